/// Quantizes an 8-bit RGB triple down to a packed RGB565 pixel.
///
/// Bit layout of the result is `RRRRRGGGGGGBBBBB`: the top 5 bits of red,
/// top 6 of green, top 5 of blue, truncated rather than rounded so the
/// output is bit-for-bit stable for any reader reproducing it.
#[inline]
pub const fn rgb888_to_rgb565([r, g, b]: [u8; 3]) -> u16 {
    (b as u16 >> 3) | ((g as u16 & 0xFC) << 3) | ((r as u16 & 0xF8) << 8)
}

/// Expands a packed RGB565 pixel back to an 8-bit RGB triple.
///
/// Only used for inspection output; the quantization is lossy, so this is
/// not an inverse of [`rgb888_to_rgb565`].
#[inline]
pub const fn rgb565_to_rgb888(pixel: u16) -> [u8; 3] {
    let r = ((pixel >> 11) & 0b1_1111) as u32;
    let g = ((pixel >> 5) & 0b11_1111) as u32;
    let b = (pixel & 0b1_1111) as u32;

    // https://stackoverflow.com/questions/2442576/how-does-one-convert-16-bit-rgb565-to-24-bit-rgb888
    let r = (r * 527 + 23) >> 6;
    let g = (g * 259 + 33) >> 6;
    let b = (b * 527 + 23) >> 6;

    [r as u8, g as u8, b as u8]
}
