use crate::{
    consts::{MAX_RUN, REPEAT_BASE},
    Image,
};
use byteorder::{LittleEndian, WriteBytesExt};
use itertools::Itertools;
use snafu::{ensure, ResultExt, Snafu};
use std::io::Write;

#[derive(Debug, Snafu)]
pub enum EncodeError {
    #[snafu(display(
        "Specified image dimensions don't match the number of pixels: {width} * {height} == {} pixels, but {pixel_count} pixels were given",
        width * height
    ))]
    InvalidDimensions {
        width: u32,
        height: u32,
        pixel_count: usize,
    },
    #[snafu(display("RLE packets cover {actual} pixels, expected {expected}"))]
    PixelCountMismatch { expected: usize, actual: usize },
    WriteIo { source: std::io::Error },
}

/// One RLE packet, as serialized behind a control byte.
///
/// The control byte is the discriminant: `1..=127` is a literal and doubles
/// as the pixel count, `129..=255` is a repeat storing `128 + count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    Literal(Vec<u16>),
    Repeat { value: u16, count: u8 },
}

impl Packet {
    /// Number of output pixels this packet expands to.
    pub fn pixel_count(&self) -> usize {
        match self {
            Packet::Literal(values) => values.len(),
            Packet::Repeat { count, .. } => usize::from(*count),
        }
    }

    fn write_to<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        match self {
            Packet::Literal(values) => {
                w.write_u8(values.len() as u8)?;
                for &value in values {
                    w.write_u16::<LittleEndian>(value)?;
                }
            }
            Packet::Repeat { value, count } => {
                w.write_u8(REPEAT_BASE + count)?;
                w.write_u16::<LittleEndian>(*value)?;
            }
        }
        Ok(())
    }
}

/// Groups a pixel sequence into RLE packets.
///
/// Maximal runs of equal pixels become [`Packet::Repeat`]s, split at the
/// 127-pixel packet limit. Isolated pixels accumulate into a shared
/// [`Packet::Literal`], also capped at 127; any repeat run closes the open
/// literal.
pub fn packets(pixels: &[u16]) -> Vec<Packet> {
    let mut out = Vec::new();

    for (value, group) in &pixels.iter().copied().group_by(|&p| p) {
        let run = group.count();
        if run == 1 {
            match out.last_mut() {
                Some(Packet::Literal(values)) if values.len() < MAX_RUN => values.push(value),
                _ => out.push(Packet::Literal(vec![value])),
            }
        } else {
            let mut remaining = run;
            while remaining > 0 {
                let count = remaining.min(MAX_RUN);
                out.push(Packet::Repeat {
                    value,
                    count: count as u8,
                });
                remaining -= count;
            }
        }
    }

    out
}

/// Encodes an image to a freshly allocated stream.
pub fn encode(image: &Image) -> Result<Vec<u8>, EncodeError> {
    // Worst case is all-literal: 2 bytes per pixel plus one control byte
    // per 127 pixels, on top of the 8-byte header.
    let mut out = Vec::with_capacity(8 + image.pixels.len() * 2 + image.pixels.len() / MAX_RUN + 1);
    encode_to(image, &mut out)?;
    Ok(out)
}

/// Encodes an image to a writer: the `(width, height)` header followed by
/// RLE packets covering every pixel.
pub fn encode_to<W: Write>(image: &Image, mut w: W) -> Result<(), EncodeError> {
    ensure!(
        image.pixel_count() == image.pixels.len(),
        InvalidDimensionsSnafu {
            width: image.width,
            height: image.height,
            pixel_count: image.pixels.len(),
        }
    );

    let packets = packets(&image.pixels);

    // The grouping pass is total, so this only trips on a codec bug.
    let covered: usize = packets.iter().map(Packet::pixel_count).sum();
    ensure!(
        covered == image.pixels.len(),
        PixelCountMismatchSnafu {
            expected: image.pixels.len(),
            actual: covered,
        }
    );

    w.write_u32::<LittleEndian>(image.width)
        .context(WriteIoSnafu)?;
    w.write_u32::<LittleEndian>(image.height)
        .context(WriteIoSnafu)?;
    for packet in &packets {
        packet.write_to(&mut w).context(WriteIoSnafu)?;
    }

    Ok(())
}
