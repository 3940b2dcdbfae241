use rle565::{consts::REPEAT_BASE, decode, encode, Image};

/// Walks the RLE body of `blob`, asserting every control byte is in the
/// legal domain, and returns how many pixels the packets cover.
fn walk_packets(blob: &[u8]) -> usize {
    let expected = {
        let w = u32::from_le_bytes(blob[0..4].try_into().unwrap()) as usize;
        let h = u32::from_le_bytes(blob[4..8].try_into().unwrap()) as usize;
        w * h
    };

    let mut covered = 0usize;
    let mut i = 8;
    while covered < expected {
        let control = blob[i];
        assert!(
            control != 0 && control != REPEAT_BASE,
            "reserved control byte {control} at {i}"
        );
        i += 1;
        if control < REPEAT_BASE {
            covered += usize::from(control);
            i += 2 * usize::from(control);
        } else {
            covered += usize::from(control - REPEAT_BASE);
            i += 2;
        }
    }
    assert_eq!(i, blob.len(), "trailing bytes after the last packet");
    covered
}

fn assert_roundtrip(image: &Image) {
    let blob = encode(image).unwrap();
    assert_eq!(walk_packets(&blob), image.pixels.len());

    let decoded = decode(&blob).unwrap();
    assert_eq!(decoded.width, image.width);
    assert_eq!(decoded.height, image.height);
    assert_eq!(decoded.pixels, image.pixels);
}

#[test]
fn solid_image() {
    assert_roundtrip(&Image::new(64, 48, vec![0x07E0; 64 * 48]));
}

#[test]
fn gradient_image() {
    let pixels = (0..320u32 * 240).map(|i| (i % 65536) as u16).collect();
    assert_roundtrip(&Image::new(320, 240, pixels));
}

#[test]
fn alternating_pixels() {
    let pixels = (0..100)
        .map(|i| if i % 2 == 0 { 0 } else { 0xFFFF })
        .collect();
    assert_roundtrip(&Image::new(10, 10, pixels));
}

#[test]
fn noisy_image() {
    // simple LCG, deterministic across runs
    let mut state = 0x2F6E2B1u32;
    let pixels = (0..160 * 120)
        .map(|_| {
            state = state.wrapping_mul(25173).wrapping_add(13849);
            (state >> 8) as u16
        })
        .collect();
    assert_roundtrip(&Image::new(160, 120, pixels));
}

#[test]
fn banded_image() {
    // runs of varying lengths interleaved with singletons, crossing the
    // 127-pixel packet limit a few times
    let mut pixels = Vec::new();
    for band in 0u16..20 {
        let run = 1 + (usize::from(band) * 37) % 300;
        pixels.extend(std::iter::repeat(band << 5).take(run));
        pixels.push(0xA5A5);
    }
    let len = pixels.len() as u32;
    assert_roundtrip(&Image::new(len, 1, pixels));
}

#[test]
fn single_pixel_image() {
    assert_roundtrip(&Image::new(1, 1, vec![0x1234]));
}
