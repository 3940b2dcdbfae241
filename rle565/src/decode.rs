use crate::{consts::REPEAT_BASE, HeaderInfo, Image};
use byteorder::{ByteOrder, LittleEndian};
use snafu::{ensure, Snafu};

#[derive(Debug, Snafu)]
pub enum DecodeError {
    UnexpectedEof,
    #[snafu(display("reserved control byte {byte:#04x} in RLE stream"))]
    ReservedControlByte { byte: u8 },
    #[snafu(display("RLE stream covers {actual} pixels, header promises {expected}"))]
    PixelCountMismatch { expected: usize, actual: usize },
}

/// Reads just the `(width, height)` header of an encoded image.
pub fn decode_header(data: &[u8]) -> Result<HeaderInfo, DecodeError> {
    ensure!(data.len() >= 8, UnexpectedEofSnafu);
    Ok(HeaderInfo {
        width: LittleEndian::read_u32(&data[0..4]),
        height: LittleEndian::read_u32(&data[4..8]),
    })
}

/// Decodes an encoded image stream back into pixels.
///
/// Decoding stops once `width * height` pixels have been produced; trailing
/// bytes are left unconsumed, since a container reader bounds each asset by
/// its TOC length rather than by the stream itself.
pub fn decode(data: &[u8]) -> Result<Image, DecodeError> {
    let HeaderInfo { width, height } = decode_header(data)?;
    let expected = width as usize * height as usize;

    let mut pixels = Vec::with_capacity(expected);
    let mut data = data[8..].iter().copied();
    let mut next = || data.next().ok_or(DecodeError::UnexpectedEof);

    while pixels.len() < expected {
        let control = next()?;

        if control == 0 || control == REPEAT_BASE {
            return ReservedControlByteSnafu { byte: control }.fail();
        }

        if control < REPEAT_BASE {
            for _ in 0..control {
                pixels.push(u16::from_le_bytes([next()?, next()?]));
            }
        } else {
            let count = usize::from(control - REPEAT_BASE);
            let value = u16::from_le_bytes([next()?, next()?]);
            pixels.extend(core::iter::repeat(value).take(count));
        }
    }

    // A packet may overrun the pixel total from the header.
    ensure!(
        pixels.len() == expected,
        PixelCountMismatchSnafu {
            expected,
            actual: pixels.len(),
        }
    );

    Ok(Image {
        width,
        height,
        pixels,
    })
}
