//! RLE565 — run-length codec, asset container, and navigation graph for
//! RGB565 asset packs.
//!
//! This crate turns a set of RGB565 images into the binary blobs a small
//! display device (an ESP8266-class microcontroller reading from an SD card)
//! consumes: one RLE-compressed stream per image, a single container file
//! with a table of contents, and a navigation table that maps the source
//! directory structure onto four-directional navigation between images.
//!
//! # Image stream format
//!
//! Every encoded image starts with an 8-byte header:
//!
//! - u32le width
//! - u32le height
//!
//! followed by a sequence of RLE packets until `width * height` pixels are
//! covered. Each packet starts with a control byte:
//!
//! ```plain
//! .- Literal packet --------------------------------.
//! |  Byte[0]   | Byte[1..=2] | ... | Byte[2n-1..=2n] |
//! |------------+-------------+-----+-----------------|
//! | n (1..127) | RGB565LE    | ... | RGB565LE        |
//! `-------------------------------------------------`
//! ```
//!
//! - control byte `1..=127`: copy the next `n` RGB565 pixels to the output
//!
//! ```plain
//! .- Repeat packet ------------------.
//! |     Byte[0]      | Byte[1..=2]   |
//! |------------------+---------------|
//! | 128+n (129..255) | RGB565LE      |
//! `----------------------------------`
//! ```
//!
//! - control byte `129..=255`: repeat one RGB565 pixel `n = control - 128`
//!   times
//!
//! The control bytes `0` and `128` are reserved and never appear in a valid
//! stream. All pixel values are little-endian RGB565 (`RRRRRGGGGGGBBBBB`).
//!
//! # Container format
//!
//! [`container::build`] packs the encoded images behind a table of contents:
//!
//! ```plain
//! { u32le offset; u32le length; }   // one TOC entry per image
//! { u32le 0;      u32le 0;      }   // sentinel terminating the TOC
//! byte[] data                       // all image streams, concatenated
//! ```
//!
//! Offsets are relative to the first byte after the sentinel, so the first
//! image always sits at offset 0.
//!
//! # Navigation format
//!
//! [`nav::build`] derives one entry per image from the directory structure,
//! in the same order as the container:
//!
//! ```plain
//! { i32le left; i32le right; i32le up; i32le down; }
//! ```
//!
//! Each field is an image index, or `-1` if there is no image in that
//! direction. Images in the same folder are chained left-to-right; an image
//! that shares its name with a folder is linked up/down with that folder's
//! images. See [`nav`] for the exact inference rules.

pub mod container;
pub mod decode;
pub mod encode;
pub mod nav;
pub mod utils;

pub use decode::{decode, decode_header, DecodeError};
pub use encode::{encode, encode_to, EncodeError};

/// Width and height as read from an encoded image header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderInfo {
    pub width: u32,
    pub height: u32,
}

/// A fully materialized RGB565 image, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u16>,
}

impl Image {
    pub fn new(width: u32, height: u32, pixels: Vec<u16>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Number of pixels the header promises, `width * height`.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

pub mod consts {
    /// Longest literal stretch or repeat run a single packet can describe.
    pub const MAX_RUN: usize = 127;

    /// Control-byte bias marking a repeat packet.
    pub const REPEAT_BASE: u8 = 128;
}
