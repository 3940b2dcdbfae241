//! The multi-asset container: a table of contents followed by the
//! concatenated image streams.
//!
//! Each TOC entry is `{ u32le offset; u32le length }`, with offsets relative
//! to the first byte after the `(0, 0)` sentinel that terminates the table.
//! Asset `i` therefore starts at file position `8 * (N + 1) + offset_i` for a
//! container of `N` assets.

use byteorder::{LittleEndian, ReadBytesExt};
use snafu::{ensure, OptionExt, Snafu};

/// Size of one serialized TOC entry (and of the sentinel).
pub const TOC_ENTRY_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TocEntry {
    pub offset: u32,
    pub length: u32,
}

#[derive(Debug, Snafu)]
pub enum ContainerError {
    #[snafu(display("container ends mid-TOC-entry"))]
    TruncatedToc,
    #[snafu(display("container TOC is not terminated by a (0, 0) sentinel"))]
    MissingSentinel,
    #[snafu(display(
        "TOC entry {index} (offset {offset}, length {length}) points outside the data region of {data_len} bytes"
    ))]
    AssetOutOfBounds {
        index: usize,
        offset: u32,
        length: u32,
        data_len: usize,
    },
}

/// Packs encoded image blobs into a single container file.
///
/// Offsets are accumulated in traversal order, so asset `i`'s offset is the
/// sum of the lengths of assets `0..i`, starting at 0.
pub fn build<B: AsRef<[u8]>>(blobs: &[B]) -> Vec<u8> {
    let data_len: usize = blobs.iter().map(|b| b.as_ref().len()).sum();
    let mut out = Vec::with_capacity(TOC_ENTRY_SIZE * (blobs.len() + 1) + data_len);

    let mut offset = 0u32;
    for blob in blobs {
        let blob = blob.as_ref();
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(&(blob.len() as u32).to_le_bytes());
        offset += blob.len() as u32;
    }
    // sentinel
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());

    for blob in blobs {
        out.extend_from_slice(blob.as_ref());
    }

    out
}

/// A parsed view over a container file, borrowing the underlying bytes.
#[derive(Debug)]
pub struct Container<'a> {
    entries: Vec<TocEntry>,
    data: &'a [u8],
}

impl<'a> Container<'a> {
    /// Walks the TOC up to the sentinel and validates that every entry lies
    /// inside the data region.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, ContainerError> {
        let mut cursor = bytes;
        let mut entries = Vec::new();

        loop {
            let offset = cursor
                .read_u32::<LittleEndian>()
                .ok()
                .context(MissingSentinelSnafu)?;
            let length = cursor
                .read_u32::<LittleEndian>()
                .ok()
                .context(TruncatedTocSnafu)?;
            if offset == 0 && length == 0 {
                break;
            }
            entries.push(TocEntry { offset, length });
        }

        let data = cursor;
        for (index, entry) in entries.iter().enumerate() {
            let end = entry.offset as usize + entry.length as usize;
            ensure!(
                end <= data.len(),
                AssetOutOfBoundsSnafu {
                    index,
                    offset: entry.offset,
                    length: entry.length,
                    data_len: data.len(),
                }
            );
        }

        Ok(Self { entries, data })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    /// The bytes of asset `index`, or `None` past the end of the TOC.
    pub fn asset(&self, index: usize) -> Option<&'a [u8]> {
        let entry = self.entries.get(index)?;
        let start = entry.offset as usize;
        Some(&self.data[start..start + entry.length as usize])
    }

    /// Iterates over all asset byte slices in TOC order.
    pub fn assets(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        let data = self.data;
        self.entries
            .iter()
            .map(move |entry| &data[entry.offset as usize..entry.offset as usize + entry.length as usize])
    }
}
