//! Infers the four-directional navigation graph from asset identifiers.
//!
//! Identifiers are slash-separated paths with the file extension stripped,
//! in the same order the assets were packed into the container. Two
//! independent relations are derived:
//!
//! - *siblings*: images sharing a parent folder are chained left-to-right;
//! - *parent/child*: an image whose name matches a folder (`menu` next to
//!   `menu/`) is linked down to that folder's first image, and every image
//!   in the folder links back up to it.
//!
//! Both relations are found by a single forward nearest-match scan, which is
//! only correct when the identifier order puts an owning image before its
//! folder's members and keeps same-folder images contiguous. [`build`]
//! checks that precondition up front and rejects input that violates it
//! instead of producing wrong links.

use snafu::Snafu;
use std::collections::HashSet;

/// Marks the absence of a neighbor in a [`NavEntry`] field.
pub const NO_LINK: i32 = -1;

/// One navigation record, index-aligned with the container's TOC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavEntry {
    pub left: i32,
    pub right: i32,
    pub up: i32,
    pub down: i32,
}

impl NavEntry {
    pub const NONE: NavEntry = NavEntry {
        left: NO_LINK,
        right: NO_LINK,
        up: NO_LINK,
        down: NO_LINK,
    };
}

#[derive(Debug, Snafu)]
pub enum NavError {
    #[snafu(display("duplicate identifier `{identifier}`"))]
    DuplicateIdentifier { identifier: String },
    #[snafu(display(
        "`{identifier}` restarts the sibling group for `{dirname}`, which is not contiguous"
    ))]
    SplitSiblingGroup {
        dirname: String,
        identifier: String,
    },
    #[snafu(display("`{member}` appears before its owning image `{owner}`"))]
    OwnerAfterMember { owner: String, member: String },
}

/// Builds the navigation table for `identifiers`, one entry per asset in
/// the same order.
///
/// For each index `i`, the nearest later identifier whose parent folder is
/// `i`'s stem-as-folder becomes `i`'s down neighbor (and `i` its up
/// neighbor); independently, the nearest later identifier sharing `i`'s
/// parent folder becomes its right neighbor, inheriting `i`'s up link so
/// every image in a folder can navigate back to the owning image, not just
/// the first.
pub fn build<S: AsRef<str>>(identifiers: &[S]) -> Result<Vec<NavEntry>, NavError> {
    let ids: Vec<&str> = identifiers.iter().map(AsRef::as_ref).collect();
    check_order(&ids)?;

    let mut nav = vec![NavEntry::NONE; ids.len()];

    for i in 0..ids.len() {
        let folder = stem_as_folder(ids[i]);
        if let Some(j) = (i + 1..ids.len()).find(|&j| dirname(ids[j]) == folder) {
            nav[i].down = j as i32;
            nav[j].up = i as i32;
        }

        if let Some(j) = (i + 1..ids.len()).find(|&j| dirname(ids[j]) == dirname(ids[i])) {
            nav[i].right = j as i32;
            nav[j].left = i as i32;
            nav[j].up = nav[i].up;
        }
    }

    Ok(nav)
}

/// Serializes navigation entries as `{ i32le left, right, up, down }`.
pub fn to_bytes(entries: &[NavEntry]) -> Vec<u8> {
    let mut out = Vec::with_capacity(entries.len() * 16);
    for entry in entries {
        out.extend_from_slice(&entry.left.to_le_bytes());
        out.extend_from_slice(&entry.right.to_le_bytes());
        out.extend_from_slice(&entry.up.to_le_bytes());
        out.extend_from_slice(&entry.down.to_le_bytes());
    }
    out
}

/// Rejects identifier sequences the nearest-match scan cannot handle.
fn check_order(ids: &[&str]) -> Result<(), NavError> {
    let mut seen = HashSet::new();
    for &id in ids {
        if !seen.insert(id) {
            return DuplicateIdentifierSnafu { identifier: id }.fail();
        }
    }

    // Same-folder images must form one contiguous block, or the sibling
    // chain would skip over unrelated entries.
    let mut closed: HashSet<&str> = HashSet::new();
    let mut current: Option<&str> = None;
    for &id in ids {
        let dir = dirname(id);
        if current != Some(dir) {
            if let Some(prev) = current {
                closed.insert(prev);
            }
            if closed.contains(dir) {
                return SplitSiblingGroupSnafu {
                    dirname: dir,
                    identifier: id,
                }
                .fail();
            }
            current = Some(dir);
        }
    }

    // An owning image must precede every member of its folder, or the
    // forward scan would never find the up/down pair.
    for (i, &member) in ids.iter().enumerate() {
        let dir = dirname(member);
        if let Some(&owner) = ids[i + 1..]
            .iter()
            .find(|&&later| stem_as_folder(later) == dir)
        {
            return OwnerAfterMemberSnafu { owner, member }.fail();
        }
    }

    Ok(())
}

/// The parent folder of an identifier, `""` at the root.
fn dirname(id: &str) -> &str {
    id.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// The folder an image would own: its identifier with the extension
/// stripped, interpreted as a path.
fn stem_as_folder(id: &str) -> String {
    let (dir, base) = id.rsplit_once('/').unwrap_or(("", id));
    let stem = match base.rfind('.') {
        Some(i) if i > 0 => &base[..i],
        _ => base,
    };
    if dir.is_empty() {
        stem.to_owned()
    } else {
        format!("{dir}/{stem}")
    }
}

#[cfg(test)]
mod tests {
    use super::{dirname, stem_as_folder};

    #[test]
    fn dirname_splits_on_last_slash() {
        assert_eq!(dirname("images/a/yes"), "images/a");
        assert_eq!(dirname("images/a"), "images");
        assert_eq!(dirname("a"), "");
    }

    #[test]
    fn stem_as_folder_strips_extension() {
        assert_eq!(stem_as_folder("images/a.bmp"), "images/a");
        assert_eq!(stem_as_folder("images/a"), "images/a");
        assert_eq!(stem_as_folder("a.png"), "a");
        assert_eq!(stem_as_folder(".hidden"), ".hidden");
    }
}
