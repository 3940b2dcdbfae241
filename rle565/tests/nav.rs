use rle565::nav::{build, to_bytes, NavEntry, NavError, NO_LINK};

fn entry(left: i32, right: i32, up: i32, down: i32) -> NavEntry {
    NavEntry {
        left,
        right,
        up,
        down,
    }
}

#[test]
fn folder_owned_by_same_named_image() {
    // images/
    //   a.bmp  b.bmp
    //   a/
    //     yes.bmp  no.bmp
    let ids = ["images/a", "images/b", "images/a/yes", "images/a/no"];
    let nav = build(&ids).unwrap();

    assert_eq!(
        nav,
        [
            entry(-1, 1, -1, 2), // a
            entry(0, -1, -1, -1), // b
            entry(-1, 3, 0, -1), // a/yes
            entry(2, -1, 0, -1), // a/no
        ]
    );
}

#[test]
fn sibling_and_parent_links_are_symmetric() {
    let ids = [
        "menu",
        "settings",
        "menu/options",
        "menu/start",
        "menu/options/high",
        "menu/options/low",
    ];
    let nav = build(&ids).unwrap();

    for (i, e) in nav.iter().enumerate() {
        let i = i as i32;
        if e.right != NO_LINK {
            assert_ne!(e.right, i);
            assert_eq!(nav[e.right as usize].left, i);
        }
        if e.down != NO_LINK {
            assert_ne!(e.down, i);
            assert_eq!(nav[e.down as usize].up, i);
        }
        // a sibling inherits its predecessor's parent link
        if e.right != NO_LINK && e.up != NO_LINK {
            assert_eq!(nav[e.right as usize].up, e.up);
        }
    }

    // every image under menu/options can navigate up to the owning image
    assert_eq!(nav[4].up, 2);
    assert_eq!(nav[5].up, 2);
    // both images in menu/ go up to menu itself
    assert_eq!(nav[2].up, 0);
    assert_eq!(nav[3].up, 0);
}

#[test]
fn only_the_nearest_match_is_linked() {
    let ids = ["top", "top/first", "top/second", "top/third"];
    let nav = build(&ids).unwrap();

    assert_eq!(nav[0].down, 1);
    assert_eq!(nav[1].up, 0);
    // chained siblings, not repeated down links
    assert_eq!(nav[1].right, 2);
    assert_eq!(nav[2].right, 3);
    assert_eq!(nav[0].right, NO_LINK);
}

#[test]
fn single_image_has_no_links() {
    let nav = build(&["lonely"]).unwrap();
    assert_eq!(nav, [entry(-1, -1, -1, -1)]);
}

#[test]
fn duplicate_identifiers_are_rejected() {
    assert!(matches!(
        build(&["a", "b", "a"]),
        Err(NavError::DuplicateIdentifier { .. })
    ));
}

#[test]
fn split_sibling_groups_are_rejected() {
    assert!(matches!(
        build(&["m/x", "n/y", "m/z"]),
        Err(NavError::SplitSiblingGroup { .. })
    ));
}

#[test]
fn owner_after_member_is_rejected() {
    assert!(matches!(
        build(&["images/a/yes", "images/a"]),
        Err(NavError::OwnerAfterMember { .. })
    ));
}

#[test]
fn serialization_is_left_right_up_down() {
    let entries = [entry(-1, 1, -1, 2), entry(0, -1, -1, -1)];
    let bytes = to_bytes(&entries);

    assert_eq!(bytes.len(), 32);
    assert_eq!(&bytes[0..4], &(-1i32).to_le_bytes());
    assert_eq!(&bytes[4..8], &1i32.to_le_bytes());
    assert_eq!(&bytes[8..12], &(-1i32).to_le_bytes());
    assert_eq!(&bytes[12..16], &2i32.to_le_bytes());
    assert_eq!(&bytes[16..20], &0i32.to_le_bytes());
}
