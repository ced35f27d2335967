//! Adversarial inputs for the decode pipeline.
//!
//! Garbage, truncated and hostile buffers must produce a categorized error
//! (or a valid cloud), never a panic, an inverted bound or an oversized
//! allocation.

use pcdview::{decode, encode_pcd, Encoding, PcdError, Point};
use proptest::prelude::*;

#[test]
fn empty_buffer() {
    assert!(matches!(
        decode(b"").unwrap_err(),
        PcdError::HeaderIncomplete(_)
    ));
}

#[test]
fn header_only_without_payload() {
    let err = decode(b"FIELDS x y z\nPOINTS 3\nDATA binary\n").unwrap_err();
    assert!(matches!(err, PcdError::TruncatedBuffer { record: 0, .. }));

    let err = decode(b"FIELDS x y z\nPOINTS 3\nDATA ascii\n").unwrap_err();
    assert!(matches!(err, PcdError::EmptyResult));
}

#[test]
fn absurd_point_count_does_not_allocate() {
    let err = decode(b"FIELDS x y z\nPOINTS 18446744073709551615\nDATA binary\n\0\0\0\0").unwrap_err();
    assert!(matches!(err, PcdError::TruncatedBuffer { .. }));

    let cloud = decode(b"FIELDS x y z\nPOINTS 18446744073709551615\nDATA ascii\n1 2 3\n").unwrap();
    assert_eq!(cloud.len(), 1);
}

#[test]
fn binary_bytes_before_data_line() {
    let cloud = decode(b"FIELDS x y z\n\xff\xfe\nPOINTS 1\nDATA ascii\n1 2 3\n").unwrap();
    assert_eq!(cloud.len(), 1);

    let err = decode(b"FIELDS x y z\nPOINTS 1\xff\nDATA ascii\n1 2 3\n").unwrap_err();
    assert!(matches!(err, PcdError::HeaderMalformed(_)));
}

#[test]
fn non_utf8_comment_is_skipped() {
    let cloud = decode(b"# cr\xe9\xe9 par scanner\nFIELDS x y z\nPOINTS 1\nDATA ascii\n1 2 3\n").unwrap();
    assert_eq!(cloud.len(), 1);
    assert_eq!(cloud.points()[0], Point::new(1.0, 2.0, 3.0));
}

#[test]
fn image_file_is_not_a_header() {
    let err = decode(b"FIELDS x y z\nPOINTS 1\n\x89PNG\r\n\x1a\n\0\0").unwrap_err();
    assert!(matches!(err, PcdError::HeaderIncomplete(_)));
}

#[test]
fn every_truncation_of_a_binary_file_fails_cleanly() {
    let points: Vec<Point> = (0..4).map(|i| Point::new(i as f32, 1.0, 2.0)).collect();
    let raw = encode_pcd(&points, Encoding::Binary).unwrap();
    for cut in 0..raw.len() {
        assert!(decode(&raw[..cut]).is_err(), "prefix of {} bytes decoded", cut);
    }
    assert_eq!(decode(&raw).unwrap().len(), 4);
}

#[test]
fn nan_points_are_kept_but_excluded_from_bounds() {
    let cloud = decode(b"FIELDS x y z\nPOINTS 3\nDATA ascii\nnan nan nan\n1 1 1\n-1 2 0\n").unwrap();
    assert_eq!(cloud.len(), 3);
    assert_eq!(cloud.bounds().min, [-1.0, 1.0, 0.0]);
    assert_eq!(cloud.bounds().max, [1.0, 2.0, 1.0]);
}

proptest! {
    #[test]
    fn arbitrary_bytes_never_panic(raw in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = decode(&raw);
    }

    #[test]
    fn arbitrary_payload_after_valid_header(
        payload in prop::collection::vec(any::<u8>(), 0..256),
        ascii in any::<bool>(),
    ) {
        let mode = if ascii { "ascii" } else { "binary" };
        let mut raw = format!("FIELDS x y z rgb\nSIZE 4 4 4 4\nTYPE F F F U\nPOINTS 8\nDATA {}\n", mode).into_bytes();
        raw.extend_from_slice(&payload);
        if let Ok(cloud) = decode(&raw) {
            prop_assert!(cloud.len() <= 8);
            for axis in 0..3 {
                prop_assert!(cloud.bounds().min[axis] <= cloud.bounds().max[axis]);
            }
        }
    }
}
