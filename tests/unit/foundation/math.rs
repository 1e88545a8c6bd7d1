use super::*;

#[test]
fn over_transparent_src_keeps_dst() {
    assert_eq!(over([10, 20, 30, 40], [0, 0, 0, 0]), [10, 20, 30, 40]);
}

#[test]
fn over_opaque_src_replaces_dst() {
    assert_eq!(over([10, 20, 30, 255], [1, 2, 3, 255]), [1, 2, 3, 255]);
}

#[test]
fn over_half_alpha_onto_transparent_is_src() {
    assert_eq!(over([0, 0, 0, 0], [50, 50, 50, 128]), [50, 50, 50, 128]);
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(!over_in_place(&mut dst, &[0u8; 4]));
    assert!(over_in_place(&mut dst, &[1, 1, 1, 255, 0, 0, 0, 0]));
    assert_eq!(dst, vec![1, 1, 1, 255, 0, 0, 0, 0]);
}

#[test]
fn flatten_alpha_0_returns_bg() {
    let mut dst = vec![0u8; 4];
    assert!(flatten_over_bg(&mut dst, &[0, 0, 0, 0], [10, 20, 30, 255]));
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_alpha_255_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    assert!(flatten_over_bg(&mut dst, &src, [10, 20, 30, 255]));
    assert_eq!(dst, src);
}
