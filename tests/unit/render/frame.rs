use super::*;

fn two_pixel_frame() -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 1,
        data: vec![0, 0, 0, 0, 100, 100, 100, 255],
        premultiplied: true,
    }
}

#[test]
fn covered_pixels_counts_nonzero_alpha() {
    assert_eq!(two_pixel_frame().covered_pixels(), 1);
}

#[test]
fn flatten_fills_transparent_pixels_with_background() {
    let out = two_pixel_frame()
        .flatten_over(Rgba8::new(18, 20, 28, 255))
        .unwrap();
    assert_eq!(out, vec![18, 20, 28, 255, 100, 100, 100, 255]);
}

#[test]
fn flatten_rejects_straight_alpha_frames() {
    let mut f = two_pixel_frame();
    f.premultiplied = false;
    assert!(f.flatten_over(Rgba8::new(0, 0, 0, 255)).is_err());
}

#[test]
fn save_png_roundtrips_dimensions() {
    let dir = std::env::temp_dir().join(format!("plum_frame_png_{}", std::process::id()));
    let path = dir.join("two.png");
    two_pixel_frame()
        .save_png(&path, Rgba8::new(0, 0, 0, 255))
        .unwrap();
    let img = image::open(&path).unwrap();
    assert_eq!(img.width(), 2);
    assert_eq!(img.height(), 1);
    let _ = std::fs::remove_dir_all(&dir);
}
