use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    let ntsc = Fps::new(30000, 1001).unwrap();
    assert_eq!((ntsc.num, ntsc.den), (30000, 1001));
}

#[test]
fn viewport_canvas_uses_document_height() {
    let vp = Viewport {
        inner_width: 1280,
        document_height: 4000,
    };
    assert_eq!(
        vp.canvas(),
        Canvas {
            width: 1280,
            height: 4000
        }
    );
    assert_eq!(vp.canvas().rgba8_len(), 1280 * 4000 * 4);
}

#[test]
fn premultiply_half_alpha() {
    let p = Rgba8::new(214, 213, 209, 128).premultiplied();
    assert_eq!(p.a, 128);
    assert_eq!(p.r, 107);
    assert_eq!(p.b, 105);
    assert_eq!(Rgba8Premul::from_straight_rgba(9, 9, 9, 0).to_array(), [0, 0, 0, 0]);
}

#[test]
fn default_stroke_matches_backdrop_look() {
    let s = StrokeStyle::default();
    assert_eq!(s.color, Rgba8::new(214, 213, 209, 128));
    assert_eq!(s.width, 0.5);
}
