use super::*;
use std::f64::consts::{FRAC_PI_2, PI};

fn painter() -> Painter {
    Painter::new(Canvas::new(100, 80))
}

#[test]
fn push_pop_restores_style_and_transform() {
    let mut p = painter();
    p.fill(Rgba8::rgb(1, 2, 3));
    p.push();
    p.fill(Rgba8::rgb(9, 9, 9));
    p.translate(10.0, 5.0);
    p.ellipse(0.0, 0.0, 4.0, 4.0);
    p.pop();
    p.ellipse(0.0, 0.0, 4.0, 4.0);

    let list = p.finish();
    let [first, second] = list.ops.as_slice() else {
        panic!("expected two ops, got {:?}", list.ops);
    };
    let DrawOp::Ellipse {
        transform, paint, ..
    } = first
    else {
        panic!("expected ellipse");
    };
    assert_eq!(*transform, Affine::translate(Vec2::new(10.0, 5.0)));
    assert_eq!(paint.fill, Some(Rgba8::rgb(9, 9, 9)));

    let DrawOp::Ellipse {
        transform, paint, ..
    } = second
    else {
        panic!("expected ellipse");
    };
    assert_eq!(*transform, Affine::IDENTITY);
    assert_eq!(paint.fill, Some(Rgba8::rgb(1, 2, 3)));
}

#[test]
fn unmatched_pop_is_ignored() {
    let mut p = painter();
    p.pop();
    p.rect(0.0, 0.0, 1.0, 1.0);
    assert_eq!(p.finish().ops.len(), 1);
}

#[test]
fn invisible_shapes_are_not_recorded() {
    let mut p = painter();
    p.no_fill();
    p.no_stroke();
    p.rect(0.0, 0.0, 10.0, 10.0);
    p.ellipse(0.0, 0.0, 10.0, 10.0);
    p.line(0.0, 0.0, 10.0, 10.0);
    p.text("hidden", 0.0, 0.0);
    assert!(p.finish().is_empty());
}

#[test]
fn arc_wraps_negative_sweep() {
    let mut p = painter();
    p.arc(0.0, 0.0, 10.0, 10.0, 3.0 * PI / 2.0, FRAC_PI_2, ArcMode::Pie);
    let list = p.finish();
    let Some(DrawOp::Arc {
        sweep_angle, mode, ..
    }) = list.ops.first()
    else {
        panic!("expected arc");
    };
    assert!((sweep_angle - PI).abs() < 1e-12);
    assert_eq!(*mode, ArcMode::Pie);
}

#[test]
fn empty_arc_is_skipped() {
    let mut p = painter();
    p.arc(0.0, 0.0, 10.0, 10.0, -FRAC_PI_2, -FRAC_PI_2, ArcMode::Open);
    assert!(p.finish().is_empty());
}

#[test]
fn text_uses_fill_and_text_state() {
    let mut p = painter();
    p.fill(Rgba8::gray(40));
    p.text_size(28.0);
    p.text_align(AlignX::Center, AlignY::Center);
    p.text_font("Georgia");
    p.text("title", 50.0, 30.0);

    let list = p.finish();
    assert_eq!(list.texts(), vec!["title"]);
    let Some(DrawOp::Text { style, origin, .. }) = list.ops.first() else {
        panic!("expected text");
    };
    assert_eq!(style.size_px, 28.0);
    assert_eq!(style.align_x, AlignX::Center);
    assert_eq!(style.family, "Georgia");
    assert_eq!(style.color, Rgba8::gray(40));
    assert_eq!(*origin, Point::new(50.0, 30.0));
}

#[test]
fn text_records_active_stroke_as_outline() {
    let mut p = painter();
    p.stroke(Rgba8::gray(200));
    p.stroke_weight(2.0);
    p.text("ruled", 10.0, 10.0);
    p.no_stroke();
    p.text("plain", 10.0, 30.0);

    let list = p.finish();
    let outlines: Vec<_> = list
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { style, .. } => Some(style.outline),
            _ => None,
        })
        .collect();
    assert_eq!(outlines.len(), 2);
    let outline = outlines[0].expect("stroke was active");
    assert_eq!(outline.color, Rgba8::gray(200));
    assert_eq!(outline.width, 2.0);
    assert_eq!(outlines[1], None);
}
