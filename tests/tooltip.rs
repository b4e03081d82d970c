use ghg_rs::tooltip::{ANCHOR_OFFSET, EDGE_PAD, Point, Size, clamp_tooltip};

const VIEW: Size = Size {
    width: 1000.0,
    height: 800.0,
};

#[test]
fn prefers_above_right_of_the_pointer() {
    let p = clamp_tooltip(Point::new(300.0, 400.0), Size::new(200.0, 100.0), VIEW);
    assert_eq!(p, Point::new(300.0 + ANCHOR_OFFSET, 400.0 - 100.0 - ANCHOR_OFFSET));
}

#[test]
fn drops_below_near_the_top_edge() {
    let p = clamp_tooltip(Point::new(300.0, 50.0), Size::new(200.0, 100.0), VIEW);
    assert_eq!(p.y, 50.0 + ANCHOR_OFFSET);
}

#[test]
fn stays_inside_the_bottom_right_corner() {
    let p = clamp_tooltip(Point::new(990.0, 790.0), Size::new(200.0, 100.0), VIEW);
    assert_eq!(p, Point::new(790.0, 674.0));
    assert!(p.x + 200.0 + EDGE_PAD <= VIEW.width);
    assert!(p.y + 100.0 + EDGE_PAD <= VIEW.height);
}

#[test]
fn oversized_box_is_pinned_to_the_padding() {
    let p = clamp_tooltip(Point::new(500.0, 400.0), Size::new(2000.0, 2000.0), VIEW);
    assert_eq!(p, Point::new(EDGE_PAD, EDGE_PAD));
}
