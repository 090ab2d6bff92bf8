use super::*;

#[test]
fn endpoints_are_exact() {
    let a = Point::new(1.0, -1.0);
    let b = Point::new(3.0, 5.0);
    assert_eq!(<Point as Lerp>::lerp(&a, &b, 0.0), a);
    assert_eq!(<Point as Lerp>::lerp(&a, &b, 1.0), b);
    assert_eq!(<Point as Lerp>::lerp(&a, &b, 0.5), Point::new(2.0, 2.0));
}

#[test]
fn rect_interpolates_each_edge() {
    let a = kurbo::Rect::new(0.0, 0.0, 2.0, 2.0);
    let b = kurbo::Rect::new(2.0, 2.0, 6.0, 6.0);
    assert_eq!(
        <kurbo::Rect as Lerp>::lerp(&a, &b, 0.5),
        kurbo::Rect::new(1.0, 1.0, 4.0, 4.0)
    );
}
