use super::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn complex_division_inverts_multiplication() {
    let a = Complex::new(3.0, -1.0);
    let b = Complex::new(0.5, 2.0);
    let q = a.mul(b).checked_div(b).unwrap();
    assert!(close(q.re, a.re) && close(q.im, a.im));
}

#[test]
fn complex_division_by_zero_is_arithmetic_error() {
    let err = Complex::new(1.0, 1.0)
        .checked_div(Complex::new(0.0, 0.0))
        .unwrap_err();
    assert!(matches!(err, GeomotionError::Arithmetic(_)));
}

#[test]
fn lines_intersect_or_report_parallel() {
    let a = Line::new((0.0, 0.0), (2.0, 2.0));
    let b = Line::new((0.0, 2.0), (2.0, 0.0));
    let p = line_line_intersection(a, b).unwrap();
    assert!(close(p.x, 1.0) && close(p.y, 1.0));

    let c = Line::new((0.0, 1.0), (2.0, 3.0));
    assert!(line_line_intersection(a, c).is_none());
}

#[test]
fn circle_line_hits_are_ordered_along_line() {
    let circle = Circle::new((0.0, 0.0), 1.0);
    let hits = circle_line_intersections(circle, Line::new((-5.0, 0.0), (5.0, 0.0)));
    assert_eq!(hits.len(), 2);
    assert!(close(hits[0].x, -1.0) && close(hits[1].x, 1.0));

    let tangent = circle_line_intersections(circle, Line::new((-5.0, 1.0), (5.0, 1.0)));
    assert_eq!(tangent.len(), 1);

    let miss = circle_line_intersections(circle, Line::new((-5.0, 2.0), (5.0, 2.0)));
    assert!(miss.is_empty());
}

#[test]
fn angle_sweep_is_counter_clockwise() {
    let (start, sweep) =
        angle_sweep(Point::ORIGIN, Point::new(1.0, 0.0), Point::new(0.0, 1.0)).unwrap();
    assert!(close(start, 0.0));
    assert!(close(sweep, std::f64::consts::FRAC_PI_2));
    assert!(angle_sweep(Point::ORIGIN, Point::ORIGIN, Point::new(0.0, 1.0)).is_err());
}

#[test]
fn conic_implicit_form_vanishes_on_defining_point() {
    let f1 = Point::new(-1.0, 0.5);
    let f2 = Point::new(2.0, 1.5);
    let p = Point::new(0.3, 3.0);

    let ellipse = Conic::ellipse_from_foci(f1, f2, p).unwrap();
    assert!(ellipse.eval(p).abs() < 1e-9);
    let (g1, g2) = ellipse.foci();
    assert!(g1.distance(f1) < 1e-9 && g2.distance(f2) < 1e-9);

    let hyperbola = Conic::hyperbola_from_foci(f1, f2, p).unwrap();
    assert!(hyperbola.eval(p).abs() < 1e-9);
    assert!(hyperbola.eval(hyperbola.local_to_scene(hyperbola.a, 0.0)).abs() < 1e-9);
}

#[test]
fn degenerate_conics_are_rejected() {
    let f = Point::new(1.0, 1.0);
    assert!(Conic::hyperbola_from_foci(f, f, Point::new(3.0, 3.0)).is_err());
    // Point on the perpendicular bisector has equal focal distances.
    assert!(
        Conic::hyperbola_from_foci(Point::new(-1.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 2.0))
            .is_err()
    );
    assert!(
        Conic::ellipse_from_foci(Point::new(-1.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 0.0))
            .is_err()
    );
}
