use super::*;

#[test]
fn point_input_accepts_every_representation() {
    let expected = Point::new(1.0, 2.0);
    assert_eq!(PointInput::from((1.0, 2.0)).resolve().unwrap(), expected);
    assert_eq!(PointInput::from((1.0, 2.0, 0.0)).resolve().unwrap(), expected);
    assert_eq!(PointInput::from([1.0, 2.0]).resolve().unwrap(), expected);
    assert_eq!(PointInput::from(vec![1.0, 2.0]).resolve().unwrap(), expected);
    assert_eq!(PointInput::from(expected).resolve().unwrap(), expected);
    assert_eq!(
        PointInput::from(Complex::new(1.0, 2.0)).resolve().unwrap(),
        expected
    );
}

#[test]
fn point_input_rejects_wrong_arity() {
    let err = PointInput::from(vec![1.0]).resolve().unwrap_err();
    assert!(matches!(err, GeomotionError::InvalidInput(_)));
    let err = PointInput::from(vec![1.0, 2.0, 3.0, 4.0])
        .resolve()
        .unwrap_err();
    assert!(matches!(err, GeomotionError::InvalidInput(_)));
}

#[test]
fn point_input_rejects_off_plane_and_non_finite() {
    assert!(PointInput::from((0.0, 0.0, 1.0)).resolve().is_err());
    assert!(PointInput::from((f64::NAN, 0.0)).resolve().is_err());
}

#[test]
fn color_parses_hex_and_arrays() {
    let c = Color::from_hex("#ff000080").unwrap();
    assert_eq!(c.r, 1.0);
    assert!((c.a - 128.0 / 255.0).abs() < 1e-12);

    let c: Color = serde_json::from_str("[0.0, 0.5, 1.0]").unwrap();
    assert_eq!(c, Color::rgb(0.0, 0.5, 1.0));

    let c: Color = serde_json::from_str(r#"{"r":1,"g":1,"b":1}"#).unwrap();
    assert_eq!(c, Color::WHITE);

    assert!(Color::from_hex("#abc").is_err());
    assert!(serde_json::from_str::<Color>("[1.0]").is_err());
}
