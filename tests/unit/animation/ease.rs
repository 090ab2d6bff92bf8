use super::*;

#[test]
fn eases_fix_endpoints() {
    for ease in [
        Ease::Linear,
        Ease::Smooth,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutCubic,
    ] {
        assert!(ease.apply(0.0).abs() < 1e-12, "{ease:?}");
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-12, "{ease:?}");
    }
}

#[test]
fn there_and_back_peaks_at_midpoint() {
    assert!(Ease::ThereAndBack.apply(0.0).abs() < 1e-12);
    assert!((Ease::ThereAndBack.apply(0.5) - 1.0).abs() < 1e-12);
    assert!(Ease::ThereAndBack.apply(1.0).abs() < 1e-12);
}

#[test]
fn input_is_clamped() {
    assert_eq!(Ease::Linear.apply(-3.0), 0.0);
    assert_eq!(Ease::Linear.apply(7.0), 1.0);
}
