use super::*;

#[test]
fn display_prefixes_are_stable() {
    let cases = [
        (GeomotionError::invalid_input("x"), "invalid input:"),
        (GeomotionError::arithmetic("x"), "arithmetic error:"),
        (GeomotionError::index_out_of_range("x"), "index out of range:"),
        (GeomotionError::count_mismatch("x"), "count mismatch:"),
        (GeomotionError::lookup_miss("x"), "lookup miss:"),
        (GeomotionError::cycle("x"), "dependency cycle:"),
        (GeomotionError::playback("x"), "playback error:"),
        (GeomotionError::narration("x"), "narration error:"),
        (GeomotionError::config("x"), "config error:"),
    ];
    for (err, prefix) in cases {
        assert!(err.to_string().starts_with(prefix), "{err}");
    }
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GeomotionError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
