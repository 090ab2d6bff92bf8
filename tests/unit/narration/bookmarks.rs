use super::*;

#[test]
fn labels_are_lettered() {
    assert_eq!(bookmark_label(0), "A");
    assert_eq!(bookmark_label(2), "C");
    assert_eq!(bookmark_label(25), "Z");
    assert_eq!(bookmark_label(26), "AA");
    assert_eq!(bookmark_label(27), "AB");
    assert_eq!(bookmark_label(26 + 26 * 26), "AAA");
}

#[test]
fn marker_format() {
    assert_eq!(bookmark_marker("B"), "<bookmark mark='B'/>");
}

#[test]
fn parse_records_word_positions() {
    let text = format!(
        "{}Draw the triangle. {}Now its   circumcircle.{} done",
        bookmark_marker("A"),
        bookmark_marker("B"),
        bookmark_marker("C"),
    );
    let parsed = parse_bookmarks(&text).unwrap();
    assert_eq!(parsed.plain, "Draw the triangle. Now its circumcircle. done");
    assert_eq!(parsed.word_count(), 7);
    let marks: Vec<_> = parsed
        .bookmarks
        .iter()
        .map(|b| (b.mark.as_str(), b.word_index))
        .collect();
    assert_eq!(marks, vec![("A", 0), ("B", 3), ("C", 6)]);
}

#[test]
fn double_quotes_are_accepted() {
    let parsed = parse_bookmarks(r#"one <bookmark mark="X"/> two"#).unwrap();
    assert_eq!(parsed.bookmarks[0].mark, "X");
    assert_eq!(parsed.bookmarks[0].word_index, 1);
}

#[test]
fn malformed_markers_are_narration_errors() {
    for text in [
        "one <bookmark mark='A' two",
        "<bookmark/> two",
        "<bookmark mark=A/>",
        "<bookmark mark=''/>",
        "<bookmark mark='A'/> x <bookmark mark='A'/>",
    ] {
        let err = parse_bookmarks(text).unwrap_err();
        assert!(matches!(err, GeomotionError::Narration(_)), "{text}");
    }
}
