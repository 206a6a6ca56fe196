use neurodesk::infrastructure::text_processing::sanitize_extracted_text;

#[test]
fn given_ligatures_when_sanitizing_then_they_are_decomposed() {
    assert_eq!(
        sanitize_extracted_text("The ﬁrst ﬂoor"),
        "The first floor"
    );
}

#[test]
fn given_blank_line_runs_when_sanitizing_then_single_paragraph_break_remains() {
    assert_eq!(
        sanitize_extracted_text("one\n\n\n\n  \ntwo"),
        "one\n\ntwo"
    );
}

#[test]
fn given_hyphenated_line_break_when_sanitizing_then_word_is_rejoined() {
    assert_eq!(
        sanitize_extracted_text("memory manage-\nment matters"),
        "memory management matters"
    );
}

#[test]
fn given_list_markers_and_compound_words_when_sanitizing_then_hyphens_survive() {
    assert_eq!(
        sanitize_extracted_text("well-known:\n- first\n- second"),
        "well-known:\n- first\n- second"
    );
}

#[test]
fn given_tabs_nuls_and_padding_when_sanitizing_then_whitespace_is_collapsed() {
    assert_eq!(
        sanitize_extracted_text("  hello\t\t world\0  "),
        "hello world"
    );
}

#[test]
fn given_whitespace_only_when_sanitizing_then_returns_empty() {
    assert_eq!(sanitize_extracted_text(" \n\t\n "), "");
}
