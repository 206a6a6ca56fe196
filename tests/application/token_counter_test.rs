use neurodesk::application::services::count_tokens;

#[test]
fn given_empty_string_when_counting_then_returns_zero() {
    assert_eq!(count_tokens(""), 0);
}

#[test]
fn given_short_sentence_when_counting_then_returns_small_positive_count() {
    let result = count_tokens("Hello, world!");
    assert!(result > 0);
    assert!(result < 10);
}

#[test]
fn given_longer_text_when_counting_then_count_grows() {
    let short = count_tokens("ownership");
    let long = count_tokens(&"ownership and borrowing ".repeat(20));
    assert!(long > short);
}
