use flatjson::{Error, TokenStore, INITIAL_CAPACITY};
use rstest::rstest;

#[rstest]
fn five_token_document_grows_twice() {
    // object + two keys + two values = 5 tokens; 2 -> 4 -> 8.
    let store = TokenStore::parse_with_capacity(r#"{"a":1,"b":2}"#, 2).unwrap();
    assert_eq!(store.len(), 5);
    assert_eq!(store.capacity(), 8);
}

#[rstest]
#[case("1", 2)]
#[case("[1,2]", 4)]
#[case(r#"{"a":[1,2,3]}"#, 8)]
fn final_capacity_is_a_doubling_of_initial(#[case] source: &str, #[case] expected: usize) {
    let store = TokenStore::parse_with_capacity(source, 2).unwrap();
    assert_eq!(store.capacity(), expected);
    assert!(store.len() <= store.capacity());
}

#[rstest]
fn default_initial_capacity_is_two() {
    assert_eq!(INITIAL_CAPACITY, 2);
    let store = TokenStore::parse("[]").unwrap();
    assert!(store.capacity() >= INITIAL_CAPACITY);
}

#[rstest]
fn retry_reparses_from_scratch() {
    // If a retry resumed a half-filled buffer instead of restarting the
    // tokenizer, spans and child counts would come out shifted. A document
    // that forces several growths must still produce a coherent sequence.
    let source = r#"[{"k":"v"},{"k":"w"},{"k":"x"}]"#;
    let store = TokenStore::parse_with_capacity(source, 2).unwrap();
    assert_eq!(store.len(), 10);
    assert_eq!(store.tokens()[0].children, 3);
    let rendered = flatjson::to_string(source).unwrap();
    assert_eq!(rendered.matches("'v'").count(), 1);
    assert_eq!(rendered.matches("'k'").count(), 3);
}

#[rstest]
#[case(r#"{"#)]
#[case("[1,")]
#[case("{]")]
#[case("@")]
fn malformed_input_is_fatal_not_retried(#[case] source: &str) {
    let err = TokenStore::parse(source).unwrap_err();
    assert!(matches!(err, Error::Format { .. }));
}

#[rstest]
fn format_error_reports_offset() {
    let err = TokenStore::parse("[1,2}").unwrap_err();
    match err {
        Error::Format { offset, .. } => assert_eq!(offset, 4),
        other => panic!("expected format error, got {other:?}"),
    }
}
