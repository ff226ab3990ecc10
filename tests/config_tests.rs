use relay_service::config::parse_recipient_ids;

/// Test: Plain comma-separated IDs parse in order
#[test]
fn test_parses_comma_separated_ids() {
    assert_eq!(parse_recipient_ids("123,456"), vec![123, 456]);
}

/// Test: Entries are trimmed and empty entries are dropped
#[test]
fn test_trims_and_skips_empty_entries() {
    assert_eq!(parse_recipient_ids(" 123 , ,456 ,"), vec![123, 456]);
}

/// Test: Non-numeric entries are discarded, not fatal
#[test]
fn test_discards_non_numeric_entries() {
    assert_eq!(parse_recipient_ids("abc,123,12.5"), vec![123]);
}

/// Test: Group chat IDs are negative and must parse
#[test]
fn test_accepts_negative_group_ids() {
    assert_eq!(
        parse_recipient_ids("-1001234567890,42"),
        vec![-1001234567890, 42]
    );
}

/// Test: Empty configuration yields an empty list
#[test]
fn test_empty_configuration() {
    assert_eq!(parse_recipient_ids(""), Vec::<i64>::new());
    assert_eq!(parse_recipient_ids("   "), Vec::<i64>::new());
}
