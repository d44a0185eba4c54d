use modheaders_lib::config::{
    from_json, parse_import, to_json, validate, ApplyOn, Config, RuleAction, RuleStatus,
    StoredRule,
};
use modheaders_lib::ModHeadersError;

use crate::TestResult;

#[test]
fn test_stored_blob_uses_persisted_field_names() -> TestResult {
    let config = Config {
        headers: vec![StoredRule::new("a", RuleAction::Delete, "Server", "", ApplyOn::Response)
            .with_status(RuleStatus::Off)
            .with_comment("hide server")],
        debug_mode: true,
        show_comments: false,
    };

    let txt = to_json(&config)?;
    let value: serde_json::Value = serde_json::from_str(&txt)?;
    let rule = &value["headers"][0];
    assert_eq!(rule["url_contains"], "a");
    assert_eq!(rule["action"], "delete");
    assert_eq!(rule["apply_on"], "res");
    assert_eq!(rule["status"], "off");
    assert_eq!(rule["comment"], "hide server");
    assert_eq!(value["debug_mode"], true);
    assert_eq!(value["show_comments"], false);
    assert!(txt.contains("\n  \"headers\""), "export is indented with two spaces");

    assert_eq!(from_json(&txt)?, config);
    Ok(())
}

#[test]
fn test_import_rejects_non_json() {
    assert!(matches!(parse_import("not json at all"), Err(ModHeadersError::InvalidFormat(_))));
    assert!(matches!(parse_import("{\"headers\": [}"), Err(ModHeadersError::InvalidFormat(_))));
    let err = parse_import("").err().map(|e| e.to_string());
    assert_eq!(err.as_deref(), Some("Invalid file format"));
}

#[test]
fn test_validate_checks_pattern_as_stored() {
    let config = Config {
        headers: vec![
            StoredRule::new("", RuleAction::Add, "x", "1", ApplyOn::Request),
            StoredRule::new(" ", RuleAction::Add, "x", "1", ApplyOn::Request),
        ],
        ..Config::default()
    };
    assert!(validate(&config).is_ok());

    let config = Config {
        headers: vec![StoredRule::new(" a(b ", RuleAction::Add, "x", "1", ApplyOn::Request)],
        ..Config::default()
    };
    match validate(&config) {
        Err(ModHeadersError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, " a(b "),
        other => panic!("unexpected result: {other:?}"),
    }
}
