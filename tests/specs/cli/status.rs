//! Tool status specs

use crate::prelude::*;

#[test]
fn status_reports_a_missing_tool_without_failing() {
    let config = TestConfig::missing_tool();
    config
        .cli()
        .args(&["status"])
        .passes()
        .stdout_has("not installed")
        .stdout_has("problem:");
}

#[test]
fn status_emits_json_when_asked() {
    let config = TestConfig::missing_tool();
    let out = config
        .cli()
        .args(&["-o", "json", "status"])
        .passes()
        .stdout();
    let value: serde_json::Value = serde_json::from_str(&out).expect("valid json");
    assert_eq!(value["installed"], false);
    assert_eq!(value["ready"], false);
    assert!(value["problem"].as_str().unwrap().contains("not installed"));
}
