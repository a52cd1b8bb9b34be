//! Schedule configuration specs

use crate::prelude::*;

#[test]
fn set_interval_saves_and_reports_the_next_run() {
    let config = TestConfig::empty();
    config
        .cli()
        .args(&["schedule", "set", "--interval", "3600"])
        .passes()
        .stdout_has("next run at");

    let saved = config.contents();
    assert!(saved.contains("enabled = true"), "saved: {saved}");
    assert!(saved.contains("mode = \"interval\""), "saved: {saved}");
    assert!(saved.contains("seconds = 3600"), "saved: {saved}");

    config
        .cli()
        .args(&["schedule", "show"])
        .passes()
        .stdout_has("every 3600 seconds");
}

#[test]
fn set_without_a_cadence_is_rejected() {
    let config = TestConfig::empty();
    config
        .cli()
        .args(&["schedule", "set"])
        .fails()
        .stderr_has("one of --interval, --daily, or --weekly");
}

#[test]
fn set_daily_with_an_invalid_hour_is_rejected() {
    let config = TestConfig::empty();
    config
        .cli()
        .args(&["schedule", "set", "--daily", "24"])
        .fails()
        .stderr_has("hour out of range");
}

#[test]
fn set_weekly_parses_day_at_hour() {
    let config = TestConfig::empty();
    config
        .cli()
        .args(&["schedule", "set", "--weekly", "mon@9"])
        .passes();

    config
        .cli()
        .args(&["schedule", "show"])
        .passes()
        .stdout_has("Mon")
        .stdout_has("09:00");
}

#[test]
fn off_disables_a_saved_schedule() {
    let config = TestConfig::empty();
    config
        .cli()
        .args(&["schedule", "set", "--interval", "900"])
        .passes();
    config.cli().args(&["schedule", "off"]).passes();

    config
        .cli()
        .args(&["schedule", "show"])
        .passes()
        .stdout_has("Schedule is off.");
}

#[test]
fn show_emits_json_when_asked() {
    let config = TestConfig::empty();
    config
        .cli()
        .args(&["schedule", "set", "--interval", "900", "--force"])
        .passes();

    let out = config
        .cli()
        .args(&["-o", "json", "schedule", "show"])
        .passes()
        .stdout();
    let value: serde_json::Value = serde_json::from_str(&out).expect("valid json");
    assert_eq!(value["mode"], "interval");
    assert_eq!(value["seconds"], 900);
    assert_eq!(value["forced"], true);
}

#[test]
fn foreground_run_refuses_a_disabled_schedule() {
    let config = TestConfig::empty();
    config
        .cli()
        .args(&["schedule", "run"])
        .fails()
        .stderr_has("schedule is off");
}
