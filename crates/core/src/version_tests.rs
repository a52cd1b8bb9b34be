// SPDX-License-Identifier: MIT

use super::*;
use yare::parameterized;

#[parameterized(
    equal_exact = { "2.7.2", "2.7.2", Ordering::Equal },
    equal_padded = { "1.0", "1.0.0", Ordering::Equal },
    patch_greater = { "0.4.3", "0.4.2", Ordering::Greater },
    minor_vs_patch = { "0.10", "0.9.9", Ordering::Greater },
    major_less = { "1.9.9", "2.0", Ordering::Less },
)]
fn comparisons(a: &str, b: &str, expected: Ordering) {
    let a = ToolVersion::parse(a).unwrap();
    let b = ToolVersion::parse(b).unwrap();
    assert_eq!(a.cmp(&b), expected);
}

#[test]
fn parses_with_surrounding_whitespace() {
    let v = ToolVersion::parse("  2.7.2\n").unwrap();
    assert_eq!(v.components(), &[2, 7, 2]);
}

#[test]
fn parses_release_candidate_suffix() {
    let v = ToolVersion::parse("2.7.2rc1").unwrap();
    assert_eq!(v.components(), &[2, 7, 2]);
    assert_eq!(v.to_string(), "2.7.2");
}

#[parameterized(
    empty = { "" },
    blank = { "   " },
    alpha = { "beta" },
)]
fn rejects_non_numeric(input: &str) {
    assert!(ToolVersion::parse(input).is_err());
}

#[test]
fn round_trips_display() {
    let v = ToolVersion::parse("0.4.2").unwrap();
    assert_eq!(ToolVersion::parse(&v.to_string()).unwrap(), v);
}
