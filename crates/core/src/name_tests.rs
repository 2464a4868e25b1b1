// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use yare::parameterized;

#[parameterized(
    simple = { "ws-1" },
    single_char = { "a" },
    digits = { "0123" },
    max_len = { "a123456789012345678901234567890123456789012345678901234567890bc" },
)]
fn accepts_valid_labels(name: &str) {
    let parsed = WorkspaceName::parse(name).unwrap();
    assert_eq!(parsed, name);
}

#[parameterized(
    empty = { "", NameError::Empty },
    uppercase = { "Ws-1", NameError::InvalidChar('W') },
    underscore = { "ws_1", NameError::InvalidChar('_') },
    dot = { "ws.1", NameError::InvalidChar('.') },
    leading_dash = { "-ws", NameError::InvalidBoundary },
    trailing_dash = { "ws-", NameError::InvalidBoundary },
)]
fn rejects_invalid_labels(name: &str, expected: NameError) {
    assert_eq!(WorkspaceName::parse(name), Err(expected));
}

#[test]
fn rejects_names_over_63_chars() {
    let name = "a".repeat(64);
    assert_eq!(WorkspaceName::parse(&name), Err(NameError::TooLong(64)));
}

#[test]
fn serializes_as_plain_string() {
    let name = WorkspaceName::parse("ws-1").unwrap();
    assert_eq!(serde_json::to_string(&name).unwrap(), r#""ws-1""#);
}

#[test]
fn from_str_validates() {
    assert!("ws-1".parse::<WorkspaceName>().is_ok());
    assert!("WS".parse::<WorkspaceName>().is_err());
}

proptest! {
    #[test]
    fn any_dns_label_parses(name in "[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?") {
        let parsed = WorkspaceName::parse(&name).unwrap();
        prop_assert_eq!(parsed.as_str(), name.as_str());
    }

    #[test]
    fn parsed_names_never_contain_uppercase(name in "\\PC{0,70}") {
        if let Ok(parsed) = WorkspaceName::parse(&name) {
            prop_assert!(parsed.len() <= MAX_NAME_LEN);
            prop_assert!(!parsed.chars().any(|c| c.is_ascii_uppercase()));
        }
    }
}
