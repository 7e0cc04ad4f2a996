//! The JSON conformance harness, exercised against small on-disk fixtures
//! checked into `tests/fixtures/` rather than the full upstream test suite.

use wrt::{parse_script, Command, Harness, Outcome};

#[test]
fn parses_every_command_kind() {
    let json = r#"
    {
      "commands": [
        { "type": "module", "line": 1, "filename": "empty.wasm", "name": "m" },
        { "type": "register", "line": 2, "name": "m", "as": "other" },
        { "type": "assert_return", "line": 3,
          "action": { "type": "invoke", "module": "m", "field": "add", "args": [
            { "type": "i32", "value": "1" }, { "type": "i32", "value": "2" }
          ] },
          "expected": [ { "type": "i32", "value": "3" } ] },
        { "type": "assert_trap", "line": 4,
          "action": { "type": "invoke", "field": "boom", "args": [] },
          "text": "unreachable" },
        { "type": "assert_malformed", "line": 5, "filename": "truncated.wasm", "text": "bad magic" },
        { "type": "assert_invalid", "line": 6, "filename": "bad_types.wasm", "text": "type mismatch" },
        { "type": "assert_unlinkable", "line": 7, "filename": "missing_import.wasm", "text": "unknown import" },
        { "type": "action", "line": 8, "action": { "type": "get", "module": "m", "field": "counter" } }
      ]
    }
    "#;

    let commands = parse_script(json).expect("valid script");
    assert_eq!(commands.len(), 8);
    assert!(matches!(commands[0], Command::Module { .. }));
    assert!(matches!(commands[1], Command::Register { .. }));
    assert!(matches!(commands[2], Command::AssertReturn { .. }));
    assert!(matches!(commands[3], Command::AssertTrap { .. }));
    assert!(matches!(commands[4], Command::AssertMalformed { .. }));
    assert!(matches!(commands[5], Command::AssertInvalid { .. }));
    assert!(matches!(commands[6], Command::AssertUnlinkable { .. }));
    assert!(matches!(commands[7], Command::Action { .. }));
}

#[test]
fn loads_a_module_fixture_and_tracks_it_as_current() {
    let json = r#"
    { "commands": [
        { "type": "module", "line": 1, "filename": "empty.wasm" }
    ] }
    "#;
    let commands = parse_script(json).unwrap();

    let mut harness = Harness::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"));
    let outcomes = harness.run_all(&commands);

    assert!(matches!(outcomes[0], Outcome::Passed), "{:?}", outcomes[0]);
}

#[test]
fn reports_a_truncated_file_as_a_malformed_pass() {
    let json = r#"
    { "commands": [
        { "type": "assert_malformed", "line": 1, "filename": "truncated.wasm", "text": "" }
    ] }
    "#;
    let commands = parse_script(json).unwrap();

    let mut harness = Harness::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"));
    let outcomes = harness.run_all(&commands);

    assert!(matches!(outcomes[0], Outcome::Passed), "{:?}", outcomes[0]);
}

#[test]
fn reports_a_well_formed_empty_module_as_not_malformed() {
    let json = r#"
    { "commands": [
        { "type": "assert_malformed", "line": 1, "filename": "empty.wasm", "text": "" }
    ] }
    "#;
    let commands = parse_script(json).unwrap();

    let mut harness = Harness::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"));
    let outcomes = harness.run_all(&commands);

    match &outcomes[0] {
        Outcome::Failed { detail, .. } => assert!(detail.contains("expected decode failure")),
        other => panic!("expected a failed outcome, got {other:?}"),
    }
}
