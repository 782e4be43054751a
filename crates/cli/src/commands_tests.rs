// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    add = { "add", Command::Add },
    stopall = { "stopall", Command::StopAll },
    cont = { "continue", Command::Continue },
    fork = { "fork", Command::Fork },
    help = { "help", Command::Help },
    exit = { "exit", Command::Exit },
    quit = { "quit", Command::Exit },
    uppercase = { "ADD", Command::Add },
    padded = { "  help  ", Command::Help },
)]
fn simple_commands(input: &str, expected: Command) {
    assert_eq!(parse(input), expected);
}

#[test]
fn stop_takes_a_target() {
    assert_eq!(parse("stop 3"), Command::Stop("3".to_string()));
    assert_eq!(parse("stop echo_d7ea02"), Command::Stop("echo_d7ea02".to_string()));
}

#[test]
fn stop_without_target_is_rejected() {
    assert!(matches!(parse("stop"), Command::Unknown(_)));
}

#[test]
fn blank_input_is_empty() {
    assert_eq!(parse(""), Command::Empty);
    assert_eq!(parse("   "), Command::Empty);
}

#[test]
fn unknown_commands_are_reported() {
    match parse("launch") {
        Command::Unknown(msg) => assert!(msg.contains("launch")),
        other => panic!("expected unknown, got {other:?}"),
    }
}
