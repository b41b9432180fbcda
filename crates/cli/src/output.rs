// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! Small formatting helpers shared by the `list`/`run`/`status`
//! subcommands (spec §4.8: "all commands accept `--json` where
//! applicable; non-JSON output is for humans and may change").

use serde::Serialize;

/// Pretty-print `value` as JSON to stdout.
pub fn print_json(value: &impl Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("ampad: failed to serialize output: {e}"),
    }
}

/// Left-pad-free column print: `name` in a fixed-width field, then the
/// rest of `fields` space-joined. Good enough for the handful of
/// columns `list`/`status` print; not a general table renderer.
pub fn print_row(name: &str, fields: &[String]) {
    println!("{name:<24} {}", fields.join("  "));
}
