//! Fuzz target for `.tfvars` files.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_tfvars
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

/// Assignments built from fuzzer-chosen names and raw value text, so most inputs get past
/// the attribute syntax and exercise expression lowering.
#[derive(Arbitrary, Debug)]
struct TfvarsInput {
    assignments: Vec<(String, String)>,
    trailer: String,
}

fuzz_target!(|input: TfvarsInput| {
    if input.assignments.len() > 50 {
        return;
    }

    let mut text = String::new();
    for (name, value) in &input.assignments {
        if name.len() > 64 || value.len() > 512 {
            continue;
        }
        text.push_str(name);
        text.push_str(" = ");
        text.push_str(value);
        text.push('\n');
    }
    text.push_str(&input.trailer);

    let _ = monguard_hcl::fuzz::parse_tfvars(&text);
});
