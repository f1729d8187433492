//! Fuzz target for parsing and lowering `.tf` files.
//!
//! Goal: The loader should **never panic** on any input.
//! It may return errors, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_hcl_config
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 64 * 1024 {
        return;
    }
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = monguard_hcl::fuzz::parse_config(text);
    }
});
