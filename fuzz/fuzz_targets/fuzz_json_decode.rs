//! Fuzz target for JSON session import.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sb_common::ExchangeFormat;
use sb_exchange::{import_bytes, Classification};

fuzz_target!(|data: &[u8]| {
    let outcome = import_bytes(ExchangeFormat::Json, data);
    // Partial and full imports both carry sessions; only total failure is empty.
    let has_sessions = outcome.sessions().is_some();
    assert_eq!(
        has_sessions,
        outcome.classification() != Classification::TotalFailure
    );
});
