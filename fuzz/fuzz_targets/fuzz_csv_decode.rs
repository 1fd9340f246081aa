//! Fuzz target for CSV session import.
//!
//! Arbitrary bytes must produce an import outcome, never a panic. Whatever
//! is imported must carry a valid datetime.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sb_common::{is_valid_datetime, ExchangeFormat};
use sb_exchange::import_bytes;

fuzz_target!(|data: &[u8]| {
    let outcome = import_bytes(ExchangeFormat::Csv, data);
    if let Some(sessions) = outcome.sessions() {
        for session in sessions {
            assert!(is_valid_datetime(&session.datetime));
        }
    }
});
