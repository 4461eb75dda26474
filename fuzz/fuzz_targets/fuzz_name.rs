// SPDX-License-Identifier: AGPL-3.0-or-later
//! Fuzz target for entry-name validation and preview classification

#![no_main]

use drive_core::name::{extension_of, validate_name};
use drive_core::preview::PreviewRules;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if validate_name(input).is_ok() {
            // An accepted name must stay a single path component.
            assert!(!input.contains('/'));
            assert!(!input.contains('\\'));
            assert!(!input.contains('\0'));
            assert!(input != "." && input != "..");
            assert!(!input.trim().is_empty());
        }

        let _ = extension_of(input);
        let _ = PreviewRules::default().classify(input);
    }
});
