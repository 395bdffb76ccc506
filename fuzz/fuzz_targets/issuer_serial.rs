#![no_main]

use libfuzzer_sys::fuzz_target;
use xtrust_lib::get_issuer_info;

fuzz_target!(|data: &[u8]| {
    // Decode-or-fail: never panic, never return a partial result.
    if let Ok(info) = get_issuer_info(data) {
        assert!(
            !info.serial_number.is_empty(),
            "decoded IssuerSerial with empty serial"
        );
        let _ = info.serial_hex();
        let _ = info.issuer_name.to_oneline();
    }
});
