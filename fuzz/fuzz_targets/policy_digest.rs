#![no_main]

use libfuzzer_sys::fuzz_target;
use xtrust_lib::{get_signature_policy_digest, DigestAlgorithm};

fuzz_target!(|data: &[u8]| {
    // Pure function over arbitrary bytes: same input, same output.
    let first = get_signature_policy_digest(DigestAlgorithm::Sha256, data);
    let second = get_signature_policy_digest(DigestAlgorithm::Sha256, data);
    match (first, second) {
        (Ok(a), Ok(b)) => assert_eq!(a, b, "policy digest not deterministic"),
        (Err(_), Err(_)) => {}
        _ => panic!("policy digest determinism violated"),
    }
});
