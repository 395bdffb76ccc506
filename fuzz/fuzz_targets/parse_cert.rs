#![no_main]

use libfuzzer_sys::fuzz_target;
use xtrust_lib::{
    compute_ski, get_ca_access_locations, get_certificate_policies, get_crl_urls,
    get_ocsp_access_locations, get_qc_statements_id_list, get_ski,
    has_id_pkix_ocsp_no_check_extension, is_ocsp_signing, parse_cert, DigestAlgorithm,
};

fuzz_target!(|data: &[u8]| {
    // Try parsing with auto-detection.
    // The parser must never panic, regardless of input.
    if let Ok(cert) = parse_cert(data) {
        // If parsing succeeds, exercise every extraction path
        let _ = cert.serial_hex();
        let _ = cert.subject_common_name();
        let _ = cert.is_self_issued();
        let _ = cert.fingerprint(DigestAlgorithm::Sha256);
        let _ = get_certificate_policies(&cert);
        let _ = get_qc_statements_id_list(&cert);
        let _ = get_ocsp_access_locations(&cert);
        let _ = get_ca_access_locations(&cert);
        let _ = get_crl_urls(&cert);
        let _ = is_ocsp_signing(&cert);
        let _ = has_id_pkix_ocsp_no_check_extension(&cert);

        // Declared and computed key identifiers must both be total
        let declared = get_ski(&cert, false);
        let resolved = get_ski(&cert, true);
        if let (Ok(Some(d)), Ok(Some(r))) = (declared, resolved) {
            // When a SKI is declared, resolution must return it unchanged
            assert_eq!(d, r, "declared SKI not returned verbatim");
        }
        let _ = compute_ski(&cert);
    }
});
