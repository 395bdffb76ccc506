//! Extension extraction.
//!
//! Each supported extension OID maps to one decode function over the raw
//! extension payload. An extension that is absent from the certificate
//! yields an empty result; an extension that is present but violates its
//! schema yields [`XtrustError::MalformedExtension`]. Unknown OIDs are
//! never dispatched anywhere.
//!
//! All functions re-decode from the certificate bytes on every call, so
//! repeated extraction is idempotent and nothing here holds state.

use crate::asn1;
use crate::oid;
use crate::token::CertificateToken;
use crate::XtrustError;
use serde::Serialize;
use x509_parser::der_parser::ber::BerObject;

/// URL list extracted from AIA/CRLDP entries, in certificate encoding
/// order. Multiple access descriptions may exist and downstream consumers
/// may prefer the first.
pub type AccessLocationSet = Vec<String>;

/// One certificate-policy entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificatePolicy {
    /// Policy OID in dotted form.
    pub oid: String,
    /// CPS URI qualifier, when the policy declares one.
    ///
    /// Populated only from a CPS-URI qualifier; user-notice qualifiers
    /// never contribute here.
    pub cps_url: Option<String>,
}

/// GeneralName CHOICE tag for uniformResourceIdentifier.
const GN_TAG_URI: u32 = 6;
/// DistributionPoint field tag for distributionPoint.
const DP_TAG_NAME: u32 = 0;
/// DistributionPointName CHOICE tag for fullName.
const DPN_TAG_FULL_NAME: u32 = 0;

/// Extract all certificate policies, preserving declaration order.
pub fn get_certificate_policies(
    cert: &CertificateToken,
) -> Result<Vec<CertificatePolicy>, XtrustError> {
    let payload = match cert.extension_value(oid::EXT_CERTIFICATE_POLICIES) {
        Some(p) => p,
        None => return Ok(Vec::new()),
    };
    decode_certificate_policies(payload)
        .map_err(|e| malformed(oid::EXT_CERTIFICATE_POLICIES, e))
}

/// Extract the declared qualified-statement OIDs (RFC 3739).
///
/// Empty, not an error, when the extension is absent.
pub fn get_qc_statements_id_list(cert: &CertificateToken) -> Result<Vec<String>, XtrustError> {
    let payload = match cert.extension_value(oid::EXT_QC_STATEMENTS) {
        Some(p) => p,
        None => return Ok(Vec::new()),
    };
    decode_qc_statements(payload).map_err(|e| malformed(oid::EXT_QC_STATEMENTS, e))
}

/// Extract OCSP responder URLs from the Authority Information Access
/// extension, preserving declaration order.
pub fn get_ocsp_access_locations(
    cert: &CertificateToken,
) -> Result<AccessLocationSet, XtrustError> {
    access_locations(cert, oid::ACCESS_OCSP)
}

/// Extract CA-issuers URLs from the Authority Information Access
/// extension, preserving declaration order.
pub fn get_ca_access_locations(cert: &CertificateToken) -> Result<AccessLocationSet, XtrustError> {
    access_locations(cert, oid::ACCESS_CA_ISSUERS)
}

/// Extract CRL distribution URLs (URI-typed full-name entries only).
pub fn get_crl_urls(cert: &CertificateToken) -> Result<AccessLocationSet, XtrustError> {
    let payload = match cert.extension_value(oid::EXT_CRL_DISTRIBUTION_POINTS) {
        Some(p) => p,
        None => return Ok(Vec::new()),
    };
    decode_crl_urls(payload).map_err(|e| malformed(oid::EXT_CRL_DISTRIBUTION_POINTS, e))
}

/// Extract the Extended Key Usage purpose OIDs.
pub fn get_extended_key_usage(cert: &CertificateToken) -> Result<Vec<String>, XtrustError> {
    let payload = match cert.extension_value(oid::EXT_EXTENDED_KEY_USAGE) {
        Some(p) => p,
        None => return Ok(Vec::new()),
    };
    decode_eku(payload).map_err(|e| malformed(oid::EXT_EXTENDED_KEY_USAGE, e))
}

/// Whether the certificate is authorized for OCSP response signing
/// (Extended Key Usage contains id-kp-OCSPSigning).
pub fn is_ocsp_signing(cert: &CertificateToken) -> Result<bool, XtrustError> {
    Ok(get_extended_key_usage(cert)?
        .iter()
        .any(|p| p == oid::EKU_OCSP_SIGNING))
}

/// Whether the id-pkix-ocsp-nocheck marker extension is present.
///
/// Presence is the signal; the extension value is irrelevant.
pub fn has_id_pkix_ocsp_no_check_extension(cert: &CertificateToken) -> bool {
    cert.extension_value(oid::EXT_OCSP_NO_CHECK).is_some()
}

// ---------------------------------------------------------------------------
// Decoders over raw extension payloads
// ---------------------------------------------------------------------------

fn access_locations(
    cert: &CertificateToken,
    access_method: &str,
) -> Result<AccessLocationSet, XtrustError> {
    let payload = match cert.extension_value(oid::EXT_AUTHORITY_INFO_ACCESS) {
        Some(p) => p,
        None => return Ok(Vec::new()),
    };
    decode_access_locations(payload, access_method)
        .map_err(|e| malformed(oid::EXT_AUTHORITY_INFO_ACCESS, e))
}

/// AuthorityInfoAccessSyntax ::= SEQUENCE OF AccessDescription
/// AccessDescription ::= SEQUENCE { accessMethod OID, accessLocation GeneralName }
fn decode_access_locations(
    payload: &[u8],
    access_method: &str,
) -> Result<AccessLocationSet, XtrustError> {
    let root = asn1::parse(payload)?;
    let mut urls = Vec::new();
    for desc in asn1::children(&root)? {
        let fields = asn1::children(desc)?;
        let method = asn1::oid_string(first(fields, "AccessDescription")?)?;
        let location = field(fields, 1, "accessLocation")?;
        if method != access_method {
            continue;
        }
        // Only URL-typed general names are returned; other name forms
        // (directoryName, rfc822Name, ...) carry no fetchable location.
        if let Some((GN_TAG_URI, data)) = asn1::context_tag(location) {
            urls.push(ia5(data)?);
        }
    }
    Ok(urls)
}

/// CRLDistributionPoints ::= SEQUENCE OF DistributionPoint
fn decode_crl_urls(payload: &[u8]) -> Result<AccessLocationSet, XtrustError> {
    let root = asn1::parse(payload)?;
    let mut urls = Vec::new();
    for point in asn1::children(&root)? {
        for dp_field in asn1::children(point)? {
            let (tag, dpn_bytes) = match asn1::context_tag(dp_field) {
                Some(t) => t,
                None => continue,
            };
            if tag != DP_TAG_NAME {
                continue; // reasons / cRLIssuer
            }
            // distributionPoint [0] wraps the DistributionPointName CHOICE
            for dpn in asn1::parse_all(dpn_bytes)? {
                let (name_tag, names_bytes) = match asn1::context_tag(&dpn) {
                    Some(t) => t,
                    None => continue,
                };
                if name_tag != DPN_TAG_FULL_NAME {
                    continue; // nameRelativeToCRLIssuer has no URL form
                }
                // fullName [0] IMPLICIT GeneralNames: inner TLVs back to back
                for gn in asn1::parse_all(names_bytes)? {
                    if let Some((GN_TAG_URI, data)) = asn1::context_tag(&gn) {
                        urls.push(ia5(data)?);
                    }
                }
            }
        }
    }
    Ok(urls)
}

/// certificatePolicies ::= SEQUENCE OF PolicyInformation
/// PolicyInformation ::= SEQUENCE { policyIdentifier OID,
///                                  policyQualifiers SEQUENCE OF PolicyQualifierInfo OPTIONAL }
fn decode_certificate_policies(payload: &[u8]) -> Result<Vec<CertificatePolicy>, XtrustError> {
    let root = asn1::parse(payload)?;
    let mut policies = Vec::new();
    for info in asn1::children(&root)? {
        let fields = asn1::children(info)?;
        let policy_oid = asn1::oid_string(first(fields, "PolicyInformation")?)?;
        let mut cps_url = None;
        if let Some(qualifiers) = fields.get(1) {
            for qualifier in asn1::children(qualifiers)? {
                let qfields = asn1::children(qualifier)?;
                let qualifier_id = asn1::oid_string(first(qfields, "PolicyQualifierInfo")?)?;
                match qualifier_id.as_str() {
                    oid::POLICY_QUALIFIER_CPS => {
                        if cps_url.is_none() {
                            let value = field(qfields, 1, "cPSuri")?;
                            cps_url = Some(asn1::text_string(value)?);
                        }
                    }
                    oid::POLICY_QUALIFIER_UNOTICE => {
                        if let Some(value) = qfields.get(1) {
                            decode_user_notice(value)?;
                        }
                    }
                    _ => {} // unknown qualifier types are skipped
                }
            }
        }
        policies.push(CertificatePolicy {
            oid: policy_oid,
            cps_url,
        });
    }
    Ok(policies)
}

/// UserNotice ::= SEQUENCE { noticeRef NoticeReference OPTIONAL,
///                           explicitText DisplayText OPTIONAL }
///
/// The notice text is schema-checked and discarded: it never contributes
/// to the CPS URL.
fn decode_user_notice(obj: &BerObject) -> Result<(), XtrustError> {
    for part in asn1::children(obj)? {
        if asn1::children(part).is_ok() {
            continue; // noticeRef
        }
        asn1::text_string(part)?; // explicitText (IA5/UTF-8/BMP/Visible)
    }
    Ok(())
}

/// QCStatements ::= SEQUENCE OF QCStatement
/// QCStatement ::= SEQUENCE { statementId OID, statementInfo ANY OPTIONAL }
fn decode_qc_statements(payload: &[u8]) -> Result<Vec<String>, XtrustError> {
    let root = asn1::parse(payload)?;
    let mut ids = Vec::new();
    for statement in asn1::children(&root)? {
        let fields = asn1::children(statement)?;
        ids.push(asn1::oid_string(first(fields, "QCStatement")?)?);
    }
    Ok(ids)
}

/// ExtKeyUsageSyntax ::= SEQUENCE OF KeyPurposeId
fn decode_eku(payload: &[u8]) -> Result<Vec<String>, XtrustError> {
    let root = asn1::parse(payload)?;
    asn1::children(&root)?.iter().map(asn1::oid_string).collect()
}

// ---------------------------------------------------------------------------
// Small helpers
// ---------------------------------------------------------------------------

fn first<'a, 'b>(
    fields: &'b [BerObject<'a>],
    what: &str,
) -> Result<&'b BerObject<'a>, XtrustError> {
    fields
        .first()
        .ok_or_else(|| XtrustError::MalformedEncoding(format!("empty {}", what)))
}

fn field<'a, 'b>(
    fields: &'b [BerObject<'a>],
    index: usize,
    what: &str,
) -> Result<&'b BerObject<'a>, XtrustError> {
    fields
        .get(index)
        .ok_or_else(|| XtrustError::MalformedEncoding(format!("missing {}", what)))
}

fn ia5(data: &[u8]) -> Result<String, XtrustError> {
    let s = std::str::from_utf8(data)
        .map_err(|_| XtrustError::MalformedEncoding("non-ASCII URI".into()))?;
    Ok(s.to_string())
}

fn malformed(ext_oid: &str, err: XtrustError) -> XtrustError {
    log::warn!("cannot decode extension {}: {}", ext_oid, err);
    XtrustError::MalformedExtension {
        oid: ext_oid.to_string(),
        reason: err.to_string(),
    }
}
