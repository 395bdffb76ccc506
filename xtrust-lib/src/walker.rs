//! Trust-chain walking with cycle detection.
//!
//! Given a starting certificate, a pool of candidate issuers and an
//! externally-supplied signed-by predicate, the walker follows signed-by
//! edges toward the root(s) without ever revisiting a certificate.
//! Mutually cross-signed CA pairs (A signed by B, B signed by A) are
//! legitimate and common between bridge CAs; hitting one again simply
//! ends that branch — it is not an error.
//!
//! The visited set is keyed by the SHA-256 digest of the DER encoding, so
//! two differently-loaded copies of one certificate count as one node.
//! Each walk owns its visited set; concurrent walks over overlapping
//! pools do not interfere.

use crate::extensions;
use crate::token::{CertificateToken, DigestAlgorithm};
use std::collections::HashSet;

/// Maximum walk depth. The visited set already guarantees termination;
/// this additionally bounds stack depth on adversarial pools.
pub(crate) const MAX_CHAIN_DEPTH: usize = 32;

/// Walks signed-by relationships over a finite certificate pool.
///
/// The predicate answers "is `cert`'s signature verifiable with
/// `candidate`'s public key" and is supplied by the cryptographic
/// collaborator; the walker itself performs no cryptography.
pub struct ChainWalker<'a, F>
where
    F: Fn(&CertificateToken, &CertificateToken) -> bool,
{
    pool: &'a [CertificateToken],
    signed_by: F,
}

impl<'a, F> ChainWalker<'a, F>
where
    F: Fn(&CertificateToken, &CertificateToken) -> bool,
{
    pub fn new(pool: &'a [CertificateToken], signed_by: F) -> Self {
        ChainWalker { pool, signed_by }
    }

    /// Visit `start` and every certificate reachable from it through
    /// signed-by edges, in first-visit order.
    ///
    /// A certificate already visited in this walk is never entered
    /// again, which terminates cross-signed cycles after one round.
    pub fn walk_from(&self, start: &'a CertificateToken) -> Vec<&'a CertificateToken> {
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        self.visit(start, &mut visited, &mut order, 0);
        order
    }

    fn visit(
        &self,
        cert: &'a CertificateToken,
        visited: &mut HashSet<Vec<u8>>,
        order: &mut Vec<&'a CertificateToken>,
        depth: usize,
    ) {
        if depth >= MAX_CHAIN_DEPTH {
            return;
        }
        if !visited.insert(cert.digest(DigestAlgorithm::Sha256)) {
            return; // already seen in this walk: cycle or duplicate path
        }
        order.push(cert);

        for candidate in self.pool {
            // Cheap name prefilter before the signature predicate.
            if candidate.subject_raw != cert.issuer_raw {
                continue;
            }
            if !(self.signed_by)(cert, candidate) {
                continue;
            }
            self.visit(candidate, visited, order, depth + 1);
        }
    }

    /// All OCSP responder URLs declared by certificates reachable from
    /// `start`, in visit order.
    ///
    /// A certificate whose AIA extension is present but malformed
    /// contributes nothing; the walk itself continues.
    pub fn ocsp_access_locations(&self, start: &'a CertificateToken) -> Vec<String> {
        self.collect(start, extensions::get_ocsp_access_locations)
    }

    /// All CA-issuers URLs declared by certificates reachable from
    /// `start`, in visit order.
    pub fn ca_access_locations(&self, start: &'a CertificateToken) -> Vec<String> {
        self.collect(start, extensions::get_ca_access_locations)
    }

    /// All CRL distribution URLs declared by certificates reachable from
    /// `start`, in visit order.
    pub fn crl_urls(&self, start: &'a CertificateToken) -> Vec<String> {
        self.collect(start, extensions::get_crl_urls)
    }

    fn collect(
        &self,
        start: &'a CertificateToken,
        extract: fn(&CertificateToken) -> Result<Vec<String>, crate::XtrustError>,
    ) -> Vec<String> {
        let mut urls = Vec::new();
        for cert in self.walk_from(start) {
            match extract(cert) {
                Ok(found) => urls.extend(found),
                Err(e) => {
                    log::warn!(
                        "skipping access locations of {}: {}",
                        cert.human_readable_name(),
                        e
                    );
                }
            }
        }
        urls
    }
}
