//! Caller-supplied configuration for a single handshake: what to offer,
//! and where the randomness for `client_random` comes from. Built once
//! by the caller and borrowed read-only for the handshake's duration.

use rand::RngCore;

use crate::constants::{is_forbidden_rc4_suite, SCSV_EMPTY_RENEGOTIATION_INFO};
use crate::error::{TlsErrorKind, TlsResult};
use crate::extensions::ExtensionTable;
use crate::handshake::{CipherSuiteId, CompressionMethod};

/// What this handshake offers the server, and how it gets its entropy.
pub struct ClientOptions {
    rng: Box<dyn RngCore>,
    cipher_suites: Vec<CipherSuiteId>,
    compression_methods: Vec<CompressionMethod>,
    extensions: ExtensionTable,
    renegotiation_info_offered: bool,
}

impl ClientOptions {
    /// Builds the options for a fresh (non-resumed, non-renegotiated)
    /// handshake. `cipher_suites` must be non-empty and free of any RC4
    /// suite; `extensions` should not already contain
    /// `renegotiation_info` (this constructor adds it, or the SCSV
    /// fallback, itself), per §3's invariant that exactly one of the two
    /// is present.
    pub fn new(
        rng: Box<dyn RngCore>,
        cipher_suites: Vec<CipherSuiteId>,
        extensions: ExtensionTable,
        advertise_renegotiation_info: bool,
    ) -> TlsResult<ClientOptions> {
        if cipher_suites.is_empty() {
            return tls_err!(TlsErrorKind::InvalidArgument, "no cipher suites offered");
        }
        for suite in &cipher_suites {
            if is_forbidden_rc4_suite(suite.0) {
                return tls_err!(TlsErrorKind::InvalidArgument, "RC4 suite 0x{:04x} may not be offered", suite.0);
            }
        }

        let mut extensions = extensions;
        let renegotiation_info_offered = advertise_renegotiation_info;
        if renegotiation_info_offered {
            extensions = extensions.with_empty_renegotiation_info()?;
        }

        Ok(ClientOptions {
            rng,
            cipher_suites,
            compression_methods: vec![CompressionMethod::NULL],
            extensions,
            renegotiation_info_offered,
        })
    }

    pub fn cipher_suites(&self) -> &[CipherSuiteId] {
        &self.cipher_suites
    }

    pub fn compression_methods(&self) -> &[CompressionMethod] {
        &self.compression_methods
    }

    pub fn extensions(&self) -> &ExtensionTable {
        &self.extensions
    }

    pub fn renegotiation_info_offered(&self) -> bool {
        self.renegotiation_info_offered
    }

    /// The offered cipher-suite list as sent on the wire: the SCSV is
    /// appended if and only if `renegotiation_info` was not offered as
    /// an extension, per §3's invariant that exactly one of the two
    /// renegotiation-info signaling mechanisms is used.
    pub fn offered_suites_on_wire(&self) -> Vec<CipherSuiteId> {
        let mut suites = self.cipher_suites.clone();
        if !self.renegotiation_info_offered {
            suites.push(CipherSuiteId(SCSV_EMPTY_RENEGOTIATION_INFO));
        }
        suites
    }

    pub fn fill_client_random(&mut self, buf: &mut [u8]) {
        self.rng.fill_bytes(buf);
    }
}
