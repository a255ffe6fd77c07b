//! The capability traits this core drives but never implements itself:
//! cipher-suite negotiation policy, key exchange, and client
//! authentication. Each lives in a separate crate supplied by the
//! caller. RSA/DH/ECDH/PSK key exchange and certificate validation are
//! deliberately not this core's problem (see module docs on
//! [`crate::driver`]).

use zeroize::Zeroizing;

use crate::error::TlsResult;
use crate::handshake::{CertificateList, CertificateRequest, CipherSuiteId, CompressionMethod, ProtocolVersion};

/// The caller's policy object: what to do once the server has answered.
/// One `TlsClient` instance drives exactly one handshake; the
/// `CipherSpec` associated type is threaded through to
/// [`crate::transport::RecordLayer`] so the two agree on what a
/// negotiated cipher actually looks like.
///
/// What to *offer* (cipher suites, compression methods, extensions,
/// whether to advertise `renegotiation_info`) is not repeated here: it
/// lives once, as plain data, on [`crate::options::ClientOptions`],
/// which the driver reads directly rather than calling back through
/// this trait for values that never change during the handshake.
pub trait TlsClient {
    type CipherSpec;

    fn client_version(&self) -> ProtocolVersion;

    fn notify_server_version(&mut self, version: ProtocolVersion);
    fn notify_session_id(&mut self, session_id: &[u8]);
    fn notify_cipher_suite(&mut self, suite: CipherSuiteId);
    fn notify_compression_method(&mut self, method: CompressionMethod);
    fn notify_secure_renegotiation(&mut self, offered: bool);

    /// Outbound supplemental data to attach to the handshake, if any
    /// (RFC 4680). Most clients never send any.
    fn supplemental_data(&self) -> Option<Vec<u8>>;
    /// Inbound supplemental data from the server, if the server sent any.
    fn consume_supplemental_data(&mut self, data: Option<Vec<u8>>);

    fn new_key_exchange(&self, suite: CipherSuiteId) -> Box<dyn KeyExchange>;
    fn new_authentication(&self) -> Option<Box<dyn Authentication>>;
    fn new_cipher_spec(
        &self,
        suite: CipherSuiteId,
        master_secret: &[u8],
        client_random: &[u8],
        server_random: &[u8],
    ) -> Self::CipherSpec;
}

/// Drives the cipher-suite-specific half of the handshake: consuming the
/// server's certificate and key exchange parameters (or being told there
/// are none to consume), and producing the client's answering messages.
pub trait KeyExchange {
    fn init(&mut self);

    fn process_certificate(&mut self, certificates: &CertificateList) -> TlsResult<()>;
    fn skip_certificate(&mut self) -> TlsResult<()>;

    fn process_server_key_exchange(&mut self, body: &[u8]) -> TlsResult<()>;
    fn skip_server_key_exchange(&mut self) -> TlsResult<()>;

    fn process_certificate_request(&mut self, request: &CertificateRequest) -> TlsResult<()>;

    fn client_key_exchange(&mut self) -> Vec<u8>;

    /// Consumes the key exchange to produce the premaster secret. Taking
    /// `self` by boxed value makes it impossible to call this twice or
    /// to keep deriving messages from a key exchange whose secret has
    /// already been extracted.
    fn into_premaster_secret(self: Box<Self>) -> Zeroizing<Vec<u8>>;
}

/// Bundles a client's certificate chain with the means to prove
/// ownership of the matching private key. `signer` is `None` when the
/// chain is empty (anonymous client auth is not offered).
pub struct ClientCredentials {
    pub certificate_chain: CertificateList,
    pub signer: Option<Box<dyn Signer>>,
}

/// Chooses, and optionally produces, the client's authentication
/// response to a `CertificateRequest`.
pub trait Authentication {
    fn process_certificate(&mut self, request: &CertificateRequest) -> TlsResult<()>;
    fn credentials(&self) -> Option<ClientCredentials>;
}

/// Signs the handshake transcript hash for `CertificateVerify`.
pub trait Signer {
    fn sign(&self, transcript_hash: &[u8]) -> Vec<u8>;
}
