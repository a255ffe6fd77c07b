//! The record carrying the evolving negotiated context for one
//! handshake: chosen version, the key-exchange and authentication
//! objects, and (in [`SecurityParameters`]) the random nonces and
//! derived master secret.

use zeroize::Zeroizing;

use crate::capability::{Authentication, ClientCredentials, KeyExchange};
use crate::handshake::{CertificateRequest, CipherSuiteId, CompressionMethod, ProtocolVersion, Random};

/// Owns the key-exchange object, authentication object, and client
/// credentials for exactly one handshake; dropped on completion or
/// failure, taking the premaster/master secret zeroization with it.
pub struct ClientHandshakeState {
    pub client_version: ProtocolVersion,
    pub server_version: Option<ProtocolVersion>,
    pub secure_renegotiation: bool,
    pub key_exchange: Option<Box<dyn KeyExchange>>,
    pub authentication: Option<Box<dyn Authentication>>,
    pub certificate_request: Option<CertificateRequest>,
    pub client_credentials: Option<ClientCredentials>,
    pub negotiated_cipher_suite: Option<CipherSuiteId>,
    pub negotiated_compression_method: Option<CompressionMethod>,
}

impl ClientHandshakeState {
    pub fn new(client_version: ProtocolVersion) -> ClientHandshakeState {
        ClientHandshakeState {
            client_version,
            server_version: None,
            secure_renegotiation: false,
            key_exchange: None,
            authentication: None,
            certificate_request: None,
            client_credentials: None,
            negotiated_cipher_suite: None,
            negotiated_compression_method: None,
        }
    }
}

/// `client_random`, `server_random`, and the 48-byte `master_secret`,
/// assigned in that order as the handshake progresses: `client_random`
/// at construction, `server_random` once `ServerHello` is processed,
/// `master_secret` once the premaster secret has been derived. The
/// master secret is a [`Zeroizing`] buffer so it is overwritten the
/// moment this record (or just the field) is dropped, on every exit
/// path, success or failure.
pub struct SecurityParameters {
    pub client_random: Random,
    pub server_random: Option<Random>,
    pub master_secret: Option<Zeroizing<Vec<u8>>>,
}

impl SecurityParameters {
    pub fn new(client_random: Random) -> SecurityParameters {
        SecurityParameters { client_random, server_random: None, master_secret: None }
    }
}
