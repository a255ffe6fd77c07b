//! The two transport-facing capabilities this core drives: reliable
//! delivery of handshake message bytes (retransmission, fragmentation,
//! and the running transcript hash all live here, outside the core),
//! and the record layer the negotiated cipher gets installed onto.

use crate::alert::{AlertDescription, AlertLevel};
use crate::handshake::ProtocolVersion;

/// One raw handshake message as `(HandshakeType, body_bytes)`, matching
/// the tag values used by [`crate::handshake::Handshake`].
pub type RawHandshakeMessage = (u8, Vec<u8>);

/// Delivers handshake messages over the unreliable datagram transport,
/// handling retransmission and reassembly, and tracks the running
/// MD5||SHA1 transcript hash those messages feed into `Finished`.
///
/// This core calls `send`/`receive` in strict alternation and never
/// holds more than one outstanding expectation at a time; the DTLS
/// cookie retry is the only point where it asks for `reset_transcript`.
pub trait ReliableHandshake {
    fn send(&mut self, message_type: u8, body: &[u8]) -> std::io::Result<()>;
    fn receive(&mut self) -> std::io::Result<RawHandshakeMessage>;

    /// The transcript hash over every message sent or received through
    /// this layer since the last reset, in send/receive order.
    fn current_transcript_hash(&self) -> Vec<u8>;

    /// Discards the transcript accumulated so far. Called exactly once,
    /// after a `HelloVerifyRequest` cookie round-trip, so the transcript
    /// covers only the cookie-bearing retransmit onward.
    fn reset_transcript(&mut self);

    /// Signals that the handshake concluded (successfully or not) and no
    /// further messages will be sent or received through this layer.
    fn finish(&mut self);
}

/// The secured channel the negotiated cipher gets installed onto once
/// key derivation completes.
pub trait RecordLayer {
    /// The cipher state `TlsClient::new_cipher_spec` produces for the
    /// negotiated suite; opaque to this core.
    type CipherSpec;

    /// The DTLS version the peer actually spoke at the record layer, if
    /// the record layer has seen enough traffic to know it.
    fn discovered_peer_version(&self) -> Option<ProtocolVersion>;

    /// Installs the newly derived cipher spec as the pending write/read
    /// epoch; it takes effect on the next ChangeCipherSpec.
    fn init_pending_epoch(&mut self, spec: Self::CipherSpec);

    /// Called once both Finished messages have been verified: the
    /// handshake is complete and application data may flow.
    fn handshake_successful(&mut self);

    fn send_alert(&mut self, level: AlertLevel, description: AlertDescription);
}
