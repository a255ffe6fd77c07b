//! The error taxonomy this core can raise, and its mapping onto wire alerts.
//!
//! Every fatal condition the driver can hit is one of these kinds. The
//! driver is responsible for mapping a `TlsErrorKind` to an `AlertDescription`
//! and dispatching it through the record layer before surfacing the error
//! to the caller (see [`crate::alert`]).

use crate::alert::AlertDescription;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsErrorKind {
    /// Null client/transport at entry, or an RC4 suite offered.
    InvalidArgument,
    /// The server's record-layer version is later than the client's.
    IllegalParameter,
    /// Wrong message type for the current driver state.
    UnexpectedMessage,
    /// Malformed length prefix, trailing bytes, or an out-of-range field.
    DecodeError,
    /// The server returned an extension the client never offered.
    UnsupportedExtension,
    /// Bad `renegotiation_info` payload, or a Finished verify_data mismatch.
    HandshakeFailure,
    /// A non-DTLS client version was configured.
    InternalError,
}

impl TlsErrorKind {
    /// The alert a conformant implementation sends when failing for this reason.
    pub fn alert_description(self) -> AlertDescription {
        match self {
            TlsErrorKind::InvalidArgument => AlertDescription::IllegalParameter,
            TlsErrorKind::IllegalParameter => AlertDescription::IllegalParameter,
            TlsErrorKind::UnexpectedMessage => AlertDescription::UnexpectedMessage,
            TlsErrorKind::DecodeError => AlertDescription::DecodeError,
            TlsErrorKind::UnsupportedExtension => AlertDescription::UnsupportedExtension,
            TlsErrorKind::HandshakeFailure => AlertDescription::HandshakeFailure,
            TlsErrorKind::InternalError => AlertDescription::InternalError,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{}: {desc}", .kind.alert_description())]
pub struct TlsError {
    pub kind: TlsErrorKind,
    pub desc: String,
}

impl TlsError {
    pub fn new(kind: TlsErrorKind, desc: String) -> TlsError {
        TlsError { kind, desc }
    }
}

pub type TlsResult<T> = Result<T, TlsError>;
