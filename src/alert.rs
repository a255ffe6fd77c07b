//! TLS `Alert` message: the wire-level counterpart of [`crate::error::TlsErrorKind`].
//!
//! We only ever construct `fatal` alerts: this core treats every failure as
//! terminal to the handshake (see §7 of the spec this crate implements).

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::error::{TlsErrorKind, TlsResult};
use crate::tls_item::TlsItem;
use crate::util::{ReadExt, WriteExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum AlertLevel {
    Warning = 1,
    Fatal = 2,
}

// A.3. Alert Messages, http://www.iana.org/assignments/tls-parameters/
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum AlertDescription {
    CloseNotify = 0,
    UnexpectedMessage = 10,
    BadRecordMac = 20,
    RecordOverflow = 22,
    HandshakeFailure = 40,
    BadCertificate = 42,
    UnsupportedCertificate = 43,
    CertificateRevoked = 44,
    CertificateExpired = 45,
    CertificateUnknown = 46,
    IllegalParameter = 47,
    UnknownCa = 48,
    AccessDenied = 49,
    DecodeError = 50,
    DecryptError = 51,
    ProtocolVersion = 70,
    InsufficientSecurity = 71,
    InternalError = 80,
    UserCanceled = 90,
    NoRenegotiation = 100,
    UnsupportedExtension = 110,
}

#[derive(Debug, Clone, Copy)]
pub struct Alert {
    pub level: AlertLevel,
    pub description: AlertDescription,
}

impl Alert {
    pub fn fatal(description: AlertDescription) -> Alert {
        Alert {
            level: AlertLevel::Fatal,
            description,
        }
    }

    /// The alert a conformant client sends when a handshake fails with `kind`.
    pub fn from_error_kind(kind: TlsErrorKind) -> Alert {
        Alert::fatal(kind.alert_description())
    }
}

impl TlsItem for Alert {
    fn tls_write<W: WriteExt>(&self, writer: &mut W) -> TlsResult<()> {
        writer.write_u8(self.level as u8)?;
        writer.write_u8(self.description as u8)?;
        Ok(())
    }

    fn tls_read<R: ReadExt>(reader: &mut R) -> TlsResult<Alert> {
        let level_byte = reader.read_u8()?;
        let desc_byte = reader.read_u8()?;

        let level = match AlertLevel::try_from(level_byte) {
            Ok(level) => level,
            Err(_) => {
                return tls_err!(
                    crate::error::TlsErrorKind::DecodeError,
                    "unknown alert level: {}",
                    level_byte
                )
            }
        };
        let description = match AlertDescription::try_from(desc_byte) {
            Ok(desc) => desc,
            Err(_) => {
                return tls_err!(
                    crate::error::TlsErrorKind::DecodeError,
                    "unknown alert description: {}",
                    desc_byte
                )
            }
        };

        Ok(Alert { level, description })
    }

    fn tls_size(&self) -> u64 {
        2
    }
}

impl std::fmt::Display for AlertDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AlertDescription::CloseNotify => "close_notify",
            AlertDescription::UnexpectedMessage => "unexpected_message",
            AlertDescription::BadRecordMac => "bad_record_mac",
            AlertDescription::RecordOverflow => "record_overflow",
            AlertDescription::HandshakeFailure => "handshake_failure",
            AlertDescription::BadCertificate => "bad_certificate",
            AlertDescription::UnsupportedCertificate => "unsupported_certificate",
            AlertDescription::CertificateRevoked => "certificate_revoked",
            AlertDescription::CertificateExpired => "certificate_expired",
            AlertDescription::CertificateUnknown => "certificate_unknown",
            AlertDescription::IllegalParameter => "illegal_parameter",
            AlertDescription::UnknownCa => "unknown_ca",
            AlertDescription::AccessDenied => "access_denied",
            AlertDescription::DecodeError => "decode_error",
            AlertDescription::DecryptError => "decrypt_error",
            AlertDescription::ProtocolVersion => "protocol_version",
            AlertDescription::InsufficientSecurity => "insufficient_security",
            AlertDescription::InternalError => "internal_error",
            AlertDescription::UserCanceled => "user_canceled",
            AlertDescription::NoRenegotiation => "no_renegotiation",
            AlertDescription::UnsupportedExtension => "unsupported_extension",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trips_through_the_wire() {
        let alert = Alert::fatal(AlertDescription::HandshakeFailure);
        let mut buf = Vec::new();
        alert.tls_write(&mut buf).unwrap();
        assert_eq!(buf, vec![2, 40]);

        let mut reader = &buf[..];
        let parsed = Alert::tls_read(&mut reader).unwrap();
        assert_eq!(parsed.level, AlertLevel::Fatal);
        assert_eq!(parsed.description, AlertDescription::HandshakeFailure);
    }

    #[test]
    fn rejects_unknown_description() {
        let mut reader: &[u8] = &[2, 255];
        assert!(Alert::tls_read(&mut reader).is_err());
    }

    #[test]
    fn every_error_kind_maps_to_a_fatal_alert() {
        use crate::error::TlsErrorKind::*;
        for kind in [
            InvalidArgument,
            IllegalParameter,
            UnexpectedMessage,
            DecodeError,
            UnsupportedExtension,
            HandshakeFailure,
            InternalError,
        ] {
            let alert = Alert::from_error_kind(kind);
            assert_eq!(alert.level, AlertLevel::Fatal);
        }
    }
}
