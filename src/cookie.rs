//! The DTLS cookie patcher (RFC 6347 §4.2.1): splices a server-issued
//! cookie into a previously serialized `ClientHello` body without
//! re-parsing or re-serializing it, so the retransmitted message is
//! byte-identical to the first send outside the cookie field.
//!
//! Operates on the `ClientHello` body as produced by
//! [`crate::handshake::ClientHello::tls_write`]: the bytes starting at
//! `client_version`, not the outer handshake-message framing (type tag
//! and u24 length), which the caller re-derives when resending.

use crate::error::{TlsErrorKind, TlsResult};

/// `client_version` (2 bytes) + `random` (32 bytes): the session_id
/// length byte immediately follows.
const SESSION_ID_LEN_OFFSET: usize = 2 + 32;

/// Splices `cookie` into `client_hello_body` in place of whatever cookie
/// field is already there (empty on a first send, a previous cookie on
/// a repeated retry), leaving every other byte untouched.
pub fn patch_cookie(client_hello_body: &[u8], cookie: &[u8]) -> TlsResult<Vec<u8>> {
    if cookie.is_empty() || cookie.len() > 32 {
        return tls_err!(
            TlsErrorKind::InvalidArgument,
            "cookie length {} out of range 1..32",
            cookie.len()
        );
    }

    if client_hello_body.len() <= SESSION_ID_LEN_OFFSET {
        return tls_err!(
            TlsErrorKind::DecodeError,
            "ClientHello body too short to carry a session_id length byte"
        );
    }
    let session_id_len = client_hello_body[SESSION_ID_LEN_OFFSET] as usize;
    let cookie_len_offset = SESSION_ID_LEN_OFFSET + 1 + session_id_len;

    if client_hello_body.len() <= cookie_len_offset {
        return tls_err!(
            TlsErrorKind::DecodeError,
            "ClientHello body too short to carry a cookie length byte"
        );
    }
    let old_cookie_len = client_hello_body[cookie_len_offset] as usize;
    let old_cookie_end = cookie_len_offset + 1 + old_cookie_len;
    if client_hello_body.len() < old_cookie_end {
        return tls_err!(TlsErrorKind::DecodeError, "ClientHello body truncated within cookie field");
    }

    let mut patched = Vec::with_capacity(client_hello_body.len() - old_cookie_len + cookie.len());
    patched.extend_from_slice(&client_hello_body[..cookie_len_offset]);
    patched.push(cookie.len() as u8);
    patched.extend_from_slice(cookie);
    patched.extend_from_slice(&client_hello_body[old_cookie_end..]);

    Ok(patched)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::extensions::ExtensionTable;
    use crate::handshake::{CipherSuiteList, ClientHello, CompressionMethodList, Cookie, Random, SessionId};
    use crate::tls_item::TlsItem;

    fn fresh_client_hello_body() -> Vec<u8> {
        let hello = ClientHello {
            client_version: crate::constants::DTLS_1_0,
            random: Random::new(vec![0x42; 32]).unwrap(),
            session_id: SessionId::new(vec![]).unwrap(),
            cookie: Cookie::new(vec![]).unwrap(),
            cipher_suites: CipherSuiteList::new(vec![0xC0, 0x2F, 0x00, 0xFF]).unwrap(),
            compression_methods: CompressionMethodList::new(vec![0]).unwrap(),
            extensions: ExtensionTable::new().with_empty_renegotiation_info().unwrap(),
        };
        let mut buf = Vec::new();
        hello.tls_write(&mut buf).unwrap();
        buf
    }

    #[test]
    fn patch_preserves_everything_outside_the_cookie_field() {
        let original = fresh_client_hello_body();
        let cookie = vec![0xDE, 0xAD, 0xBE, 0xEF];

        let patched = patch_cookie(&original, &cookie).unwrap();
        assert_eq!(patched.len(), original.len() + cookie.len());

        let mut reader = &patched[..];
        let parsed = ClientHello::tls_read(&mut reader).unwrap();
        assert_eq!(&*parsed.cookie, cookie.as_slice());
        assert_eq!(&*parsed.random, &[0x42; 32][..]);
        assert_eq!(&*parsed.session_id, &[][..]);
        assert_eq!(&*parsed.cipher_suites, &[0xC0, 0x2F, 0x00, 0xFF][..]);
        assert_eq!(&*parsed.compression_methods, &[0][..]);
    }

    #[test]
    fn splice_lands_at_the_documented_offset_for_an_empty_session_id() {
        let original = fresh_client_hello_body();
        let patched = patch_cookie(&original, &[1, 2, 3, 4]).unwrap();

        // offset 34 = session_id length byte (0x00), offset 35 = new cookie length byte.
        assert_eq!(original[34], 0);
        assert_eq!(patched[35], 4);
        assert_eq!(&patched[36..40], &[1, 2, 3, 4]);
    }

    #[test]
    fn repeated_patch_over_a_previous_cookie_is_clean() {
        let original = fresh_client_hello_body();
        let once = patch_cookie(&original, &[9, 9, 9]).unwrap();
        let twice = patch_cookie(&once, &[9, 9, 9]).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn every_cookie_length_in_range_round_trips() {
        let original = fresh_client_hello_body();
        for len in 1..=32usize {
            let cookie = vec![0x55u8; len];
            let patched = patch_cookie(&original, &cookie).unwrap();
            let mut reader = &patched[..];
            let parsed = ClientHello::tls_read(&mut reader).unwrap();
            assert_eq!(&*parsed.cookie, cookie.as_slice());
        }
    }

    #[test]
    fn rejects_out_of_range_cookie_length() {
        let original = fresh_client_hello_body();
        assert!(patch_cookie(&original, &[]).is_err());
        assert!(patch_cookie(&original, &[0u8; 33]).is_err());
    }
}
