//! Handshake message types: the `ClientHello`/`ServerHello`/
//! `HelloVerifyRequest` cookie exchange, the server's certificate chain
//! and key exchange parameters (carried opaque, since parsing and
//! validating them is a capability the caller supplies), and the
//! client's answering `Certificate`/`ClientKeyExchange`/
//! `CertificateVerify`/`Finished` messages.
//!
//! Every message type here implements [`TlsItem`]; [`Handshake`] wraps
//! them with the one-byte message-type tag and u24 body length that
//! precede every handshake message on the wire (RFC 5246 §7.4).

use crate::error::{TlsErrorKind, TlsResult};
use crate::extensions::ExtensionTable;
use crate::tls_item::{tls_array, tls_vec, TlsItem};
use crate::util::{ReadExt, WriteExt};

/// `{major, minor}` as sent on the wire. DTLS versions are the inverse of
/// the TLS version they correspond to; see [`crate::constants`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolVersion {
    pub major: u8,
    pub minor: u8,
}

impl TlsItem for ProtocolVersion {
    fn tls_write<W: WriteExt>(&self, writer: &mut W) -> TlsResult<()> {
        writer.write_u8(self.major)?;
        writer.write_u8(self.minor)
    }

    fn tls_read<R: ReadExt>(reader: &mut R) -> TlsResult<ProtocolVersion> {
        let major = reader.read_u8()?;
        let minor = reader.read_u8()?;
        Ok(ProtocolVersion { major, minor })
    }

    fn tls_size(&self) -> u64 {
        2
    }
}

tls_array!(Random, 32, "32 bytes of client/server randomness (RFC 5246 §7.4.1.2).");
tls_vec!(SessionId, 0, 32, "Opaque session identifier, empty on a non-resumed handshake.");
tls_vec!(Cookie, 0, 32, "Anti-amplification cookie carried in ClientHello and HelloVerifyRequest.");

/// A cipher suite identifier. This core never interprets the value
/// beyond comparing it against the offered list and the RC4 denylist;
/// the chosen suite's actual behavior is the `TlsClient` capability's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherSuiteId(pub u16);

impl TlsItem for CipherSuiteId {
    fn tls_write<W: WriteExt>(&self, writer: &mut W) -> TlsResult<()> {
        writer.write_be_u16(self.0)
    }
    fn tls_read<R: ReadExt>(reader: &mut R) -> TlsResult<CipherSuiteId> {
        Ok(CipherSuiteId(reader.read_be_u16()?))
    }
    fn tls_size(&self) -> u64 {
        2
    }
}

tls_vec!(CipherSuiteList, 2, (1 << 16) - 2, "The client's offered cipher suites, u16-encoded.");

/// A compression method identifier. The only value this core ever
/// offers or accepts is [`CompressionMethod::NULL`]; any other value a
/// server selects is a handshake failure (see Non-goals: no compression
/// support).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionMethod(pub u8);

impl CompressionMethod {
    pub const NULL: CompressionMethod = CompressionMethod(0);
}

impl TlsItem for CompressionMethod {
    fn tls_write<W: WriteExt>(&self, writer: &mut W) -> TlsResult<()> {
        writer.write_u8(self.0)
    }
    fn tls_read<R: ReadExt>(reader: &mut R) -> TlsResult<CompressionMethod> {
        Ok(CompressionMethod(reader.read_u8()?))
    }
    fn tls_size(&self) -> u64 {
        1
    }
}

tls_vec!(CompressionMethodList, 1, 255, "The client's offered compression methods.");

/// `ClientHello`, sent twice on a fresh handshake: once with an empty
/// cookie, and once more with the cookie copied from the server's
/// `HelloVerifyRequest` (RFC 6347 §4.2.1). The second send is produced
/// by [`crate::cookie`] splicing the cookie into a copy of the first
/// send's bytes, not by re-running this codec, but both sends parse
/// back through the same type.
#[derive(Debug, Clone)]
pub struct ClientHello {
    pub client_version: ProtocolVersion,
    pub random: Random,
    pub session_id: SessionId,
    pub cookie: Cookie,
    pub cipher_suites: CipherSuiteList,
    pub compression_methods: CompressionMethodList,
    pub extensions: ExtensionTable,
}

impl TlsItem for ClientHello {
    fn tls_write<W: WriteExt>(&self, writer: &mut W) -> TlsResult<()> {
        self.client_version.tls_write(writer)?;
        self.random.tls_write(writer)?;
        self.session_id.tls_write(writer)?;
        self.cookie.tls_write(writer)?;
        self.cipher_suites.tls_write(writer)?;
        self.compression_methods.tls_write(writer)?;
        self.extensions.write_if_present(writer)
    }

    fn tls_read<R: ReadExt>(reader: &mut R) -> TlsResult<ClientHello> {
        let client_version = ProtocolVersion::tls_read(reader)?;
        let random = Random::tls_read(reader)?;
        let session_id = SessionId::tls_read(reader)?;
        let cookie = Cookie::tls_read(reader)?;
        let cipher_suites = CipherSuiteList::tls_read(reader)?;
        let compression_methods = CompressionMethodList::tls_read(reader)?;
        Ok(ClientHello {
            client_version,
            random,
            session_id,
            cookie,
            cipher_suites,
            compression_methods,
            extensions: ExtensionTable::new(),
        })
    }

    fn tls_size(&self) -> u64 {
        self.client_version.tls_size()
            + self.random.tls_size()
            + self.session_id.tls_size()
            + self.cookie.tls_size()
            + self.cipher_suites.tls_size()
            + self.compression_methods.tls_size()
    }
}

/// `ServerHello`. The extension block is optional on the wire: absent
/// when the server offers none, present (possibly empty) otherwise.
/// Both cases parse to an empty [`ExtensionTable`] here, since there is
/// no behavioral difference between them for this core.
#[derive(Debug, Clone)]
pub struct ServerHello {
    pub server_version: ProtocolVersion,
    pub random: Random,
    pub session_id: SessionId,
    pub cipher_suite: CipherSuiteId,
    pub compression_method: CompressionMethod,
    pub extensions: ExtensionTable,
}

impl ServerHello {
    /// `ServerHello`'s extension block only exists after 4 fixed fields
    /// and two opaque/scalar ones that can't be read generically by
    /// `TlsItem::tls_read` (it needs a `&[u8]` it can leave partially
    /// consumed). Parsed from the handshake body by [`Handshake::tls_read`].
    pub(crate) fn parse_body(body: &mut &[u8]) -> TlsResult<ServerHello> {
        let server_version = ProtocolVersion::tls_read(body)?;
        let random = Random::tls_read(body)?;
        let session_id = SessionId::tls_read(body)?;
        let cipher_suite = CipherSuiteId::tls_read(body)?;
        let compression_method = CompressionMethod::tls_read(body)?;
        let extensions = ExtensionTable::read_if_present(body)?;
        Ok(ServerHello {
            server_version,
            random,
            session_id,
            cipher_suite,
            compression_method,
            extensions,
        })
    }

    pub(crate) fn write_body<W: WriteExt>(&self, writer: &mut W) -> TlsResult<()> {
        self.server_version.tls_write(writer)?;
        self.random.tls_write(writer)?;
        self.session_id.tls_write(writer)?;
        self.cipher_suite.tls_write(writer)?;
        self.compression_method.tls_write(writer)?;
        self.extensions.write_if_present(writer)
    }
}

/// `HelloVerifyRequest`. The `server_version` field here is not the
/// negotiated version: RFC 6347 §4.2.1 has servers echo their *own*
/// version regardless of what the client offered, and this core does
/// not validate it against anything beyond "is this a DTLS version".
#[derive(Debug, Clone)]
pub struct HelloVerifyRequest {
    pub server_version: ProtocolVersion,
    pub cookie: Cookie,
}

impl TlsItem for HelloVerifyRequest {
    fn tls_write<W: WriteExt>(&self, writer: &mut W) -> TlsResult<()> {
        self.server_version.tls_write(writer)?;
        self.cookie.tls_write(writer)
    }

    fn tls_read<R: ReadExt>(reader: &mut R) -> TlsResult<HelloVerifyRequest> {
        let server_version = ProtocolVersion::tls_read(reader)?;
        let cookie = Cookie::tls_read(reader)?;
        // Cookie's own size range is 0..32 (ClientHello's first-send cookie
        // is empty), but a HelloVerifyRequest cookie must be 1..32.
        if cookie.is_empty() {
            return tls_err!(TlsErrorKind::DecodeError, "HelloVerifyRequest cookie must not be empty");
        }
        Ok(HelloVerifyRequest { server_version, cookie })
    }

    fn tls_size(&self) -> u64 {
        self.server_version.tls_size() + self.cookie.tls_size()
    }
}

/// The server's certificate chain, carried as the raw
/// `u24-length-prefixed` list of `u24-length-prefixed` DER certificates,
/// unparsed: validating it is the `Authentication` capability's job, not
/// this core's (see Non-goals: no X.509 parsing or chain validation).
#[derive(Debug, Clone)]
pub struct CertificateList(pub Vec<u8>);

impl TlsItem for CertificateList {
    fn tls_write<W: WriteExt>(&self, writer: &mut W) -> TlsResult<()> {
        write_u24_len(writer, self.0.len())?;
        writer.write_bytes(&self.0)
    }

    fn tls_read<R: ReadExt>(reader: &mut R) -> TlsResult<CertificateList> {
        let len = read_u24_len(reader)?;
        Ok(CertificateList(reader.read_exact_vec(len)?))
    }

    fn tls_size(&self) -> u64 {
        3 + self.0.len() as u64
    }
}

/// The server's key exchange parameters, carried opaque: their shape
/// depends on the negotiated cipher suite's key exchange method, which
/// the `KeyExchange` capability alone understands.
#[derive(Debug, Clone)]
pub struct ServerKeyExchange(pub Vec<u8>);

impl ServerKeyExchange {
    /// Unlike the other handshake bodies, a `ServerKeyExchange`'s
    /// internal structure is entirely cipher-suite-defined, so this
    /// reads to the end of the enclosing handshake body rather than a
    /// length it encodes itself.
    pub(crate) fn parse_body(body: &mut &[u8]) -> TlsResult<ServerKeyExchange> {
        let remaining = body.read_exact_vec(body.len())?;
        Ok(ServerKeyExchange(remaining))
    }

    pub(crate) fn write_body<W: WriteExt>(&self, writer: &mut W) -> TlsResult<()> {
        writer.write_bytes(&self.0)
    }
}

tls_vec!(CertificateAuthorities, 0, (1 << 16) - 1, "DER-encoded distinguished names the server will accept.");

/// `CertificateRequest`. The certificate type list and supported
/// signature algorithms are exposed as-is; choosing and producing a
/// matching client certificate is the `Authentication` capability's job.
#[derive(Debug, Clone)]
pub struct CertificateRequest {
    pub certificate_types: Vec<u8>,
    pub supported_signature_algorithms: Vec<(u8, u8)>,
    pub certificate_authorities: CertificateAuthorities,
}

impl CertificateRequest {
    pub(crate) fn parse_body(body: &mut &[u8]) -> TlsResult<CertificateRequest> {
        let ct_len = body.read_u8()? as usize;
        let certificate_types = body.read_exact_vec(ct_len)?;

        let sig_algs_len = body.read_be_u16()? as usize;
        if sig_algs_len % 2 != 0 {
            return tls_err!(
                TlsErrorKind::DecodeError,
                "odd-length supported_signature_algorithms: {} bytes",
                sig_algs_len
            );
        }
        let sig_algs_bytes = body.read_exact_vec(sig_algs_len)?;
        let supported_signature_algorithms = sig_algs_bytes.chunks(2).map(|c| (c[0], c[1])).collect();

        let certificate_authorities = CertificateAuthorities::tls_read(body)?;

        Ok(CertificateRequest {
            certificate_types,
            supported_signature_algorithms,
            certificate_authorities,
        })
    }

    pub(crate) fn write_body<W: WriteExt>(&self, writer: &mut W) -> TlsResult<()> {
        writer.write_u8(self.certificate_types.len() as u8)?;
        writer.write_bytes(&self.certificate_types)?;

        writer.write_be_u16((self.supported_signature_algorithms.len() * 2) as u16)?;
        for (hash, sig) in &self.supported_signature_algorithms {
            writer.write_u8(*hash)?;
            writer.write_u8(*sig)?;
        }

        self.certificate_authorities.tls_write(writer)
    }
}

/// `ServerHelloDone`: a zero-length body. A non-empty body is a decode
/// error, not something to silently ignore.
#[derive(Debug, Clone, Copy)]
pub struct ServerHelloDone;

impl ServerHelloDone {
    pub(crate) fn parse_body(body: &mut &[u8]) -> TlsResult<ServerHelloDone> {
        body.assert_empty()?;
        Ok(ServerHelloDone)
    }

    pub(crate) fn write_body<W: WriteExt>(&self, _writer: &mut W) -> TlsResult<()> {
        Ok(())
    }
}

/// The client's answer to `ServerKeyExchange`/`CertificateRequest`,
/// produced by the `KeyExchange` capability. Carried opaque for the same
/// reason as `ServerKeyExchange`.
#[derive(Debug, Clone)]
pub struct ClientKeyExchange(pub Vec<u8>);

impl ClientKeyExchange {
    pub(crate) fn parse_body(body: &mut &[u8]) -> TlsResult<ClientKeyExchange> {
        let remaining = body.read_exact_vec(body.len())?;
        Ok(ClientKeyExchange(remaining))
    }

    pub(crate) fn write_body<W: WriteExt>(&self, writer: &mut W) -> TlsResult<()> {
        writer.write_bytes(&self.0)
    }
}

tls_vec!(Signature, 0, (1 << 16) - 1, "The client's signature over the handshake transcript.");

/// `CertificateVerify`: proves possession of the private key matching
/// the client certificate just sent. Produced by the `Signer` capability.
#[derive(Debug, Clone)]
pub struct CertificateVerify {
    pub signature: Signature,
}

impl TlsItem for CertificateVerify {
    fn tls_write<W: WriteExt>(&self, writer: &mut W) -> TlsResult<()> {
        self.signature.tls_write(writer)
    }
    fn tls_read<R: ReadExt>(reader: &mut R) -> TlsResult<CertificateVerify> {
        Ok(CertificateVerify { signature: Signature::tls_read(reader)? })
    }
    fn tls_size(&self) -> u64 {
        self.signature.tls_size()
    }
}

tls_array!(VerifyData, 12, "12-byte PRF output proving knowledge of the master secret.");

/// `Finished`: the last message of each side's flight, whose
/// `verify_data` must be compared with [`crate::util::crypto_compare`],
/// never `==`.
#[derive(Debug, Clone)]
pub struct Finished {
    pub verify_data: VerifyData,
}

impl TlsItem for Finished {
    fn tls_write<W: WriteExt>(&self, writer: &mut W) -> TlsResult<()> {
        self.verify_data.tls_write(writer)
    }
    fn tls_read<R: ReadExt>(reader: &mut R) -> TlsResult<Finished> {
        Ok(Finished { verify_data: VerifyData::tls_read(reader)? })
    }
    fn tls_size(&self) -> u64 {
        self.verify_data.tls_size()
    }
}

/// Raw `HandshakeType` tag values (RFC 5246 §7.4), for the driver to
/// match on directly: the `ReliableHandshake` capability hands back
/// already-depacketized `(type, body)` pairs rather than the framed
/// bytes `Handshake::tls_read` expects, so the driver parses each
/// message's body with its own codec function keyed on one of these.
pub mod message_type {
    pub const HELLO_REQUEST: u8 = 0;
    pub const CLIENT_HELLO: u8 = 1;
    pub const SERVER_HELLO: u8 = 2;
    pub const HELLO_VERIFY_REQUEST: u8 = 3;
    pub const CERTIFICATE: u8 = 11;
    pub const SERVER_KEY_EXCHANGE: u8 = 12;
    pub const CERTIFICATE_REQUEST: u8 = 13;
    pub const SERVER_HELLO_DONE: u8 = 14;
    pub const CERTIFICATE_VERIFY: u8 = 15;
    pub const CLIENT_KEY_EXCHANGE: u8 = 16;
    pub const FINISHED: u8 = 20;
    /// RFC 4680. Not one of the ten message types this core's wire
    /// codec owns end-to-end, but the driver must recognize the tag to
    /// implement the optional SupplementalData step.
    pub const SUPPLEMENTAL_DATA: u8 = 23;
}

fn write_u24_len<W: WriteExt>(writer: &mut W, len: usize) -> TlsResult<()> {
    if len > 0x00FF_FFFF {
        return tls_err!(TlsErrorKind::InternalError, "length {} does not fit a u24 prefix", len);
    }
    let b = (len as u32).to_be_bytes();
    writer.write_u8(b[1])?;
    writer.write_u8(b[2])?;
    writer.write_u8(b[3])
}

fn read_u24_len<R: ReadExt>(reader: &mut R) -> TlsResult<usize> {
    let b0 = reader.read_u8()? as u32;
    let b1 = reader.read_u8()? as u32;
    let b2 = reader.read_u8()? as u32;
    Ok(((b0 << 16) | (b1 << 8) | b2) as usize)
}

/// The handshake messages this core sends or receives. Each variant
/// corresponds to one `HandshakeType` (RFC 5246 §7.4); the wrapping
/// one-byte tag and u24 body length are handled by
/// [`Handshake::tls_write`]/[`Handshake::tls_read`], not by the inner
/// types, so that every message shares exactly one length-framing
/// implementation.
#[derive(Debug, Clone)]
pub enum Handshake {
    HelloVerifyRequest(HelloVerifyRequest),
    ClientHello(ClientHello),
    ServerHello(ServerHello),
    Certificate(CertificateList),
    ServerKeyExchange(ServerKeyExchange),
    CertificateRequest(CertificateRequest),
    ServerHelloDone(ServerHelloDone),
    ClientKeyExchange(ClientKeyExchange),
    CertificateVerify(CertificateVerify),
    Finished(Finished),
}

impl Handshake {
    fn message_type(&self) -> u8 {
        use message_type::*;
        match self {
            Handshake::HelloVerifyRequest(_) => HELLO_VERIFY_REQUEST,
            Handshake::ClientHello(_) => CLIENT_HELLO,
            Handshake::ServerHello(_) => SERVER_HELLO,
            Handshake::Certificate(_) => CERTIFICATE,
            Handshake::ServerKeyExchange(_) => SERVER_KEY_EXCHANGE,
            Handshake::CertificateRequest(_) => CERTIFICATE_REQUEST,
            Handshake::ServerHelloDone(_) => SERVER_HELLO_DONE,
            Handshake::CertificateVerify(_) => CERTIFICATE_VERIFY,
            Handshake::ClientKeyExchange(_) => CLIENT_KEY_EXCHANGE,
            Handshake::Finished(_) => FINISHED,
        }
    }

    pub(crate) fn write_body<W: WriteExt>(&self, writer: &mut W) -> TlsResult<()> {
        match self {
            Handshake::HelloVerifyRequest(m) => m.tls_write(writer),
            Handshake::ClientHello(m) => m.tls_write(writer),
            Handshake::ServerHello(m) => m.write_body(writer),
            Handshake::Certificate(m) => m.tls_write(writer),
            Handshake::ServerKeyExchange(m) => m.write_body(writer),
            Handshake::CertificateRequest(m) => m.write_body(writer),
            Handshake::ServerHelloDone(m) => m.write_body(writer),
            Handshake::ClientKeyExchange(m) => m.write_body(writer),
            Handshake::CertificateVerify(m) => m.tls_write(writer),
            Handshake::Finished(m) => m.tls_write(writer),
        }
    }

    pub fn tls_write<W: WriteExt>(&self, writer: &mut W) -> TlsResult<()> {
        let mut body = Vec::new();
        self.write_body(&mut body)?;

        writer.write_u8(self.message_type())?;
        write_u24_len(writer, body.len())?;
        writer.write_bytes(&body)
    }

    pub fn tls_read(reader: &mut &[u8]) -> TlsResult<Handshake> {
        use message_type::*;

        let message_type = reader.read_u8()?;
        let len = read_u24_len(reader)?;
        let mut body = &reader.read_exact_vec(len)?[..];

        let msg = match message_type {
            HELLO_VERIFY_REQUEST => Handshake::HelloVerifyRequest(HelloVerifyRequest::tls_read(&mut body)?),
            CLIENT_HELLO => Handshake::ClientHello(ClientHello::tls_read(&mut body)?),
            SERVER_HELLO => Handshake::ServerHello(ServerHello::parse_body(&mut body)?),
            CERTIFICATE => Handshake::Certificate(CertificateList::tls_read(&mut body)?),
            SERVER_KEY_EXCHANGE => Handshake::ServerKeyExchange(ServerKeyExchange::parse_body(&mut body)?),
            CERTIFICATE_REQUEST => Handshake::CertificateRequest(CertificateRequest::parse_body(&mut body)?),
            SERVER_HELLO_DONE => Handshake::ServerHelloDone(ServerHelloDone::parse_body(&mut body)?),
            CLIENT_KEY_EXCHANGE => Handshake::ClientKeyExchange(ClientKeyExchange::parse_body(&mut body)?),
            CERTIFICATE_VERIFY => Handshake::CertificateVerify(CertificateVerify::tls_read(&mut body)?),
            FINISHED => Handshake::Finished(Finished::tls_read(&mut body)?),
            other => {
                return tls_err!(TlsErrorKind::UnexpectedMessage, "unknown handshake message type: {}", other)
            }
        };

        body.assert_empty()?;
        Ok(msg)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample_client_hello() -> ClientHello {
        ClientHello {
            client_version: crate::constants::DTLS_1_0,
            random: Random::new(vec![0xAB; 32]).unwrap(),
            session_id: SessionId::new(vec![]).unwrap(),
            cookie: Cookie::new(vec![]).unwrap(),
            cipher_suites: CipherSuiteList::new(vec![0xC0, 0x2F]).unwrap(),
            compression_methods: CompressionMethodList::new(vec![0]).unwrap(),
            extensions: ExtensionTable::new(),
        }
    }

    #[test]
    fn client_hello_round_trips_through_handshake_framing() {
        let hello = Handshake::ClientHello(sample_client_hello());
        let mut buf = Vec::new();
        hello.tls_write(&mut buf).unwrap();

        assert_eq!(buf[0], 1); // client_hello
        let mut reader = &buf[..];
        match Handshake::tls_read(&mut reader).unwrap() {
            Handshake::ClientHello(parsed) => {
                assert_eq!(parsed.client_version, crate::constants::DTLS_1_0);
                assert_eq!(&*parsed.random, &[0xAB; 32][..]);
                assert_eq!(&*parsed.session_id, &[][..]);
            }
            other => panic!("wrong variant: {:?}", other),
        }
        reader.assert_empty().unwrap();
    }

    #[test]
    fn client_hello_with_extensions_round_trips() {
        let mut hello = sample_client_hello();
        hello.extensions = hello.extensions.with_empty_renegotiation_info().unwrap();

        let mut buf = Vec::new();
        Handshake::ClientHello(hello).tls_write(&mut buf).unwrap();

        let mut reader = &buf[..];
        match Handshake::tls_read(&mut reader).unwrap() {
            Handshake::ClientHello(parsed) => {
                assert!(parsed.extensions.contains(crate::constants::EXTENSION_RENEGOTIATION_INFO));
            }
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn session_id_of_32_bytes_is_accepted_33_is_rejected() {
        assert!(SessionId::new(vec![0u8; 32]).is_ok());
        assert!(SessionId::new(vec![0u8; 33]).is_err());
    }

    #[test]
    fn cookie_of_32_bytes_is_accepted_33_is_rejected() {
        assert!(Cookie::new(vec![0u8; 32]).is_ok());
        assert!(Cookie::new(vec![0u8; 33]).is_err());
    }

    #[test]
    fn hello_verify_request_round_trips() {
        let hvr = HelloVerifyRequest {
            server_version: crate::constants::DTLS_1_0,
            cookie: Cookie::new(vec![1, 2, 3, 4]).unwrap(),
        };
        let mut buf = Vec::new();
        Handshake::HelloVerifyRequest(hvr).tls_write(&mut buf).unwrap();

        let mut reader = &buf[..];
        match Handshake::tls_read(&mut reader).unwrap() {
            Handshake::HelloVerifyRequest(parsed) => {
                assert_eq!(&*parsed.cookie, &[1, 2, 3, 4][..]);
            }
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn hello_verify_request_rejects_empty_cookie() {
        let mut buf = Vec::new();
        crate::constants::DTLS_1_0.tls_write(&mut buf).unwrap();
        Cookie::new(vec![]).unwrap().tls_write(&mut buf).unwrap();

        let mut reader = &buf[..];
        assert!(HelloVerifyRequest::tls_read(&mut reader).is_err());
    }

    #[test]
    fn server_hello_with_absent_extension_block_parses() {
        let sh = ServerHello {
            server_version: crate::constants::DTLS_1_0,
            random: Random::new(vec![1; 32]).unwrap(),
            session_id: SessionId::new(vec![]).unwrap(),
            cipher_suite: CipherSuiteId(0xC02F),
            compression_method: CompressionMethod::NULL,
            extensions: ExtensionTable::new(),
        };
        let mut buf = Vec::new();
        let mut body = Vec::new();
        sh.write_body(&mut body).unwrap();
        buf.write_u8(2).unwrap();
        write_u24_len(&mut buf, body.len()).unwrap();
        buf.write_bytes(&body).unwrap();

        let mut reader = &buf[..];
        match Handshake::tls_read(&mut reader).unwrap() {
            Handshake::ServerHello(parsed) => {
                assert!(parsed.extensions.is_empty());
                assert_eq!(parsed.cipher_suite.0, 0xC02F);
            }
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn server_hello_done_rejects_non_empty_body() {
        let mut buf = Vec::new();
        buf.write_u8(14).unwrap();
        write_u24_len(&mut buf, 1).unwrap();
        buf.write_bytes(&[0xFF]).unwrap();

        let mut reader = &buf[..];
        assert!(Handshake::tls_read(&mut reader).is_err());
    }

    #[test]
    fn finished_round_trips() {
        let finished = Finished { verify_data: VerifyData::new(vec![7u8; 12]).unwrap() };
        let mut buf = Vec::new();
        Handshake::Finished(finished).tls_write(&mut buf).unwrap();

        let mut reader = &buf[..];
        match Handshake::tls_read(&mut reader).unwrap() {
            Handshake::Finished(parsed) => assert_eq!(&*parsed.verify_data, &[7u8; 12][..]),
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn unknown_message_type_is_rejected() {
        let mut buf = Vec::new();
        buf.write_u8(99).unwrap();
        write_u24_len(&mut buf, 0).unwrap();

        let mut reader = &buf[..];
        assert!(Handshake::tls_read(&mut reader).is_err());
    }
}
