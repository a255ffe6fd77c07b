//! The handshake driver: the ordered state machine that interleaves
//! reads from the reliable-handshake layer with callbacks into the
//! `TlsClient` capability, producing a fully negotiated, keyed
//! connection on the supplied record layer. This is the centerpiece of
//! the crate; everything else exists to support it.

use log::{debug, trace, warn};
use zeroize::Zeroizing;

use crate::alert::AlertLevel;
use crate::capability::{Authentication, KeyExchange, TlsClient};
use crate::constants::is_dtls_version;
use crate::error::{TlsErrorKind, TlsResult};
use crate::extensions::is_empty_renegotiation_info;
use crate::handshake::{
    message_type, CertificateList, CertificateRequest, ClientHello, CompressionMethodList, Cookie, Finished,
    Random, ServerHello, ServerHelloDone, SessionId, VerifyData,
};
use crate::options::ClientOptions;
use crate::state::{ClientHandshakeState, SecurityParameters};
use crate::tls_item::TlsItem;
use crate::transport::{RawHandshakeMessage, ReliableHandshake, RecordLayer};
use crate::util::crypto_compare;

/// Drives one client handshake to completion over `reliable`, leaving
/// the negotiated cipher installed on `record_layer`. On success, the
/// caller's `record_layer` is the secured transport; on failure, a
/// fatal alert matching the returned error has already been sent.
pub fn connect<C>(
    client: &mut dyn TlsClient<CipherSpec = C>,
    options: &mut ClientOptions,
    reliable: &mut dyn ReliableHandshake,
    record_layer: &mut dyn RecordLayer<CipherSpec = C>,
) -> TlsResult<()> {
    match run(client, options, reliable, record_layer) {
        Ok(()) => Ok(()),
        Err(err) => {
            let description = err.kind.alert_description();
            warn!("handshake failed, dispatching fatal alert: kind={:?} description={}", err.kind, description);
            record_layer.send_alert(AlertLevel::Fatal, description);
            Err(err)
        }
    }
}

fn run<C>(
    client: &mut dyn TlsClient<CipherSpec = C>,
    options: &mut ClientOptions,
    reliable: &mut dyn ReliableHandshake,
    record_layer: &mut dyn RecordLayer<CipherSpec = C>,
) -> TlsResult<()> {
    // 1. Init.
    trace!("state: Init");
    let client_version = client.client_version();
    if !is_dtls_version(client_version) {
        return tls_err!(TlsErrorKind::InternalError, "client_version is not a DTLS version");
    }
    let mut client_random_bytes = vec![0u8; Random::LEN];
    options.fill_client_random(&mut client_random_bytes);
    let client_random = Random::new(client_random_bytes)?;
    let mut state = ClientHandshakeState::new(client_version);
    let mut security_params = SecurityParameters::new(client_random.clone());

    // 2. SendClientHello.
    trace!("state: SendClientHello");
    let mut client_hello_body = build_client_hello(client_version, &client_random, options)?;
    send_body(reliable, message_type::CLIENT_HELLO, &client_hello_body)?;

    // 3. ExpectServerHello/VerifyRequest.
    trace!("state: ExpectServerHello/VerifyRequest");
    let mut next = receive(reliable)?;

    if let Some(peer_version) = record_layer.discovered_peer_version() {
        check_server_version_not_later(client_version, peer_version)?;
        state.server_version = Some(peer_version);
    }

    // 4. CookieLoop.
    while next.0 == message_type::HELLO_VERIFY_REQUEST {
        trace!("state: CookieLoop");
        let hvr = crate::handshake::HelloVerifyRequest::tls_read(&mut &next.1[..])?;
        if let Some(server_version) = state.server_version {
            if hvr.server_version != server_version {
                return tls_err!(TlsErrorKind::DecodeError, "HelloVerifyRequest version does not match server_version");
            }
        }
        if hvr.cookie.is_empty() || hvr.cookie.len() > 32 {
            return tls_err!(TlsErrorKind::DecodeError, "cookie length {} out of range 1..32", hvr.cookie.len());
        }

        client_hello_body = crate::cookie::patch_cookie(&client_hello_body, &hvr.cookie)?;
        reliable.reset_transcript();
        send_body(reliable, message_type::CLIENT_HELLO, &client_hello_body)?;
        next = receive(reliable)?;
    }

    // 5. ServerHello.
    trace!("state: ServerHello");
    if next.0 != message_type::SERVER_HELLO {
        return tls_err!(TlsErrorKind::UnexpectedMessage, "expected ServerHello, got type {}", next.0);
    }
    let server_hello = ServerHello::parse_body(&mut &next.1[..])?;
    process_server_hello(client, options, &mut state, &mut security_params, &server_hello)?;
    debug!(
        "negotiated cipher_suite=0x{:04x} secure_renegotiation={}",
        state.negotiated_cipher_suite.unwrap().0,
        state.secure_renegotiation
    );

    state.key_exchange = Some(client.new_key_exchange(state.negotiated_cipher_suite.unwrap()));
    state.key_exchange.as_mut().unwrap().init();
    next = receive(reliable)?;

    // 6. (optional) SupplementalData.
    if next.0 == message_type::SUPPLEMENTAL_DATA {
        trace!("state: SupplementalData");
        client.consume_supplemental_data(Some(next.1.clone()));
        next = receive(reliable)?;
    } else {
        client.consume_supplemental_data(None);
    }

    // 7. (optional) Certificate.
    if next.0 == message_type::CERTIFICATE {
        trace!("state: Certificate");
        let certificates = CertificateList::tls_read(&mut &next.1[..])?;
        state.key_exchange.as_mut().unwrap().process_certificate(&certificates)?;
        state.authentication = client.new_authentication();
        next = receive(reliable)?;
    } else {
        state.key_exchange.as_mut().unwrap().skip_certificate()?;
    }

    // 8. (optional) ServerKeyExchange.
    if next.0 == message_type::SERVER_KEY_EXCHANGE {
        trace!("state: ServerKeyExchange");
        state.key_exchange.as_mut().unwrap().process_server_key_exchange(&next.1)?;
        next = receive(reliable)?;
    } else {
        state.key_exchange.as_mut().unwrap().skip_server_key_exchange()?;
    }

    // 9. (optional) CertificateRequest.
    if next.0 == message_type::CERTIFICATE_REQUEST {
        trace!("state: CertificateRequest");
        if state.authentication.is_none() {
            return tls_err!(TlsErrorKind::UnexpectedMessage, "CertificateRequest with no authentication capability");
        }
        let request = CertificateRequest::parse_body(&mut &next.1[..])?;
        state.key_exchange.as_mut().unwrap().process_certificate_request(&request)?;
        state.authentication.as_mut().unwrap().process_certificate(&request)?;
        state.certificate_request = Some(request);
        next = receive(reliable)?;
    }

    // 10. ServerHelloDone.
    trace!("state: ServerHelloDone");
    if next.0 != message_type::SERVER_HELLO_DONE {
        return tls_err!(TlsErrorKind::UnexpectedMessage, "expected ServerHelloDone, got type {}", next.0);
    }
    ServerHelloDone::parse_body(&mut &next.1[..])?;

    // 11. SendClientSupplementalData.
    if let Some(supplemental) = client.supplemental_data() {
        if !supplemental.is_empty() {
            trace!("state: SendClientSupplementalData");
            send_body(reliable, message_type::SUPPLEMENTAL_DATA, &supplemental)?;
        }
    }

    // 12. SendClientCertificate.
    if state.certificate_request.is_some() {
        trace!("state: SendClientCertificate");
        let credentials = state.authentication.as_ref().and_then(|a| a.credentials());
        let chain = match &credentials {
            Some(c) => &c.certificate_chain,
            None => &EMPTY_CERTIFICATE_LIST,
        };
        let mut body = Vec::new();
        chain.tls_write(&mut body)?;
        send_body(reliable, message_type::CERTIFICATE, &body)?;
        state.client_credentials = credentials;
    }

    // 13. SendClientKeyExchange.
    trace!("state: SendClientKeyExchange");
    let cke_body = state.key_exchange.as_mut().unwrap().client_key_exchange();
    send_body(reliable, message_type::CLIENT_KEY_EXCHANGE, &cke_body)?;

    // 14. DeriveSecrets.
    trace!("state: DeriveSecrets");
    let server_random = security_params.server_random.clone().expect("set in process_server_hello");
    {
        let premaster: Zeroizing<Vec<u8>> = state.key_exchange.take().unwrap().into_premaster_secret();
        security_params.master_secret = Some(crate::prf::master_secret(&premaster, &client_random, &server_random));
        // `premaster` is zeroized here on drop, on this and every other exit path.
    }
    let master_secret = security_params.master_secret.as_ref().expect("set above");

    // 15. SendCertificateVerify.
    if let Some(credentials) = &state.client_credentials {
        if let Some(signer) = &credentials.signer {
            trace!("state: SendCertificateVerify");
            let transcript_hash = reliable.current_transcript_hash();
            let signature = signer.sign(&transcript_hash);
            let verify = crate::handshake::CertificateVerify {
                signature: crate::handshake::Signature::new(signature)?,
            };
            let mut body = Vec::new();
            verify.tls_write(&mut body)?;
            send_body(reliable, message_type::CERTIFICATE_VERIFY, &body)?;
        }
    }

    // 16. Install pending cipher.
    trace!("state: InstallPendingCipher");
    let cipher_spec = client.new_cipher_spec(
        state.negotiated_cipher_suite.unwrap(),
        master_secret,
        &client_random,
        &server_random,
    );
    record_layer.init_pending_epoch(cipher_spec);

    // 17. SendClientFinished.
    trace!("state: SendClientFinished");
    let transcript_before_client_finished = reliable.current_transcript_hash();
    let client_verify_data =
        crate::prf::verify_data(master_secret, crate::prf::CLIENT_FINISHED_LABEL, &transcript_before_client_finished);
    let client_finished = Finished { verify_data: VerifyData::new(client_verify_data.to_vec())? };
    let mut finished_body = Vec::new();
    client_finished.tls_write(&mut finished_body)?;
    send_body(reliable, message_type::FINISHED, &finished_body)?;

    // 18. ExpectServerFinished.
    trace!("state: ExpectServerFinished");
    let transcript_before_server_finished = reliable.current_transcript_hash();
    let expected_server_verify_data =
        crate::prf::verify_data(master_secret, crate::prf::SERVER_FINISHED_LABEL, &transcript_before_server_finished);

    let final_message = receive(reliable)?;
    if final_message.0 != message_type::FINISHED {
        return tls_err!(TlsErrorKind::UnexpectedMessage, "expected Finished, got type {}", final_message.0);
    }
    let server_finished = Finished::tls_read(&mut &final_message.1[..])?;
    if !crypto_compare(&server_finished.verify_data, &expected_server_verify_data) {
        return tls_err!(TlsErrorKind::HandshakeFailure, "server Finished verify_data mismatch");
    }

    // 19. Finish.
    trace!("state: Finish");
    reliable.finish();
    record_layer.handshake_successful();

    Ok(())
}

static EMPTY_CERTIFICATE_LIST: CertificateList = CertificateList(Vec::new());

fn build_client_hello(client_version: crate::handshake::ProtocolVersion, client_random: &Random, options: &ClientOptions) -> TlsResult<Vec<u8>> {
    let cipher_suites = options.offered_suites_on_wire();
    let mut cipher_suite_bytes = Vec::with_capacity(cipher_suites.len() * 2);
    for suite in &cipher_suites {
        suite.tls_write(&mut cipher_suite_bytes)?;
    }

    let mut compression_bytes = Vec::new();
    for method in options.compression_methods() {
        method.tls_write(&mut compression_bytes)?;
    }

    let hello = ClientHello {
        client_version,
        random: client_random.clone(),
        session_id: SessionId::new(vec![])?,
        cookie: Cookie::new(vec![])?,
        cipher_suites: crate::handshake::CipherSuiteList::new(cipher_suite_bytes)?,
        compression_methods: CompressionMethodList::new(compression_bytes)?,
        extensions: options.extensions().clone(),
    };

    let mut body = Vec::new();
    hello.tls_write(&mut body)?;
    Ok(body)
}

fn process_server_hello<C>(
    client: &mut dyn TlsClient<CipherSpec = C>,
    options: &ClientOptions,
    state: &mut ClientHandshakeState,
    security_params: &mut SecurityParameters,
    server_hello: &ServerHello,
) -> TlsResult<()> {
    if let Some(server_version) = state.server_version {
        if server_hello.server_version != server_version {
            return tls_err!(TlsErrorKind::DecodeError, "ServerHello version does not match recorded server_version");
        }
    } else {
        check_server_version_not_later(state.client_version, server_hello.server_version)?;
        state.server_version = Some(server_hello.server_version);
    }
    client.notify_server_version(server_hello.server_version);

    if server_hello.session_id.len() > 32 {
        return tls_err!(TlsErrorKind::DecodeError, "ServerHello session_id longer than 32 bytes");
    }
    client.notify_session_id(&server_hello.session_id);

    let offered = options.offered_suites_on_wire();
    if server_hello.cipher_suite.0 == crate::constants::SCSV_EMPTY_RENEGOTIATION_INFO {
        return tls_err!(TlsErrorKind::IllegalParameter, "server selected the renegotiation SCSV as a cipher suite");
    }
    if !offered.iter().any(|s| s.0 == server_hello.cipher_suite.0) {
        return tls_err!(TlsErrorKind::IllegalParameter, "server selected a cipher suite the client did not offer");
    }
    client.notify_cipher_suite(server_hello.cipher_suite);
    state.negotiated_cipher_suite = Some(server_hello.cipher_suite);

    if !options.compression_methods().iter().any(|m| *m == server_hello.compression_method) {
        return tls_err!(TlsErrorKind::IllegalParameter, "server selected a compression method the client did not offer");
    }
    client.notify_compression_method(server_hello.compression_method);
    state.negotiated_compression_method = Some(server_hello.compression_method);

    for (ty, payload) in server_hello.extensions.iter() {
        if ty == crate::constants::EXTENSION_RENEGOTIATION_INFO {
            if !is_empty_renegotiation_info(payload) {
                return tls_err!(TlsErrorKind::HandshakeFailure, "renegotiation_info payload is not the expected empty value");
            }
            state.secure_renegotiation = true;
        } else if !options.extensions().contains(ty) {
            return tls_err!(TlsErrorKind::UnsupportedExtension, "server sent extension type {} the client did not offer", ty);
        }
    }
    client.notify_secure_renegotiation(state.secure_renegotiation);

    security_params.server_random = Some(server_hello.random.clone());

    Ok(())
}

fn check_server_version_not_later(client_version: crate::handshake::ProtocolVersion, server_version: crate::handshake::ProtocolVersion) -> TlsResult<()> {
    // DTLS versions are inverted: a numerically smaller minor means a
    // later protocol version, so "later than the client" means
    // "smaller minor" here, not larger.
    if server_version.major != client_version.major || server_version.minor < client_version.minor {
        return tls_err!(TlsErrorKind::IllegalParameter, "server_version is later than client_version");
    }
    Ok(())
}

fn send_body(reliable: &mut dyn ReliableHandshake, message_type: u8, body: &[u8]) -> TlsResult<()> {
    reliable.send(message_type, body).map_err(|e| io_error(message_type, e))
}

fn receive(reliable: &mut dyn ReliableHandshake) -> TlsResult<RawHandshakeMessage> {
    reliable.receive().map_err(|e| {
        crate::error::TlsError { kind: TlsErrorKind::InternalError, desc: format!("transport error: {}", e) }
    })
}

fn io_error(message_type: u8, e: std::io::Error) -> crate::error::TlsError {
    crate::error::TlsError {
        kind: TlsErrorKind::InternalError,
        desc: format!("transport error sending message type {}: {}", message_type, e),
    }
}
