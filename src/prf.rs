//! The TLS 1.0/1.1 pseudo-random function and the two secrets it drives:
//! `master_secret` (from the premaster secret) and `verify_data` (from
//! the master secret and the handshake transcript).
//!
//! `PRF(secret, label, seed) = P_MD5(secret, label || seed) XOR
//! P_SHA1(secret, label || seed)`, with both halves driven off the same
//! HMAC-based expansion, parameterized only by the digest.

use hmac::{Hmac, Mac};
use md5::Md5;
use sha1::Sha1;
use zeroize::Zeroizing;

const MASTER_SECRET_LEN: usize = 48;
const VERIFY_DATA_LEN: usize = 12;

fn hmac_once<M: Mac>(mut mac: M, data: &[u8]) -> Vec<u8> {
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// `P_hash(secret, seed)`, truncated to `out_len` bytes: `A(0) = seed`,
/// `A(i) = HMAC(secret, A(i-1))`, output is the concatenation of
/// `HMAC(secret, A(i) || seed)`.
fn p_hash<D>(secret: &[u8], seed: &[u8], out_len: usize) -> Vec<u8>
where
    Hmac<D>: Mac,
{
    let mut result = Vec::with_capacity(out_len + 32);
    let new_mac = || <Hmac<D> as Mac>::new_from_slice(secret).expect("HMAC accepts any key length");

    let mut a = hmac_once(new_mac(), seed);
    while result.len() < out_len {
        let mut input = a.clone();
        input.extend_from_slice(seed);
        result.extend_from_slice(&hmac_once(new_mac(), &input));
        a = hmac_once(new_mac(), &a);
    }

    result.truncate(out_len);
    result
}

/// The combined TLS 1.0/1.1 PRF.
pub fn prf(secret: &[u8], label: &[u8], seed: &[u8], out_len: usize) -> Vec<u8> {
    let mut full_seed = Vec::with_capacity(label.len() + seed.len());
    full_seed.extend_from_slice(label);
    full_seed.extend_from_slice(seed);

    let md5_out = p_hash::<Md5>(secret, &full_seed, out_len);
    let sha1_out = p_hash::<Sha1>(secret, &full_seed, out_len);

    md5_out.iter().zip(sha1_out.iter()).map(|(a, b)| a ^ b).collect()
}

/// Derives the 48-byte master secret from the premaster secret and the
/// two hello randoms. The premaster secret is the caller's to zeroize;
/// this function only ever borrows it.
pub fn master_secret(premaster_secret: &[u8], client_random: &[u8], server_random: &[u8]) -> Zeroizing<Vec<u8>> {
    let mut seed = Vec::with_capacity(client_random.len() + server_random.len());
    seed.extend_from_slice(client_random);
    seed.extend_from_slice(server_random);
    Zeroizing::new(prf(premaster_secret, b"master secret", &seed, MASTER_SECRET_LEN))
}

/// Derives a 12-byte `verify_data` for a `Finished` message: `label` is
/// `"client finished"` or `"server finished"`, `transcript_hash` is the
/// MD5||SHA1 concatenation of every handshake message exchanged so far
/// (owned by the reliable-handshake layer).
pub fn verify_data(master_secret: &[u8], label: &[u8], transcript_hash: &[u8]) -> [u8; VERIFY_DATA_LEN] {
    let bytes = prf(master_secret, label, transcript_hash, VERIFY_DATA_LEN);
    let mut out = [0u8; VERIFY_DATA_LEN];
    out.copy_from_slice(&bytes);
    out
}

pub const CLIENT_FINISHED_LABEL: &[u8] = b"client finished";
pub const SERVER_FINISHED_LABEL: &[u8] = b"server finished";
