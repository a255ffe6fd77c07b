//! A client-side DTLS 1.0 handshake driver core.
//!
//! This crate drives one client handshake to completion over an
//! unreliable datagram transport: it negotiates a cipher suite,
//! exchanges the DTLS `HelloVerifyRequest` cookie, derives the master
//! secret, and installs it on a record layer. It does not implement any
//! cipher suite, key exchange algorithm, or certificate validation
//! itself. Those are capabilities the caller supplies through the
//! traits in [`capability`] and [`transport`].
//!
//! The entry point is [`driver::connect`].

#[macro_use]
mod macros;

pub mod alert;
pub mod capability;
pub mod constants;
pub mod cookie;
pub mod driver;
pub mod error;
pub mod extensions;
pub mod handshake;
pub mod options;
pub mod prf;
pub mod state;
pub mod tls_item;
pub mod transport;
pub mod util;

pub use capability::{Authentication, ClientCredentials, KeyExchange, Signer, TlsClient};
pub use driver::connect;
pub use error::{TlsError, TlsErrorKind, TlsResult};
pub use options::ClientOptions;
pub use transport::{ReliableHandshake, RecordLayer};
