//! `TlsItem` is the serialization trait for everything that goes on the
//! wire: fixed-width integers, length-prefixed opaque vectors, and the
//! handshake messages built out of them.
//!
//! Two macros cover the repetitive cases:
//!
//! - [`tls_array!`] for a fixed-length byte array (e.g. a 32-byte random).
//! - [`tls_vec!`] for a length-prefixed vector of items (e.g. opaque8,
//!   opaque16, or a list of cipher suites).
//!
//! Everything else (structs, enums) is written by hand per message, since
//! there are few enough of them that a generic macro buys little clarity.

use crate::error::TlsResult;
use crate::util::{ReadExt, WriteExt};

/// A value that can be serialized to, and parsed from, a TLS byte stream.
pub trait TlsItem: Sized {
    fn tls_write<W: WriteExt>(&self, writer: &mut W) -> TlsResult<()>;
    fn tls_read<R: ReadExt>(reader: &mut R) -> TlsResult<Self>;
    /// Length of the serialized form in bytes.
    fn tls_size(&self) -> u64;
}

impl TlsItem for u8 {
    fn tls_write<W: WriteExt>(&self, writer: &mut W) -> TlsResult<()> {
        writer.write_u8(*self)
    }
    fn tls_read<R: ReadExt>(reader: &mut R) -> TlsResult<u8> {
        reader.read_u8()
    }
    fn tls_size(&self) -> u64 {
        1
    }
}

impl TlsItem for u16 {
    fn tls_write<W: WriteExt>(&self, writer: &mut W) -> TlsResult<()> {
        writer.write_be_u16(*self)
    }
    fn tls_read<R: ReadExt>(reader: &mut R) -> TlsResult<u16> {
        reader.read_be_u16()
    }
    fn tls_size(&self) -> u64 {
        2
    }
}

/// A fixed-size byte array, e.g. the 32-byte handshake `Random`.
macro_rules! tls_array {
    ($name:ident, $n:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, PartialEq, Eq)]
        pub struct $name(pub Vec<u8>);

        impl $name {
            pub const LEN: usize = $n;

            pub fn new(v: Vec<u8>) -> $crate::error::TlsResult<$name> {
                if v.len() != Self::LEN {
                    return tls_err!(
                        $crate::error::TlsErrorKind::DecodeError,
                        "bad size: {} != {}",
                        v.len(),
                        Self::LEN
                    );
                }
                Ok($name(v))
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({} bytes)", stringify!($name), self.0.len())
            }
        }

        impl std::ops::Deref for $name {
            type Target = [u8];
            fn deref(&self) -> &[u8] {
                &self.0
            }
        }

        impl $crate::tls_item::TlsItem for $name {
            fn tls_write<W: $crate::util::WriteExt>(&self, writer: &mut W) -> $crate::error::TlsResult<()> {
                writer.write_bytes(&self.0)
            }

            fn tls_read<R: $crate::util::ReadExt>(reader: &mut R) -> $crate::error::TlsResult<$name> {
                let data = reader.read_exact_vec(Self::LEN)?;
                Ok($name(data))
            }

            fn tls_size(&self) -> u64 {
                Self::LEN as u64
            }
        }
    };
}

pub(crate) use tls_array;

/// A length-prefixed opaque vector of bytes, `size_min..size_max` bytes long.
/// The prefix width (u8 or u16) is derived from `size_max`, as in RFC 5246 §4.3.
macro_rules! tls_vec {
    ($name:ident, $size_min:expr, $size_max:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, PartialEq, Eq)]
        pub struct $name(pub Vec<u8>);

        impl $name {
            pub fn new(v: Vec<u8>) -> $crate::error::TlsResult<$name> {
                let size_min: usize = $size_min;
                let size_max: usize = $size_max;
                if v.len() < size_min {
                    return tls_err!(
                        $crate::error::TlsErrorKind::DecodeError,
                        "bad size: {} < {}",
                        v.len(),
                        size_min
                    );
                }
                if v.len() > size_max {
                    return tls_err!(
                        $crate::error::TlsErrorKind::DecodeError,
                        "bad size: {} > {}",
                        v.len(),
                        size_max
                    );
                }
                Ok($name(v))
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({} bytes)", stringify!($name), self.0.len())
            }
        }

        impl std::ops::Deref for $name {
            type Target = [u8];
            fn deref(&self) -> &[u8] {
                &self.0
            }
        }

        impl $crate::tls_item::TlsItem for $name {
            fn tls_write<W: $crate::util::WriteExt>(&self, writer: &mut W) -> $crate::error::TlsResult<()> {
                let size_max: u64 = $size_max;
                let width = $crate::macros::len_prefix_width!(size_max);
                let len = self.0.len() as u64;
                if width == 1 {
                    writer.write_u8(len as u8)?;
                } else {
                    writer.write_be_u16(len as u16)?;
                }
                writer.write_bytes(&self.0)
            }

            fn tls_read<R: $crate::util::ReadExt>(reader: &mut R) -> $crate::error::TlsResult<$name> {
                let size_max: u64 = $size_max;
                let width = $crate::macros::len_prefix_width!(size_max);
                let len = if width == 1 {
                    reader.read_u8()? as usize
                } else {
                    reader.read_be_u16()? as usize
                };
                let data = reader.read_exact_vec(len)?;
                $name::new(data)
            }

            fn tls_size(&self) -> u64 {
                let size_max: u64 = $size_max;
                let width = $crate::macros::len_prefix_width!(size_max);
                width + self.0.len() as u64
            }
        }
    };
}

pub(crate) use tls_vec;

#[cfg(test)]
mod test {
    use super::*;

    tls_array!(TestArray32, 32, "test fixed array");
    tls_vec!(TestOpaque8, 0, 255, "test opaque8");
    tls_vec!(TestOpaque16, 0, 65535, "test opaque16");

    #[test]
    fn fixed_array_round_trips() {
        let a = TestArray32::new(vec![7u8; 32]).unwrap();
        let mut buf = Vec::new();
        a.tls_write(&mut buf).unwrap();
        assert_eq!(buf.len(), 32);

        let mut reader = &buf[..];
        let b = TestArray32::tls_read(&mut reader).unwrap();
        assert_eq!(*a, *b);
    }

    #[test]
    fn fixed_array_rejects_wrong_size() {
        assert!(TestArray32::new(vec![0u8; 31]).is_err());
        assert!(TestArray32::new(vec![0u8; 33]).is_err());
    }

    #[test]
    fn opaque8_uses_one_byte_length_prefix() {
        let v = TestOpaque8::new(vec![1, 2, 3]).unwrap();
        let mut buf = Vec::new();
        v.tls_write(&mut buf).unwrap();
        assert_eq!(buf, vec![3, 1, 2, 3]);
    }

    #[test]
    fn opaque16_uses_two_byte_length_prefix() {
        let v = TestOpaque16::new(vec![1, 2, 3]).unwrap();
        let mut buf = Vec::new();
        v.tls_write(&mut buf).unwrap();
        assert_eq!(buf, vec![0, 3, 1, 2, 3]);
    }

    #[test]
    fn opaque_rejects_out_of_range_size() {
        tls_vec!(Narrow, 1, 32, "cookie-like");
        assert!(Narrow::new(vec![]).is_err());
        assert!(Narrow::new(vec![0u8; 33]).is_err());
        assert!(Narrow::new(vec![0u8; 1]).is_ok());
        assert!(Narrow::new(vec![0u8; 32]).is_ok());
    }
}
