//! Small helper macros shared by the wire codec and message codecs.

/// Build a `TlsError` of the given kind with a formatted description.
macro_rules! tls_err {
    ($kind:expr, $($args:tt)*) => {
        Err($crate::error::TlsError::new($kind, format!($($args)*)))
    };
}

/// Number of wire bytes occupied by a length prefix for the given max size.
/// Opaque vectors in this core only ever use a u8 or u16 length (RFC 5246
/// §4.3); a larger `size_max` is a programmer error in a `tls_vec!` call.
macro_rules! len_prefix_width {
    ($size_max:expr) => {{
        let size_max: u64 = $size_max;
        assert!(size_max < (1 << 16), "tls_vec! size_max must fit a u16 length prefix");
        if size_max < (1 << 8) {
            1u64
        } else {
            2
        }
    }};
}

pub(crate) use len_prefix_width;
pub(crate) use tls_err;
