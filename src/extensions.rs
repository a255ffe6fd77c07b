//! The client/server extension table: an ordered `u16 type -> opaque bytes`
//! mapping, plus the one extension this core interprets itself
//! (`renegotiation_info`); every other extension type is opaque payload
//! the `TlsClient` capability may choose to inspect.

use crate::constants::EXTENSION_RENEGOTIATION_INFO;
use crate::error::{TlsErrorKind, TlsResult};
use crate::util::{ReadExt, WriteExt};

/// `type -> opaque payload`, preserving insertion order on the wire.
/// Built by the client before the handshake starts; read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionTable(Vec<(u16, Vec<u8>)>);

impl ExtensionTable {
    pub fn new() -> ExtensionTable {
        ExtensionTable(Vec::new())
    }

    /// Inserts an extension. Rejects a duplicate type.
    pub fn insert(&mut self, ty: u16, payload: Vec<u8>) -> TlsResult<()> {
        if self.0.iter().any(|(t, _)| *t == ty) {
            return tls_err!(TlsErrorKind::DecodeError, "duplicate extension type: {}", ty);
        }
        self.0.push((ty, payload));
        Ok(())
    }

    pub fn contains(&self, ty: u16) -> bool {
        self.0.iter().any(|(t, _)| *t == ty)
    }

    pub fn get(&self, ty: u16) -> Option<&[u8]> {
        self.0.iter().find(|(t, _)| *t == ty).map(|(_, v)| v.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &[u8])> {
        self.0.iter().map(|(t, v)| (*t, v.as_slice()))
    }

    /// Builds the `renegotiation_info` extension payload for an initial
    /// (non-resumed, non-renegotiated) handshake: a single zero length
    /// byte, i.e. an empty `renegotiated_connection`.
    pub fn with_empty_renegotiation_info(mut self) -> TlsResult<ExtensionTable> {
        self.insert(EXTENSION_RENEGOTIATION_INFO, vec![0u8])?;
        Ok(self)
    }

    fn body_len(&self) -> u64 {
        self.0.iter().map(|(_, v)| 2 + 2 + v.len() as u64).sum()
    }

    /// Serializes the extension block (its own u16 total-length prefix,
    /// then the (type, length, bytes) triples) if non-empty; writes
    /// nothing at all when the table is empty.
    pub fn write_if_present<W: WriteExt>(&self, writer: &mut W) -> TlsResult<()> {
        if self.is_empty() {
            return Ok(());
        }

        writer.write_be_u16(self.body_len() as u16)?;
        for (ty, payload) in &self.0 {
            writer.write_be_u16(*ty)?;
            writer.write_be_u16(payload.len() as u16)?;
            writer.write_bytes(payload)?;
        }
        Ok(())
    }

    /// Parses an extension block from the remaining bytes of a message,
    /// or returns an empty table if no bytes remain. Per §4.2, an empty
    /// extension block is not the same thing as an absent one on the
    /// wire, but both are represented identically here: an
    /// `ExtensionTable` with no entries.
    pub fn read_if_present(reader: &mut &[u8]) -> TlsResult<ExtensionTable> {
        if reader.is_empty() {
            return Ok(ExtensionTable::new());
        }

        let total_len = reader.read_be_u16()? as usize;
        if total_len > reader.len() {
            return tls_err!(
                TlsErrorKind::DecodeError,
                "extension block length {} exceeds remaining {} bytes",
                total_len,
                reader.len()
            );
        }
        let (mut block, rest) = reader.split_at(total_len);
        *reader = rest;

        let mut table = ExtensionTable::new();
        while !block.is_empty() {
            let ty = block.read_be_u16()?;
            let len = block.read_be_u16()? as usize;
            let payload = block.read_exact_vec(len)?;
            table.insert(ty, payload)?;
        }

        Ok(table)
    }
}

/// Verifies a received `renegotiation_info` payload is a constant-time
/// match for the initial-handshake value (a single zero byte), per RFC
/// 5746 §3.3. The comparison is constant-time because, unlike most
/// parsing checks here, this one exists specifically to defend against a
/// MITM that injected itself before the real handshake began.
pub fn is_empty_renegotiation_info(payload: &[u8]) -> bool {
    crate::util::crypto_compare(payload, &[0u8])
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_table_writes_nothing() {
        let table = ExtensionTable::new();
        let mut buf = Vec::new();
        table.write_if_present(&mut buf).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn round_trips_through_the_wire() {
        let mut table = ExtensionTable::new();
        table.insert(10, vec![1, 2, 3]).unwrap();
        table.insert(11, vec![]).unwrap();

        let mut buf = Vec::new();
        table.write_if_present(&mut buf).unwrap();

        let mut reader: &[u8] = &buf;
        let parsed = ExtensionTable::read_if_present(&mut reader).unwrap();
        reader.assert_empty().unwrap();

        assert_eq!(parsed.get(10), Some(&[1, 2, 3][..]));
        assert_eq!(parsed.get(11), Some(&[][..]));
        assert_eq!(parsed.iter().map(|(t, _)| t).collect::<Vec<_>>(), vec![10, 11]);
    }

    #[test]
    fn rejects_duplicate_extension_type() {
        let mut table = ExtensionTable::new();
        table.insert(10, vec![1]).unwrap();
        assert!(table.insert(10, vec![2]).is_err());
    }

    #[test]
    fn renegotiation_info_payload_check_is_exact() {
        assert!(is_empty_renegotiation_info(&[0]));
        assert!(!is_empty_renegotiation_info(&[1]));
        assert!(!is_empty_renegotiation_info(&[0, 0]));
        assert!(!is_empty_renegotiation_info(&[]));
    }

    #[test]
    fn absent_block_parses_as_empty_table() {
        let mut reader: &[u8] = &[];
        let table = ExtensionTable::read_if_present(&mut reader).unwrap();
        assert!(table.is_empty());
    }
}
