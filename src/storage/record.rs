//! Snapshot record framing
//!
//! The snapshot file layout is:
//!
//! ```text
//! +------------------+
//! | Magic            | (8 bytes, "FRGTDB01")
//! +------------------+
//! | Record*          | (until end of file)
//! +------------------+
//! ```
//!
//! and each record is:
//!
//! ```text
//! +------------------+
//! | Section Tag      | (u8)
//! +------------------+
//! | Payload Length   | (u32 LE)
//! +------------------+
//! | Payload          | (JSON entity bytes)
//! +------------------+
//! | Checksum         | (u32 LE, CRC32 of tag + length + payload)
//! +------------------+
//! ```

use std::io::{self, Read};

use super::checksum::{compute_checksum, verify_checksum};
use super::errors::{StorageError, StorageResult};

/// File magic, first 8 bytes of every snapshot.
pub const SNAPSHOT_MAGIC: &[u8; 8] = b"FRGTDB01";

/// Refuse to read records claiming more than this many payload bytes;
/// a larger length field means the file is damaged.
const MAX_PAYLOAD_LEN: u32 = 64 * 1024 * 1024;

/// Which entity table a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionTag {
    Customer,
    Product,
    Order,
    Shipping,
}

impl SectionTag {
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Customer => 1,
            Self::Product => 2,
            Self::Order => 3,
            Self::Shipping => 4,
        }
    }

    pub fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::Customer),
            2 => Some(Self::Product),
            3 => Some(Self::Order),
            4 => Some(Self::Shipping),
            _ => None,
        }
    }
}

/// One framed snapshot record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub tag: SectionTag,
    pub payload: Vec<u8>,
}

impl Record {
    pub fn new(tag: SectionTag, payload: Vec<u8>) -> Self {
        Self { tag, payload }
    }

    /// Appends the encoded record (including checksum) to `buf`.
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        let start = buf.len();
        buf.push(self.tag.as_u8());
        buf.extend_from_slice(&(self.payload.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.payload);
        let checksum = compute_checksum(&buf[start..]);
        buf.extend_from_slice(&checksum.to_le_bytes());
    }

    /// Reads the next record from `reader`.
    ///
    /// `offset` is the byte position of the record's first byte in the
    /// file, used for corruption reports. Returns `Ok(None)` at a clean
    /// end of file; a partial record or checksum mismatch is
    /// `StorageError::Corruption`.
    pub fn decode_from<R: Read>(reader: &mut R, offset: u64) -> StorageResult<Option<Self>> {
        let mut tag_byte = [0u8; 1];
        match reader.read_exact(&mut tag_byte) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(StorageError::Io(e)),
        }

        let tag = SectionTag::from_u8(tag_byte[0])
            .ok_or_else(|| StorageError::corruption(offset, format!("unknown section tag {}", tag_byte[0])))?;

        let mut len_bytes = [0u8; 4];
        reader
            .read_exact(&mut len_bytes)
            .map_err(|_| StorageError::corruption(offset, "truncated record length"))?;
        let len = u32::from_le_bytes(len_bytes);
        if len > MAX_PAYLOAD_LEN {
            return Err(StorageError::corruption(
                offset,
                format!("payload length {} exceeds limit", len),
            ));
        }

        let mut payload = vec![0u8; len as usize];
        reader
            .read_exact(&mut payload)
            .map_err(|_| StorageError::corruption(offset, "truncated record payload"))?;

        let mut checksum_bytes = [0u8; 4];
        reader
            .read_exact(&mut checksum_bytes)
            .map_err(|_| StorageError::corruption(offset, "truncated record checksum"))?;
        let expected = u32::from_le_bytes(checksum_bytes);

        let mut covered = Vec::with_capacity(5 + payload.len());
        covered.push(tag_byte[0]);
        covered.extend_from_slice(&len_bytes);
        covered.extend_from_slice(&payload);
        if !verify_checksum(&covered, expected) {
            return Err(StorageError::corruption(offset, "checksum mismatch"));
        }

        Ok(Some(Self { tag, payload }))
    }

    /// Encoded size in bytes: tag + length + payload + checksum.
    pub fn encoded_len(&self) -> u64 {
        1 + 4 + self.payload.len() as u64 + 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_encode_decode_round_trip() {
        let record = Record::new(SectionTag::Order, br#"{"id":1}"#.to_vec());
        let mut buf = Vec::new();
        record.encode_into(&mut buf);
        assert_eq!(buf.len() as u64, record.encoded_len());

        let decoded = Record::decode_from(&mut Cursor::new(&buf), 0).unwrap().unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_clean_eof_returns_none() {
        let mut empty = Cursor::new(Vec::<u8>::new());
        assert!(Record::decode_from(&mut empty, 0).unwrap().is_none());
    }

    #[test]
    fn test_flipped_payload_byte_is_corruption() {
        let record = Record::new(SectionTag::Customer, b"{\"id\":7}".to_vec());
        let mut buf = Vec::new();
        record.encode_into(&mut buf);
        buf[7] ^= 0x40;

        let err = Record::decode_from(&mut Cursor::new(&buf), 0).unwrap_err();
        assert_eq!(err.code(), "CORRUPTION");
    }

    #[test]
    fn test_truncated_record_is_corruption() {
        let record = Record::new(SectionTag::Shipping, b"{}".to_vec());
        let mut buf = Vec::new();
        record.encode_into(&mut buf);
        buf.truncate(buf.len() - 2);

        let err = Record::decode_from(&mut Cursor::new(&buf), 0).unwrap_err();
        assert_eq!(err.code(), "CORRUPTION");
    }

    #[test]
    fn test_unknown_tag_is_corruption() {
        let buf = vec![9u8, 0, 0, 0, 0, 0, 0, 0, 0];
        let err = Record::decode_from(&mut Cursor::new(&buf), 0).unwrap_err();
        assert!(matches!(err, StorageError::Corruption { offset: 0, .. }));
    }

    #[test]
    fn test_section_tag_round_trip() {
        for tag in [
            SectionTag::Customer,
            SectionTag::Product,
            SectionTag::Order,
            SectionTag::Shipping,
        ] {
            assert_eq!(SectionTag::from_u8(tag.as_u8()), Some(tag));
        }
        assert_eq!(SectionTag::from_u8(0), None);
        assert_eq!(SectionTag::from_u8(5), None);
    }
}
