//! Payload Encoding
//!
//! Turns a [`PayloadRecord`] into the opaque bytes held by the store and back.
//!
//! ## Wire Format
//!
//! ```text
//! ┌─────────┬──────────────────────────────────────────────┐
//! │ version │ bincode body (varint ints, little-endian)    │
//! │ 1 byte  │ reference | secret_key | iv | expires_at     │
//! └─────────┴──────────────────────────────────────────────┘
//! ```
//!
//! Encoding is deterministic: the same record always produces the same bytes.
//! Decoding is all-or-nothing. Truncated input, trailing garbage and unknown
//! versions are all rejected.

use crate::codec::record::PayloadRecord;
use bincode::Options;
use bytes::Bytes;
use thiserror::Error;

/// Current version byte written in front of every payload.
pub const PAYLOAD_FORMAT_VERSION: u8 = 1;

/// Maximum size of an encoded payload body (1 MB)
pub const MAX_PAYLOAD_SIZE: usize = 1024 * 1024;

/// Errors that can occur while encoding or decoding a payload.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The input buffer is empty
    #[error("empty payload")]
    Empty,

    /// The leading version byte is not one we understand
    #[error("unsupported payload version: {0}")]
    UnsupportedVersion(u8),

    /// The payload exceeds the maximum allowed size
    #[error("payload too large: {size} bytes (max: {max})")]
    TooLarge { size: usize, max: usize },

    /// The serializer failed
    #[error("failed to serialize payload: {0}")]
    Encode(#[source] bincode::Error),

    /// The body does not match the record schema
    #[error("malformed payload: {0}")]
    Malformed(#[source] bincode::Error),
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

#[inline]
fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_limit(MAX_PAYLOAD_SIZE as u64)
        .reject_trailing_bytes()
}

/// Serializes a record into its stored byte form.
pub fn encode(record: &PayloadRecord) -> CodecResult<Bytes> {
    // Measured without the limit so oversize records report their real size
    let size = bincode::DefaultOptions::new()
        .serialized_size(record)
        .map_err(CodecError::Encode)? as usize;
    if size > MAX_PAYLOAD_SIZE {
        return Err(CodecError::TooLarge {
            size,
            max: MAX_PAYLOAD_SIZE,
        });
    }

    let mut buf = Vec::with_capacity(1 + size);
    buf.push(PAYLOAD_FORMAT_VERSION);
    options()
        .serialize_into(&mut buf, record)
        .map_err(CodecError::Encode)?;

    Ok(Bytes::from(buf))
}

/// Deserializes a record from its stored byte form.
pub fn decode(input: &[u8]) -> CodecResult<PayloadRecord> {
    let (&version, body) = input.split_first().ok_or(CodecError::Empty)?;

    if version != PAYLOAD_FORMAT_VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }

    if body.len() > MAX_PAYLOAD_SIZE {
        return Err(CodecError::TooLarge {
            size: body.len(),
            max: MAX_PAYLOAD_SIZE,
        });
    }

    options().deserialize(body).map_err(CodecError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PayloadRecord {
        PayloadRecord::new(
            "9f2c0a7be1d44f06",
            "0123456789abcdef0123456789abcdef",
            vec![0x00, 0xff, 0x10, 0x80, 0x7f, 0x01],
            1_700_000_000,
        )
    }

    #[test]
    fn test_roundtrip() {
        let original = sample();
        let encoded = encode(&original).unwrap();
        let decoded = decode(&encoded).unwrap();
        assert_eq!(original, decoded);
        assert_eq!(decoded.iv, vec![0x00, 0xff, 0x10, 0x80, 0x7f, 0x01]);
    }

    #[test]
    fn test_roundtrip_edge_values() {
        // Empty strings, empty IV, negative and extreme timestamps
        let records = [
            PayloadRecord::new("", "", Vec::new(), 0),
            PayloadRecord::new("ключ", "🔑", vec![0; 256], -1),
            PayloadRecord::new("r", "s", vec![1], i64::MAX),
            PayloadRecord::new("r", "s", vec![1], i64::MIN),
        ];

        for record in records {
            let encoded = encode(&record).unwrap();
            assert_eq!(decode(&encoded).unwrap(), record);
        }
    }

    #[test]
    fn test_encoding_is_deterministic() {
        assert_eq!(encode(&sample()).unwrap(), encode(&sample()).unwrap());
    }

    #[test]
    fn test_version_prefix() {
        let encoded = encode(&sample()).unwrap();
        assert_eq!(encoded[0], PAYLOAD_FORMAT_VERSION);
    }

    #[test]
    fn test_decode_empty() {
        assert!(matches!(decode(&[]), Err(CodecError::Empty)));
    }

    #[test]
    fn test_decode_unknown_version() {
        let mut encoded = encode(&sample()).unwrap().to_vec();
        encoded[0] = 42;
        assert!(matches!(
            decode(&encoded),
            Err(CodecError::UnsupportedVersion(42))
        ));
    }

    #[test]
    fn test_decode_truncated() {
        let encoded = encode(&sample()).unwrap();
        for cut in 1..encoded.len() {
            assert!(
                matches!(decode(&encoded[..cut]), Err(CodecError::Malformed(_))),
                "truncation at {} should fail",
                cut
            );
        }
    }

    #[test]
    fn test_decode_trailing_bytes() {
        let mut encoded = encode(&sample()).unwrap().to_vec();
        encoded.push(0);
        assert!(matches!(decode(&encoded), Err(CodecError::Malformed(_))));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(decode(b"garbage").is_err());
        assert!(decode(&[PAYLOAD_FORMAT_VERSION, 0xff, 0xff, 0xff]).is_err());
    }

    #[test]
    fn test_encode_too_large() {
        let record = PayloadRecord::new("r", "s", vec![0u8; MAX_PAYLOAD_SIZE + 1], 0);
        assert!(matches!(
            encode(&record),
            Err(CodecError::TooLarge { max: MAX_PAYLOAD_SIZE, .. })
        ));
    }
}
