//! Frame encoding and decoding
//!
//! Pure functions, no I/O. The encoder is the only producer of wire frames
//! in this crate; the decoder exists for receivers and tests. The decoder
//! does not re-split the payload into file name and raw bytes — that is the
//! receiver's concern.

use bytes::{BufMut, Bytes, BytesMut};

/// Width of the fixed tag field at the start of every wire frame
pub const TAG_FIELD_LEN: usize = 64;

/// Width of the fixed file-name field following the tag
pub const NAME_FIELD_LEN: usize = 64;

/// Total fixed header length (tag + file name)
pub const WIRE_HEADER_LEN: usize = TAG_FIELD_LEN + NAME_FIELD_LEN;

/// Kind of relay frame
///
/// Closed set: anything else on the wire is a decode error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// Binary model snapshot (.ply point cloud)
    Model,
    /// JSON label/annotation sidecar
    Labels,
}

impl FrameKind {
    /// Canonical wire tag for this kind
    pub fn tag(&self) -> &'static str {
        match self {
            FrameKind::Model => "PLY",
            FrameKind::Labels => "LABELS",
        }
    }

    /// Map a trimmed wire tag back to a kind
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "PLY" => Some(FrameKind::Model),
            "LABELS" => Some(FrameKind::Labels),
            _ => None,
        }
    }
}

impl std::fmt::Display for FrameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// A decoded relay frame
///
/// The payload is the opaque remainder after the tag field: the file-name
/// field followed by the raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame kind recovered from the tag field
    pub kind: FrameKind,
    /// File-name field plus raw bytes, unsplit
    pub payload: Bytes,
}

/// Error type for frame encoding/decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// File name's UTF-8 encoding exceeds the 64-byte field
    InvalidFileName {
        /// Encoded length of the offending name
        len: usize,
    },
    /// Tag field matches no known frame kind
    UnknownFrameKind(String),
    /// Fewer bytes than the fixed 128-byte header
    TruncatedFrame {
        /// Number of bytes actually present
        len: usize,
    },
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameError::InvalidFileName { len } => write!(
                f,
                "File name too long: {} bytes (max {})",
                len, NAME_FIELD_LEN
            ),
            FrameError::UnknownFrameKind(tag) => write!(f, "Unknown frame kind: {:?}", tag),
            FrameError::TruncatedFrame { len } => write!(
                f,
                "Truncated frame: {} bytes (need at least {})",
                len, WIRE_HEADER_LEN
            ),
        }
    }
}

impl std::error::Error for FrameError {}

/// Write UTF-8 text into a fixed-width field, right-padded with NULs
fn put_padded(buf: &mut BytesMut, text: &str, width: usize) {
    debug_assert!(text.len() <= width);
    buf.put_slice(text.as_bytes());
    buf.put_bytes(0, width - text.len());
}

/// Trim trailing NUL padding from a fixed-width field
fn trim_padding(field: &[u8]) -> &[u8] {
    let end = field
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |pos| pos + 1);
    &field[..end]
}

/// Encode a wire frame: tag field, file-name field, raw bytes
///
/// Fails with [`FrameError::InvalidFileName`] when the UTF-8 encoding of
/// `file_name` does not fit the 64-byte field. Rejection is deliberate:
/// silent truncation would corrupt file-name recovery on the receiving
/// side. Zero-length `raw` is legal and forwarded as-is.
pub fn encode(kind: FrameKind, file_name: &str, raw: &[u8]) -> Result<Bytes, FrameError> {
    let name_len = file_name.len();
    if name_len > NAME_FIELD_LEN {
        return Err(FrameError::InvalidFileName { len: name_len });
    }

    let mut buf = BytesMut::with_capacity(WIRE_HEADER_LEN + raw.len());
    put_padded(&mut buf, kind.tag(), TAG_FIELD_LEN);
    put_padded(&mut buf, file_name, NAME_FIELD_LEN);
    buf.put_slice(raw);

    Ok(buf.freeze())
}

/// Decode the tag field of a wire frame
///
/// Returns the frame kind and the opaque payload (file-name field plus raw
/// bytes). Fails with [`FrameError::TruncatedFrame`] when fewer than 128
/// bytes are present, or [`FrameError::UnknownFrameKind`] when the trimmed
/// tag matches neither canonical value.
pub fn decode(bytes: &[u8]) -> Result<Frame, FrameError> {
    if bytes.len() < WIRE_HEADER_LEN {
        return Err(FrameError::TruncatedFrame { len: bytes.len() });
    }

    let tag_field = trim_padding(&bytes[..TAG_FIELD_LEN]);
    let tag = std::str::from_utf8(tag_field)
        .map_err(|_| FrameError::UnknownFrameKind(String::from_utf8_lossy(tag_field).into()))?;

    let kind = FrameKind::from_tag(tag)
        .ok_or_else(|| FrameError::UnknownFrameKind(tag.to_string()))?;

    Ok(Frame {
        kind,
        payload: Bytes::copy_from_slice(&bytes[TAG_FIELD_LEN..]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let frame = encode(FrameKind::Model, "cube.ply", &[0x01, 0x02, 0x03]).unwrap();

        assert_eq!(frame.len(), WIRE_HEADER_LEN + 3);
        assert_eq!(&frame[..3], b"PLY");
        assert!(frame[3..64].iter().all(|&b| b == 0));
        assert_eq!(&frame[64..72], b"cube.ply");
        assert!(frame[72..128].iter().all(|&b| b == 0));
        assert_eq!(&frame[128..], &[0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_encode_labels_layout() {
        let frame = encode(FrameKind::Labels, "scene", br#"{"a":1}"#).unwrap();

        assert_eq!(&frame[..6], b"LABELS");
        assert!(frame[6..64].iter().all(|&b| b == 0));
        assert_eq!(&frame[64..69], b"scene");
        assert_eq!(&frame[128..], br#"{"a":1}"#);
    }

    #[test]
    fn test_roundtrip() {
        let raw = b"binary point cloud data";
        let encoded = encode(FrameKind::Model, "scan_042.ply", raw).unwrap();
        let decoded = decode(&encoded).unwrap();

        assert_eq!(decoded.kind, FrameKind::Model);
        // Payload is name field + raw; strip the name field to recover raw.
        assert_eq!(&decoded.payload[..12], b"scan_042.ply");
        assert!(decoded.payload[12..NAME_FIELD_LEN].iter().all(|&b| b == 0));
        assert_eq!(&decoded.payload[NAME_FIELD_LEN..], raw);
    }

    #[test]
    fn test_roundtrip_labels() {
        let encoded = encode(FrameKind::Labels, "scene", br#"{"a":1}"#).unwrap();
        let decoded = decode(&encoded).unwrap();

        assert_eq!(decoded.kind, FrameKind::Labels);
        assert_eq!(&decoded.payload[NAME_FIELD_LEN..], br#"{"a":1}"#);
    }

    #[test]
    fn test_empty_raw_is_legal() {
        let encoded = encode(FrameKind::Model, "empty.ply", &[]).unwrap();

        assert_eq!(encoded.len(), WIRE_HEADER_LEN);
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded.payload.len(), NAME_FIELD_LEN);
    }

    #[test]
    fn test_name_at_field_boundary() {
        let name = "a".repeat(NAME_FIELD_LEN);
        let frame = encode(FrameKind::Model, &name, b"x").unwrap();

        assert_eq!(&frame[64..128], name.as_bytes());
    }

    #[test]
    fn test_name_too_long_rejected() {
        let name = "a".repeat(NAME_FIELD_LEN + 1);
        let result = encode(FrameKind::Model, &name, b"x");

        assert_eq!(result, Err(FrameError::InvalidFileName { len: 65 }));
    }

    #[test]
    fn test_name_length_is_utf8_bytes() {
        // 22 snowmen, 3 UTF-8 bytes each: 66 bytes, over the limit even
        // though only 22 characters.
        let name = "\u{2603}".repeat(22);
        let result = encode(FrameKind::Model, &name, b"");

        assert_eq!(result, Err(FrameError::InvalidFileName { len: 66 }));
    }

    #[test]
    fn test_decode_unknown_kind() {
        let mut bytes = vec![0u8; WIRE_HEADER_LEN];
        bytes[..4].copy_from_slice(b"GLTF");

        let result = decode(&bytes);
        assert_eq!(result, Err(FrameError::UnknownFrameKind("GLTF".into())));
    }

    #[test]
    fn test_decode_empty_tag() {
        let bytes = vec![0u8; WIRE_HEADER_LEN];

        let result = decode(&bytes);
        assert_eq!(result, Err(FrameError::UnknownFrameKind(String::new())));
    }

    #[test]
    fn test_decode_truncated() {
        let result = decode(&[0u8; 127]);
        assert_eq!(result, Err(FrameError::TruncatedFrame { len: 127 }));

        let result = decode(&[]);
        assert_eq!(result, Err(FrameError::TruncatedFrame { len: 0 }));
    }

    #[test]
    fn test_tag_parsing() {
        assert_eq!(FrameKind::from_tag("PLY"), Some(FrameKind::Model));
        assert_eq!(FrameKind::from_tag("LABELS"), Some(FrameKind::Labels));
        assert_eq!(FrameKind::from_tag("ply"), None);
        assert_eq!(FrameKind::from_tag(""), None);
    }
}
