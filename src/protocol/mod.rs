//! Wire protocol for relay frames
//!
//! A relay frame is a single binary message with a fixed 128-byte header:
//!
//! ```text
//! ┌──────────────────┬──────────────────┬─────────────────┐
//! │ tag (64 bytes)   │ name (64 bytes)  │ raw (remaining) │
//! │ "PLY"/"LABELS"   │ file name        │ opaque payload  │
//! │ zero-padded      │ zero-padded      │                 │
//! └──────────────────┴──────────────────┴─────────────────┘
//! ```
//!
//! Both fixed fields hold UTF-8 text right-padded with NUL bytes; receivers
//! recover the text by trimming trailing NULs. The layout is bit-exact for
//! interoperability with existing viewers, which slice each binary message
//! at offsets 64 and 128.

pub mod frame;

pub use frame::{decode, encode, Frame, FrameError, FrameKind};
pub use frame::{NAME_FIELD_LEN, TAG_FIELD_LEN, WIRE_HEADER_LEN};
