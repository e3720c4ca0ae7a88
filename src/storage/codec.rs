//! Frame codec for persisted snapshot blobs.
//!
//! Every blob written by the filesystem backend is framed as:
//!
//! ```text
//! [magic: 4 bytes][version: 1 byte][length: 4 bytes LE][payload: N bytes][crc32: 4 bytes LE]
//! ```
//!
//! The CRC32 trailer detects torn or bit-rotted files; a mismatch is
//! reported as corruption, never as an absent snapshot.

use std::io::{Error as IoError, ErrorKind, Result as IoResult};

use crc32fast::Hasher;

/// Magic bytes identifying routewatch snapshot files.
pub const MAGIC: [u8; 4] = *b"RWSN";

/// Current frame version.
const FRAME_VERSION: u8 = 1;

/// Frame overhead in bytes (magic + version + length + crc).
const HEADER_LEN: usize = 4 + 1 + 4;
const TRAILER_LEN: usize = 4;

// Snapshots are one routing table; anything near this size is a bug.
const MAX_PAYLOAD: usize = 64 * 1024 * 1024;

fn crc32(payload: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(payload);
    hasher.finalize()
}

/// Frames a payload for durable storage.
pub fn encode_frame(payload: &[u8]) -> IoResult<Vec<u8>> {
    if payload.len() > MAX_PAYLOAD {
        return Err(IoError::new(
            ErrorKind::InvalidInput,
            format!("payload size {} exceeds maximum {}", payload.len(), MAX_PAYLOAD),
        ));
    }

    let len = payload.len() as u32;
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len() + TRAILER_LEN);
    out.extend_from_slice(&MAGIC);
    out.push(FRAME_VERSION);
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(payload);
    out.extend_from_slice(&crc32(payload).to_le_bytes());
    Ok(out)
}

/// Unframes a stored blob, verifying magic, version, length, and CRC.
///
/// # Errors
/// Returns `InvalidData` if the frame is truncated, carries the wrong
/// magic or version, or fails the checksum.
pub fn decode_frame(blob: &[u8]) -> IoResult<Vec<u8>> {
    if blob.len() < HEADER_LEN + TRAILER_LEN {
        return Err(IoError::new(
            ErrorKind::InvalidData,
            format!("frame truncated: {} bytes", blob.len()),
        ));
    }

    if blob[..4] != MAGIC {
        return Err(IoError::new(
            ErrorKind::InvalidData,
            format!("invalid magic bytes: expected {:?}, got {:?}", MAGIC, &blob[..4]),
        ));
    }

    let version = blob[4];
    if version != FRAME_VERSION {
        return Err(IoError::new(
            ErrorKind::InvalidData,
            format!("unsupported frame version: {version} (expected {FRAME_VERSION})"),
        ));
    }

    let len_bytes: [u8; 4] = blob[5..9].try_into().map_err(|_| {
        IoError::new(ErrorKind::InvalidData, "frame length field truncated")
    })?;
    let len = u32::from_le_bytes(len_bytes) as usize;

    if len > MAX_PAYLOAD {
        return Err(IoError::new(
            ErrorKind::InvalidData,
            format!("payload size {len} exceeds maximum {MAX_PAYLOAD}"),
        ));
    }

    let expected_total = HEADER_LEN + len + TRAILER_LEN;
    if blob.len() != expected_total {
        return Err(IoError::new(
            ErrorKind::InvalidData,
            format!("frame size mismatch: expected {expected_total} bytes, got {}", blob.len()),
        ));
    }

    let payload = &blob[HEADER_LEN..HEADER_LEN + len];
    let stored_crc = u32::from_le_bytes(
        blob[HEADER_LEN + len..]
            .try_into()
            .map_err(|_| IoError::new(ErrorKind::InvalidData, "crc trailer truncated"))?,
    );
    let computed_crc = crc32(payload);

    if stored_crc != computed_crc {
        return Err(IoError::new(
            ErrorKind::InvalidData,
            format!("CRC mismatch: stored={stored_crc:08x}, computed={computed_crc:08x}"),
        ));
    }

    Ok(payload.to_vec())
}
