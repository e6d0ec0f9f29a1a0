//! Little-endian framing helpers.
//!
//! Thin wrappers around `Read` / `Write` for the fixed-width integers and
//! byte runs a snapshot is made of.

use std::io::{self, Read, Write};

use crate::snapshot::error::SnapshotError;

/// Write a `u32` in little-endian order.
///
/// # Errors
///
/// Returns [`SnapshotError::Io`] if the write fails.
pub fn write_u32<W: Write>(writer: &mut W, value: u32) -> Result<(), SnapshotError> {
    writer.write_all(&value.to_le_bytes())?;
    Ok(())
}

/// Write a `u64` in little-endian order.
///
/// # Errors
///
/// Returns [`SnapshotError::Io`] if the write fails.
pub fn write_u64<W: Write>(writer: &mut W, value: u64) -> Result<(), SnapshotError> {
    writer.write_all(&value.to_le_bytes())?;
    Ok(())
}

/// Read exactly `N` bytes.
///
/// # Errors
///
/// Returns [`SnapshotError::Io`] on a short read.
pub fn read_array<R: Read, const N: usize>(reader: &mut R) -> Result<[u8; N], SnapshotError> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

/// Read a little-endian `u32`.
///
/// # Errors
///
/// Returns [`SnapshotError::Io`] on a short read.
pub fn read_u32<R: Read>(reader: &mut R) -> Result<u32, SnapshotError> {
    read_array(reader).map(u32::from_le_bytes)
}

/// Read a little-endian `u64`.
///
/// # Errors
///
/// Returns [`SnapshotError::Io`] on a short read.
pub fn read_u64<R: Read>(reader: &mut R) -> Result<u64, SnapshotError> {
    read_array(reader).map(u64::from_le_bytes)
}

/// Read exactly `len` bytes into a fresh buffer.
///
/// `len` usually comes from the stream itself, so the buffer grows with the
/// bytes actually read instead of being allocated up front.
///
/// # Errors
///
/// Returns [`SnapshotError::Io`] on a short read.
pub fn read_bytes<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>, SnapshotError> {
    let mut buf = Vec::new();
    reader.by_ref().take(len as u64).read_to_end(&mut buf)?;
    if buf.len() != len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("expected {len} bytes, stream ended after {}", buf.len()),
        )
        .into());
    }
    Ok(buf)
}
