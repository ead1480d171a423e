//! Content hashing for videos and subtitles.
//!
//! - [`fingerprint`] is the OSDb movie hash: the file size plus every
//!   little-endian `u64` of the first and last 64 KiB, summed with
//!   wraparound. It is a lookup key for hash-indexed catalogs, not a
//!   cryptographic digest.
//! - [`checksum`] is an MD5 over the whole file, used to de-duplicate
//!   subtitles.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use md5::{Digest, Md5};
use sift_core::{Error, Result};

/// Size of each fingerprint window in bytes.
pub const CHUNK_SIZE: u64 = 65536;

/// Smallest file that can be fingerprinted.
pub const MIN_FINGERPRINT_SIZE: u64 = 2 * CHUNK_SIZE;

const READ_BUFFER: usize = 64 * 1024;

/// Compute the 16-character hex fingerprint of a video file.
///
/// Fails with [`Error::FileTooSmall`] below [`MIN_FINGERPRINT_SIZE`] and with
/// [`Error::FileIo`] if the file cannot be opened or read.
pub fn fingerprint(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| Error::file_io(path, e))?;
    let size = file
        .metadata()
        .map_err(|e| Error::file_io(path, e))?
        .len();
    fingerprint_reader(&mut file, size).map_err(|e| match e {
        Error::Io { source } => Error::file_io(path, source),
        other => other,
    })
}

/// Like [`fingerprint`], but a too-small file yields `Ok(None)`.
pub fn fingerprint_opt(path: &Path) -> Result<Option<String>> {
    match fingerprint(path) {
        Ok(hash) => Ok(Some(hash)),
        Err(Error::FileTooSmall { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Fingerprint any seekable reader whose total length is `size`.
pub fn fingerprint_reader<R: Read + Seek>(reader: &mut R, size: u64) -> Result<String> {
    if size < MIN_FINGERPRINT_SIZE {
        return Err(Error::FileTooSmall {
            size,
            min: MIN_FINGERPRINT_SIZE,
        });
    }

    let mut window = vec![0u8; CHUNK_SIZE as usize];
    let mut sum = size;

    reader.seek(SeekFrom::Start(0))?;
    reader.read_exact(&mut window)?;
    sum = sum.wrapping_add(sum_words(&window));

    reader.seek(SeekFrom::Start(size - CHUNK_SIZE))?;
    reader.read_exact(&mut window)?;
    sum = sum.wrapping_add(sum_words(&window));

    Ok(format!("{sum:016x}"))
}

/// Wrapping sum of a buffer read as little-endian `u64` words.
fn sum_words(buf: &[u8]) -> u64 {
    buf.chunks_exact(8).fold(0u64, |acc, chunk| {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        acc.wrapping_add(u64::from_le_bytes(word))
    })
}

/// MD5 of the whole file as lowercase hex.
pub fn checksum(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| Error::file_io(path, e))?;
    let mut hasher = Md5::new();
    let mut buf = vec![0u8; READ_BUFFER];
    loop {
        let n = file.read(&mut buf).map_err(|e| Error::file_io(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
