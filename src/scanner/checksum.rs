//! Streamed SHA-256 file digests.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::errors::ScanError;

/// Compute the SHA-256 digest of a file as 64 lowercase hex characters.
///
/// The file is streamed through the hasher, so it never has to fit in
/// memory.
pub fn file_checksum(path: &Path) -> Result<String, ScanError> {
    let io_err = |source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher).map_err(io_err)?;

    Ok(hex::encode(hasher.finalize()))
}
