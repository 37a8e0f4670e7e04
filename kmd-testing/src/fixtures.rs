//! Files to feed to the data storage RPCs.

use std::fs::{self, File};
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use bitcoin::hashes::{sha256, Hash};
use rand::Rng;

use crate::error::{Error, Result};

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const HEX_DIGITS: &[u8] = b"0123456789abcdef";

/// First line of every sample file.
pub const SAMPLE_FILE_HEADER: &str = "filename";
const SAMPLE_FILE_LINES: usize = 10;

fn random_from(alphabet: &[u8], len: usize) -> String {
	let mut rng = rand::rng();
	(0..len).map(|_| alphabet[rng.random_range(0..alphabet.len())] as char).collect()
}

/// A random string of ASCII letters.
pub fn random_string(len: usize) -> String {
	random_from(LETTERS, len)
}

/// 64 random lowercase hex characters, shaped like a pubkey or txid.
pub fn random_hex() -> String {
	random_from(HEX_DIGITS, 64)
}

/// Write a small text file: a header line and ten lines of random hex.
pub fn write_sample_file(path: impl AsRef<Path>) -> Result<()> {
	let mut content = format!("{}\n", SAMPLE_FILE_HEADER);
	for _ in 0..SAMPLE_FILE_LINES {
		content.push_str(&random_hex());
		content.push('\n');
	}
	fs::write(path, content)?;
	Ok(())
}

/// Write a sparse file slightly larger than `size_mb` megabytes.
///
/// Any existing file at `path` is replaced.
pub fn write_sparse_file(path: impl AsRef<Path>, size_mb: u64) -> Result<()> {
	let path = path.as_ref();
	if path.is_file() {
		fs::remove_file(path)?;
	}

	let len = size_mb * 1024 * 1025;
	let mut file = File::create(path)?;
	if len > 0 {
		file.seek(SeekFrom::Start(len - 1))?;
		file.write_all(&[0])?;
	}
	trace!("Wrote sparse file {} of {} bytes", path.display(), len);
	Ok(())
}

fn existing_file(path: &Path) -> Result<()> {
	if path.is_file() {
		Ok(())
	} else {
		Err(Error::FileNotFound(path.to_path_buf()))
	}
}

/// Size of the file in bytes.
pub fn file_size(path: impl AsRef<Path>) -> Result<u64> {
	let path = path.as_ref();
	existing_file(path)?;
	Ok(fs::metadata(path)?.len())
}

/// Lowercase hex SHA-256 of the file contents.
pub fn file_sha256(path: impl AsRef<Path>) -> Result<String> {
	let path = path.as_ref();
	existing_file(path)?;
	let bytes = fs::read(path)?;
	Ok(sha256::Hash::hash(&bytes).to_string())
}
