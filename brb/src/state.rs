//! Persisted ledger state.
//!
//! The CLI keeps the whole token (balances, aggregates, fee and limit
//! settings, swap-back and burn-to-earn state), the access policy and the
//! simulated pool in one file:
//!
//! ```text
//! +----------+-------------+------------------+--------------------------+
//! | BRBSTATE | version u32 | sha256(payload)  | payload: zstd(bincode)   |
//! | 8 bytes  | LE, 4 bytes | 32 bytes         | rest of file             |
//! +----------+-------------+------------------+--------------------------+
//! ```
//!
//! Reads check all three header fields before decoding.

use brb_ledger_core::{AccessPolicy, ConstantProductPool, Exchange, ReflectionToken};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

/// Current state file format version
pub const STATE_VERSION: u32 = 1;

/// Magic bytes for state file identification
pub const STATE_MAGIC: &[u8; 8] = b"BRBSTATE";

/// Zstd compression level (3 = balanced speed/compression)
const COMPRESSION_LEVEL: i32 = 3;

/// Errors that can occur reading or writing the state file
#[derive(Debug, Error)]
pub enum StateFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Not a brb state file")]
    InvalidMagic,

    #[error("Version mismatch: expected {expected}, got {got}")]
    VersionMismatch { expected: u32, got: u32 },

    #[error("Checksum mismatch: state file is corrupt")]
    ChecksumMismatch,

    #[error("Compression error: {0}")]
    Compression(String),

    #[error("Decompression error: {0}")]
    Decompression(String),
}

/// Everything the CLI needs between invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    pub token: ReflectionToken,
    pub policy: AccessPolicy,
    pub pool: ConstantProductPool,
}

impl LedgerState {
    pub fn pool_token_reserve(&self) -> u128 {
        self.pool.reserves().token
    }

    pub fn pool_base_reserve(&self) -> u128 {
        self.pool.reserves().base
    }

    /// Match the pool's token reserve to what the pair holds in the ledger.
    ///
    /// Needed after transfers that credit or debit the pair without going
    /// through the pool, so spot quotes stay in line with the ledger.
    pub fn sync_pool_reserve(&mut self) {
        let pair_balance = self.token.base_balance_of(&self.pool.pair());
        self.pool.sync_token_reserve(pair_balance);
    }

    /// Write the state with its header.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), StateFileError> {
        let encoded =
            bincode::serialize(self).map_err(|e| StateFileError::Serialization(e.to_string()))?;
        let payload = compress(&encoded)?;

        writer.write_all(STATE_MAGIC)?;
        writer.write_all(&STATE_VERSION.to_le_bytes())?;
        writer.write_all(&checksum(&payload))?;
        writer.write_all(&payload)?;
        writer.flush()?;
        Ok(())
    }

    /// Read and verify a state written by [`LedgerState::write_to`].
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self, StateFileError> {
        let mut magic = [0u8; 8];
        reader.read_exact(&mut magic)?;
        if &magic != STATE_MAGIC {
            return Err(StateFileError::InvalidMagic);
        }

        let mut version = [0u8; 4];
        reader.read_exact(&mut version)?;
        let version = u32::from_le_bytes(version);
        if version != STATE_VERSION {
            return Err(StateFileError::VersionMismatch {
                expected: STATE_VERSION,
                got: version,
            });
        }

        let mut expected = [0u8; 32];
        reader.read_exact(&mut expected)?;
        let mut payload = Vec::new();
        reader.read_to_end(&mut payload)?;
        if checksum(&payload) != expected {
            return Err(StateFileError::ChecksumMismatch);
        }

        let decoded = decompress(&payload)?;
        bincode::deserialize(&decoded).map_err(|e| StateFileError::Serialization(e.to_string()))
    }

    /// Save to `path`, replacing any previous state atomically.
    pub fn save(&self, path: &Path) -> Result<(), StateFileError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("brb.tmp");
        {
            let file = fs::File::create(&tmp)?;
            self.write_to(std::io::BufWriter::new(file))?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, StateFileError> {
        let file = fs::File::open(path)?;
        Self::read_from(std::io::BufReader::new(file))
    }
}

fn checksum(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

// ============================================================================
// Compression Helpers
// ============================================================================

/// Compress data using zstd.
fn compress(data: &[u8]) -> Result<Vec<u8>, StateFileError> {
    zstd::encode_all(data, COMPRESSION_LEVEL)
        .map_err(|e| StateFileError::Compression(e.to_string()))
}

/// Decompress zstd-compressed data.
fn decompress(data: &[u8]) -> Result<Vec<u8>, StateFileError> {
    zstd::decode_all(data).map_err(|e| StateFileError::Decompression(e.to_string()))
}

// ============================================================================
// Tests
// ============================================================================
