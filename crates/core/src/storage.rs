//! Framed tag files on disk and content identity.
//!
//! A plain frame is
//!
//! ```text
//! "NBTF" | u16 format | i32 DataVersion | u32 CRC32 | u32 length | payload
//! ```
//!
//! with little-endian header fields and the named big-endian encoding of the
//! root compound as payload. The header repeats the root's `DataVersion` so
//! tools can sort or reject files without decoding them; a frame whose
//! header disagrees with its payload is refused.
//!
//! An authenticated frame is `"NBTA" | HMAC-SHA256 | plain frame`, the MAC
//! covering the whole inner frame.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::binary;
use crate::compound::Compound;
use crate::limits::SizeTracker;
use crate::tag::Tag;
use crate::version::{
    get_data_version, AUTH_TAG_FILE_MAGIC, TAG_FILE_FORMAT_VERSION, TAG_FILE_MAGIC,
};

/// SHA-256 of a tag's unnamed binary encoding.
pub type TagId = [u8; 32];
type HmacSha256 = Hmac<Sha256>;

const HEADER_LEN: usize = 4 + 2 + 4 + 4 + 4;
const MAC_LEN: usize = 32;
const FILE_EXTENSION: &str = "nbtf";

/// Identity of a tag tree: equal trees always share an id since compound
/// keys are encoded in sorted order.
pub fn compute_tag_id(tag: &Tag) -> Result<TagId, FrameError> {
    let mut encoded = Vec::new();
    binary::write_unnamed(&mut encoded, tag).map_err(|err| FrameError::Payload(err.to_string()))?;
    Ok(Sha256::digest(&encoded).into())
}

pub fn tag_id_hex(id: &TagId) -> String {
    use std::fmt::Write as _;
    id.iter().fold(String::with_capacity(id.len() * 2), |mut out, byte| {
        let _ = write!(out, "{byte:02x}");
        out
    })
}

/// Fixed-size prefix of a plain frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrameHeader {
    data_version: i32,
    checksum: u32,
    payload_len: usize,
}

impl FrameHeader {
    fn parse(input: &[u8]) -> Result<Self, FrameError> {
        let header = input.get(..HEADER_LEN).ok_or(FrameError::TooSmall)?;
        if header[0..4] != TAG_FILE_MAGIC {
            return Err(FrameError::InvalidMagic);
        }
        let format = u16::from_le_bytes([header[4], header[5]]);
        if format != TAG_FILE_FORMAT_VERSION {
            return Err(FrameError::IncompatibleVersion {
                found: format,
                expected: TAG_FILE_FORMAT_VERSION,
            });
        }
        let word = |at: usize| [header[at], header[at + 1], header[at + 2], header[at + 3]];
        Ok(Self {
            data_version: i32::from_le_bytes(word(6)),
            checksum: u32::from_le_bytes(word(10)),
            payload_len: u32::from_le_bytes(word(14)) as usize,
        })
    }
}

/// Reads the `DataVersion` recorded in a plain frame's header without
/// touching the payload.
pub fn peek_data_version(input: &[u8]) -> Result<i32, FrameError> {
    FrameHeader::parse(input).map(|header| header.data_version)
}

#[derive(Clone, Debug, PartialEq)]
pub struct TagFile {
    pub root: Compound,
}

impl TagFile {
    pub fn new(root: Compound) -> Self {
        Self { root }
    }

    /// The root's stamp, or the legacy version when unstamped.
    pub fn data_version(&self) -> i32 {
        get_data_version(&self.root)
    }

    pub fn tag_id(&self) -> Result<TagId, FrameError> {
        compute_tag_id(&Tag::Compound(self.root.clone()))
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, FrameError> {
        let payload =
            binary::to_bytes(&self.root).map_err(|err| FrameError::Payload(err.to_string()))?;
        let payload_len = u32::try_from(payload.len()).map_err(|_| FrameError::TooLarge)?;

        let mut output = Vec::with_capacity(HEADER_LEN + payload.len());
        output.extend_from_slice(&TAG_FILE_MAGIC);
        output.extend_from_slice(&TAG_FILE_FORMAT_VERSION.to_le_bytes());
        output.extend_from_slice(&self.data_version().to_le_bytes());
        output.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        output.extend_from_slice(&payload_len.to_le_bytes());
        output.extend_from_slice(&payload);
        Ok(output)
    }

    pub fn from_binary(input: &[u8]) -> Result<Self, FrameError> {
        Self::from_binary_with(input, SizeTracker::default())
    }

    /// Validates the header and checksum before decoding the payload under
    /// `tracker`, then checks the decoded stamp against the header.
    pub fn from_binary_with(input: &[u8], tracker: SizeTracker) -> Result<Self, FrameError> {
        let header = FrameHeader::parse(input)?;
        let payload = &input[HEADER_LEN..];
        if payload.len() != header.payload_len {
            return Err(FrameError::LengthMismatch);
        }
        if crc32fast::hash(payload) != header.checksum {
            return Err(FrameError::ChecksumMismatch);
        }
        let root = binary::from_bytes(payload, tracker)
            .map_err(|err| FrameError::Payload(err.to_string()))?;
        let file = Self { root };
        if file.data_version() != header.data_version {
            return Err(FrameError::DataVersionMismatch {
                header: header.data_version,
                payload: file.data_version(),
            });
        }
        Ok(file)
    }

    pub fn to_authenticated_binary(&self, key: &[u8]) -> Result<Vec<u8>, FrameError> {
        let frame = self.to_binary()?;
        let mac = keyed_mac(key, &frame)?.finalize().into_bytes();

        let mut output = Vec::with_capacity(AUTH_TAG_FILE_MAGIC.len() + MAC_LEN + frame.len());
        output.extend_from_slice(&AUTH_TAG_FILE_MAGIC);
        output.extend_from_slice(&mac);
        output.extend_from_slice(&frame);
        Ok(output)
    }

    /// Checks the MAC before anything inside the frame is decoded.
    pub fn from_authenticated_binary(input: &[u8], key: &[u8]) -> Result<Self, FrameError> {
        let mac_end = AUTH_TAG_FILE_MAGIC.len() + MAC_LEN;
        if input.len() < mac_end + HEADER_LEN {
            return Err(FrameError::TooSmall);
        }
        if input[..AUTH_TAG_FILE_MAGIC.len()] != AUTH_TAG_FILE_MAGIC {
            return Err(FrameError::InvalidMagic);
        }
        let frame = &input[mac_end..];
        keyed_mac(key, frame)?
            .verify_slice(&input[AUTH_TAG_FILE_MAGIC.len()..mac_end])
            .map_err(|_| FrameError::AuthenticationFailed)?;
        Self::from_binary(frame)
    }
}

fn keyed_mac(key: &[u8], frame: &[u8]) -> Result<HmacSha256, FrameError> {
    if key.is_empty() {
        return Err(FrameError::AuthKeyInvalid);
    }
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| FrameError::AuthKeyInvalid)?;
    mac.update(frame);
    Ok(mac)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("tag file too small")]
    TooSmall,
    #[error("tag file too large")]
    TooLarge,
    #[error("invalid tag file magic bytes")]
    InvalidMagic,
    #[error("incompatible tag file format: found {found}, expected {expected}")]
    IncompatibleVersion { found: u16, expected: u16 },
    #[error("tag file checksum mismatch")]
    ChecksumMismatch,
    #[error("tag file length mismatch")]
    LengthMismatch,
    #[error("header DataVersion {header} does not match payload DataVersion {payload}")]
    DataVersionMismatch { header: i32, payload: i32 },
    #[error("authentication key is empty or invalid")]
    AuthKeyInvalid,
    #[error("tag file authentication failed")]
    AuthenticationFailed,
    #[error("tag file payload error: {0}")]
    Payload(String),
}

/// Directory of named tag files, each replaced atomically and backed up
/// to `<file>.bak` before being overwritten.
#[derive(Debug)]
pub struct TagStore {
    root: PathBuf,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("tag store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("tag store frame error: {0}")]
    Frame(#[from] FrameError),
    #[error("invalid tag file name: {0:?}")]
    InvalidName(String),
    #[error(
        "tag file unrecoverable (primary: {primary}, backup: {})",
        .backup.as_ref().map_or_else(|| "missing".to_string(), ToString::to_string)
    )]
    RecoveryFailed {
        primary: FrameError,
        backup: Option<FrameError>,
    },
}

impl TagStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn save(&self, name: &str, file: &TagFile) -> Result<PathBuf, StoreError> {
        let path = self.file_path(name)?;
        fs::create_dir_all(&self.root)?;
        let frame = file.to_binary()?;
        if path.exists() {
            fs::copy(&path, backup_path(&path))?;
        }
        let staging = path.with_extension("tmp");
        fs::write(&staging, &frame)?;
        fs::rename(&staging, &path)?;
        tracing::debug!(
            path = %path.display(),
            data_version = file.data_version(),
            bytes = frame.len(),
            "saved tag file"
        );
        Ok(path)
    }

    /// Loads `name`, falling back to its backup when the primary frame
    /// does not validate.
    pub fn load(&self, name: &str) -> Result<TagFile, StoreError> {
        let path = self.file_path(name)?;
        let primary = match TagFile::from_binary(&fs::read(&path)?) {
            Ok(file) => return Ok(file),
            Err(err) => err,
        };
        let backup_bytes = match fs::read(backup_path(&path)) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::RecoveryFailed {
                    primary,
                    backup: None,
                })
            }
            Err(err) => return Err(err.into()),
        };
        match TagFile::from_binary(&backup_bytes) {
            Ok(file) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %primary,
                    data_version = file.data_version(),
                    "primary tag file invalid, recovered from backup"
                );
                Ok(file)
            }
            Err(backup) => Err(StoreError::RecoveryFailed {
                primary,
                backup: Some(backup),
            }),
        }
    }

    /// Header `DataVersion` of a stored file; the payload is not decoded.
    pub fn data_version(&self, name: &str) -> Result<i32, StoreError> {
        let bytes = fs::read(self.file_path(name)?)?;
        Ok(peek_data_version(&bytes)?)
    }

    pub fn remove(&self, name: &str) -> Result<(), StoreError> {
        let path = self.file_path(name)?;
        for target in [backup_path(&path), path] {
            if target.exists() {
                fs::remove_file(target)?;
            }
        }
        Ok(())
    }

    /// Stored names, sorted.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn file_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        if matches!(name, "" | "." | "..") || name.contains(['/', '\\']) {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(format!("{name}.{FILE_EXTENSION}")))
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut output = path.as_os_str().to_os_string();
    output.push(".bak");
    PathBuf::from(output)
}

#[cfg(test)]
#[path = "tests/storage_tests.rs"]
mod tests;
