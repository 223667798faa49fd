//! Version stamps: the `DataVersion` key carried by saved trees, and the
//! constants of the framed file formats.
//!
//! Trees written without a stamp predate versioning and read back as
//! [`LEGACY_DATA_VERSION`].

use crate::compound::Compound;
use crate::number::Number;
use crate::ops::{DataResult, DynamicOps};

pub const DATA_VERSION_KEY: &str = "DataVersion";

/// Data version written by this build.
pub const CURRENT_DATA_VERSION: i32 = 4671;

/// Reported for trees without a stamp.
pub const LEGACY_DATA_VERSION: i32 = -1;

/// Current layout of the framed tag file envelope.
/// Increment when the header or payload layout changes.
pub const TAG_FILE_FORMAT_VERSION: u16 = 1;

/// Magic bytes for plain framed tag files.
pub const TAG_FILE_MAGIC: [u8; 4] = *b"NBTF";

/// Magic bytes for framed tag files carrying an HMAC.
pub const AUTH_TAG_FILE_MAGIC: [u8; 4] = *b"NBTA";

pub fn put_data_version(nbt: &mut Compound) -> &mut Compound {
    put_data_version_with(nbt, CURRENT_DATA_VERSION)
}

pub fn put_data_version_with(nbt: &mut Compound, version: i32) -> &mut Compound {
    nbt.put_int(DATA_VERSION_KEY, version);
    nbt
}

pub fn get_data_version(nbt: &Compound) -> i32 {
    get_data_version_or(nbt, LEGACY_DATA_VERSION)
}

/// Any numeric tag under the key counts, truncated to an int.
pub fn get_data_version_or(nbt: &Compound, fallback: i32) -> i32 {
    nbt.get_int_or(DATA_VERSION_KEY, fallback)
}

/// Stamps a map in any ops representation.
pub fn put_data_version_in<O: DynamicOps>(
    ops: &O,
    value: O::Value,
    version: i32,
) -> DataResult<O::Value> {
    ops.merge_to_map(value, ops.create_string(DATA_VERSION_KEY), ops.create_int(version))
}

pub fn get_data_version_in<O: DynamicOps>(ops: &O, value: &O::Value, fallback: i32) -> i32 {
    ops.get_map(value)
        .ok()
        .and_then(|map| map.get_str(DATA_VERSION_KEY))
        .and_then(|version| ops.get_number_value(&version).ok())
        .map_or(fallback, Number::int_value)
}
