//! Named Binary Tag trees: the tag model, a format-agnostic ops algebra,
//! SNBT text, the big-endian binary form and framed on-disk storage.

mod array;
mod compound;
mod error;
mod limits;
mod list;
mod merger;
mod number;
mod tag;

pub mod binary;
pub mod config;
pub mod matching;
pub mod ops;
pub mod pretty;
pub mod provider;
pub mod snbt;
pub mod storage;
pub mod version;

pub use array::{ByteArray, IntArray, LongArray};
pub use compound::Compound;
pub use config::{ConfigError, NbtConfig};
pub use error::{NbtError, NbtResult};
pub use limits::SizeTracker;
pub use list::{List, TagSequence};
pub use matching::matches;
pub use merger::ListMerger;
pub use number::Number;
pub use ops::{convert, DataResult, DynamicOps, JsonOps, NbtOps, OpsError};
pub use provider::ProviderOptions;
pub use storage::{FrameError, StoreError, TagFile, TagId, TagStore};
pub use tag::{Tag, TagKind};
