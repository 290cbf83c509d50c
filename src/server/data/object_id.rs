//! Collection-native document identifiers.
//!
//! An `ObjectId` is 12 bytes written as 24 lowercase hex characters. Freshly
//! generated ids lay out as 4 bytes of big-endian unix seconds, 5 random bytes
//! fixed per process and a 3 byte counter, so ids sort roughly by creation time.

use std::{
    fmt,
    str::FromStr,
    sync::{
        atomic::{AtomicU32, Ordering},
        LazyLock,
    },
};

use chrono::Utc;
use md5::{Digest, Md5};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::server::error::store::StoreError;

static PROCESS_UNIQUE: LazyLock<[u8; 5]> = LazyLock::new(rand::random);
static COUNTER: LazyLock<AtomicU32> = LazyLock::new(|| AtomicU32::new(rand::random()));

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// The all-zero id.
    pub const NIL: ObjectId = ObjectId([0; 12]);

    /// Generates a new id from the current time, the process bytes and the counter.
    pub fn new() -> Self {
        let seconds = Utc::now().timestamp() as u32;
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    pub const fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Parses exactly 24 hex characters, either case.
    pub fn parse_str(value: &str) -> Result<Self, StoreError> {
        if value.len() != 24 {
            return Err(StoreError::InvalidObjectId(value.to_string()));
        }

        let mut bytes = [0u8; 12];
        hex::decode_to_slice(value, &mut bytes)
            .map_err(|_| StoreError::InvalidObjectId(value.to_string()))?;

        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId(\"{}\")", self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse_str(&value).map_err(de::Error::custom)
    }
}

impl From<ObjectId> for serde_json::Value {
    fn from(id: ObjectId) -> Self {
        serde_json::Value::String(id.to_hex())
    }
}

/// Maps an arbitrary external key (email, slug, ...) to an object id.
///
/// A well-formed 24 hex character string is parsed as-is. Anything else maps to
/// the first 12 bytes of its MD5 digest, so the same input always yields the
/// same id without a lookup table. MD5 is only used for key derivation here.
pub fn string_to_object_id(value: &str) -> ObjectId {
    if let Ok(id) = ObjectId::parse_str(value) {
        return id;
    }

    let digest = Md5::digest(value.as_bytes());
    let mut bytes = [0u8; 12];
    bytes.copy_from_slice(&digest[..12]);
    ObjectId(bytes)
}
