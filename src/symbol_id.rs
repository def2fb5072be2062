//! Symbol identity - stable, content-derived key for every declared entity
//!
//! A `SymbolId` is 160 bits taken from the BLAKE3 hash of the extractor's
//! canonical declaration key (typically a USR string). Two sightings of the
//! same logical entity carry the same key and therefore the same id.
//!
//! Textual form is 40 lowercase hex digits:
//! - `0000000000000000000000000000000000000000` is the invalid id
//! - `ffffffffffffffffffffffffffffffffffffffff` is the global namespace

use crate::symbol::Access;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width of an identifier in bytes.
pub const SYMBOL_ID_LEN: usize = 20;

/// Prefix mixed into synthetic overload-set keys so they live in their own
/// key space.
const OVERLOADS_DOMAIN: &str = "symcorpus.overloads";

/// Global, stable identifier for every entity in the corpus.
///
/// This id serves as the primary key for:
/// - Entities in the corpus store
/// - Parent, member, and base references
/// - Synthetic overload groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SymbolId([u8; SYMBOL_ID_LEN]);

impl SymbolId {
    /// The "no entity" sentinel.
    pub const INVALID: SymbolId = SymbolId([0; SYMBOL_ID_LEN]);

    /// The implicit global namespace.
    pub const GLOBAL: SymbolId = SymbolId([0xFF; SYMBOL_ID_LEN]);

    /// Wrap raw bytes
    pub const fn from_bytes(bytes: [u8; SYMBOL_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Derive the id of an entity from its canonical declaration key
    pub fn from_key(key: &str) -> Self {
        let hash = blake3::hash(key.as_bytes());
        let mut bytes = [0u8; SYMBOL_ID_LEN];
        bytes.copy_from_slice(&hash.as_bytes()[..SYMBOL_ID_LEN]);
        Self(bytes)
    }

    /// Derive the id of the overload group `(parent, name, access, is_static)`
    pub fn for_overloads(parent: SymbolId, name: &str, access: Access, is_static: bool) -> Self {
        let key = format!(
            "{}:{}-{}-{}-{}",
            OVERLOADS_DOMAIN,
            parent,
            name,
            access.as_str(),
            is_static
        );
        Self::from_key(&key)
    }

    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }

    pub fn as_bytes(&self) -> &[u8; SYMBOL_ID_LEN] {
        &self.0
    }

    /// Parse the 40-digit hex form
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() != SYMBOL_ID_LEN * 2 || !s.is_ascii() {
            return Err(Error::InvalidSymbolId(format!(
                "expected {} hex digits, got {:?}",
                SYMBOL_ID_LEN * 2,
                s
            )));
        }

        let mut bytes = [0u8; SYMBOL_ID_LEN];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = &s[i * 2..i * 2 + 2];
            *byte = u8::from_str_radix(pair, 16)
                .map_err(|_| Error::InvalidSymbolId(format!("invalid hex digits {:?} in {:?}", pair, s)))?;
        }
        Ok(Self(bytes))
    }

    /// Convert to the hex string
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(SYMBOL_ID_LEN * 2);
        for byte in &self.0 {
            out.push_str(&format!("{:02x}", byte));
        }
        out
    }

    /// Short prefix for log lines and tables
    pub fn short(&self) -> String {
        self.to_hex()[..10].to_string()
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for SymbolId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for SymbolId {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SymbolId {
    /// Accepts the hex form, an empty string (invalid), or any other string
    /// as a canonical declaration key.
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            return Ok(SymbolId::INVALID);
        }
        if s.len() == SYMBOL_ID_LEN * 2 && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return SymbolId::parse(&s).map_err(serde::de::Error::custom);
        }
        Ok(SymbolId::from_key(&s))
    }
}
