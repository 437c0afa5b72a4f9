//! Identifier types.
//!
//! - [`StructureId`]: stable id of a repository resource, independent of its path
//! - [`EntryId`]: stable id of a sitemap entry (not necessarily a resource id)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Locale;

/// Stable identifier of a repository resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructureId(Uuid);

impl StructureId {
    pub const fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a fresh random id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an id, returning `None` for malformed input.
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s.trim()).ok().map(Self)
    }

    #[inline]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for StructureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for StructureId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Stable identifier of a sitemap entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub const fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse an id, returning `None` for malformed input.
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s.trim()).ok().map(Self)
    }

    /// Derive an id for an entry whose raw id is missing or malformed.
    ///
    /// Name-based (UUID v5) so the same logical node gets the same id on
    /// every rebuild.
    pub fn synthesize(sitemap: StructureId, locale: &Locale, original_uri: &str) -> Self {
        let name = format!("{}:{}", locale.as_str(), original_uri);
        Self(Uuid::new_v5(sitemap.as_uuid(), name.as_bytes()))
    }

    #[inline]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for EntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}
