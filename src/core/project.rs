//! Offline / online project selector.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two parallel views of the repository.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Project {
    /// Editable draft content.
    #[default]
    Offline,
    /// Published, live content.
    Online,
}

impl Project {
    #[inline]
    pub const fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::Online => "online",
        }
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
