// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::str::FromStr;

use crate::{IconError, IconPack};

/// A single icon: its pack plus its name within that pack.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconKind {
    /// Pack the icon belongs to.
    pub pack: IconPack,
    /// Name of the icon within its pack, such as `"ArrowDown"`.
    pub name: String,
}

impl IconKind {
    /// Creates a kind from a pack and an icon name.
    pub fn new(pack: IconPack, name: impl Into<String>) -> Self {
        Self {
            pack,
            name: name.into(),
        }
    }

    /// Identifier of the form `Pack|Name`, unique across all packs.
    #[must_use]
    pub fn identifier(&self) -> String {
        format!("{}|{}", self.pack.name(), self.name)
    }
}

impl fmt::Display for IconKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.pack.name(), self.name)
    }
}

impl FromStr for IconKind {
    type Err = IconError;

    /// Parses an [`identifier`](IconKind::identifier).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (pack, name) = s
            .split_once('|')
            .ok_or_else(|| IconError::MalformedIdentifier(s.into()))?;
        if name.is_empty() {
            return Err(IconError::MalformedIdentifier(s.into()));
        }
        Ok(Self::new(pack.parse()?, name))
    }
}
