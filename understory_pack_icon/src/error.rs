// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::SvgParseError;
use thiserror::Error;

use crate::{IconKind, IconPack};

/// Errors produced while resolving or loading icons.
#[derive(Debug, Error)]
pub enum IconError {
    /// No pack has this name.
    #[error("unknown icon pack `{0}`")]
    UnknownPack(String),
    /// An icon identifier was not of the form `Pack|Name`.
    #[error("malformed icon identifier `{0}`, expected `Pack|Name`")]
    MalformedIdentifier(String),
    /// The data table has no path data for this icon.
    #[error("no path data for icon {0}")]
    UnknownKind(IconKind),
    /// The icon's path data is not valid SVG path syntax.
    #[error("invalid path data for icon {kind}: {error}")]
    InvalidPathData {
        /// Icon whose data failed to parse.
        kind: IconKind,
        /// Parser failure.
        error: SvgParseError,
    },
    /// A JSON icon table entry was not a string.
    #[error("icon {name} in pack {pack} has non-string path data")]
    InvalidEntry {
        /// Pack being loaded.
        pack: IconPack,
        /// Offending icon name.
        name: String,
    },
    /// The JSON document could not be parsed.
    #[cfg(feature = "json")]
    #[error("malformed icon table: {0}")]
    Json(#[from] serde_json::Error),
}
