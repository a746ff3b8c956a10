// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_pack_icon --heading-base-level=0

//! Understory Pack Icon: vector icons from named icon packs.
//!
//! An icon is identified by an [`IconKind`]: the [`IconPack`] it belongs to
//! plus its name. Path data lives in an external [`IconSource`], usually an
//! [`IconDataTable`] loaded once per pack. A [`PackIcon`] resolves its kind
//! into a [`kurbo::BezPath`] and carries the per-icon display state:
//!
//! - [`Flip`] mirroring, applied first,
//! - a static rotation clamped to `0..=360` degrees,
//! - a spin animation, running only while [`can_spin`] holds.
//!
//! [`IconCatalog`] lists icons sorted by name and narrows them with an
//! [`IconFilter`], producing the dense item sequence a virtualizing panel
//! displays.
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_pack_icon::{
//!     Flip, IconDataTable, IconKind, IconPack, PackIcon, PackIconControl,
//! };
//!
//! let mut table = IconDataTable::new();
//! let kind = IconKind::new(IconPack::BoxIcons, "Square");
//! table.insert(kind.clone(), "M0 0H24V24H0Z");
//!
//! let mut icon = PackIcon::new(kind);
//! icon.update_geometry(&table).unwrap();
//! icon.set_flip(Flip::Vertical);
//!
//! // Fit the 24×24 geometry into a 48×48 cell, mirrored top to bottom.
//! let cell = Rect::new(0.0, 0.0, 48.0, 48.0);
//! let placement = icon.placement(cell, 0.0).unwrap();
//! let p = placement * Point::new(0.0, 0.0);
//! assert!((p - Point::new(0.0, 48.0)).hypot() < 1e-9);
//! ```

mod catalog;
mod data;
mod error;
mod icon;
mod kind;
mod pack;
mod transform;

pub use catalog::{IconCatalog, IconEntry, IconFilter, sort_entries, sorted_kinds};
pub use data::{IconDataTable, IconSource, PLACEHOLDER_NAME};
pub use error::IconError;
pub use icon::{PackIcon, PackIconControl};
pub use kind::IconKind;
pub use pack::IconPack;
pub use transform::{Flip, SpinState, can_spin, clamp_rotation, clamp_spin_duration, spin_angle};
