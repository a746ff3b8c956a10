// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Panel configuration.

use kurbo::Size;

use crate::{Orientation, SIZE_TOLERANCE};

/// Configuration for a [`VirtualizingWrapPanel`](crate::VirtualizingWrapPanel).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapPanelOptions {
    /// Direction in which items flow within a line.
    pub orientation: Orientation,
    /// Item size assumed before any container has been measured.
    pub initial_element_size: Size,
    /// Largest size change, in either axis, that does not invalidate cached positions.
    pub size_tolerance: f64,
    /// Maximum number of pooled containers per recycle key. `None` is unbounded.
    pub recycle_pool_limit: Option<usize>,
    /// Report snap points along the U axis as evenly spaced lines.
    pub regular_snap_points: bool,
}

impl Default for WrapPanelOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            initial_element_size: Size::new(25.0, 25.0),
            size_tolerance: SIZE_TOLERANCE,
            recycle_pool_limit: None,
            regular_snap_points: false,
        }
    }
}

impl WrapPanelOptions {
    /// Sets the flow orientation.
    #[must_use]
    pub const fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Sets the item size assumed before anything is measured.
    #[must_use]
    pub const fn with_initial_element_size(mut self, size: Size) -> Self {
        self.initial_element_size = size;
        self
    }

    /// Sets the size comparison tolerance.
    #[must_use]
    pub const fn with_size_tolerance(mut self, tolerance: f64) -> Self {
        self.size_tolerance = tolerance;
        self
    }

    /// Caps the recycle pool at `limit` containers per key.
    #[must_use]
    pub const fn with_recycle_pool_limit(mut self, limit: usize) -> Self {
        self.recycle_pool_limit = Some(limit);
        self
    }

    /// Chooses between evenly spaced and per-line snap points.
    #[must_use]
    pub const fn with_regular_snap_points(mut self, regular: bool) -> Self {
        self.regular_snap_points = regular;
        self
    }
}
