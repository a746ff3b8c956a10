// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Orientation and the U/V axis abstraction.
//!
//! Layout code in this crate never talks about x/y directly. Instead it works in
//! terms of two axes:
//!
//! - **U** (primary): the direction in which lines stack and the panel scrolls.
//! - **V** (cross): the direction in which items flow within a line before wrapping.
//!
//! [`Orientation`] maps these back to Kurbo's x/y geometry.

use kurbo::{Point, Rect, Size};

/// Direction in which items flow within a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Items flow left to right; lines stack downward and the panel scrolls vertically.
    ///
    /// U is the y axis, V is the x axis.
    #[default]
    Horizontal,
    /// Items flow top to bottom; lines stack rightward and the panel scrolls horizontally.
    ///
    /// U is the x axis, V is the y axis.
    Vertical,
}

impl Orientation {
    /// Extent of `size` on the primary (U) axis.
    #[must_use]
    pub const fn u(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.height,
            Self::Vertical => size.width,
        }
    }

    /// Extent of `size` on the cross (V) axis.
    #[must_use]
    pub const fn v(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// Builds a [`Size`] from U and V extents.
    #[must_use]
    pub const fn size(self, u: f64, v: f64) -> Size {
        match self {
            Self::Horizontal => Size::new(v, u),
            Self::Vertical => Size::new(u, v),
        }
    }

    /// Builds a [`Point`] from U and V coordinates.
    #[must_use]
    pub const fn point(self, u: f64, v: f64) -> Point {
        match self {
            Self::Horizontal => Point::new(v, u),
            Self::Vertical => Point::new(u, v),
        }
    }

    /// Builds a [`Rect`] with origin `(u, v)` and the given U/V extents.
    #[must_use]
    pub fn rect(self, u: f64, v: f64, size_u: f64, size_v: f64) -> Rect {
        Rect::from_origin_size(self.point(u, v), self.size(size_u, size_v))
    }

    /// Start and end of `rect` on the U axis.
    #[must_use]
    pub const fn u_range(self, rect: Rect) -> (f64, f64) {
        match self {
            Self::Horizontal => (rect.y0, rect.y1),
            Self::Vertical => (rect.x0, rect.x1),
        }
    }

    /// Far edge of `rect` on the V axis.
    #[must_use]
    pub const fn v_end(self, rect: Rect) -> f64 {
        match self {
            Self::Horizontal => rect.x1,
            Self::Vertical => rect.y1,
        }
    }
}

/// Returns `true` if `inner` lies entirely within `outer` (edges inclusive).
pub(crate) fn rect_contains_rect(outer: Rect, inner: Rect) -> bool {
    let outer = outer.abs();
    let inner = inner.abs();
    inner.x0 >= outer.x0 && inner.y0 >= outer.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
}

/// Approximate float comparison used for viewport change detection.
pub(crate) fn are_close(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    let eps = (a.abs() + b.abs() + 10.0) * f64::EPSILON;
    let delta = a - b;
    -eps < delta && delta < eps
}
