// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Running estimate of item size, used to place items that are not realized.

use kurbo::Size;

use crate::Orientation;

/// An estimated item size plus how many items fit on one line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementSizeEstimate {
    /// Average extent of an item on the primary (U) axis.
    pub size_u: f64,
    /// Average extent of an item on the cross (V) axis.
    pub size_v: f64,
    /// Number of items that fit on one line. Always at least 1.
    pub elements_per_row: usize,
}

impl ElementSizeEstimate {
    /// Contribution of a single item to the U extent, amortized over its line.
    #[must_use]
    pub fn u_per_item(&self) -> f64 {
        self.size_u / to_f64(self.elements_per_row)
    }

    /// Estimated U position of the line containing `index`.
    #[must_use]
    pub fn estimate_u(&self, index: usize) -> f64 {
        to_f64(index / self.elements_per_row) * self.size_u
    }

    /// Estimated V position of `index` within its line.
    #[must_use]
    pub fn estimate_v(&self, index: usize) -> f64 {
        to_f64(index % self.elements_per_row) * self.size_v
    }

    /// Estimated index of the first item on the line at U offset `offset`.
    ///
    /// The result is not clamped to the item count.
    #[must_use]
    pub fn index_at_u(&self, offset: f64) -> usize {
        if offset <= 0.0 {
            return 0;
        }
        lines_before(offset, self.size_u).saturating_mul(self.elements_per_row)
    }

    /// Estimated U extent of `count` items laid out in full lines.
    #[must_use]
    pub fn extent_of(&self, count: usize) -> f64 {
        to_f64(count.div_ceil(self.elements_per_row)) * self.size_u
    }
}

/// Tracks the last known [`ElementSizeEstimate`].
///
/// The estimate only ever changes when there is usable measurement data, so
/// callers can divide by its extents without further checks.
#[derive(Debug, Clone)]
pub struct SizeEstimator {
    last: ElementSizeEstimate,
}

impl SizeEstimator {
    /// Creates an estimator seeded with `initial` (in x/y terms) as the item size.
    ///
    /// Zero, negative or non-finite extents in `initial` fall back to `1.0`.
    #[must_use]
    pub fn new(initial: Size, orientation: Orientation) -> Self {
        Self {
            last: ElementSizeEstimate {
                size_u: sanitize(orientation.u(initial)),
                size_v: sanitize(orientation.v(initial)),
                elements_per_row: 1,
            },
        }
    }

    /// Returns the last computed estimate.
    #[must_use]
    pub const fn last(&self) -> ElementSizeEstimate {
        self.last
    }

    /// Updates the estimate from measured `(size_u, size_v)` pairs.
    ///
    /// `cross_extent` is the space available on the V axis; it determines how
    /// many items fit on a line. If `sizes` yields nothing usable, the previous
    /// estimate is returned unchanged.
    pub fn estimate<I>(&mut self, sizes: I, cross_extent: f64) -> ElementSizeEstimate
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut total_u = 0.0;
        let mut total_v = 0.0;
        let mut count = 0_usize;
        let mut line_v = 0.0;
        let mut per_row = None;

        for (size_u, size_v) in sizes {
            if !size_u.is_finite() || !size_v.is_finite() {
                continue;
            }
            total_u += size_u;
            total_v += size_v;
            count += 1;

            if per_row.is_none() {
                if line_v > 0.0 && line_v + size_v > cross_extent {
                    per_row = Some(count - 1);
                } else {
                    line_v += size_v;
                }
            }
        }

        if count == 0 || total_u <= 0.0 || total_v <= 0.0 {
            return self.last;
        }

        let count_f = to_f64(count);
        let size_u = total_u / count_f;
        let size_v = total_v / count_f;
        let elements_per_row = per_row
            .unwrap_or_else(|| {
                // Everything measured fits on one line; extrapolate from the average.
                if cross_extent.is_finite() && cross_extent > 0.0 {
                    lines_before(cross_extent, size_v).max(count)
                } else {
                    count
                }
            })
            .max(1);

        let next = ElementSizeEstimate {
            size_u,
            size_v,
            elements_per_row,
        };
        if next != self.last {
            tracing::trace!(
                size_u,
                size_v,
                elements_per_row,
                "wrap panel size estimate updated"
            );
        }
        self.last = next;
        next
    }
}

fn sanitize(extent: f64) -> f64 {
    if extent.is_finite() && extent > 0.0 {
        extent
    } else {
        1.0
    }
}

pub(crate) fn to_f64(value: usize) -> f64 {
    value as f64
}

/// Number of whole `extent`s that fit before `offset`.
pub(crate) fn lines_before(offset: f64, extent: f64) -> usize {
    if offset.is_nan() || offset <= 0.0 || extent.is_nan() || extent <= 0.0 {
        return 0;
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "Non-negative quotient used as an index approximation; truncation is flooring"
    )]
    {
        (offset / extent) as usize
    }
}
