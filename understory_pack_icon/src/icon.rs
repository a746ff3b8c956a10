// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A displayable pack icon.

use kurbo::{Affine, BezPath, Rect, Shape};

use crate::transform::{SpinState, can_spin, clamp_rotation, clamp_spin_duration, spin_angle};
use crate::{Flip, IconError, IconKind, IconPack, IconSource};

/// What every pack icon can do, independent of how it is drawn.
pub trait PackIconControl {
    /// Selects the icon to show. `None` shows nothing.
    fn set_kind(&mut self, kind: Option<IconKind>);

    /// Resolves the current kind's geometry from `source`.
    ///
    /// On error the geometry is cleared.
    fn update_geometry(&mut self, source: &dyn IconSource) -> Result<(), IconError>;
}

/// An icon with its flip, rotation and spin settings.
///
/// Setting the kind marks the geometry stale; call
/// [`update_geometry`](PackIconControl::update_geometry) to resolve it.
#[derive(Debug, Clone, Default)]
pub struct PackIcon {
    kind: Option<IconKind>,
    geometry: Option<BezPath>,
    geometry_stale: bool,
    flip: Flip,
    rotation: f64,
    spin: SpinState,
    spinning: bool,
}

impl PackIcon {
    /// Creates an icon showing `kind`.
    #[must_use]
    pub fn new(kind: IconKind) -> Self {
        Self {
            kind: Some(kind),
            geometry_stale: true,
            ..Self::default()
        }
    }

    /// The icon being shown.
    #[must_use]
    pub fn kind(&self) -> Option<&IconKind> {
        self.kind.as_ref()
    }

    /// Pack of the icon being shown.
    #[must_use]
    pub fn pack(&self) -> Option<IconPack> {
        self.kind.as_ref().map(|kind| kind.pack)
    }

    /// Resolved path, in the icon's own coordinate space.
    #[must_use]
    pub fn geometry(&self) -> Option<&BezPath> {
        self.geometry.as_ref()
    }

    /// Whether the kind changed since the geometry was last resolved.
    #[must_use]
    pub fn is_geometry_stale(&self) -> bool {
        self.geometry_stale
    }

    /// Current mirroring.
    #[must_use]
    pub fn flip(&self) -> Flip {
        self.flip
    }

    /// Sets the mirroring.
    pub fn set_flip(&mut self, flip: Flip) {
        self.flip = flip;
    }

    /// Static rotation in degrees, always within `0..=360`.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Sets the static rotation; see [`clamp_rotation`].
    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = clamp_rotation(degrees);
    }

    /// Current spin inputs.
    #[must_use]
    pub fn spin_state(&self) -> &SpinState {
        &self.spin
    }

    /// Whether the spin animation is running.
    #[must_use]
    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    /// Requests or cancels spinning.
    pub fn set_spin(&mut self, spin: bool) {
        self.spin.spin = spin;
        self.refresh_spin();
    }

    /// Records whether the icon is visible.
    pub fn set_visible(&mut self, visible: bool) {
        self.spin.visible = visible;
        self.refresh_spin();
    }

    /// Records the icon's opacity.
    pub fn set_opacity(&mut self, opacity: f64) {
        self.spin.opacity = opacity;
        self.refresh_spin();
    }

    /// Sets the seconds per turn; negative values become `0`.
    pub fn set_spin_duration(&mut self, secs: f64) {
        self.spin.duration_secs = clamp_spin_duration(secs);
        self.refresh_spin();
    }

    /// Records whether an easing curve is configured.
    pub fn set_spin_easing(&mut self, has_easing: bool) {
        self.spin.has_easing = has_easing;
        self.refresh_spin();
    }

    /// Alternates the turn direction on every other cycle.
    pub fn set_spin_auto_reverse(&mut self, auto_reverse: bool) {
        self.spin.auto_reverse = auto_reverse;
    }

    fn refresh_spin(&mut self) {
        let spinning = can_spin(&self.spin);
        if spinning != self.spinning {
            tracing::trace!(kind = ?self.kind, spinning, "spin state changed");
            self.spinning = spinning;
        }
    }

    /// Rotation in degrees at `elapsed_secs` into the spin animation.
    ///
    /// A spinning icon's animated angle replaces its static rotation.
    #[must_use]
    pub fn angle_at(&self, elapsed_secs: f64) -> f64 {
        if self.spinning {
            spin_angle(&self.spin, elapsed_secs)
        } else {
            self.rotation
        }
    }

    /// Transform that flips, then rotates, the icon about the center of `bounds`.
    #[must_use]
    pub fn render_transform(&self, bounds: Rect, elapsed_secs: f64) -> Affine {
        let center = bounds.center().to_vec2();
        Affine::translate(center)
            * Affine::rotate(self.angle_at(elapsed_secs).to_radians())
            * Affine::scale_non_uniform(self.flip.scale_x(), self.flip.scale_y())
            * Affine::translate(-center)
    }

    /// Transform that scales the geometry uniformly to fit `bounds`, centered.
    ///
    /// Returns `None` without geometry or when the geometry has no area.
    #[must_use]
    pub fn fit_transform(&self, bounds: Rect) -> Option<Affine> {
        let extent = self.geometry.as_ref()?.bounding_box();
        if extent.width() <= 0.0 || extent.height() <= 0.0 {
            return None;
        }
        let scale = (bounds.width() / extent.width()).min(bounds.height() / extent.height());
        let offset = bounds.center().to_vec2() - extent.center().to_vec2() * scale;
        Some(Affine::translate(offset) * Affine::scale(scale))
    }

    /// Full transform from geometry space to panel space for `bounds`.
    #[must_use]
    pub fn placement(&self, bounds: Rect, elapsed_secs: f64) -> Option<Affine> {
        Some(self.render_transform(bounds, elapsed_secs) * self.fit_transform(bounds)?)
    }
}

impl PackIconControl for PackIcon {
    fn set_kind(&mut self, kind: Option<IconKind>) {
        if self.kind != kind {
            self.kind = kind;
            self.geometry_stale = true;
        }
    }

    fn update_geometry(&mut self, source: &dyn IconSource) -> Result<(), IconError> {
        self.geometry_stale = false;
        self.geometry = None;
        let Some(kind) = &self.kind else {
            return Ok(());
        };
        let data = source
            .path_data(kind)
            .ok_or_else(|| IconError::UnknownKind(kind.clone()))?;
        let path = BezPath::from_svg(data).map_err(|error| IconError::InvalidPathData {
            kind: kind.clone(),
            error,
        })?;
        self.geometry = Some(path);
        Ok(())
    }
}

impl From<IconKind> for PackIcon {
    fn from(kind: IconKind) -> Self {
        Self::new(kind)
    }
}
