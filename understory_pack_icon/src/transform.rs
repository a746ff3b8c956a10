// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flip, rotation and spin state of an icon.
//!
//! These are plain values plus pure functions over them. [`PackIcon`](crate::PackIcon)
//! re-evaluates [`can_spin`] after each mutation of a field it depends on.

/// Mirroring applied to an icon before rotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Flip {
    /// No mirroring.
    #[default]
    Normal,
    /// Mirror left to right.
    Horizontal,
    /// Mirror top to bottom.
    Vertical,
    /// Mirror in both axes.
    Both,
}

impl Flip {
    /// Scale factor along x: `-1.0` when mirrored horizontally.
    #[must_use]
    pub const fn scale_x(self) -> f64 {
        match self {
            Self::Horizontal | Self::Both => -1.0,
            Self::Normal | Self::Vertical => 1.0,
        }
    }

    /// Scale factor along y: `-1.0` when mirrored vertically.
    #[must_use]
    pub const fn scale_y(self) -> f64 {
        match self {
            Self::Vertical | Self::Both => -1.0,
            Self::Normal | Self::Horizontal => 1.0,
        }
    }
}

/// Coerces a rotation angle in degrees into `0..=360`.
///
/// Values outside the range are clamped rather than wrapped; NaN becomes `0`.
#[must_use]
pub fn clamp_rotation(angle: f64) -> f64 {
    if angle.is_nan() {
        0.0
    } else {
        angle.clamp(0.0, 360.0)
    }
}

/// Coerces a spin duration in seconds to be non-negative; NaN becomes `0`.
#[must_use]
pub fn clamp_spin_duration(duration_secs: f64) -> f64 {
    if duration_secs.is_nan() {
        0.0
    } else {
        duration_secs.max(0.0)
    }
}

/// Inputs that decide whether an icon spins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinState {
    /// Spin was requested.
    pub spin: bool,
    /// The icon is visible.
    pub visible: bool,
    /// Seconds per full turn.
    pub duration_secs: f64,
    /// Icon opacity in `0..=1`.
    pub opacity: f64,
    /// An easing curve is configured.
    pub has_easing: bool,
    /// Alternate turn direction on every other cycle.
    pub auto_reverse: bool,
}

impl Default for SpinState {
    fn default() -> Self {
        Self {
            spin: false,
            visible: true,
            duration_secs: 1.0,
            opacity: 1.0,
            has_easing: true,
            auto_reverse: false,
        }
    }
}

/// Whether an icon in `state` should run its spin animation.
#[must_use]
pub fn can_spin(state: &SpinState) -> bool {
    state.spin
        && state.visible
        && state.duration_secs > 0.0
        && state.opacity > 0.0
        && state.has_easing
}

/// Rotation in degrees of a linear spin `elapsed_secs` into the animation.
///
/// Each cycle turns from `0` to `360`. With `auto_reverse`, odd cycles turn
/// back from `360` to `0`. A non-positive duration yields `0`.
#[must_use]
pub fn spin_angle(state: &SpinState, elapsed_secs: f64) -> f64 {
    let duration = clamp_spin_duration(state.duration_secs);
    if duration == 0.0 || !elapsed_secs.is_finite() || elapsed_secs <= 0.0 {
        return 0.0;
    }
    let cycles = elapsed_secs / duration;
    let progress = cycles.fract();
    let reversed = state.auto_reverse && cycles.trunc() % 2.0 == 1.0;
    if reversed {
        360.0 * (1.0 - progress)
    } else {
        360.0 * progress
    }
}
