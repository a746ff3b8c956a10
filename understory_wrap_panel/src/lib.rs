// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_wrap_panel --heading-base-level=0

//! Understory Wrap Panel: a viewport-driven virtualizing wrap panel.
//!
//! This crate realizes, recycles, measures and arranges item containers for
//! an ordered item collection laid out in lines that wrap at the panel's
//! cross-axis edge. Only items near the viewport get containers; everything
//! else is estimated from the average size of what has been measured.
//!
//! The core concepts are:
//!
//! - [`Orientation`]: maps the primary (U, scrolling) and cross (V, wrapping)
//!   axes onto Kurbo's x/y geometry.
//! - [`SizeEstimator`]: a running average item size plus the number of items
//!   per line, used to place items that are not realized.
//! - [`RealizedWrappedElements`]: the contiguous window of realized containers
//!   with cached positions and sizes, patched in place on collection changes.
//! - [`RecyclePool`] and [`ItemContainerManager`]: keyed reuse of detached
//!   containers.
//! - [`VirtualizingWrapPanel`]: the measure/arrange orchestration, collection
//!   change handling, scroll-into-view and keyboard navigation.
//!
//! This crate deliberately does **not** own items or containers. Host
//! frameworks implement [`ContainerGenerator`] and [`ContainerLayout`] to:
//!
//! - create, prepare and clear containers (any cheap handle, such as a node id),
//! - attach, show, measure and arrange them,
//! - report keyboard focus and scroll anchoring.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use understory_wrap_panel::{
//!     ContainerGenerator, ContainerLayout, ContainerRequest, VirtualizingWrapPanel,
//! };
//!
//! /// 1000 items of 48×48; containers are indices into `sizes`.
//! #[derive(Default)]
//! struct Grid {
//!     sizes: Vec<Option<Size>>,
//! }
//!
//! impl ContainerGenerator for Grid {
//!     type Container = usize;
//!     type RecycleKey = ();
//!
//!     fn item_count(&self) -> usize {
//!         1000
//!     }
//!     fn needs_container(&mut self, _index: usize) -> ContainerRequest<()> {
//!         ContainerRequest::Generate { recycle_key: Some(()) }
//!     }
//!     fn item_container(&mut self, _index: usize) -> usize {
//!         unreachable!("items are never their own containers")
//!     }
//!     fn create_container(&mut self, _index: usize, _key: Option<&()>) -> usize {
//!         self.sizes.push(None);
//!         self.sizes.len() - 1
//!     }
//!     fn prepare_container(&mut self, _container: &usize, _index: usize) {}
//!     fn clear_container(&mut self, _container: &usize) {}
//! }
//!
//! impl ContainerLayout for Grid {
//!     fn add_child(&mut self, _container: &usize) {}
//!     fn remove_child(&mut self, _container: &usize) {}
//!     fn set_visible(&mut self, _container: &usize, _visible: bool) {}
//!     fn measure(&mut self, container: &usize, _available: Size) -> Size {
//!         self.sizes[*container] = Some(Size::new(48.0, 48.0));
//!         Size::new(48.0, 48.0)
//!     }
//!     fn desired_size(&self, container: &usize) -> Option<Size> {
//!         self.sizes[*container]
//!     }
//!     fn arrange(&mut self, _container: &usize, _rect: Rect) {}
//!     fn bring_into_view(&mut self, _container: &usize) {}
//! }
//!
//! let mut host = Grid::default();
//! let mut panel = VirtualizingWrapPanel::default();
//!
//! // A 400×300 viewport at the top of the panel.
//! panel.set_effective_viewport(Rect::new(0.0, 0.0, 400.0, 300.0));
//! let desired = panel.measure(&mut host, Size::new(400.0, f64::INFINITY));
//! panel.arrange(&mut host, desired);
//!
//! // Eight items fit on each 400 px line.
//! assert_eq!(panel.estimate().elements_per_row, 8);
//! assert_eq!(panel.first_realized_index(), Some(0));
//!
//! // Scroll down by 20 lines: realization restarts at item 160, reusing the
//! // containers recycled from the top.
//! let created = host.sizes.len();
//! panel.set_effective_viewport(Rect::new(0.0, 960.0, 400.0, 1260.0));
//! let desired = panel.measure(&mut host, Size::new(400.0, f64::INFINITY));
//! panel.arrange(&mut host, desired);
//! assert_eq!(panel.first_realized_index(), Some(160));
//! assert_eq!(host.sizes.len(), created);
//! ```
//!
//! All geometry is in the panel's coordinate space (typically logical pixels).
//! The viewport is expected to be already clipped to the panel by the host.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod axis;
mod container_manager;
mod estimator;
mod host;
mod options;
mod panel;
mod pool;
mod realized;

#[cfg(test)]
mod test_host;

pub use axis::Orientation;
pub use container_manager::{ItemContainerManager, RecycleKey, RecycleMode, Recycled};
pub use estimator::{ElementSizeEstimate, SizeEstimator};
pub use host::{ContainerGenerator, ContainerLayout, ContainerRequest, ItemsChange, LayoutRoot};
pub use options::WrapPanelOptions;
pub use panel::{LayoutPhase, NavigationDirection, SnapPointsAlignment, VirtualizingWrapPanel};
pub use pool::RecyclePool;
pub use realized::{ElementCallbacks, RealizedElement, RealizedWrappedElements, SIZE_TOLERANCE};
