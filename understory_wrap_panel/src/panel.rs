// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport-driven realization, measure and arrange.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};

use crate::axis::{are_close, rect_contains_rect};
use crate::container_manager::{ItemContainerManager, RecycleMode, Recycled};
use crate::estimator::{ElementSizeEstimate, SizeEstimator, lines_before, to_f64};
use crate::realized::{ElementCallbacks, RealizedWrappedElements};
use crate::{ContainerLayout, ItemsChange, LayoutRoot, Orientation, WrapPanelOptions};

/// Positions closer than this to a line start count as the line start.
const LINE_START_EPSILON: f64 = 1e-6;

/// Stage of the layout state machine.
///
/// Intermediate stages are only entered while [`VirtualizingWrapPanel::measure`]
/// or [`VirtualizingWrapPanel::arrange`] run. Between passes the panel reports
/// [`Swapped`](Self::Swapped) after a completed measure that has not been
/// arranged yet, and [`Idle`](Self::Idle) otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LayoutPhase {
    /// No pass in progress.
    #[default]
    Idle,
    /// Computing the anchor element for the viewport.
    Measuring,
    /// Realizing from the anchor towards the end of the viewport.
    RealizingForward,
    /// Realizing from the anchor towards the start of the viewport.
    RealizingBackward,
    /// The measure buffer replaced the realized window.
    Swapped,
    /// Positioning realized containers.
    Arranging,
}

/// Direction of a keyboard navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDirection {
    /// The first item.
    First,
    /// The last item.
    Last,
    /// The next item in source order.
    Next,
    /// The previous item in source order.
    Previous,
    /// One step left.
    Left,
    /// One step right.
    Right,
    /// One step up.
    Up,
    /// One step down.
    Down,
}

/// Which edge of a line a snap point lines up with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SnapPointsAlignment {
    /// The line's leading edge.
    #[default]
    Near,
    /// The middle of the line.
    Center,
    /// The line's trailing edge.
    Far,
}

impl SnapPointsAlignment {
    fn offset(self, extent: f64) -> f64 {
        match self {
            Self::Near => 0.0,
            Self::Center => extent / 2.0,
            Self::Far => extent,
        }
    }
}

/// The viewport a measure pass realizes against, in U/V terms.
#[derive(Debug, Clone, Copy)]
struct MeasureViewport {
    anchor_index: usize,
    anchor_u: f64,
    anchor_v: f64,
    u_start: f64,
    u_end: f64,
    /// Lines wrap here.
    v_end: f64,
    /// Largest line extent measured on the V axis.
    measured_v: f64,
    /// U position just past the last realized line.
    realized_end_u: f64,
    last_index: Option<usize>,
    is_disjunct: bool,
}

#[derive(Debug, Clone)]
struct KeptElement<C> {
    index: usize,
    container: C,
}

#[derive(Debug, Clone)]
struct ScrollTarget<C> {
    index: usize,
    container: C,
    rect: Rect,
}

/// Routes containers leaving the realized window through the container manager.
struct Recycler<'a, H: ContainerLayout> {
    manager: &'a mut ItemContainerManager<H::Container, H::RecycleKey>,
    host: &'a mut H,
    focused: &'a mut Option<KeptElement<H::Container>>,
    mode: RecycleMode,
}

impl<H: ContainerLayout> ElementCallbacks<H::Container> for Recycler<'_, H> {
    fn recycle(&mut self, element: H::Container, index: usize) {
        if let Recycled::KeptForFocus(container) =
            self.manager.recycle(self.host, element, index, self.mode)
        {
            if let Some(stale) = self.focused.replace(KeptElement { index, container }) {
                // Only one container can hold keyboard focus.
                self.manager.recycle(
                    self.host,
                    stale.container,
                    stale.index,
                    RecycleMode::ItemRemoved,
                );
            }
        }
    }

    fn index_changed(&mut self, element: &H::Container, old_index: usize, new_index: usize) {
        self.host
            .container_index_changed(element, old_index, new_index);
    }
}

/// A virtualizing panel that lays items out in lines, wrapping at the cross-axis edge.
///
/// Only containers for items intersecting the viewport (plus a line of
/// overscan) are realized. Containers leaving the realized window are pooled
/// by recycle key and reused for other items.
///
/// The panel is driven by the host:
///
/// 1. [`set_effective_viewport`](Self::set_effective_viewport) whenever the
///    visible part of the panel changes,
/// 2. [`measure`](Self::measure) and [`arrange`](Self::arrange) from the
///    host's layout pass,
/// 3. [`items_changed`](Self::items_changed) for every change to the items.
///
/// `C` is the host's container handle and `K` its recycle key type; see
/// [`ContainerGenerator`](crate::ContainerGenerator).
#[derive(Debug, Clone)]
pub struct VirtualizingWrapPanel<C, K> {
    options: WrapPanelOptions,
    estimator: SizeEstimator,
    realized: RealizedWrappedElements<C>,
    measure_buffer: RealizedWrappedElements<C>,
    manager: ItemContainerManager<C, K>,
    viewport: Rect,
    bounds: Rect,
    desired: Size,
    measure_valid: bool,
    waiting_for_viewport: bool,
    bringing_into_view: bool,
    phase: LayoutPhase,
    focused: Option<KeptElement<C>>,
    scroll_to: Option<ScrollTarget<C>>,
}

impl<C, K> Default for VirtualizingWrapPanel<C, K>
where
    C: Clone + Eq + core::hash::Hash + core::fmt::Debug,
    K: Clone + Eq + core::hash::Hash + core::fmt::Debug,
{
    fn default() -> Self {
        Self::new(WrapPanelOptions::default())
    }
}

impl<C, K> VirtualizingWrapPanel<C, K>
where
    C: Clone + Eq + core::hash::Hash + core::fmt::Debug,
    K: Clone + Eq + core::hash::Hash + core::fmt::Debug,
{
    /// Creates a panel with the given options and nothing realized.
    #[must_use]
    pub fn new(options: WrapPanelOptions) -> Self {
        let manager = match options.recycle_pool_limit {
            Some(limit) => ItemContainerManager::with_pool_limit(limit),
            None => ItemContainerManager::new(),
        };
        Self {
            options,
            estimator: SizeEstimator::new(options.initial_element_size, options.orientation),
            realized: RealizedWrappedElements::new(),
            measure_buffer: RealizedWrappedElements::new(),
            manager,
            viewport: Rect::ZERO,
            bounds: Rect::ZERO,
            desired: Size::ZERO,
            measure_valid: false,
            waiting_for_viewport: false,
            bringing_into_view: false,
            phase: LayoutPhase::Idle,
            focused: None,
            scroll_to: None,
        }
    }

    /// Current options.
    #[must_use]
    pub const fn options(&self) -> &WrapPanelOptions {
        &self.options
    }

    /// Flow orientation.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.options.orientation
    }

    /// Changes the flow orientation.
    ///
    /// Cached positions swap meaning between axes, so every realized
    /// container is recycled and the size estimate starts over.
    pub fn set_orientation<H>(&mut self, host: &mut H, orientation: Orientation)
    where
        H: ContainerLayout<Container = C, RecycleKey = K>,
    {
        if orientation == self.options.orientation {
            return;
        }
        self.realized.recycle_all(&mut Recycler {
            manager: &mut self.manager,
            host: &mut *host,
            focused: &mut self.focused,
            mode: RecycleMode::Virtualize,
        });
        self.options.orientation = orientation;
        self.estimator = SizeEstimator::new(self.options.initial_element_size, orientation);
        self.invalidate_measure();
    }

    /// Current layout phase.
    #[must_use]
    pub const fn phase(&self) -> LayoutPhase {
        self.phase
    }

    /// The viewport in panel coordinates, as last given to
    /// [`set_effective_viewport`](Self::set_effective_viewport).
    #[must_use]
    pub const fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Panel bounds recorded by the last arrange, at the origin.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Returns `false` if the panel needs to be measured again.
    #[must_use]
    pub const fn is_measure_valid(&self) -> bool {
        self.measure_valid
    }

    /// Marks the panel as needing a new measure pass.
    pub fn invalidate_measure(&mut self) {
        self.measure_valid = false;
    }

    /// The last size estimate.
    #[must_use]
    pub const fn estimate(&self) -> ElementSizeEstimate {
        self.estimator.last()
    }

    /// The realized window.
    #[must_use]
    pub const fn realized(&self) -> &RealizedWrappedElements<C> {
        &self.realized
    }

    /// The container manager and its recycle pool.
    #[must_use]
    pub const fn container_manager(&self) -> &ItemContainerManager<C, K> {
        &self.manager
    }

    /// First realized index, if anything is realized.
    #[must_use]
    pub fn first_realized_index(&self) -> Option<usize> {
        self.realized.first_index()
    }

    /// Last realized index, if anything is realized.
    #[must_use]
    pub fn last_realized_index(&self) -> Option<usize> {
        self.realized.last_index()
    }

    /// Iterates the realized containers in index order.
    pub fn realized_containers(&self) -> impl Iterator<Item = &C> + '_ {
        self.realized.containers()
    }

    /// A focused container kept alive outside the realized window, with its index.
    #[must_use]
    pub fn focused(&self) -> Option<(usize, &C)> {
        self.focused.as_ref().map(|kept| (kept.index, &kept.container))
    }

    /// The container currently realized for `index`, if any.
    ///
    /// This includes a pending scroll-into-view target and the kept focused container.
    #[must_use]
    pub fn container_from_index(&self, index: usize) -> Option<&C> {
        if let Some(target) = self.scroll_to.as_ref().filter(|t| t.index == index) {
            return Some(&target.container);
        }
        if let Some(kept) = self.focused.as_ref().filter(|k| k.index == index) {
            return Some(&kept.container);
        }
        self.realized.element(index)
    }

    /// The index `container` is realized for, if any.
    #[must_use]
    pub fn index_from_container(&self, container: &C) -> Option<usize> {
        if let Some(target) = self.scroll_to.as_ref().filter(|t| t.container == *container) {
            return Some(target.index);
        }
        if let Some(kept) = self.focused.as_ref().filter(|k| k.container == *container) {
            return Some(kept.index);
        }
        self.realized.index_of(container)
    }

    /// Whether snap points along the U axis are evenly spaced.
    ///
    /// See [`WrapPanelOptions::regular_snap_points`].
    #[must_use]
    pub const fn are_snap_points_regular(&self) -> bool {
        self.options.regular_snap_points
    }

    /// Evenly spaced snap points along the U axis, as `(interval, offset)`.
    ///
    /// The interval is the estimated line extent, so snapping lands on line
    /// boundaries while all items share one size. Returns `None` unless the
    /// panel was configured for regular snap points.
    #[must_use]
    pub fn regular_snap_points(&self, alignment: SnapPointsAlignment) -> Option<(f64, f64)> {
        if !self.options.regular_snap_points {
            return None;
        }
        let interval = self.estimator.last().size_u;
        Some((interval, alignment.offset(interval)))
    }

    /// One snap point per realized line along the U axis, in order.
    ///
    /// Empty while nothing is realized or the cached positions are stale.
    #[must_use]
    pub fn irregular_snap_points(&self, alignment: SnapPointsAlignment) -> Vec<f64> {
        if self.realized.start_u().is_none() || self.realized.start_v().is_none() {
            return Vec::new();
        }
        // (u, extent) of each line.
        let mut lines: Vec<(f64, f64)> = Vec::new();
        for element in self.realized.iter() {
            match lines.last_mut() {
                Some((u, extent)) if are_close(*u, element.u) => {
                    *extent = extent.max(element.size_u);
                }
                _ => lines.push((element.u, element.size_u)),
            }
        }
        lines
            .into_iter()
            .map(|(u, extent)| u + alignment.offset(extent))
            .collect()
    }

    /// Records the visible part of the panel, in panel coordinates.
    ///
    /// Clears a pending viewport wait. Returns `true` if measure was
    /// invalidated, which happens when the U range changed or a pass was
    /// waiting for this update.
    pub fn set_effective_viewport(&mut self, viewport: Rect) -> bool {
        let orientation = self.options.orientation;
        let (old_start, old_end) = orientation.u_range(self.viewport);
        let (new_start, new_end) = orientation.u_range(viewport);
        let was_waiting = self.waiting_for_viewport;

        self.viewport = viewport;
        self.waiting_for_viewport = false;

        let changed = !are_close(old_start, new_start) || !are_close(old_end, new_end);
        if changed || was_waiting {
            self.invalidate_measure();
            return true;
        }
        false
    }

    /// Measures the panel, realizing containers for the viewport.
    ///
    /// Returns the desired size: the realized extent plus an estimate for the
    /// items after the realized window on the U axis, and the viewport's far
    /// edge on the V axis.
    pub fn measure<H>(&mut self, host: &mut H, available: Size) -> Size
    where
        H: ContainerLayout<Container = C, RecycleKey = K>,
    {
        let count = host.item_count();
        self.measure_valid = true;

        if count == 0 {
            self.realized.recycle_all(&mut Recycler {
                manager: &mut self.manager,
                host: &mut *host,
                focused: &mut self.focused,
                mode: RecycleMode::Virtualize,
            });
            self.desired = Size::ZERO;
            self.phase = LayoutPhase::Idle;
            return Size::ZERO;
        }

        if self.waiting_for_viewport {
            return self.estimated_desired_size(count);
        }

        if self.viewport.width() <= 0.0 || self.viewport.height() <= 0.0 {
            tracing::debug!("wrap panel viewport is empty; waiting for a viewport update");
            self.waiting_for_viewport = true;
            return self.estimated_desired_size(count);
        }

        self.phase = LayoutPhase::Measuring;
        let orientation = self.options.orientation;
        let tolerance = self.options.size_tolerance;
        self.realized
            .validate_start_u(orientation, tolerance, |c| host.desired_size(c));
        self.realized
            .validate_start_v(orientation, tolerance, |c| host.desired_size(c));

        let mut viewport = self.measure_viewport(host, count);
        if viewport.is_disjunct {
            tracing::debug!(
                anchor = viewport.anchor_index,
                first = ?self.realized.first_index(),
                last = ?self.realized.last_index(),
                "anchor outside realized window; recycling everything"
            );
            self.realized.recycle_all(&mut Recycler {
                manager: &mut self.manager,
                host: &mut *host,
                focused: &mut self.focused,
                mode: RecycleMode::Virtualize,
            });
        }

        self.realize_elements(host, available, count, &mut viewport);

        core::mem::swap(&mut self.realized, &mut self.measure_buffer);
        self.measure_buffer.reset_for_reuse();
        self.realized.debug_check_invariants();
        self.phase = LayoutPhase::Swapped;

        if let Some(kept) = &self.focused {
            host.measure(&kept.container, available);
        }

        let estimate = self.refresh_estimate(host, viewport.v_end);
        let remaining = viewport
            .last_index
            .map_or(count, |last| count - last - 1);
        let size_u = viewport.realized_end_u + estimate.extent_of(remaining);
        self.desired = orientation.size(size_u, viewport.v_end);
        self.desired
    }

    /// Arranges the realized containers into lines within `final_size`.
    pub fn arrange<H>(&mut self, host: &mut H, final_size: Size) -> Size
    where
        H: ContainerLayout<Container = C, RecycleKey = K>,
    {
        self.phase = LayoutPhase::Arranging;
        let orientation = self.options.orientation;
        let bound_v = orientation.v(final_size);
        let estimate = self.estimator.last();

        let first = self.realized.first_index();
        let mut u = self
            .realized
            .start_u()
            .unwrap_or_else(|| first.map_or(0.0, |i| estimate.estimate_u(i)));
        let mut v = self
            .realized
            .start_v()
            .unwrap_or_else(|| first.map_or(0.0, |i| estimate.estimate_v(i)));
        let mut line_u = 0.0_f64;

        for element in self.realized.iter() {
            if v > 0.0 && v + element.size_v > bound_v {
                u += line_u;
                v = 0.0;
                line_u = 0.0;
            }
            let rect = orientation.rect(u, v, element.size_u, element.size_v);
            host.arrange(element.element, rect);
            host.register_anchor_candidate(element.element);
            v += element.size_v;
            line_u = line_u.max(element.size_u);
        }

        if let Some(kept) = &self.focused {
            let u = self
                .realized
                .element_u(kept.index)
                .unwrap_or_else(|| estimate.estimate_u(kept.index));
            let v = self
                .realized
                .element_v(kept.index)
                .unwrap_or_else(|| estimate.estimate_v(kept.index));
            let size = host
                .desired_size(&kept.container)
                .unwrap_or_else(|| orientation.size(estimate.size_u, estimate.size_v));
            host.arrange(
                &kept.container,
                orientation.rect(u, v, orientation.u(size), orientation.v(size)),
            );
        }

        self.bounds = Rect::from_origin_size(Point::ZERO, final_size);
        self.phase = LayoutPhase::Idle;
        final_size
    }

    /// Patches the realized window after the items changed.
    ///
    /// `host.item_count()` must already reflect the change.
    ///
    /// # Panics
    ///
    /// Panics if `change` references indices outside the collection.
    pub fn items_changed<H>(&mut self, host: &mut H, change: ItemsChange)
    where
        H: ContainerLayout<Container = C, RecycleKey = K>,
    {
        let count = host.item_count();
        match change {
            ItemsChange::Add { index, count: added } => {
                assert!(
                    index + added <= count,
                    "inserted range {index}..{} exceeds item count {count}",
                    index + added
                );
            }
            ItemsChange::Remove { index, .. } => {
                assert!(
                    index <= count,
                    "removal at {index} is past the remaining item count {count}"
                );
            }
            ItemsChange::Replace {
                index,
                count: replaced,
            } => {
                assert!(
                    index + replaced <= count,
                    "replaced range {index}..{} exceeds item count {count}",
                    index + replaced
                );
            }
            ItemsChange::Move {
                old_index,
                new_index,
                count: moved,
            } => {
                assert!(
                    old_index + moved <= count && new_index + moved <= count,
                    "moved range exceeds item count {count}"
                );
            }
            ItemsChange::Reset => {}
        }

        self.invalidate_measure();
        tracing::trace!(?change, "wrap panel items changed");

        match change {
            ItemsChange::Add { index, count } => self.insert_items(host, index, count),
            ItemsChange::Remove { index, count } => self.remove_items(host, index, count),
            ItemsChange::Replace { index, count } => {
                self.realized.items_replaced(
                    index,
                    count,
                    &mut Recycler {
                        manager: &mut self.manager,
                        host: &mut *host,
                        focused: &mut self.focused,
                        mode: RecycleMode::ItemRemoved,
                    },
                );
                if self
                    .focused
                    .as_ref()
                    .is_some_and(|k| (index..index + count).contains(&k.index))
                {
                    self.recycle_focused(host, RecycleMode::ItemRemoved);
                }
            }
            ItemsChange::Move {
                old_index,
                new_index,
                count,
            } => {
                self.remove_items(host, old_index, count);
                self.insert_items(host, new_index, count);
            }
            ItemsChange::Reset => {
                self.realized.items_reset(&mut Recycler {
                    manager: &mut self.manager,
                    host: &mut *host,
                    focused: &mut self.focused,
                    mode: RecycleMode::ItemRemoved,
                });
                self.recycle_focused(host, RecycleMode::ItemRemoved);
                if let Some(target) = self.scroll_to.take() {
                    self.manager.recycle(
                        host,
                        target.container,
                        target.index,
                        RecycleMode::ItemRemoved,
                    );
                }
            }
        }
    }

    /// Tells the panel that keyboard focus left `container`.
    ///
    /// If `container` was kept alive outside the realized window for focus,
    /// it is recycled now.
    pub fn focus_moved_from<H>(&mut self, host: &mut H, container: &C)
    where
        H: ContainerLayout<Container = C, RecycleKey = K>,
    {
        if self
            .focused
            .as_ref()
            .is_some_and(|k| k.container == *container)
        {
            self.recycle_focused(host, RecycleMode::Virtualize);
        }
    }

    /// Brings the item at `index` into view, realizing it if necessary.
    ///
    /// Returns the container for `index`, or `None` if `index` is out of range,
    /// a scroll-into-view is already running, or no layout pass realized it.
    ///
    /// A container that is not realized yet is created, measured and put at its
    /// estimated position. The layout root then runs extra passes so that
    /// scrollable ancestors see an up-to-date extent before the final attempt
    /// to bring the container into view.
    pub fn scroll_into_view<H, R>(&mut self, index: usize, host: &mut H, root: &mut R) -> Option<C>
    where
        H: ContainerLayout<Container = C, RecycleKey = K>,
        R: LayoutRoot<H>,
    {
        if self.bringing_into_view || index >= host.item_count() {
            return None;
        }

        if let Some(container) = self.realized.element(index).cloned() {
            host.bring_into_view(&container);
            return Some(container);
        }

        self.bringing_into_view = true;
        let orientation = self.options.orientation;

        let container = self.get_or_create(host, index);
        let size = host.measure(&container, Size::new(f64::INFINITY, f64::INFINITY));
        let estimate = self.refresh_estimate(host, orientation.v_end(self.viewport));
        let u = self
            .realized
            .element_u(index)
            .unwrap_or_else(|| estimate.estimate_u(index));
        let v = self
            .realized
            .element_v(index)
            .unwrap_or_else(|| estimate.estimate_v(index));
        let rect = orientation.rect(u, v, orientation.u(size), orientation.v(size));
        host.arrange(&container, rect);
        self.scroll_to = Some(ScrollTarget {
            index,
            container: container.clone(),
            rect,
        });
        tracing::debug!(index, ?rect, "bringing unrealized item into view");

        // Items added since the last pass are outside our bounds; let the
        // ancestors pick up the new extent first.
        if !rect_contains_rect(self.bounds, rect) && !rect_contains_rect(self.viewport, rect) {
            self.waiting_for_viewport = true;
            root.execute_layout_pass(self, host);
            self.waiting_for_viewport = false;
        }

        host.bring_into_view(&container);

        self.waiting_for_viewport = !rect_contains_rect(self.viewport, rect);
        root.execute_layout_pass(self, host);

        if self.waiting_for_viewport {
            // The pass was a no-op because no new viewport arrived.
            tracing::debug!(index, "no viewport update; running another layout pass");
            self.waiting_for_viewport = false;
            self.invalidate_measure();
            root.execute_layout_pass(self, host);
        }

        // The cross-axis extent may have been stale during the first attempt.
        host.bring_into_view(&container);

        if let Some(target) = self.scroll_to.take() {
            self.manager.recycle(
                host,
                target.container,
                target.index,
                RecycleMode::ItemRemoved,
            );
        }
        self.bringing_into_view = false;

        self.realized.element(index).cloned()
    }

    /// Moves keyboard navigation from `from` in `direction` and brings the
    /// target into view.
    ///
    /// Steps along the flow direction move by one item; steps across lines
    /// move by the estimated number of items per line. With `wrap`, moving
    /// past either end continues at the other.
    pub fn navigate<H, R>(
        &mut self,
        from: Option<&C>,
        direction: NavigationDirection,
        wrap: bool,
        host: &mut H,
        root: &mut R,
    ) -> Option<C>
    where
        H: ContainerLayout<Container = C, RecycleKey = K>,
        R: LayoutRoot<H>,
    {
        enum Step {
            To(usize),
            Forward(usize),
            Backward(usize),
        }

        let count = host.item_count();
        if count == 0 {
            return None;
        }

        let per_line = self.estimator.last().elements_per_row;
        let horizontal = self.options.orientation == Orientation::Horizontal;
        let step = match direction {
            NavigationDirection::First => Step::To(0),
            NavigationDirection::Last => Step::To(count - 1),
            NavigationDirection::Next => Step::Forward(1),
            NavigationDirection::Previous => Step::Backward(1),
            NavigationDirection::Left if horizontal => Step::Backward(1),
            NavigationDirection::Right if horizontal => Step::Forward(1),
            NavigationDirection::Up if !horizontal => Step::Backward(1),
            NavigationDirection::Down if !horizontal => Step::Forward(1),
            NavigationDirection::Left | NavigationDirection::Up => Step::Backward(per_line),
            NavigationDirection::Right | NavigationDirection::Down => Step::Forward(per_line),
        };

        let from_index = from.and_then(|c| self.index_from_container(c));
        let target = match (step, from_index) {
            (Step::To(index), _) => index,
            (_, None) => return None,
            (Step::Forward(n), Some(i)) => match i.checked_add(n).filter(|&t| t < count) {
                Some(t) => t,
                None if wrap => 0,
                None => return None,
            },
            (Step::Backward(n), Some(i)) => match i.checked_sub(n) {
                Some(t) => t,
                None if wrap => count - 1,
                None => return None,
            },
        };

        if Some(target) == from_index {
            return from.cloned();
        }
        self.scroll_into_view(target, host, root)
    }

    /// Recycles everything and removes every container the panel created from the host.
    pub fn teardown<H>(&mut self, host: &mut H)
    where
        H: ContainerLayout<Container = C, RecycleKey = K>,
    {
        self.realized.recycle_all(&mut Recycler {
            manager: &mut self.manager,
            host: &mut *host,
            focused: &mut self.focused,
            mode: RecycleMode::ItemRemoved,
        });
        self.recycle_focused(host, RecycleMode::ItemRemoved);
        if let Some(target) = self.scroll_to.take() {
            self.manager
                .recycle(host, target.container, target.index, RecycleMode::ItemRemoved);
        }
        self.manager.clear(host);
        self.invalidate_measure();
        self.desired = Size::ZERO;
    }

    fn insert_items<H>(&mut self, host: &mut H, index: usize, count: usize)
    where
        H: ContainerLayout<Container = C, RecycleKey = K>,
    {
        self.realized.items_inserted(
            index,
            count,
            &mut Recycler {
                manager: &mut self.manager,
                host: &mut *host,
                focused: &mut self.focused,
                mode: RecycleMode::ItemRemoved,
            },
        );
        if let Some(kept) = self.focused.as_mut().filter(|k| k.index >= index) {
            let old_index = kept.index;
            kept.index += count;
            host.container_index_changed(&kept.container, old_index, kept.index);
        }
    }

    fn remove_items<H>(&mut self, host: &mut H, index: usize, count: usize)
    where
        H: ContainerLayout<Container = C, RecycleKey = K>,
    {
        self.realized.items_removed(
            index,
            count,
            &mut Recycler {
                manager: &mut self.manager,
                host: &mut *host,
                focused: &mut self.focused,
                mode: RecycleMode::ItemRemoved,
            },
        );
        let Some(kept_index) = self.focused.as_ref().map(|k| k.index) else {
            return;
        };
        if (index..index + count).contains(&kept_index) {
            self.recycle_focused(host, RecycleMode::ItemRemoved);
        } else if let Some(kept) = self.focused.as_mut().filter(|k| k.index >= index + count) {
            kept.index -= count;
            host.container_index_changed(&kept.container, kept_index, kept.index);
        }
    }

    fn recycle_focused<H>(&mut self, host: &mut H, mode: RecycleMode)
    where
        H: ContainerLayout<Container = C, RecycleKey = K>,
    {
        let Some(kept) = self.focused.take() else {
            return;
        };
        if let Recycled::KeptForFocus(container) =
            self.manager.recycle(host, kept.container, kept.index, mode)
        {
            // Still focused; keep holding on to it.
            self.focused = Some(KeptElement {
                index: kept.index,
                container,
            });
        }
    }

    /// Returns the container for `index`, preferring containers that already
    /// represent it: the realized one, the kept focused one, or a pending
    /// scroll-into-view target.
    fn get_or_create<H>(&mut self, host: &mut H, index: usize) -> C
    where
        H: ContainerLayout<Container = C, RecycleKey = K>,
    {
        if let Some(container) = self.realized.element(index) {
            return container.clone();
        }
        if let Some(kept) = self.focused.take_if(|k| k.index == index) {
            return kept.container;
        }
        if let Some(target) = self.scroll_to.take_if(|t| t.index == index) {
            return target.container;
        }
        self.manager.realize(host, index)
    }

    fn refresh_estimate<H>(&mut self, host: &H, cross_extent: f64) -> ElementSizeEstimate
    where
        H: ContainerLayout<Container = C, RecycleKey = K>,
    {
        let orientation = self.options.orientation;
        let sizes = self
            .realized
            .containers()
            .filter_map(|c| host.desired_size(c))
            .map(|size| (orientation.u(size), orientation.v(size)));
        self.estimator.estimate(sizes, cross_extent)
    }

    fn estimated_desired_size(&self, count: usize) -> Size {
        let orientation = self.options.orientation;
        let estimate = self.estimator.last();
        let size_v = orientation.v(self.desired);
        let size_u = match &self.scroll_to {
            Some(target) => {
                let (_, end_u) = orientation.u_range(target.rect);
                end_u + estimate.extent_of(count.saturating_sub(target.index + 1))
            }
            None => estimate.extent_of(count),
        };
        orientation.size(size_u, size_v)
    }

    fn measure_viewport<H>(&mut self, host: &H, count: usize) -> MeasureViewport
    where
        H: ContainerLayout<Container = C, RecycleKey = K>,
    {
        let orientation = self.options.orientation;
        let (u_start, u_end) = orientation.u_range(self.viewport);
        let v_end = orientation.v_end(self.viewport);

        let (anchor_index, anchor_u, anchor_v) = if let Some(target) = &self.scroll_to {
            let (u, _) = orientation.u_range(target.rect);
            let v = match orientation {
                Orientation::Horizontal => target.rect.x0,
                Orientation::Vertical => target.rect.y0,
            };
            (target.index, u, v)
        } else if u_start <= 0.0 {
            (0, 0.0, 0.0)
        } else if let Some(anchor) = self.anchor_from_realized(u_start, u_end) {
            anchor
        } else {
            let estimate = self.refresh_estimate(host, v_end);
            let index = estimate.index_at_u(u_start).min(count - 1);
            (index, estimate.estimate_u(index), estimate.estimate_v(index))
        };

        let is_disjunct = !self.realized.contains_index(anchor_index);
        MeasureViewport {
            anchor_index,
            anchor_u,
            anchor_v,
            u_start,
            u_end,
            v_end,
            measured_v: 0.0,
            realized_end_u: anchor_u,
            last_index: None,
            is_disjunct,
        }
    }

    /// Finds the start of the first realized line that reaches into the viewport.
    ///
    /// Only usable while the window's start position is stable.
    fn anchor_from_realized(&self, u_start: f64, u_end: f64) -> Option<(usize, f64, f64)> {
        self.realized.start_u()?;
        self.realized.start_v()?;
        let hit = self
            .realized
            .iter()
            .find(|e| e.u + e.size_u > u_start && e.u < u_end)?;
        let line_start = self
            .realized
            .iter()
            .find(|e| are_close(e.u, hit.u))
            .unwrap_or(hit);
        let v = if line_start.v.abs() <= LINE_START_EPSILON {
            0.0
        } else {
            line_start.v
        };
        Some((line_start.index, line_start.u, v))
    }

    fn realize_elements<H>(
        &mut self,
        host: &mut H,
        available: Size,
        count: usize,
        viewport: &mut MeasureViewport,
    ) where
        H: ContainerLayout<Container = C, RecycleKey = K>,
    {
        let orientation = self.options.orientation;
        let cross = viewport.v_end;

        self.phase = LayoutPhase::RealizingForward;
        let mut index = viewport.anchor_index;
        let mut u = viewport.anchor_u;
        let mut v = viewport.anchor_v;
        let mut line_u = 0.0_f64;
        loop {
            let container = self.get_or_create(host, index);
            let size = host.measure(&container, available);
            let (size_u, size_v) = (orientation.u(size), orientation.v(size));

            if v > LINE_START_EPSILON && v + size_v > cross {
                u += line_u;
                v = 0.0;
                line_u = 0.0;
            }
            self.measure_buffer
                .add(index, container, u, v, size_u, size_v);
            v += size_v;
            line_u = line_u.max(size_u);
            viewport.measured_v = viewport.measured_v.max(v);

            index += 1;
            if index >= count || u >= viewport.u_end {
                break;
            }
        }
        viewport.last_index = Some(index - 1);
        viewport.realized_end_u = u + line_u;

        self.realized.recycle_elements_after(
            index - 1,
            &mut Recycler {
                manager: &mut self.manager,
                host: &mut *host,
                focused: &mut self.focused,
                mode: RecycleMode::Virtualize,
            },
        );

        self.phase = LayoutPhase::RealizingBackward;
        let mut index = viewport.anchor_index;
        let mut u = viewport.anchor_u;
        let mut v = viewport.anchor_v;
        while index > 0 && (u > viewport.u_start || v > LINE_START_EPSILON) {
            index -= 1;
            let container = self.get_or_create(host, index);
            let size = host.measure(&container, available);
            let (size_u, size_v) = (orientation.u(size), orientation.v(size));

            if v - size_v < -LINE_START_EPSILON {
                // Wrap to the end of the previous line.
                u -= size_u;
                let per_line = lines_before(cross, size_v).max(1);
                v = to_f64(per_line - 1) * size_v;
            } else {
                v = (v - size_v).max(0.0);
            }
            self.measure_buffer
                .add(index, container, u, v, size_u, size_v);
        }

        self.realized.recycle_elements_before(
            index,
            &mut Recycler {
                manager: &mut self.manager,
                host: &mut *host,
                focused: &mut self.focused,
                mode: RecycleMode::Virtualize,
            },
        );

        tracing::trace!(
            first = index,
            last = ?viewport.last_index,
            anchor = viewport.anchor_index,
            "wrap panel realized elements"
        );
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kurbo::{Rect, Size};

    use super::{LayoutPhase, NavigationDirection, SnapPointsAlignment, VirtualizingWrapPanel};
    use crate::test_host::{Call, TestHost, TestRoot};
    use crate::{ItemsChange, Orientation, WrapPanelOptions};

    type Panel = VirtualizingWrapPanel<u32, &'static str>;

    const VIEWPORT: Size = Size::new(400.0, 300.0);

    fn viewport_at(offset: f64) -> Rect {
        Rect::new(0.0, offset, VIEWPORT.width, offset + VIEWPORT.height)
    }

    fn layout(panel: &mut Panel, host: &mut TestHost) -> Size {
        let desired = panel.measure(host, Size::new(VIEWPORT.width, f64::INFINITY));
        panel.arrange(host, desired);
        desired
    }

    fn realized_indices(panel: &Panel) -> Vec<usize> {
        panel.realized().iter().map(|e| e.index).collect()
    }

    /// Checks every realized container against an 8-per-line grid of 48×48 cells.
    fn assert_on_grid(panel: &Panel, host: &TestHost) {
        for e in panel.realized().iter() {
            let x = 48.0 * (e.index % 8) as f64;
            let y = 48.0 * (e.index / 8) as f64;
            assert_eq!(
                host.arranged(*e.element),
                Some(Rect::new(x, y, x + 48.0, y + 48.0)),
                "index {} is off the grid",
                e.index
            );
        }
    }

    #[test]
    fn first_pass_fills_viewport_with_one_line_of_overscan() {
        let mut host = TestHost::grid(1000, 48.0, 48.0);
        let mut panel = Panel::default();
        assert!(panel.set_effective_viewport(viewport_at(0.0)));
        let desired = layout(&mut panel, &mut host);

        assert_eq!(panel.first_realized_index(), Some(0));
        // Lines at 0..=288 fill the viewport; 56 starts the overscan line.
        assert_eq!(panel.last_realized_index(), Some(56));
        assert_eq!(panel.estimate().elements_per_row, 8);
        assert_eq!(desired.width, 400.0);
        assert!(desired.height >= 125.0 * 48.0, "extent must cover every line");
        assert_eq!(host.arranged_at(9), Some(Rect::new(48.0, 48.0, 96.0, 96.0)));
        assert!(panel.is_measure_valid());
        assert_eq!(panel.phase(), LayoutPhase::Idle);
    }

    #[test]
    fn scrolling_to_offset_anchors_on_estimated_line() {
        let mut host = TestHost::grid(1000, 48.0, 48.0);
        let mut panel = Panel::default();
        panel.set_effective_viewport(viewport_at(0.0));
        layout(&mut panel, &mut host);
        let created = host.created();

        assert!(panel.set_effective_viewport(viewport_at(960.0)));
        layout(&mut panel, &mut host);

        let first = panel.first_realized_index().unwrap();
        let last = panel.last_realized_index().unwrap();
        assert!(first <= 160 && 160 <= last, "window {first}..={last} must contain 160");
        assert_eq!(first, 160);
        assert_eq!(last, 216);
        assert_eq!(host.created(), created, "disjunct reset must reuse pooled containers");
        assert_eq!(host.arranged_at(160).map(|r| r.y0), Some(960.0));
        assert!(panel.container_manager().pool().is_empty());
    }

    #[test]
    fn remeasure_is_idempotent() {
        let mut host = TestHost::grid(100, 48.0, 48.0);
        let mut panel = Panel::default();
        panel.set_effective_viewport(viewport_at(0.0));
        layout(&mut panel, &mut host);
        let before: Vec<u32> = panel.realized_containers().copied().collect();
        let prepares = host.count_calls(|c| matches!(c, Call::Prepare(..)));

        layout(&mut panel, &mut host);
        let after: Vec<u32> = panel.realized_containers().copied().collect();
        assert_eq!(before, after, "realizing an already realized index must reuse it");
        assert_eq!(
            host.count_calls(|c| matches!(c, Call::Prepare(..))),
            prepares,
            "no container may be re-prepared"
        );
    }

    #[test]
    fn small_scroll_shifts_window_incrementally() {
        let mut host = TestHost::grid(1000, 48.0, 48.0);
        let mut panel = Panel::default();
        panel.set_effective_viewport(viewport_at(0.0));
        layout(&mut panel, &mut host);
        let kept = *panel.container_from_index(20).unwrap();

        panel.set_effective_viewport(viewport_at(100.0));
        layout(&mut panel, &mut host);
        // 100 falls on the third line, which starts at index 16.
        assert_eq!(panel.first_realized_index(), Some(16));
        assert_eq!(panel.container_from_index(20), Some(&kept));
        assert_eq!(panel.index_from_container(&kept), Some(20));
        assert!(panel.container_from_index(0).is_none());
        assert_eq!(panel.container_manager().pool().len(), 16);
    }

    #[test]
    fn scrolling_back_realizes_backward_from_anchor() {
        let mut host = TestHost::grid(1000, 48.0, 48.0);
        let mut panel = Panel::default();
        panel.set_effective_viewport(viewport_at(0.0));
        layout(&mut panel, &mut host);
        panel.set_effective_viewport(viewport_at(960.0));
        layout(&mut panel, &mut host);

        panel.set_effective_viewport(viewport_at(900.0));
        layout(&mut panel, &mut host);
        // 900 lies on line 18 (864..912), which starts at index 144.
        assert_eq!(panel.first_realized_index(), Some(144));
        assert!(panel.last_realized_index().unwrap() >= 200);
        panel.realized().debug_check_invariants();
    }

    #[test]
    fn zero_items_realize_nothing() {
        let mut host = TestHost::grid(0, 48.0, 48.0);
        let mut panel = Panel::default();
        panel.set_effective_viewport(viewport_at(0.0));
        assert_eq!(layout(&mut panel, &mut host), Size::ZERO);
        assert!(panel.realized().is_empty());
        assert_eq!(host.created(), 0);
    }

    #[test]
    fn empty_viewport_suspends_until_update() {
        let mut host = TestHost::grid(100, 48.0, 48.0);
        let mut panel = Panel::default();
        let desired = panel.measure(&mut host, VIEWPORT);
        assert!(desired.height > 0.0, "suspended measure still reports an estimate");
        assert!(panel.realized().is_empty());

        // A zero-sized update suspends the next pass again.
        panel.set_effective_viewport(Rect::ZERO);
        panel.measure(&mut host, VIEWPORT);
        assert!(panel.realized().is_empty());
        assert_eq!(host.created(), 0);

        assert!(panel.set_effective_viewport(viewport_at(0.0)));
        layout(&mut panel, &mut host);
        assert!(!panel.realized().is_empty());
    }

    #[test]
    fn viewport_change_detection() {
        let mut panel = Panel::default();
        assert!(panel.set_effective_viewport(viewport_at(10.0)));
        let mut host = TestHost::grid(10, 48.0, 48.0);
        layout(&mut panel, &mut host);
        // Only the U range matters for invalidation.
        assert!(!panel.set_effective_viewport(Rect::new(0.0, 10.0, 380.0, 310.0)));
        assert!(panel.is_measure_valid());
        assert!(panel.set_effective_viewport(viewport_at(11.0)));
        assert!(!panel.is_measure_valid());
    }

    #[test]
    fn remove_inside_window_recycles_and_reindexes() {
        let mut host = TestHost::grid(100, 48.0, 48.0);
        let mut panel = Panel::default();
        panel.set_effective_viewport(viewport_at(0.0));
        layout(&mut panel, &mut host);
        let survivor = *panel.container_from_index(15).unwrap();

        host.remove(5, 5);
        panel.items_changed(&mut host, ItemsChange::Remove { index: 5, count: 5 });
        assert!(!panel.is_measure_valid());
        assert_eq!(panel.last_realized_index(), Some(51));
        assert_eq!(panel.container_from_index(10), Some(&survivor));
        assert!(host.calls().contains(&Call::IndexChanged(survivor, 15, 10)));
        assert_eq!(panel.container_manager().pool().len(), 5);

        layout(&mut panel, &mut host);
        assert_eq!(panel.last_realized_index(), Some(56));
        panel.realized().debug_check_invariants();
    }

    #[test]
    fn insert_inside_window_then_scroll_stays_on_grid() {
        let mut host = TestHost::grid(1000, 48.0, 48.0);
        let mut panel = Panel::default();
        panel.set_effective_viewport(viewport_at(0.0));
        layout(&mut panel, &mut host);

        host.insert(5, 3);
        panel.items_changed(&mut host, ItemsChange::Add { index: 5, count: 3 });
        assert_eq!(panel.realized().start_u(), None);

        panel.set_effective_viewport(viewport_at(100.0));
        layout(&mut panel, &mut host);
        assert_eq!(panel.first_realized_index(), Some(16));
        assert_eq!(host.arranged_at(19), Some(Rect::new(144.0, 96.0, 192.0, 144.0)));
        assert_on_grid(&panel, &host);
    }

    #[test]
    fn remove_inside_window_then_scroll_stays_on_grid() {
        let mut host = TestHost::grid(1000, 48.0, 48.0);
        let mut panel = Panel::default();
        panel.set_effective_viewport(viewport_at(0.0));
        layout(&mut panel, &mut host);

        host.remove(5, 5);
        panel.items_changed(&mut host, ItemsChange::Remove { index: 5, count: 5 });

        panel.set_effective_viewport(viewport_at(100.0));
        layout(&mut panel, &mut host);
        assert_eq!(panel.first_realized_index(), Some(16));
        assert_on_grid(&panel, &host);
    }

    #[test]
    fn remove_straddling_window_end_refills_on_remeasure() {
        let mut host = TestHost::grid(100, 48.0, 48.0);
        let mut panel = Panel::default();
        panel.set_effective_viewport(viewport_at(0.0));
        layout(&mut panel, &mut host);
        let created = host.created();

        host.remove(50, 20);
        panel.items_changed(&mut host, ItemsChange::Remove { index: 50, count: 20 });
        assert_eq!(panel.last_realized_index(), Some(49));
        assert_eq!(panel.realized().start_u(), Some(0.0), "nothing realized moved");
        assert_eq!(panel.container_manager().pool().len(), 7);

        layout(&mut panel, &mut host);
        assert_eq!(realized_indices(&panel), (0..=56).collect::<Vec<_>>());
        assert_eq!(host.created(), created, "refill must reuse the removed containers");
        assert!(panel.container_manager().pool().is_empty());
        assert_eq!(host.arranged_at(53), Some(Rect::new(240.0, 288.0, 288.0, 336.0)));
        assert_on_grid(&panel, &host);
    }

    #[test]
    fn resized_items_anchor_on_estimate() {
        let mut host = TestHost::grid(1000, 48.0, 48.0);
        let mut panel = Panel::default();
        panel.set_effective_viewport(viewport_at(0.0));
        layout(&mut panel, &mut host);

        // Lines grow to 60 px, so the cached 48 px positions are stale.
        host.resize_items(Size::new(48.0, 60.0));
        panel.set_effective_viewport(viewport_at(100.0));
        layout(&mut panel, &mut host);

        // 100 lies on the second 60 px line, which starts at index 8.
        assert_eq!(panel.first_realized_index(), Some(8));
        assert_eq!(host.arranged_at(8), Some(Rect::new(0.0, 60.0, 48.0, 120.0)));
        assert_eq!(panel.realized().start_u(), Some(60.0));
        assert_eq!(panel.estimate().size_u, 60.0);
    }

    #[test]
    fn insert_before_window_destabilizes_start() {
        let mut host = TestHost::grid(1000, 48.0, 48.0);
        let mut panel = Panel::default();
        panel.set_effective_viewport(viewport_at(0.0));
        layout(&mut panel, &mut host);
        panel.set_effective_viewport(viewport_at(960.0));
        layout(&mut panel, &mut host);

        host.insert(0, 5);
        panel.items_changed(&mut host, ItemsChange::Add { index: 0, count: 5 });
        assert_eq!(panel.first_realized_index(), Some(165));
        assert_eq!(panel.realized().start_u(), None);

        layout(&mut panel, &mut host);
        let first = panel.first_realized_index().unwrap();
        assert!(first <= 165, "window must be rebuilt around the viewport");
        assert!(panel.realized().start_u().is_some());
    }

    #[test]
    fn replace_and_reset_recycle_affected_containers() {
        let mut host = TestHost::grid(50, 48.0, 48.0);
        let mut panel = Panel::default();
        panel.set_effective_viewport(viewport_at(0.0));
        layout(&mut panel, &mut host);
        let replaced = *panel.container_from_index(3).unwrap();

        panel.items_changed(&mut host, ItemsChange::Replace { index: 3, count: 1 });
        assert!(panel.container_from_index(3).is_none());
        assert_eq!(host.bound_item(replaced), None);

        layout(&mut panel, &mut host);
        assert!(panel.container_from_index(3).is_some());

        panel.items_changed(&mut host, ItemsChange::Reset);
        assert!(panel.realized().is_empty());
        assert_eq!(panel.container_manager().pool().len(), host.created());
    }

    #[test]
    fn move_is_remove_then_insert() {
        let mut host = TestHost::grid(50, 48.0, 48.0);
        let mut panel = Panel::default();
        panel.set_effective_viewport(viewport_at(0.0));
        layout(&mut panel, &mut host);
        let moved = *panel.container_from_index(2).unwrap();

        panel.items_changed(
            &mut host,
            ItemsChange::Move {
                old_index: 2,
                new_index: 10,
                count: 1,
            },
        );
        assert_eq!(host.bound_item(moved), None, "moved item's container is recycled");
        assert!(panel.container_from_index(10).is_none());
        panel.realized().debug_check_invariants();
    }

    #[test]
    #[should_panic(expected = "exceeds item count")]
    fn inconsistent_change_panics() {
        let mut host = TestHost::grid(10, 48.0, 48.0);
        let mut panel = Panel::default();
        panel.items_changed(&mut host, ItemsChange::Add { index: 8, count: 5 });
    }

    #[test]
    fn focused_container_survives_scrolling_away() {
        let mut host = TestHost::grid(1000, 48.0, 48.0);
        let mut panel = Panel::default();
        panel.set_effective_viewport(viewport_at(0.0));
        layout(&mut panel, &mut host);
        let focused = *panel.container_from_index(3).unwrap();
        host.set_focus(Some(focused));

        panel.set_effective_viewport(viewport_at(960.0));
        layout(&mut panel, &mut host);
        assert_eq!(panel.focused(), Some((3, &focused)));
        assert_eq!(panel.container_from_index(3), Some(&focused));
        assert!(host.is_visible(focused));
        assert_eq!(host.arranged(focused), Some(Rect::new(144.0, 0.0, 192.0, 48.0)));

        host.insert(0, 2);
        panel.items_changed(&mut host, ItemsChange::Add { index: 0, count: 2 });
        assert_eq!(panel.focused(), Some((5, &focused)));

        host.set_focus(None);
        panel.focus_moved_from(&mut host, &focused);
        assert_eq!(panel.focused(), None);
        assert_eq!(host.bound_item(focused), None);
    }

    #[test]
    fn focused_container_is_reused_when_scrolled_back() {
        let mut host = TestHost::grid(1000, 48.0, 48.0);
        let mut panel = Panel::default();
        panel.set_effective_viewport(viewport_at(0.0));
        layout(&mut panel, &mut host);
        let focused = *panel.container_from_index(3).unwrap();
        host.set_focus(Some(focused));
        panel.set_effective_viewport(viewport_at(960.0));
        layout(&mut panel, &mut host);

        panel.set_effective_viewport(viewport_at(0.0));
        layout(&mut panel, &mut host);
        assert_eq!(panel.focused(), None);
        assert_eq!(panel.container_from_index(3), Some(&focused));
    }

    #[test]
    fn scroll_into_view_of_realized_item_is_direct() {
        let mut host = TestHost::grid(100, 48.0, 48.0);
        let mut root = TestRoot::new(VIEWPORT);
        let mut panel = Panel::default();
        panel.set_effective_viewport(viewport_at(0.0));
        layout(&mut panel, &mut host);

        let c = panel.scroll_into_view(9, &mut host, &mut root);
        assert_eq!(c.as_ref(), panel.container_from_index(9));
        assert_eq!(root.passes(), 0);
        assert_eq!(host.brought_into_view(), c.as_slice());
    }

    #[test]
    fn scroll_into_view_realizes_distant_item() {
        let mut host = TestHost::grid(1000, 48.0, 48.0);
        let mut root = TestRoot::new(VIEWPORT);
        let mut panel = Panel::default();
        panel.set_effective_viewport(viewport_at(0.0));
        layout(&mut panel, &mut host);

        let c = panel
            .scroll_into_view(500, &mut host, &mut root)
            .expect("item must be realized");
        assert_eq!(panel.index_from_container(&c), Some(500));
        assert!(root.passes() >= 1);
        assert!(
            !panel.realized().contains_index(0),
            "the old window must be recycled"
        );
        let rect = host.arranged(c).unwrap();
        assert!(panel.viewport().contains(rect.center()));
        assert_eq!(host.brought_into_view().last(), Some(&c));
        assert!(panel.container_from_index(500).is_some());
        assert_eq!(panel.phase(), LayoutPhase::Idle);
    }

    #[test]
    fn scroll_into_view_without_viewport_update_forces_a_pass() {
        let mut host = TestHost::grid(1000, 48.0, 48.0);
        let mut root = TestRoot::frozen(VIEWPORT);
        let mut panel = Panel::default();
        panel.set_effective_viewport(viewport_at(0.0));
        layout(&mut panel, &mut host);

        let c = panel
            .scroll_into_view(500, &mut host, &mut root)
            .expect("the forced pass must realize the target");
        // One pass that the root ignored, one forced remeasure.
        assert_eq!(root.passes(), 2);
        assert_eq!(panel.index_from_container(&c), Some(500));
        assert_eq!(panel.viewport(), viewport_at(0.0));
        assert_eq!(host.arranged(c).map(|r| r.y0), Some(2976.0));
        assert!(panel.is_measure_valid());
        assert_eq!(panel.phase(), LayoutPhase::Idle);
        panel.realized().debug_check_invariants();

        // The guard is released, so a second request is served.
        assert!(panel.scroll_into_view(0, &mut host, &mut root).is_some());
    }

    #[test]
    fn scroll_into_view_rejects_out_of_range() {
        let mut host = TestHost::grid(10, 48.0, 48.0);
        let mut root = TestRoot::new(VIEWPORT);
        let mut panel = Panel::default();
        assert_eq!(panel.scroll_into_view(10, &mut host, &mut root), None);
    }

    #[test]
    fn navigation_steps_and_wraps() {
        let mut host = TestHost::grid(100, 48.0, 48.0);
        let mut root = TestRoot::new(VIEWPORT);
        let mut panel = Panel::default();
        panel.set_effective_viewport(viewport_at(0.0));
        layout(&mut panel, &mut host);

        let first = panel
            .navigate(None, NavigationDirection::First, false, &mut host, &mut root)
            .unwrap();
        assert_eq!(panel.index_from_container(&first), Some(0));

        let right = panel
            .navigate(Some(&first), NavigationDirection::Right, false, &mut host, &mut root)
            .unwrap();
        assert_eq!(panel.index_from_container(&right), Some(1));

        let down = panel
            .navigate(Some(&right), NavigationDirection::Down, false, &mut host, &mut root)
            .unwrap();
        assert_eq!(panel.index_from_container(&down), Some(9));

        assert_eq!(
            panel.navigate(Some(&first), NavigationDirection::Previous, false, &mut host, &mut root),
            None
        );
        let wrapped = panel
            .navigate(Some(&first), NavigationDirection::Previous, true, &mut host, &mut root)
            .unwrap();
        assert_eq!(panel.index_from_container(&wrapped), Some(99));

        assert_eq!(
            panel.navigate(None, NavigationDirection::Next, false, &mut host, &mut root),
            None,
            "relative moves need a starting container"
        );
    }

    #[test]
    fn vertical_orientation_scrolls_along_x() {
        let mut host = TestHost::grid(1000, 48.0, 48.0);
        let mut panel = Panel::new(WrapPanelOptions::default().with_orientation(Orientation::Vertical));
        // Items flow down 300 px columns: six per column.
        panel.set_effective_viewport(Rect::new(0.0, 0.0, 400.0, 300.0));
        let desired = panel.measure(&mut host, Size::new(f64::INFINITY, 300.0));
        panel.arrange(&mut host, desired);
        assert_eq!(panel.estimate().elements_per_row, 6);
        assert_eq!(desired.height, 300.0);
        assert_eq!(host.arranged_at(7), Some(Rect::new(48.0, 48.0, 96.0, 96.0)));
    }

    #[test]
    fn set_orientation_recycles_everything() {
        let mut host = TestHost::grid(100, 48.0, 48.0);
        let mut panel = Panel::default();
        panel.set_effective_viewport(viewport_at(0.0));
        layout(&mut panel, &mut host);
        panel.set_orientation(&mut host, Orientation::Vertical);
        assert!(panel.realized().is_empty());
        assert!(!panel.is_measure_valid());
        assert_eq!(panel.estimate().elements_per_row, 1);
    }

    #[test]
    fn teardown_removes_all_children() {
        let mut host = TestHost::grid(1000, 48.0, 48.0);
        let mut panel = Panel::default();
        panel.set_effective_viewport(viewport_at(0.0));
        layout(&mut panel, &mut host);
        panel.set_effective_viewport(viewport_at(2000.0));
        layout(&mut panel, &mut host);

        panel.teardown(&mut host);
        assert_eq!(host.child_count(), 0);
        assert!(panel.container_manager().pool().is_empty());
    }

    #[test]
    fn snap_points_follow_realized_lines() {
        let mut host = TestHost::grid(1000, 48.0, 48.0);
        let mut panel = Panel::default();
        assert!(panel.irregular_snap_points(SnapPointsAlignment::Near).is_empty());
        panel.set_effective_viewport(viewport_at(0.0));
        layout(&mut panel, &mut host);
        panel.set_effective_viewport(viewport_at(100.0));
        layout(&mut panel, &mut host);

        assert!(!panel.are_snap_points_regular());
        assert_eq!(panel.regular_snap_points(SnapPointsAlignment::Near), None);

        let near = panel.irregular_snap_points(SnapPointsAlignment::Near);
        assert_eq!(near.len(), 8);
        assert_eq!(near[..2], [96.0, 144.0]);
        assert_eq!(near.last(), Some(&432.0));
        let far = panel.irregular_snap_points(SnapPointsAlignment::Far);
        assert_eq!(far.first(), Some(&144.0));
    }

    #[test]
    fn regular_snap_points_use_line_extent() {
        let mut host = TestHost::grid(1000, 48.0, 48.0);
        let mut panel = Panel::new(WrapPanelOptions::default().with_regular_snap_points(true));
        panel.set_effective_viewport(viewport_at(0.0));
        layout(&mut panel, &mut host);

        assert!(panel.are_snap_points_regular());
        assert_eq!(
            panel.regular_snap_points(SnapPointsAlignment::Near),
            Some((48.0, 0.0))
        );
        assert_eq!(
            panel.regular_snap_points(SnapPointsAlignment::Center),
            Some((48.0, 24.0))
        );
    }

    #[test]
    fn pool_limit_bounds_detached_containers() {
        let mut host = TestHost::grid(1000, 48.0, 48.0);
        let mut panel = Panel::new(WrapPanelOptions::default().with_recycle_pool_limit(4));
        panel.set_effective_viewport(viewport_at(0.0));
        layout(&mut panel, &mut host);
        panel.items_changed(&mut host, ItemsChange::Reset);
        assert_eq!(panel.container_manager().pool().len(), 4);
        assert_eq!(host.child_count(), 4);
    }
}
