// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contiguous window of realized containers, indexed by source position.

use alloc::vec::Vec;

use kurbo::Size;

use crate::Orientation;

/// Default tolerance used when comparing cached and current sizes.
pub const SIZE_TOLERANCE: f64 = 0.01;

/// Receives containers leaving a [`RealizedWrappedElements`] window and index updates.
///
/// A single trait object is used for both so that one host borrow can serve
/// recycling and reindexing within the same operation.
pub trait ElementCallbacks<C> {
    /// Called for each container removed from the window. `index` is the
    /// source index the container was realized for.
    fn recycle(&mut self, element: C, index: usize);

    /// Called when a realized container's source index changes because items
    /// were inserted or removed before it.
    fn index_changed(&mut self, element: &C, old_index: usize, new_index: usize) {
        let _ = (element, old_index, new_index);
    }
}

#[derive(Debug, Clone)]
struct Slot<C> {
    element: Option<C>,
    u: f64,
    v: f64,
    size_u: f64,
    size_v: f64,
}

impl<C> Slot<C> {
    const fn empty() -> Self {
        Self {
            element: None,
            u: f64::NAN,
            v: f64::NAN,
            size_u: f64::NAN,
            size_v: f64::NAN,
        }
    }
}

/// A realized element as seen through [`RealizedWrappedElements::iter`].
#[derive(Debug, Clone, Copy)]
pub struct RealizedElement<'a, C> {
    /// Source index of the element.
    pub index: usize,
    /// The container.
    pub element: &'a C,
    /// U position recorded when the element was added.
    pub u: f64,
    /// V position recorded when the element was added.
    pub v: f64,
    /// Size on the U axis recorded when the element was added.
    pub size_u: f64,
    /// Size on the V axis recorded when the element was added.
    pub size_v: f64,
}

/// Stores the realized element state for a panel that lays its children out in
/// lines, wrapping when a line reaches the cross-axis bound.
///
/// The window covers a contiguous run of source indices `first..=last`. Slots
/// can be empty after items are inserted into the middle of the window or
/// replaced; empty slots have unknown sizes.
///
/// The start position of the first element ([`start_u`](Self::start_u) /
/// [`start_v`](Self::start_v)) is only trustworthy while no collection change
/// or size change has invalidated it. Once invalidated it reads as `None`
/// until the window is rebuilt.
#[derive(Debug, Clone)]
pub struct RealizedWrappedElements<C> {
    first_index: usize,
    slots: Vec<Slot<C>>,
    start_u: f64,
    start_v: f64,
    start_u_unstable: bool,
    start_v_unstable: bool,
}

impl<C> Default for RealizedWrappedElements<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> RealizedWrappedElements<C> {
    /// Creates an empty window.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            first_index: 0,
            slots: Vec::new(),
            start_u: 0.0,
            start_v: 0.0,
            start_u_unstable: false,
            start_v_unstable: false,
        }
    }

    /// Number of slots in the window, including empty ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if nothing is realized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Source index of the first slot, if any.
    #[must_use]
    pub fn first_index(&self) -> Option<usize> {
        (!self.slots.is_empty()).then_some(self.first_index)
    }

    /// Source index of the last slot, if any.
    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        (!self.slots.is_empty()).then(|| self.first_index + self.slots.len() - 1)
    }

    /// Returns `true` if `index` lies within `first..=last`.
    #[must_use]
    pub fn contains_index(&self, index: usize) -> bool {
        !self.slots.is_empty()
            && index >= self.first_index
            && index - self.first_index < self.slots.len()
    }

    /// U position of the first element, or `None` while it is unstable.
    #[must_use]
    pub fn start_u(&self) -> Option<f64> {
        (!self.start_u_unstable).then_some(self.start_u)
    }

    /// V position of the first element, or `None` while it is unstable.
    #[must_use]
    pub fn start_v(&self) -> Option<f64> {
        (!self.start_v_unstable).then_some(self.start_v)
    }

    /// Adds a newly realized element at the edge of the window.
    ///
    /// `u`/`v` are the element's position and `size_u`/`size_v` its measured
    /// size. Adding to an empty window initializes it at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the window is not empty and `index` is neither `last + 1` nor
    /// `first - 1`: elements can only be added at the edges.
    pub fn add(&mut self, index: usize, element: C, u: f64, v: f64, size_u: f64, size_v: f64) {
        let slot = Slot {
            element: Some(element),
            u,
            v,
            size_u,
            size_v,
        };

        if self.slots.is_empty() {
            self.slots.push(slot);
            self.first_index = index;
            self.start_u = u;
            self.start_v = v;
        } else if Some(index) == self.last_index().map(|last| last + 1) {
            self.slots.push(slot);
        } else if index + 1 == self.first_index {
            self.slots.insert(0, slot);
            self.first_index = index;
            self.start_u = u;
            self.start_v = v;
        } else {
            panic!(
                "can only add realized elements at the edges: index {index} is not adjacent to {}..={}",
                self.first_index,
                self.first_index + self.slots.len() - 1
            );
        }
    }

    fn offset_of(&self, index: usize) -> Option<usize> {
        self.contains_index(index).then(|| index - self.first_index)
    }

    /// Returns the element realized for `index`, if any.
    #[must_use]
    pub fn element(&self, index: usize) -> Option<&C> {
        self.offset_of(index)
            .and_then(|i| self.slots[i].element.as_ref())
    }

    /// U position of the element realized for `index`.
    ///
    /// Returns `None` if `index` is outside the window, its slot is empty, or
    /// the start position is unstable.
    #[must_use]
    pub fn element_u(&self, index: usize) -> Option<f64> {
        if self.start_u_unstable {
            return None;
        }
        let slot = &self.slots[self.offset_of(index)?];
        slot.element.as_ref().map(|_| slot.u)
    }

    /// V position of the element realized for `index`.
    ///
    /// Returns `None` under the same conditions as [`element_u`](Self::element_u),
    /// using the V start's stability.
    #[must_use]
    pub fn element_v(&self, index: usize) -> Option<f64> {
        if self.start_v_unstable {
            return None;
        }
        let slot = &self.slots[self.offset_of(index)?];
        slot.element.as_ref().map(|_| slot.v)
    }

    /// Cached `(size_u, size_v)` for `index`, if its slot holds an element.
    #[must_use]
    pub fn element_size(&self, index: usize) -> Option<(f64, f64)> {
        let slot = &self.slots[self.offset_of(index)?];
        slot.element.as_ref().map(|_| (slot.size_u, slot.size_v))
    }

    /// Iterates realized (non-empty) slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = RealizedElement<'_, C>> + '_ {
        let first = self.first_index;
        self.slots.iter().enumerate().filter_map(move |(i, slot)| {
            slot.element.as_ref().map(|element| RealizedElement {
                index: first + i,
                element,
                u: slot.u,
                v: slot.v,
                size_u: slot.size_u,
                size_v: slot.size_v,
            })
        })
    }

    /// Iterates the realized containers in index order.
    pub fn containers(&self) -> impl Iterator<Item = &C> + '_ {
        self.slots.iter().filter_map(|slot| slot.element.as_ref())
    }

    /// Source index of `element`, if it is realized in this window.
    #[must_use]
    pub fn index_of(&self, element: &C) -> Option<usize>
    where
        C: PartialEq,
    {
        self.slots
            .iter()
            .position(|slot| slot.element.as_ref() == Some(element))
            .map(|i| i + self.first_index)
    }

    /// Updates the window after `count` items were inserted at `index`.
    ///
    /// Insertion before the first index shifts the whole window. Insertion
    /// at or inside it opens `count` empty slots, whose sizes are unknown.
    /// Either way the cached positions no longer describe a packed layout, so
    /// the start position becomes unstable. Every element at or after the
    /// insertion point is reported through [`ElementCallbacks::index_changed`].
    pub fn items_inserted(
        &mut self,
        index: usize,
        count: usize,
        callbacks: &mut dyn ElementCallbacks<C>,
    ) {
        if self.slots.is_empty() || count == 0 {
            return;
        }

        let first = self.first_index;
        if index >= first + self.slots.len() {
            // Appended after the window; nothing realized moves.
            return;
        }

        let start = index.saturating_sub(first);
        for (i, slot) in self.slots.iter().enumerate().skip(start) {
            if let Some(element) = &slot.element {
                let old_index = first + i;
                callbacks.index_changed(element, old_index, old_index + count);
            }
        }

        if index < first {
            self.first_index += count;
        } else {
            let at = index - first;
            self.slots
                .splice(at..at, core::iter::repeat_with(Slot::empty).take(count));
        }
        self.start_u_unstable = true;
        self.start_v_unstable = true;
    }

    /// Updates the window after `count` items were removed starting at `index`.
    ///
    /// Elements realized for removed items are passed to
    /// [`ElementCallbacks::recycle`]; elements after the removed range are
    /// reindexed. The start position stays stable only when no surviving
    /// element moves.
    pub fn items_removed(
        &mut self,
        index: usize,
        count: usize,
        callbacks: &mut dyn ElementCallbacks<C>,
    ) {
        if self.slots.is_empty() || count == 0 {
            return;
        }

        let first = self.first_index;
        let len = self.slots.len();
        let end = index + count;

        if end <= first {
            // Removed range lies entirely before the window.
            self.first_index -= count;
            self.start_u_unstable = true;
            self.start_v_unstable = true;
            let new_first = self.first_index;
            for (i, slot) in self.slots.iter().enumerate() {
                if let Some(element) = &slot.element {
                    callbacks.index_changed(element, new_first + i + count, new_first + i);
                }
            }
            return;
        }

        if index >= first + len {
            // Removed range lies entirely after the window.
            return;
        }

        let start = index.saturating_sub(first);
        let stop = (end - first).min(len);
        for (i, slot) in self.slots.drain(start..stop).enumerate() {
            if let Some(element) = slot.element {
                callbacks.recycle(element, first + start + i);
            }
        }

        if self.slots.is_empty() {
            self.reset_positions();
            return;
        }

        if index <= first {
            // The old first element is gone; its position no longer anchors the window.
            self.first_index = index;
            self.start_u_unstable = true;
            self.start_v_unstable = true;
        } else if start < self.slots.len() {
            // Survivors moved up into the gap and still carry their old positions.
            self.start_u_unstable = true;
            self.start_v_unstable = true;
        }

        let new_first = self.first_index;
        for (i, slot) in self.slots.iter().enumerate().skip(start) {
            if let Some(element) = &slot.element {
                let new_index = new_first + i;
                callbacks.index_changed(element, new_index + count, new_index);
            }
        }
    }

    /// Updates the window after `count` items starting at `index` were replaced.
    ///
    /// Affected elements are recycled and their slots left empty.
    pub fn items_replaced(
        &mut self,
        index: usize,
        count: usize,
        callbacks: &mut dyn ElementCallbacks<C>,
    ) {
        if self.slots.is_empty() || count == 0 {
            return;
        }

        let first = self.first_index;
        let len = self.slots.len();
        let end = index + count;
        if end <= first || index >= first + len {
            return;
        }

        let start = index.saturating_sub(first);
        let stop = (end - first).min(len);
        for i in start..stop {
            let replaced = core::mem::replace(&mut self.slots[i], Slot::empty());
            if let Some(element) = replaced.element {
                callbacks.recycle(element, first + i);
            }
        }
    }

    /// Recycles every element in response to the source collection being reset.
    pub fn items_reset(&mut self, callbacks: &mut dyn ElementCallbacks<C>) {
        self.recycle_all(callbacks);
    }

    /// Recycles elements before `index`, which becomes the new first index.
    ///
    /// If `index` is past the end of the window, everything is recycled.
    pub fn recycle_elements_before(
        &mut self,
        index: usize,
        callbacks: &mut dyn ElementCallbacks<C>,
    ) {
        if self.slots.is_empty() || index <= self.first_index {
            return;
        }
        if index >= self.first_index + self.slots.len() {
            self.recycle_all(callbacks);
            return;
        }

        let first = self.first_index;
        let stop = index - first;
        for (i, slot) in self.slots.drain(..stop).enumerate() {
            if let Some(element) = slot.element {
                callbacks.recycle(element, first + i);
            }
        }
        self.first_index = index;
    }

    /// Recycles elements after `index`, which becomes the new last index.
    ///
    /// If `index` is before the start of the window, everything is recycled.
    pub fn recycle_elements_after(
        &mut self,
        index: usize,
        callbacks: &mut dyn ElementCallbacks<C>,
    ) {
        let Some(last) = self.last_index() else {
            return;
        };
        if index >= last {
            return;
        }
        if index < self.first_index {
            self.recycle_all(callbacks);
            return;
        }

        let first = self.first_index;
        let start = index + 1 - first;
        for (i, slot) in self.slots.drain(start..).enumerate() {
            if let Some(element) = slot.element {
                callbacks.recycle(element, first + start + i);
            }
        }
    }

    /// Recycles every realized element and empties the window.
    pub fn recycle_all(&mut self, callbacks: &mut dyn ElementCallbacks<C>) {
        let first = self.first_index;
        for (i, slot) in self.slots.drain(..).enumerate() {
            if let Some(element) = slot.element {
                callbacks.recycle(element, first + i);
            }
        }
        self.reset_positions();
    }

    /// Empties the window without recycling, so it can be reused as a fresh buffer.
    ///
    /// This is used after a measure pass swaps buffers: every element the old
    /// buffer still references is now owned by the new one.
    pub fn reset_for_reuse(&mut self) {
        self.slots.clear();
        self.reset_positions();
        self.start_u_unstable = false;
        self.start_v_unstable = false;
    }

    fn reset_positions(&mut self) {
        self.first_index = 0;
        self.start_u = 0.0;
        self.start_v = 0.0;
    }

    /// Marks the U start unstable if any element's current U size differs from
    /// the cached one by more than `tolerance`.
    ///
    /// `current_size` reports an element's current desired size, or `None` if
    /// it has not been measured; unmeasured elements are skipped.
    pub fn validate_start_u(
        &mut self,
        orientation: Orientation,
        tolerance: f64,
        mut current_size: impl FnMut(&C) -> Option<Size>,
    ) {
        if self.start_u_unstable {
            return;
        }
        let changed = self.slots.iter().any(|slot| {
            slot.element
                .as_ref()
                .and_then(&mut current_size)
                .is_some_and(|size| (orientation.u(size) - slot.size_u).abs() > tolerance)
        });
        if changed {
            self.start_u_unstable = true;
        }
    }

    /// Marks the V start unstable if any element's current V size differs from
    /// the cached one by more than `tolerance`.
    pub fn validate_start_v(
        &mut self,
        orientation: Orientation,
        tolerance: f64,
        mut current_size: impl FnMut(&C) -> Option<Size>,
    ) {
        if self.start_v_unstable {
            return;
        }
        let changed = self.slots.iter().any(|slot| {
            slot.element
                .as_ref()
                .and_then(&mut current_size)
                .is_some_and(|size| (orientation.v(size) - slot.size_v).abs() > tolerance)
        });
        if changed {
            self.start_v_unstable = true;
        }
    }

    /// Asserts the structural invariants of the window.
    ///
    /// Only active with debug assertions.
    pub fn debug_check_invariants(&self) {
        if cfg!(debug_assertions) {
            if let Some(last) = self.last_index() {
                assert_eq!(
                    last - self.first_index + 1,
                    self.slots.len(),
                    "realized window count must match its index range"
                );
            } else {
                assert_eq!(self.first_index, 0, "empty window must reset its first index");
            }
        }
    }
}
