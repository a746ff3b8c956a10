// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Traits implemented by the hosting UI stack.
//!
//! The panel never owns items or containers. It asks the host to create,
//! prepare, measure and arrange containers, and tells it when a container is
//! no longer needed.

use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Rect, Size};

use crate::VirtualizingWrapPanel;

/// What the host wants for the item at a given index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerRequest<K> {
    /// The item is itself a container (for example, a widget placed directly
    /// in the items collection). It is never pooled.
    ItemIsContainer,
    /// A container must be generated for the item.
    ///
    /// Containers with a recycle key may be pooled and reused for any item
    /// requesting the same key. Containers without a key are destroyed when
    /// they leave the realized window.
    Generate {
        /// Key grouping interchangeable containers, if the container is recyclable.
        recycle_key: Option<K>,
    },
}

/// Item and container lifecycle, mirroring an items control's container generator.
pub trait ContainerGenerator {
    /// Handle to a host-owned container.
    type Container: Clone + Eq + Hash + Debug;
    /// Key grouping interchangeable containers.
    type RecycleKey: Clone + Eq + Hash + Debug;

    /// Number of items in the backing collection.
    fn item_count(&self) -> usize;

    /// Decides whether the item at `index` needs a generated container.
    fn needs_container(&mut self, index: usize) -> ContainerRequest<Self::RecycleKey>;

    /// Returns the item at `index` as a container.
    ///
    /// Only called when [`needs_container`](Self::needs_container) returned
    /// [`ContainerRequest::ItemIsContainer`].
    fn item_container(&mut self, index: usize) -> Self::Container;

    /// Creates a fresh container for the item at `index`.
    fn create_container(
        &mut self,
        index: usize,
        recycle_key: Option<&Self::RecycleKey>,
    ) -> Self::Container;

    /// Binds `container` to the item at `index`.
    fn prepare_container(&mut self, container: &Self::Container, index: usize);

    /// Clears any per-item binding from `container` before it is pooled.
    fn clear_container(&mut self, container: &Self::Container);

    /// Notifies that a realized container's item moved from `old_index` to `new_index`.
    fn container_index_changed(
        &mut self,
        container: &Self::Container,
        old_index: usize,
        new_index: usize,
    ) {
        let _ = (container, old_index, new_index);
    }
}

/// Visual-tree and layout services for containers.
pub trait ContainerLayout: ContainerGenerator {
    /// Attaches `container` as a child of the panel.
    fn add_child(&mut self, container: &Self::Container);

    /// Detaches `container` from the panel; the engine forgets it afterwards.
    fn remove_child(&mut self, container: &Self::Container);

    /// Shows or hides `container` without detaching it.
    fn set_visible(&mut self, container: &Self::Container, visible: bool);

    /// Measures `container` against `available` and returns its desired size.
    fn measure(&mut self, container: &Self::Container, available: Size) -> Size;

    /// The last desired size of `container`, or `None` if its measure is not valid.
    fn desired_size(&self, container: &Self::Container) -> Option<Size>;

    /// Positions `container` at `rect` in panel coordinates.
    fn arrange(&mut self, container: &Self::Container, rect: Rect);

    /// Asks scrollable ancestors to bring `container` into view.
    fn bring_into_view(&mut self, container: &Self::Container);

    /// Returns `true` if `container` is the keyboard focus anchor of the items
    /// control. Such containers are kept alive when they scroll out of view.
    fn has_keyboard_focus(&self, container: &Self::Container) -> bool {
        let _ = container;
        false
    }

    /// Registers `container` as a scroll anchor candidate.
    fn register_anchor_candidate(&mut self, container: &Self::Container) {
        let _ = container;
    }

    /// Removes `container` from the scroll anchor candidates.
    fn unregister_anchor_candidate(&mut self, container: &Self::Container) {
        let _ = container;
    }
}

/// The layout root, able to run a full synchronous layout pass.
///
/// Scroll-into-view uses this to let scrollable ancestors recompute their
/// extent before bringing a freshly realized container into view. A pass is
/// expected to measure and arrange `panel` as needed and to deliver any
/// resulting viewport change through
/// [`VirtualizingWrapPanel::set_effective_viewport`].
pub trait LayoutRoot<H: ContainerLayout> {
    /// Runs one layout pass.
    fn execute_layout_pass(
        &mut self,
        panel: &mut VirtualizingWrapPanel<H::Container, H::RecycleKey>,
        host: &mut H,
    );
}

/// A change to the backing item collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemsChange {
    /// `count` items were inserted at `index`.
    Add {
        /// Index of the first inserted item.
        index: usize,
        /// Number of inserted items.
        count: usize,
    },
    /// `count` items were removed starting at `index`.
    Remove {
        /// Index of the first removed item.
        index: usize,
        /// Number of removed items.
        count: usize,
    },
    /// `count` items starting at `index` were replaced.
    Replace {
        /// Index of the first replaced item.
        index: usize,
        /// Number of replaced items.
        count: usize,
    },
    /// `count` items moved from `old_index` to `new_index`.
    Move {
        /// Index the items were removed from.
        old_index: usize,
        /// Index the items were inserted at, after removal.
        new_index: usize,
        /// Number of moved items.
        count: usize,
    },
    /// The collection changed wholesale.
    Reset,
}
