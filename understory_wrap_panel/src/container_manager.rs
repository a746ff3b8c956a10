// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Container realization and recycling, independent of layout.

use hashbrown::HashMap;

use crate::pool::RecyclePool;
use crate::{ContainerLayout, ContainerRequest};

/// How a container should be disposed of when it leaves the realized window.
///
/// This is recorded for every container the manager hands out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecycleKey<K> {
    /// The container is not recyclable and is removed from the host.
    Discard,
    /// The item is its own container; it is hidden, never pooled.
    OwnContainer,
    /// The container is pooled under this key.
    Pooled(K),
}

/// Why a container is being recycled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecycleMode {
    /// The container scrolled out of the realized window.
    Virtualize,
    /// The container's item was removed from, or replaced in, the collection.
    ItemRemoved,
}

/// Outcome of [`ItemContainerManager::recycle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recycled<C> {
    /// The container was removed from the host.
    Removed,
    /// The container was hidden but stays attached (own-container items).
    Hidden,
    /// The container was cleared, hidden and pushed onto the pool.
    Pooled,
    /// The container holds keyboard focus and must be kept by the caller.
    KeptForFocus(C),
}

/// Hands out containers for item indices and takes them back.
///
/// The manager owns the [`RecyclePool`] and remembers each live container's
/// [`RecycleKey`], which decides what happens to it on recycle.
#[derive(Debug, Clone)]
pub struct ItemContainerManager<C, K> {
    pool: RecyclePool<K, C>,
    keys: HashMap<C, RecycleKey<K>>,
}

impl<C, K> Default for ItemContainerManager<C, K> {
    fn default() -> Self {
        Self {
            pool: RecyclePool::default(),
            keys: HashMap::default(),
        }
    }
}

impl<C, K> ItemContainerManager<C, K>
where
    C: Clone + Eq + core::hash::Hash + core::fmt::Debug,
    K: Clone + Eq + core::hash::Hash + core::fmt::Debug,
{
    /// Creates a manager with an unbounded pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a manager whose pool keeps at most `limit` containers per key.
    #[must_use]
    pub fn with_pool_limit(limit: usize) -> Self {
        Self {
            pool: RecyclePool::with_limit(limit),
            keys: HashMap::default(),
        }
    }

    /// The pool of detached containers.
    #[must_use]
    pub fn pool(&self) -> &RecyclePool<K, C> {
        &self.pool
    }

    /// Recorded disposition of `container`, if the manager handed it out.
    #[must_use]
    pub fn recycle_key(&self, container: &C) -> Option<&RecycleKey<K>> {
        self.keys.get(container)
    }

    /// Returns a container for the item at `index`, reusing a pooled one when possible.
    ///
    /// The returned container is attached, visible and prepared for `index`.
    pub fn realize<H>(&mut self, host: &mut H, index: usize) -> C
    where
        H: ContainerLayout<Container = C, RecycleKey = K>,
    {
        match host.needs_container(index) {
            ContainerRequest::ItemIsContainer => {
                let container = host.item_container(index);
                if !self.keys.contains_key(&container) {
                    host.prepare_container(&container, index);
                    host.add_child(&container);
                    self.keys
                        .insert(container.clone(), RecycleKey::OwnContainer);
                }
                host.set_visible(&container, true);
                container
            }
            ContainerRequest::Generate { recycle_key } => {
                if let Some(key) = &recycle_key {
                    if let Some(container) = self.pool.pop(key) {
                        tracing::trace!(index, ?key, "reusing pooled container");
                        host.set_visible(&container, true);
                        host.prepare_container(&container, index);
                        return container;
                    }
                }

                let container = host.create_container(index, recycle_key.as_ref());
                let disposition = match recycle_key {
                    Some(key) => RecycleKey::Pooled(key),
                    None => RecycleKey::Discard,
                };
                self.keys.insert(container.clone(), disposition);
                host.prepare_container(&container, index);
                host.add_child(&container);
                container
            }
        }
    }

    /// Takes back `container`, realized for `index`.
    pub fn recycle<H>(
        &mut self,
        host: &mut H,
        container: C,
        index: usize,
        mode: RecycleMode,
    ) -> Recycled<C>
    where
        H: ContainerLayout<Container = C, RecycleKey = K>,
    {
        host.unregister_anchor_candidate(&container);

        match (self.keys.get(&container).cloned(), mode) {
            (None | Some(RecycleKey::Discard), _)
            | (Some(RecycleKey::OwnContainer), RecycleMode::ItemRemoved) => {
                self.remove(host, &container);
                Recycled::Removed
            }
            (Some(RecycleKey::OwnContainer), RecycleMode::Virtualize) => {
                host.set_visible(&container, false);
                Recycled::Hidden
            }
            (Some(RecycleKey::Pooled(_)), RecycleMode::Virtualize)
                if host.has_keyboard_focus(&container) =>
            {
                tracing::trace!(index, "keeping focused container alive");
                Recycled::KeptForFocus(container)
            }
            (Some(RecycleKey::Pooled(key)), _) => {
                host.clear_container(&container);
                host.set_visible(&container, false);
                match self.pool.push(key, container) {
                    Ok(()) => Recycled::Pooled,
                    Err(container) => {
                        self.remove(host, &container);
                        Recycled::Removed
                    }
                }
            }
        }
    }

    /// Removes every container the manager still tracks from the host.
    ///
    /// This covers pooled containers and hidden own-container items. Callers
    /// recycle realized containers first.
    pub fn clear<H>(&mut self, host: &mut H)
    where
        H: ContainerLayout<Container = C, RecycleKey = K>,
    {
        self.pool.clear();
        for (container, _) in self.keys.drain() {
            host.remove_child(&container);
        }
    }

    fn remove<H>(&mut self, host: &mut H, container: &C)
    where
        H: ContainerLayout<Container = C, RecycleKey = K>,
    {
        self.keys.remove(container);
        host.remove_child(container);
    }
}
