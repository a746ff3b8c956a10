// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed pool of detached containers awaiting reuse.

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;

/// A pool of detached containers, grouped by recycle key.
///
/// Each key owns a stack: the most recently recycled container is reused
/// first. By default the pool is unbounded; [`RecyclePool::with_limit`] caps
/// the number of containers kept per key.
#[derive(Debug, Clone)]
pub struct RecyclePool<K, C> {
    stacks: HashMap<K, Vec<C>>,
    limit: Option<usize>,
}

impl<K, C> Default for RecyclePool<K, C> {
    fn default() -> Self {
        Self {
            stacks: HashMap::default(),
            limit: None,
        }
    }
}

impl<K: Eq + Hash, C> RecyclePool<K, C> {
    /// Creates an unbounded pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pool that keeps at most `limit` containers per key.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            stacks: HashMap::default(),
            limit: Some(limit),
        }
    }

    /// Per-key limit, if any.
    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Pushes `container` onto the stack for `key`.
    ///
    /// # Errors
    ///
    /// Returns the container back if the stack for `key` is already at the
    /// pool's limit; the caller is then responsible for disposing of it.
    pub fn push(&mut self, key: K, container: C) -> Result<(), C> {
        let stack = self.stacks.entry(key).or_default();
        if self.limit.is_some_and(|limit| stack.len() >= limit) {
            return Err(container);
        }
        stack.push(container);
        Ok(())
    }

    /// Pops the most recently pushed container for `key`.
    pub fn pop(&mut self, key: &K) -> Option<C> {
        self.stacks.get_mut(key).and_then(Vec::pop)
    }

    /// Number of pooled containers for `key`.
    #[must_use]
    pub fn len_for(&self, key: &K) -> usize {
        self.stacks.get(key).map_or(0, Vec::len)
    }

    /// Total number of pooled containers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stacks.values().map(Vec::len).sum()
    }

    /// Returns `true` if no containers are pooled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stacks.values().all(Vec::is_empty)
    }

    /// Forgets every pooled container.
    pub fn clear(&mut self) {
        self.stacks.clear();
    }

    /// Removes and returns every pooled container.
    pub fn drain(&mut self) -> impl Iterator<Item = C> + '_ {
        self.stacks.drain().flat_map(|(_, stack)| stack)
    }
}
