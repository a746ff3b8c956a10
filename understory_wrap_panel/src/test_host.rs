// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A recording host used by the unit tests.

use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};
use kurbo::{Rect, Size, Vec2};

use crate::{ContainerGenerator, ContainerLayout, ContainerRequest, LayoutRoot, VirtualizingWrapPanel};

const OWN_CONTAINER_BASE: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Call {
    Create(u32),
    Prepare(u32, usize),
    Clear(u32),
    Add(u32),
    Remove(u32),
    Visible(u32, bool),
    IndexChanged(u32, usize, usize),
    BringIntoView(u32),
}

/// Uniformly sized items whose containers are plain `u32` ids.
#[derive(Debug)]
pub(crate) struct TestHost {
    count: usize,
    item_size: Size,
    recycle_keys: bool,
    own_containers: bool,
    next_id: u32,
    bound: HashMap<u32, usize>,
    visible: HashMap<u32, bool>,
    measured: HashMap<u32, Size>,
    arranged: HashMap<u32, Rect>,
    children: HashSet<u32>,
    focus: Option<u32>,
    brought: Vec<u32>,
    scroll_request: Option<Rect>,
    calls: Vec<Call>,
}

impl TestHost {
    pub(crate) fn grid(count: usize, width: f64, height: f64) -> Self {
        Self {
            count,
            item_size: Size::new(width, height),
            recycle_keys: true,
            own_containers: false,
            next_id: 0,
            bound: HashMap::new(),
            visible: HashMap::new(),
            measured: HashMap::new(),
            arranged: HashMap::new(),
            children: HashSet::new(),
            focus: None,
            brought: Vec::new(),
            scroll_request: None,
            calls: Vec::new(),
        }
    }

    pub(crate) fn without_recycle_keys(mut self) -> Self {
        self.recycle_keys = false;
        self
    }

    pub(crate) fn items_are_containers(mut self) -> Self {
        self.own_containers = true;
        self
    }

    pub(crate) fn insert(&mut self, _index: usize, count: usize) {
        self.count += count;
    }

    pub(crate) fn remove(&mut self, _index: usize, count: usize) {
        self.count -= count;
    }

    /// Changes the size of every item, as if each container re-measured itself.
    pub(crate) fn resize_items(&mut self, size: Size) {
        self.item_size = size;
        for measured in self.measured.values_mut() {
            *measured = size;
        }
    }

    pub(crate) fn set_focus(&mut self, container: Option<u32>) {
        self.focus = container;
    }

    pub(crate) fn created(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Create(_)))
            .count()
    }

    pub(crate) fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub(crate) fn count_calls(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub(crate) fn bound_item(&self, container: u32) -> Option<usize> {
        self.bound.get(&container).copied()
    }

    pub(crate) fn is_visible(&self, container: u32) -> bool {
        self.visible.get(&container).copied().unwrap_or(false)
    }

    pub(crate) fn arranged(&self, container: u32) -> Option<Rect> {
        self.arranged.get(&container).copied()
    }

    /// Last arranged rect of the container currently bound to `index`.
    pub(crate) fn arranged_at(&self, index: usize) -> Option<Rect> {
        let (container, _) = self.bound.iter().find(|&(_, &i)| i == index)?;
        self.arranged(*container)
    }

    pub(crate) fn child_count(&self) -> usize {
        self.children.len()
    }

    pub(crate) fn brought_into_view(&self) -> &[u32] {
        &self.brought
    }

    fn take_scroll_request(&mut self) -> Option<Rect> {
        self.scroll_request.take()
    }
}

impl ContainerGenerator for TestHost {
    type Container = u32;
    type RecycleKey = &'static str;

    fn item_count(&self) -> usize {
        self.count
    }

    fn needs_container(&mut self, _index: usize) -> ContainerRequest<&'static str> {
        if self.own_containers {
            ContainerRequest::ItemIsContainer
        } else {
            ContainerRequest::Generate {
                recycle_key: self.recycle_keys.then_some("icon"),
            }
        }
    }

    fn item_container(&mut self, index: usize) -> u32 {
        OWN_CONTAINER_BASE + u32::try_from(index).unwrap()
    }

    fn create_container(&mut self, _index: usize, _recycle_key: Option<&&'static str>) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.calls.push(Call::Create(id));
        id
    }

    fn prepare_container(&mut self, container: &u32, index: usize) {
        self.bound.insert(*container, index);
        self.calls.push(Call::Prepare(*container, index));
    }

    fn clear_container(&mut self, container: &u32) {
        self.bound.remove(container);
        self.measured.remove(container);
        self.calls.push(Call::Clear(*container));
    }

    fn container_index_changed(&mut self, container: &u32, old_index: usize, new_index: usize) {
        self.bound.insert(*container, new_index);
        self.calls
            .push(Call::IndexChanged(*container, old_index, new_index));
    }
}

impl ContainerLayout for TestHost {
    fn add_child(&mut self, container: &u32) {
        self.children.insert(*container);
        self.visible.insert(*container, true);
        self.calls.push(Call::Add(*container));
    }

    fn remove_child(&mut self, container: &u32) {
        self.children.remove(container);
        self.visible.remove(container);
        self.bound.remove(container);
        self.calls.push(Call::Remove(*container));
    }

    fn set_visible(&mut self, container: &u32, visible: bool) {
        self.visible.insert(*container, visible);
        self.calls.push(Call::Visible(*container, visible));
    }

    fn measure(&mut self, container: &u32, _available: Size) -> Size {
        self.measured.insert(*container, self.item_size);
        self.item_size
    }

    fn desired_size(&self, container: &u32) -> Option<Size> {
        self.measured.get(container).copied()
    }

    fn arrange(&mut self, container: &u32, rect: Rect) {
        self.arranged.insert(*container, rect);
    }

    fn bring_into_view(&mut self, container: &u32) {
        self.brought.push(*container);
        self.scroll_request = self.arranged.get(container).copied();
        self.calls.push(Call::BringIntoView(*container));
    }

    fn has_keyboard_focus(&self, container: &u32) -> bool {
        self.focus == Some(*container)
    }
}

/// Layout root acting as a scroll viewer of fixed size around the panel.
#[derive(Debug)]
pub(crate) struct TestRoot {
    viewport_size: Size,
    passes: usize,
    scrolls: bool,
}

impl TestRoot {
    pub(crate) fn new(viewport_size: Size) -> Self {
        Self {
            viewport_size,
            passes: 0,
            scrolls: true,
        }
    }

    /// A root that drops every scroll request, so the viewport never moves.
    pub(crate) fn frozen(viewport_size: Size) -> Self {
        Self {
            scrolls: false,
            ..Self::new(viewport_size)
        }
    }

    pub(crate) fn passes(&self) -> usize {
        self.passes
    }
}

/// Smallest offset that moves `[start, end]` into `[view_start, view_end]`.
fn scroll_delta(start: f64, end: f64, view_start: f64, view_end: f64) -> f64 {
    if end > view_end {
        end - view_end
    } else if start < view_start {
        start - view_start
    } else {
        0.0
    }
}

impl LayoutRoot<TestHost> for TestRoot {
    fn execute_layout_pass(
        &mut self,
        panel: &mut VirtualizingWrapPanel<u32, &'static str>,
        host: &mut TestHost,
    ) {
        self.passes += 1;

        if let Some(target) = host.take_scroll_request().filter(|_| self.scrolls) {
            let viewport = panel.viewport();
            let delta = Vec2::new(
                scroll_delta(target.x0, target.x1, viewport.x0, viewport.x1),
                scroll_delta(target.y0, target.y1, viewport.y0, viewport.y1),
            );
            if delta != Vec2::ZERO {
                panel.set_effective_viewport(viewport + delta);
            }
        }

        if !panel.is_measure_valid() {
            let available = Size::new(self.viewport_size.width, f64::INFINITY);
            let desired = panel.measure(host, available);
            panel.arrange(host, desired);
        }
    }
}
