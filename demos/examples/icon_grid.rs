// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Icon browser grid: `understory_pack_icon` items in a virtualizing wrap panel.
//!
//! This example shows how to combine:
//! - `understory_pack_icon` to load, sort and filter an icon pack,
//! - `understory_wrap_panel` to realize only the icons near the viewport,
//! - a toy scroll viewer acting as the layout root for scroll-into-view.
//!
//! Nothing is drawn; each step prints the realized range instead.
//!
//! Run:
//! - `cargo run -p understory_wrap_demos --example icon_grid`
//! - `RUST_LOG=understory_wrap_panel=trace cargo run -p understory_wrap_demos --example icon_grid`

use kurbo::{Point, Rect, Size};
use understory_pack_icon::{
    Flip, IconCatalog, IconDataTable, IconPack, PackIcon, PackIconControl,
};
use understory_wrap_panel::{
    ContainerGenerator, ContainerLayout, ContainerRequest, ItemsChange, LayoutRoot,
    NavigationDirection, VirtualizingWrapPanel, WrapPanelOptions,
};

const SHAPES: [&str; 8] = ["Arrow", "Bell", "Chevron", "Clock", "Cloud", "File", "Heart", "Star"];
const VARIANTS: [&str; 6] = ["Up", "Down", "Left", "Right", "Filled", "Outline"];

/// A JSON icon table in the format the data loader expects: name to path data.
fn synthetic_pack_json() -> String {
    let mut entries = vec![r#""None": """#.to_string()];
    for shape in SHAPES {
        for variant in VARIANTS {
            for n in 0..50 {
                let inset = n % 6;
                entries.push(format!(
                    r#""{shape}{variant}{n}": "M{inset} {inset}H{far}V{far}H{inset}Z""#,
                    far = 24 - inset
                ));
            }
        }
    }
    format!("{{{}}}", entries.join(","))
}

/// One icon cell; containers are indices into [`IconGrid::cells`].
#[derive(Debug, Default)]
struct Cell {
    icon: PackIcon,
    item: Option<usize>,
    desired: Option<Size>,
    rect: Option<Rect>,
    visible: bool,
    attached: bool,
}

/// The items control: owns the catalog and every cell it ever created.
struct IconGrid {
    table: IconDataTable,
    catalog: IconCatalog,
    cells: Vec<Cell>,
    cell_size: Size,
    scroll_request: Option<Rect>,
}

impl IconGrid {
    fn attached(&self) -> usize {
        self.cells.iter().filter(|c| c.attached).count()
    }
}

impl ContainerGenerator for IconGrid {
    type Container = usize;
    type RecycleKey = &'static str;

    fn item_count(&self) -> usize {
        self.catalog.len()
    }

    fn needs_container(&mut self, _index: usize) -> ContainerRequest<&'static str> {
        ContainerRequest::Generate {
            recycle_key: Some("icon"),
        }
    }

    fn item_container(&mut self, _index: usize) -> usize {
        unreachable!("catalog entries are never their own containers")
    }

    fn create_container(&mut self, _index: usize, _key: Option<&&'static str>) -> usize {
        self.cells.push(Cell::default());
        self.cells.len() - 1
    }

    fn prepare_container(&mut self, container: &usize, index: usize) {
        let cell = &mut self.cells[*container];
        cell.item = Some(index);
        cell.icon
            .set_kind(self.catalog.get(index).map(|entry| entry.kind.clone()));
        if let Err(err) = cell.icon.update_geometry(&self.table) {
            tracing::warn!(index, %err, "icon has no geometry");
        }
    }

    fn clear_container(&mut self, container: &usize) {
        let cell = &mut self.cells[*container];
        cell.item = None;
        cell.desired = None;
        cell.icon.set_kind(None);
    }
}

impl ContainerLayout for IconGrid {
    fn add_child(&mut self, container: &usize) {
        let cell = &mut self.cells[*container];
        cell.attached = true;
        cell.visible = true;
    }

    fn remove_child(&mut self, container: &usize) {
        let cell = &mut self.cells[*container];
        cell.attached = false;
        cell.item = None;
    }

    fn set_visible(&mut self, container: &usize, visible: bool) {
        self.cells[*container].visible = visible;
    }

    fn measure(&mut self, container: &usize, _available: Size) -> Size {
        self.cells[*container].desired = Some(self.cell_size);
        self.cell_size
    }

    fn desired_size(&self, container: &usize) -> Option<Size> {
        self.cells[*container].desired
    }

    fn arrange(&mut self, container: &usize, rect: Rect) {
        self.cells[*container].rect = Some(rect);
    }

    fn bring_into_view(&mut self, container: &usize) {
        self.scroll_request = self.cells[*container].rect;
    }
}

/// A vertical scroll viewer of fixed size around the panel.
struct ScrollViewer {
    size: Size,
    offset: f64,
    extent: f64,
}

impl ScrollViewer {
    fn scroll_to(&mut self, panel: &mut VirtualizingWrapPanel<usize, &'static str>, offset: f64) {
        self.offset = offset.clamp(0.0, (self.extent - self.size.height).max(0.0));
        panel.set_effective_viewport(Rect::from_origin_size(
            Point::new(0.0, self.offset),
            self.size,
        ));
    }
}

impl LayoutRoot<IconGrid> for ScrollViewer {
    fn execute_layout_pass(
        &mut self,
        panel: &mut VirtualizingWrapPanel<usize, &'static str>,
        host: &mut IconGrid,
    ) {
        if let Some(target) = host.scroll_request.take() {
            let view = panel.viewport();
            if target.y1 > view.y1 {
                self.extent = self.extent.max(target.y1);
                self.scroll_to(panel, self.offset + target.y1 - view.y1);
            } else if target.y0 < view.y0 {
                self.scroll_to(panel, target.y0);
            }
        }
        if !panel.is_measure_valid() {
            let desired = panel.measure(host, Size::new(self.size.width, f64::INFINITY));
            self.extent = desired.height;
            panel.arrange(host, desired);
        }
    }
}

fn report(step: &str, panel: &VirtualizingWrapPanel<usize, &'static str>, grid: &IconGrid) {
    println!(
        "{step}: items {} | realized {:?}..={:?} | per line {} | cells created {} attached {} pooled {}",
        grid.catalog.len(),
        panel.first_realized_index(),
        panel.last_realized_index(),
        panel.estimate().elements_per_row,
        grid.cells.len(),
        grid.attached(),
        panel.container_manager().pool().len(),
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let table = IconDataTable::from_json(IconPack::BoxIcons, &synthetic_pack_json())?;
    let catalog = IconCatalog::from_source(&table, &[IconPack::BoxIcons]);
    let mut grid = IconGrid {
        table,
        catalog,
        cells: Vec::new(),
        cell_size: Size::new(48.0, 48.0),
        scroll_request: None,
    };
    let mut panel = VirtualizingWrapPanel::new(
        WrapPanelOptions::default().with_initial_element_size(grid.cell_size),
    );
    let mut viewer = ScrollViewer {
        size: Size::new(400.0, 300.0),
        offset: 0.0,
        extent: 0.0,
    };

    viewer.scroll_to(&mut panel, 0.0);
    viewer.execute_layout_pass(&mut panel, &mut grid);
    report("initial", &panel, &grid);

    viewer.scroll_to(&mut panel, 2000.0);
    viewer.execute_layout_pass(&mut panel, &mut grid);
    report("scrolled to 2000", &panel, &grid);

    // Narrow the listing; the panel only learns that the items changed wholesale.
    let matches = grid.catalog.set_filter("arrow+up|down");
    panel.items_changed(&mut grid, ItemsChange::Reset);
    viewer.scroll_to(&mut panel, 0.0);
    viewer.execute_layout_pass(&mut panel, &mut grid);
    report(&format!("filtered to {matches}"), &panel, &grid);

    // Keyboard navigation across a line, then jump to the end.
    let first = panel.realized_containers().next().copied();
    let below = panel.navigate(
        first.as_ref(),
        NavigationDirection::Down,
        false,
        &mut grid,
        &mut viewer,
    );
    println!(
        "down from item 0 lands on item {:?}",
        below.and_then(|c| panel.index_from_container(&c))
    );
    let last = panel.navigate(None, NavigationDirection::Last, false, &mut grid, &mut viewer);
    report("navigated to last", &panel, &grid);

    if let Some(cell) = last.map(|c| &mut grid.cells[c]) {
        cell.icon.set_flip(Flip::Horizontal);
        cell.icon.set_rotation(90.0);
        if let (Some(rect), Some(kind)) = (cell.rect, cell.icon.kind()) {
            let placement = cell.icon.placement(rect, 0.0);
            println!("{kind} at {rect:?}, placement {placement:?}");
        }
    }

    panel.teardown(&mut grid);
    report("torn down", &panel, &grid);
    Ok(())
}
