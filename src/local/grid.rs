//! In-memory grid playing every collaborator role for its cursors.
//!
//! Visible columns and rows are recomputed whenever the viewport changes:
//! reserved columns first, then the fixed columns, then scrolled columns until
//! the viewport width is filled. Rows stack the subgrids in order; the data
//! subgrid shows its fixed rows, then scrolled rows in whatever height the
//! other subgrids leave.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::context::{
    Behavior, CursorContext, GridHost, GridProperties, Renderer, SelectionModel, Subgrid,
    VisibleColumn, VisibleRow,
};
use crate::cursor::{CellCursor, CellSnapshot};
use crate::error::{CursorError, Result};
use crate::types::{Column, GridCellCoord, Point, PropertyBag, SubgridKind};
use crate::value::is_truthy;

use super::config::{ColumnConfig, GridConfig, SubgridConfig, TREE_COLUMN_NAME};
use super::format::format_value;
use super::layout::{GridLayout, Viewport, DEFAULT_COL_WIDTH, DEFAULT_ROW_HEIGHT};
use super::selection::{LocalSelection, Selection};
use super::subgrid::{LocalSubgrid, ROW_NUMBER_FIELD};

const DEFAULT_HANDLE_WIDTH: f32 = 40.0;

/// Row field holding a hierarchical row's depth.
pub const TREE_LEVEL_FIELD: &str = "__treeLevel";
/// Row field holding the rows grouped under an aggregation row.
pub const CHILDREN_FIELD: &str = "$$children";
/// Row field set while an aggregation row is expanded.
pub const OPEN_FIELD: &str = "$$open";

fn to_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

fn to_usize(n: u32) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

pub struct LocalGrid {
    properties: GridProperties,
    row_column_index: i32,
    tree_column_index: i32,
    tree_header_row_index: i32,
    handle_column: Rc<Column>,
    tree_column: Option<Rc<Column>>,
    /// Active columns; grid x is the position here.
    active: Vec<Rc<Column>>,
    subgrids: Vec<Rc<LocalSubgrid>>,
    layout: GridLayout,
    viewport: Cell<Viewport>,
    visible_columns: RefCell<Vec<VisibleColumn>>,
    /// Leading entries of `visible_columns` that are reserved columns.
    reserved_visible: Cell<usize>,
    visible_rows: RefCell<Vec<VisibleRow>>,
    selection: LocalSelection,
    hover: Cell<Option<GridCellCoord>>,
    has_pointer: Cell<bool>,
    row_properties: RefCell<HashMap<(SubgridKind, i32), PropertyBag>>,
}

impl LocalGrid {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GridConfig = serde_json::from_str(json)?;
        Self::from_config(config)
    }

    pub fn from_config(config: GridConfig) -> Result<Self> {
        validate(&config)?;

        let columns: Vec<Rc<Column>> = config
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| Rc::new(column_from_config(to_i32(i), c)))
            .collect();
        let active = match &config.column_order {
            Some(order) => order
                .iter()
                .map(|&i| columns.get(i).map(Rc::clone))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| CursorError::Config("column order names a missing column".into()))?,
            None => columns.clone(),
        };

        let handle_column = Rc::new(
            Column::new(config.row_column_index, ROW_NUMBER_FIELD)
                .with_properties(config.handle_column.clone()),
        );
        let tree_column = config.tree_column.as_ref().map(|c| {
            let mut tree = column_from_config(config.tree_column_index, c);
            if tree.name.is_empty() {
                tree.name = TREE_COLUMN_NAME.to_owned();
            }
            Rc::new(tree)
        });

        let schema: Vec<String> = config.columns.iter().map(|c| c.name.clone()).collect();
        let subgrid_configs = if config.subgrids.is_empty() {
            vec![
                SubgridConfig::new(SubgridKind::Header),
                SubgridConfig::new(SubgridKind::Data),
            ]
        } else {
            config.subgrids.clone()
        };
        let subgrids = subgrid_configs
            .into_iter()
            .map(|s| {
                build_subgrid(s, &schema, &columns, tree_column.as_deref(), config.row_column_index)
                    .map(Rc::new)
            })
            .collect::<Result<Vec<_>>>()?;

        let data_rows = subgrids
            .iter()
            .find(|s| s.kind().is_data())
            .map_or(0, |s| s.row_count());
        let col_widths: HashMap<usize, f32> = config
            .columns
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.width.map(|w| (i, w)))
            .collect();
        let mut layout = GridLayout::new(columns.len(), data_rows, &col_widths, &config.row_heights);
        layout.header_row_height = config.header_row_height.unwrap_or(DEFAULT_ROW_HEIGHT);
        layout.handle_width = config.handle_width.unwrap_or(DEFAULT_HANDLE_WIDTH);
        layout.tree_width = config
            .tree_column
            .as_ref()
            .and_then(|c| c.width)
            .unwrap_or(DEFAULT_COL_WIDTH);

        let selection = LocalSelection::new(subgrids.iter().find(|s| s.kind().is_data()).map(Rc::clone));
        for s in &config.selections {
            selection.select(*s);
        }

        let row_properties = config
            .row_properties
            .iter()
            .map(|r| ((r.subgrid, r.row), r.properties.clone()))
            .collect();

        let grid = Self {
            properties: config.properties,
            row_column_index: config.row_column_index,
            tree_column_index: config.tree_column_index,
            tree_header_row_index: config.tree_header_row_index,
            handle_column,
            tree_column,
            active,
            subgrids,
            layout,
            viewport: Cell::new(config.viewport),
            visible_columns: RefCell::new(Vec::new()),
            reserved_visible: Cell::new(0),
            visible_rows: RefCell::new(Vec::new()),
            selection,
            hover: Cell::new(config.hover),
            has_pointer: Cell::new(config.hover.is_some()),
            row_properties: RefCell::new(row_properties),
        };
        grid.refresh();
        Ok(grid)
    }

    /// Collaborators for cursors over this grid.
    pub fn context(self: &Rc<Self>) -> CursorContext {
        CursorContext::from_host(self)
    }

    /// A new untargeted cursor over this grid.
    pub fn cursor(self: &Rc<Self>) -> CellCursor {
        CellCursor::new(self.context())
    }

    /// Snapshot of every rendered cell, row by row.
    pub fn snapshot_all(self: &Rc<Self>) -> Vec<CellSnapshot> {
        let columns = self.visible_columns();
        let rows = self.visible_rows();
        let mut cursor = self.cursor();
        let mut out = Vec::with_capacity(columns.len() * rows.len());
        for row in &rows {
            for column in &columns {
                cursor.retarget(column.clone(), row.clone());
                out.push(cursor.snapshot());
            }
        }
        out
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    pub fn visible_columns(&self) -> Vec<VisibleColumn> {
        self.visible_columns.borrow().clone()
    }

    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        self.visible_rows.borrow().clone()
    }

    /// Rendered cell under a viewport pixel, and the pixel relative to it.
    pub fn cell_at_point(&self, x: f32, y: f32) -> Option<(GridCellCoord, Point)> {
        let columns = self.visible_columns.borrow();
        let column = columns.iter().find(|c| c.left <= x && x < c.left + c.width)?;
        let rows = self.visible_rows.borrow();
        let row = rows.iter().find(|r| r.top <= y && y < r.top + r.height)?;
        let cell = GridCellCoord {
            x: column.column_index,
            y: row.index,
        };
        let point = Point {
            x: x - column.left,
            y: y - row.top,
        };
        Some((cell, point))
    }

    /// Cursor on the cell under a viewport pixel, carrying the pointer.
    pub fn cursor_at_point(self: &Rc<Self>, x: f32, y: f32) -> Option<CellCursor> {
        let (cell, point) = self.cell_at_point(x, y)?;
        let mut cursor = CellCursor::at_grid(self.context(), cell.x, cell.y)?;
        cursor.set_mouse_point(Some(point));
        Some(cursor)
    }

    pub fn local_subgrid(&self, kind: SubgridKind) -> Option<Rc<LocalSubgrid>> {
        self.subgrids.iter().find(|s| s.kind() == kind).map(Rc::clone)
    }

    /// Scroll so `col` and `row` lead the scrollable areas.
    pub fn scroll_to(&self, col: usize, row: usize) {
        let mut viewport = self.viewport.get();
        viewport.scroll_col = col;
        viewport.scroll_row = row;
        self.viewport.set(viewport);
        self.refresh();
    }

    pub fn resize(&self, width: f32, height: f32) {
        let mut viewport = self.viewport.get();
        viewport.resize(width, height);
        self.viewport.set(viewport);
        self.refresh();
    }

    /// Move the pointer over a grid cell, or off the grid with `None`.
    pub fn set_hover(&self, cell: Option<GridCellCoord>) {
        self.hover.set(cell);
        self.has_pointer.set(cell.is_some());
    }

    pub fn select(&self, selection: Selection) {
        self.selection.select(selection);
    }

    pub fn clear_selection(&self) {
        self.selection.clear();
    }

    fn refresh(&self) {
        let fixed_cols = to_usize(self.properties.fixed_column_count).min(self.active.len());
        let data_rows = self.layout.row_count();
        let fixed_rows = to_usize(self.properties.fixed_row_count).min(data_rows);

        let mut viewport = self.viewport.get();
        viewport.clamp_scroll((self.active.len(), data_rows), (fixed_cols, fixed_rows));
        self.viewport.set(viewport);

        let columns = self.compute_columns(&viewport, fixed_cols);
        let rows = self.compute_rows(&viewport, fixed_rows);
        log::debug!(
            "viewport at column {} row {}: {} columns, {} rows rendered",
            viewport.scroll_col,
            viewport.scroll_row,
            columns.len(),
            rows.len()
        );
        *self.visible_columns.borrow_mut() = columns;
        *self.visible_rows.borrow_mut() = rows;
    }

    fn compute_columns(&self, viewport: &Viewport, fixed: usize) -> Vec<VisibleColumn> {
        let mut columns = Vec::new();
        let mut left = 0.0;

        let mut reserved = Vec::new();
        if self.properties.show_row_numbers {
            reserved.push((self.row_column_index, &self.handle_column, self.layout.handle_width));
        }
        if let Some(tree) = &self.tree_column {
            reserved.push((self.tree_column_index, tree, self.layout.tree_width));
        }
        for (index, column, width) in reserved {
            columns.push(VisibleColumn {
                column_index: index,
                index,
                column: Some(Rc::clone(column)),
                left,
                width,
            });
            left += width;
        }
        self.reserved_visible.set(columns.len());

        let scrolled = viewport.scroll_col.max(fixed)..self.active.len();
        let mut slot = 0;
        for grid_x in (0..fixed).chain(scrolled) {
            if grid_x >= fixed && left >= viewport.width {
                break;
            }
            let Some(column) = self.active.get(grid_x) else {
                continue;
            };
            let width = usize::try_from(column.index).map_or(DEFAULT_COL_WIDTH, |i| self.layout.col_width(i));
            columns.push(VisibleColumn {
                column_index: to_i32(grid_x),
                index: slot,
                column: Some(Rc::clone(column)),
                left,
                width,
            });
            slot += 1;
            left += width;
        }
        columns
    }

    fn compute_rows(&self, viewport: &Viewport, fixed: usize) -> Vec<VisibleRow> {
        let header_height = self.layout.header_row_height;
        let other_height: f32 = self
            .subgrids
            .iter()
            .filter(|s| !s.kind().is_data())
            .map(|s| (0..s.row_count()).map(|_| header_height).sum::<f32>())
            .sum();

        let mut rows = Vec::new();
        let mut top = 0.0;
        for subgrid in &self.subgrids {
            let shared: Rc<dyn Subgrid> = Rc::clone(subgrid) as Rc<dyn Subgrid>;
            let mut push = |row: usize, height: f32, top: &mut f32| {
                rows.push(VisibleRow {
                    index: to_i32(rows.len()),
                    row_index: to_i32(row),
                    subgrid: Rc::clone(&shared),
                    top: *top,
                    height,
                });
                *top += height;
            };

            if !subgrid.kind().is_data() {
                for row in 0..subgrid.row_count() {
                    push(row, header_height, &mut top);
                }
                continue;
            }

            let bottom = top + (viewport.height - other_height).max(0.0);
            let scrolled = viewport.scroll_row.max(fixed)..subgrid.row_count();
            for row in (0..fixed).chain(scrolled) {
                if row >= fixed && top >= bottom {
                    break;
                }
                push(row, self.layout.row_height(row), &mut top);
            }
        }
        rows
    }

    fn data_visible_columns(&self) -> std::cell::Ref<'_, [VisibleColumn]> {
        let reserved = self.reserved_visible.get();
        std::cell::Ref::map(self.visible_columns.borrow(), |cols| {
            cols.get(reserved..).unwrap_or_default()
        })
    }
}

fn validate(config: &GridConfig) -> Result<()> {
    let mut names = HashSet::new();
    for column in &config.columns {
        if column.name.is_empty() {
            return Err(CursorError::Config("column without a name".into()));
        }
        if !names.insert(column.name.as_str()) {
            return Err(CursorError::Config(format!("duplicate column {:?}", column.name)));
        }
    }
    if config.columns.iter().any(|c| c.name == ROW_NUMBER_FIELD) {
        return Err(CursorError::Config(format!("{ROW_NUMBER_FIELD:?} is reserved")));
    }

    let mut kinds = HashSet::new();
    for subgrid in &config.subgrids {
        if !kinds.insert(subgrid.kind) {
            return Err(CursorError::Config(format!("duplicate {:?} subgrid", subgrid.kind)));
        }
    }

    if config.tree_column.is_some() && config.tree_column_index == config.row_column_index {
        return Err(CursorError::Config(
            "tree column and row handle column share an index".into(),
        ));
    }
    Ok(())
}

fn column_from_config(index: i32, config: &ColumnConfig) -> Column {
    let mut column = Column::new(index, config.name.clone())
        .with_properties(config.properties.clone())
        .with_search_type(config.search_type);
    column.header.clone_from(&config.header);
    column.tree_level = config.tree_level;
    column.is_tree = config.is_tree;
    column
}

fn build_subgrid(
    config: SubgridConfig,
    schema: &[String],
    columns: &[Rc<Column>],
    tree_column: Option<&Column>,
    row_column_index: i32,
) -> Result<LocalSubgrid> {
    let rows = if config.kind.is_header() && config.rows.is_empty() {
        let mut header = Map::new();
        for column in columns.iter().map(|c| &**c).chain(tree_column) {
            header.insert(column.name.clone(), Value::from(column.header_text()));
        }
        vec![header]
    } else {
        config.rows
    };

    let mut subgrid = LocalSubgrid::new(config.kind, schema.to_vec())?
        .with_rows(rows)
        .with_reserved_field(row_column_index, ROW_NUMBER_FIELD)
        .with_merges(&config.merges);
    if let Some(tree) = tree_column {
        subgrid = subgrid.with_reserved_field(tree.index, tree.name.clone());
    }
    for cell in config.cell_properties {
        subgrid = subgrid.with_defined_properties(cell.x, cell.y, cell.properties);
    }
    Ok(subgrid)
}

impl GridHost for LocalGrid {
    fn properties(&self) -> GridProperties {
        self.properties
    }

    fn format_value(&self, format: Option<&Value>, value: &Value, is_header_row: bool) -> String {
        format_value(format, value, is_header_row)
    }

    fn hover_cell(&self) -> Option<GridCellCoord> {
        self.hover.get()
    }

    fn has_pointer(&self) -> bool {
        self.has_pointer.get()
    }

    fn is_column_visible(&self, x: i32) -> bool {
        self.data_visible_columns()
            .iter()
            .any(|c| c.column.as_ref().is_some_and(|col| col.index == x))
    }

    fn is_data_row_visible(&self, y: i32) -> bool {
        self.visible_rows
            .borrow()
            .iter()
            .any(|r| r.subgrid.kind().is_data() && r.row_index == y)
    }
}

impl Behavior for LocalGrid {
    fn row_column_index(&self) -> i32 {
        self.row_column_index
    }

    fn tree_column_index(&self) -> i32 {
        self.tree_column_index
    }

    fn tree_header_row_index(&self) -> i32 {
        self.tree_header_row_index
    }

    fn additional_width(&self, x: i32, y: i32, kind: SubgridKind) -> f32 {
        let Some(subgrid) = self.local_subgrid(kind) else {
            return 0.0;
        };
        let colspan = to_usize(subgrid.colspan(x, y));
        usize::try_from(x).map_or(0.0, |first| self.layout.span_width(first + 1, colspan))
    }

    fn additional_height(&self, x: i32, y: i32, kind: SubgridKind) -> f32 {
        let Some(subgrid) = self.local_subgrid(kind) else {
            return 0.0;
        };
        let rowspan = to_usize(subgrid.rowspan(x, y));
        if !kind.is_data() {
            return (0..rowspan).map(|_| self.layout.header_row_height).sum();
        }
        usize::try_from(y).map_or(0.0, |first| self.layout.span_height(first + 1, rowspan))
    }

    fn column(&self, grid_x: i32) -> Option<Rc<Column>> {
        if grid_x == self.row_column_index {
            return Some(Rc::clone(&self.handle_column));
        }
        if grid_x == self.tree_column_index {
            return self.tree_column.as_ref().map(Rc::clone);
        }
        let index = usize::try_from(grid_x).ok()?;
        self.active.get(index).map(Rc::clone)
    }

    fn subgrid(&self, kind: SubgridKind) -> Option<Rc<dyn Subgrid>> {
        self.local_subgrid(kind).map(|s| s as Rc<dyn Subgrid>)
    }

    fn row_properties(&self, kind: SubgridKind, y: i32) -> Option<PropertyBag> {
        self.row_properties.borrow().get(&(kind, y)).cloned()
    }

    fn set_row_properties(&self, kind: SubgridKind, y: i32, properties: PropertyBag) {
        self.row_properties.borrow_mut().insert((kind, y), properties);
    }

    fn is_aggregation_row(&self, row: &Value) -> bool {
        row.get(TREE_LEVEL_FIELD).is_some() && row.get(TREE_COLUMN_NAME).is_some()
    }

    fn child_rows(&self, row: &Value) -> Vec<Value> {
        row.get(CHILDREN_FIELD)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    fn aggregation_child_count(&self, row: &Value) -> usize {
        if !self.is_aggregation_row(row) {
            return 0;
        }
        row.get(CHILDREN_FIELD)
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    fn is_row_expanded(&self, row: &Value) -> bool {
        row.get(OPEN_FIELD).is_some_and(is_truthy)
    }

    fn row_tree_level(&self, row: &Value) -> Option<u32> {
        row.get(TREE_LEVEL_FIELD)
            .and_then(Value::as_u64)
            .and_then(|level| u32::try_from(level).ok())
    }
}

impl Renderer for LocalGrid {
    fn visible_column(&self, grid_x: i32) -> Option<VisibleColumn> {
        self.visible_columns
            .borrow()
            .iter()
            .find(|c| c.column_index == grid_x)
            .cloned()
    }

    fn visible_column_at(&self, slot: i32) -> Option<VisibleColumn> {
        self.visible_columns
            .borrow()
            .iter()
            .find(|c| c.index == slot)
            .cloned()
    }

    fn visible_row(&self, grid_y: i32) -> Option<VisibleRow> {
        let index = usize::try_from(grid_y).ok()?;
        self.visible_rows.borrow().get(index).cloned()
    }

    fn visible_data_column(&self, data_x: i32) -> Option<VisibleColumn> {
        self.data_visible_columns()
            .iter()
            .find(|c| c.column.as_ref().is_some_and(|col| col.index == data_x))
            .cloned()
    }

    fn visible_data_row(&self, data_y: i32, kind: SubgridKind) -> Option<VisibleRow> {
        self.visible_rows
            .borrow()
            .iter()
            .find(|r| r.subgrid.kind() == kind && r.row_index == data_y)
            .cloned()
    }
}

impl SelectionModel for LocalGrid {
    fn check_cell_left(&self, x: i32, y: i32) -> i32 {
        self.selection.check_cell_left(x, y)
    }

    fn check_cell_top(&self, x: i32, y: i32) -> i32 {
        self.selection.check_cell_top(x, y)
    }

    fn is_row_selected(&self, y: i32) -> bool {
        self.selection.is_row_selected(y)
    }

    fn is_column_selected(&self, x: i32) -> bool {
        self.selection.is_column_selected(x)
    }

    fn is_cell_selected(&self, x: i32, y: i32) -> bool {
        self.selection.is_cell_selected(x, y)
    }
}

impl std::fmt::Debug for LocalGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalGrid")
            .field("columns", &self.active.len())
            .field("subgrids", &self.subgrids.iter().map(|s| s.kind()).collect::<Vec<_>>())
            .field("viewport", &self.viewport.get())
            .finish_non_exhaustive()
    }
}
