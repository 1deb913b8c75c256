//! Collaborator interfaces consumed by the cursor.
//!
//! A [`CellCursor`](crate::CellCursor) never owns data, layout or selection
//! state. It reads them through these traits, captured once per grid in a
//! [`CursorContext`]. All collaborators are single-threaded and take `&self`;
//! implementations that need mutation use interior mutability.

use std::fmt;
use std::rc::Rc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{Column, GridCellCoord, PropertyBag, SubgridKind};

/// Default threshold for [`GridProperties::max_chars`].
pub const DEFAULT_MAX_CHARS: usize = 450;

/// Default reserved grid x of the row-number handle column.
pub const DEFAULT_ROW_COLUMN_INDEX: i32 = -2;

/// Default reserved grid x of the tree column.
pub const DEFAULT_TREE_COLUMN_INDEX: i32 = -1;

/// Static grid-wide settings the classifiers depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridProperties {
    /// Display strings at least this long need an out-of-band full value fetch.
    #[serde(rename = "MAX_CHARS", alias = "maxChars")]
    pub max_chars: usize,
    pub fixed_row_count: u32,
    pub fixed_column_count: u32,
    pub show_row_numbers: bool,
}

impl Default for GridProperties {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            fixed_row_count: 0,
            fixed_column_count: 0,
            show_row_numbers: true,
        }
    }
}

/// A named partition of row data plus its merge and property metadata.
///
/// Coordinates are data coordinates. Span counts are the number of *extra*
/// cells covered (0 = no span).
pub trait Subgrid {
    fn kind(&self) -> SubgridKind;

    fn value(&self, x: i32, y: i32) -> Value;
    fn set_value(&self, x: i32, y: i32, value: Value);

    /// Row object at `y`; `tree_level` selects a level in hierarchical data.
    fn row(&self, y: i32, tree_level: Option<u32>) -> Option<Value>;
    /// Row object backing the cell at `(x, y)`.
    fn data_row_object(&self, x: i32, y: i32) -> Option<Value>;

    fn colspan(&self, x: i32, y: i32) -> u32;
    fn rowspan(&self, x: i32, y: i32) -> u32;
    /// True when the cell is covered by a neighbor's span.
    fn is_render_skip_needed(&self, x: i32, y: i32) -> bool;
    fn is_colspaned_by_left_column(&self, x: i32, y: i32) -> bool;
    fn is_rowspaned_by_row(&self, x: i32, y: i32) -> bool;
    /// Row whose span covers this cell, if any.
    fn rowspan_main_row(&self, x: i32, y: i32) -> Option<i32>;
    /// Name of the column whose span covers this cell, if any.
    fn colspan_main_column_name(&self, x: i32, y: i32) -> Option<String>;

    /// Sparse per-cell properties declared by the data source.
    fn defined_cell_properties(&self, x: i32, y: i32) -> Option<PropertyBag>;

    /// Cell-own overrides for `column` at row `y`, if any were ever written.
    fn cell_own_properties(&self, column: &Column, y: i32) -> Option<PropertyBag>;
    /// Write one cell-own override, creating the store on first use.
    fn set_cell_property(&self, column: &Column, y: i32, key: &str, value: Value);

    fn highlight_regex(&self, text: &str, search_type: crate::types::SearchType) -> Option<Regex>;
    fn is_value_url(&self, value: &Value) -> bool;

    // Column groups: a group header cell describes the columns nested under it.

    /// Column definitions nested under the group cell at `(x, y)`.
    fn child_columns(&self, _x: i32, _y: i32) -> Vec<Value> {
        Vec::new()
    }
    fn is_column_open_by_default(&self, _x: i32, _y: i32) -> bool {
        false
    }
    /// Whether the cell's column shows while its group is open.
    fn is_column_expanded(&self, _x: i32, _y: i32) -> bool {
        false
    }
    fn column_group_id(&self, _x: i32, _y: i32) -> Option<Value> {
        None
    }
}

/// Grid behavior: reserved indices, column lookup, row properties, spans.
pub trait Behavior {
    fn row_column_index(&self) -> i32 {
        DEFAULT_ROW_COLUMN_INDEX
    }
    fn tree_column_index(&self) -> i32 {
        DEFAULT_TREE_COLUMN_INDEX
    }
    fn tree_header_row_index(&self) -> i32;

    /// Extra pixel width contributed by the columns the cell at data `(x, y)`
    /// of subgrid `kind` spans.
    fn additional_width(&self, x: i32, y: i32, kind: SubgridKind) -> f32;
    /// Extra pixel height contributed by the rows the cell spans.
    fn additional_height(&self, x: i32, y: i32, kind: SubgridKind) -> f32;

    /// Active column at grid x (reserved indices included).
    fn column(&self, grid_x: i32) -> Option<Rc<Column>>;
    fn subgrid(&self, kind: SubgridKind) -> Option<Rc<dyn Subgrid>>;

    fn row_properties(&self, kind: SubgridKind, y: i32) -> Option<PropertyBag>;
    fn set_row_properties(&self, kind: SubgridKind, y: i32, properties: PropertyBag);

    // Hierarchical (pivot) rows; `row` is the data row object.

    /// A row summarizing the rows grouped under it.
    fn is_aggregation_row(&self, _row: &Value) -> bool {
        false
    }
    fn child_rows(&self, _row: &Value) -> Vec<Value> {
        Vec::new()
    }
    fn has_child_rows(&self, row: &Value) -> bool {
        !self.child_rows(row).is_empty()
    }
    /// Number of source rows an aggregation row summarizes.
    fn aggregation_child_count(&self, _row: &Value) -> usize {
        0
    }
    fn is_expandable_row(&self, row: &Value) -> bool {
        self.has_child_rows(row)
    }
    fn is_row_expanded(&self, _row: &Value) -> bool {
        false
    }
    /// Depth in the hierarchy; `None` for flat data.
    fn row_tree_level(&self, _row: &Value) -> Option<u32> {
        None
    }
}

/// A rendered column.
#[derive(Debug, Clone, Default)]
pub struct VisibleColumn {
    /// Grid x (active column index or reserved index).
    pub column_index: i32,
    /// Slot in the renderer's visible column list.
    pub index: i32,
    pub column: Option<Rc<Column>>,
    pub left: f32,
    pub width: f32,
}

/// A rendered row.
#[derive(Clone)]
pub struct VisibleRow {
    /// Grid y.
    pub index: i32,
    /// Data y within `subgrid`.
    pub row_index: i32,
    pub subgrid: Rc<dyn Subgrid>,
    pub top: f32,
    pub height: f32,
}

impl fmt::Debug for VisibleRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisibleRow")
            .field("index", &self.index)
            .field("row_index", &self.row_index)
            .field("subgrid", &self.subgrid.kind())
            .field("top", &self.top)
            .field("height", &self.height)
            .finish()
    }
}

/// What is currently on screen.
pub trait Renderer {
    /// Rendered column whose grid x is `grid_x`.
    fn visible_column(&self, grid_x: i32) -> Option<VisibleColumn>;
    /// Rendered column in slot `slot` (reserved columns use their negative index).
    fn visible_column_at(&self, slot: i32) -> Option<VisibleColumn>;
    fn visible_row(&self, grid_y: i32) -> Option<VisibleRow>;
    fn visible_data_column(&self, data_x: i32) -> Option<VisibleColumn>;
    /// Rendered row showing data row `data_y` of the `kind` subgrid.
    fn visible_data_row(&self, data_y: i32, kind: SubgridKind) -> Option<VisibleRow>;
}

/// Selection state and merge-anchor lookups.
pub trait SelectionModel {
    /// Anchor column for a cell covered by a span from the left.
    fn check_cell_left(&self, x: i32, y: i32) -> i32;
    /// Anchor row for a cell covered by a span from above.
    fn check_cell_top(&self, x: i32, y: i32) -> i32;
    fn is_row_selected(&self, y: i32) -> bool;
    fn is_column_selected(&self, x: i32) -> bool;
    fn is_cell_selected(&self, x: i32, y: i32) -> bool;
}

/// Grid-level state: properties, formatting, hover, visibility.
pub trait GridHost {
    fn properties(&self) -> GridProperties;
    fn format_value(&self, format: Option<&Value>, value: &Value, is_header_row: bool) -> String;
    fn hover_cell(&self) -> Option<GridCellCoord>;
    /// Whether the pointer is currently over the grid.
    fn has_pointer(&self) -> bool;
    /// Whether the column with data index `x` is scrolled into view.
    fn is_column_visible(&self, x: i32) -> bool;
    /// Whether data row `y` is scrolled into view.
    fn is_data_row_visible(&self, y: i32) -> bool;
}

/// Collaborators captured once per grid and shared by all of its cursors.
#[derive(Clone)]
pub struct CursorContext {
    pub grid: Rc<dyn GridHost>,
    pub behavior: Rc<dyn Behavior>,
    pub renderer: Rc<dyn Renderer>,
    pub selection: Rc<dyn SelectionModel>,
}

impl CursorContext {
    pub fn new(
        grid: Rc<dyn GridHost>,
        behavior: Rc<dyn Behavior>,
        renderer: Rc<dyn Renderer>,
        selection: Rc<dyn SelectionModel>,
    ) -> Self {
        Self {
            grid,
            behavior,
            renderer,
            selection,
        }
    }

    /// Context for a host that plays every collaborator role.
    pub fn from_host<T>(host: &Rc<T>) -> Self
    where
        T: GridHost + Behavior + Renderer + SelectionModel + 'static,
    {
        Self {
            grid: Rc::clone(host) as Rc<dyn GridHost>,
            behavior: Rc::clone(host) as Rc<dyn Behavior>,
            renderer: Rc::clone(host) as Rc<dyn Renderer>,
            selection: Rc::clone(host) as Rc<dyn SelectionModel>,
        }
    }
}
