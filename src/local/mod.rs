//! A self-contained in-memory grid.
//!
//! [`LocalGrid`] implements every collaborator trait over JSON rows, a merge
//! map and a scrollable viewport. It backs the CLI and the WASM entry points
//! and serves as the reference host in tests.

mod config;
mod format;
mod grid;
mod layout;
mod selection;
mod subgrid;

pub use config::{
    CellPropertiesConfig, ColumnConfig, GridConfig, RowPropertiesConfig, SubgridConfig, TREE_COLUMN_NAME,
};
pub use format::{format_value, ValueFormat};
pub use grid::{LocalGrid, CHILDREN_FIELD, OPEN_FIELD, TREE_LEVEL_FIELD};
pub use layout::{GridLayout, Viewport, DEFAULT_COL_WIDTH, DEFAULT_ROW_HEIGHT};
pub use selection::{LocalSelection, Selection, SelectionType};
pub use subgrid::{LocalSubgrid, MergeInfo, MergeRange, ROW_NUMBER_FIELD};
