//! Selections over the data subgrid and merge-anchor lookups.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::context::{SelectionModel, Subgrid};

use super::subgrid::LocalSubgrid;

/// Type of selection for row/column headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionType {
    /// Standard cell selection (default)
    #[default]
    CellRange,
    /// Entire row(s) selected
    RowRange,
    /// Entire column(s) selected
    ColumnRange,
    /// All cells selected (corner click)
    All,
}

/// A selected rectangle: columns in grid x, rows in data y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    #[serde(default, rename = "type")]
    pub selection_type: SelectionType,
    #[serde(default)]
    pub start_row: i32,
    #[serde(default)]
    pub start_col: i32,
    #[serde(default = "open_end")]
    pub end_row: i32,
    #[serde(default = "open_end")]
    pub end_col: i32,
}

const fn open_end() -> i32 {
    i32::MAX
}

impl Selection {
    /// Create a new cell range selection
    pub fn cell_range(start_row: i32, start_col: i32, end_row: i32, end_col: i32) -> Self {
        Self {
            selection_type: SelectionType::CellRange,
            start_row,
            start_col,
            end_row,
            end_col,
        }
    }

    /// Create a row range selection
    pub fn row_range(start_row: i32, end_row: i32) -> Self {
        Self {
            selection_type: SelectionType::RowRange,
            start_row,
            start_col: 0,
            end_row,
            end_col: i32::MAX,
        }
    }

    /// Create a column range selection
    pub fn column_range(start_col: i32, end_col: i32) -> Self {
        Self {
            selection_type: SelectionType::ColumnRange,
            start_row: 0,
            start_col,
            end_row: i32::MAX,
            end_col,
        }
    }

    /// Create a select-all selection
    pub fn all() -> Self {
        Self {
            selection_type: SelectionType::All,
            start_row: 0,
            start_col: 0,
            end_row: i32::MAX,
            end_col: i32::MAX,
        }
    }

    /// Get normalized bounds (min_row, min_col, max_row, max_col)
    pub fn bounds(&self) -> (i32, i32, i32, i32) {
        (
            self.start_row.min(self.end_row),
            self.start_col.min(self.end_col),
            self.start_row.max(self.end_row),
            self.start_col.max(self.end_col),
        )
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (min_row, min_col, max_row, max_col) = self.bounds();
        (min_row..=max_row).contains(&y) && (min_col..=max_col).contains(&x)
    }

    fn covers_row(&self, y: i32) -> bool {
        let (min_row, _, max_row, _) = self.bounds();
        matches!(self.selection_type, SelectionType::RowRange | SelectionType::All)
            && (min_row..=max_row).contains(&y)
    }

    fn covers_column(&self, x: i32) -> bool {
        let (_, min_col, _, max_col) = self.bounds();
        matches!(self.selection_type, SelectionType::ColumnRange | SelectionType::All)
            && (min_col..=max_col).contains(&x)
    }
}

/// Selection state of a [`LocalGrid`](super::LocalGrid).
///
/// Anchor lookups walk the data subgrid's merge flags back to the cell that
/// owns the span.
pub struct LocalSelection {
    data: Option<Rc<LocalSubgrid>>,
    selections: RefCell<Vec<Selection>>,
}

impl LocalSelection {
    pub fn new(data: Option<Rc<LocalSubgrid>>) -> Self {
        Self {
            data,
            selections: RefCell::new(Vec::new()),
        }
    }

    pub fn select(&self, selection: Selection) {
        self.selections.borrow_mut().push(selection);
    }

    pub fn clear(&self) {
        self.selections.borrow_mut().clear();
    }

    pub fn selections(&self) -> Vec<Selection> {
        self.selections.borrow().clone()
    }
}

impl SelectionModel for LocalSelection {
    fn check_cell_left(&self, x: i32, y: i32) -> i32 {
        let Some(data) = &self.data else {
            return x;
        };
        let mut anchor = x;
        while anchor > 0 && data.is_colspaned_by_left_column(anchor, y) {
            anchor -= 1;
        }
        anchor
    }

    fn check_cell_top(&self, x: i32, y: i32) -> i32 {
        let Some(data) = &self.data else {
            return y;
        };
        let mut anchor = y;
        while anchor > 0 && data.is_rowspaned_by_row(x, anchor) {
            anchor -= 1;
        }
        anchor
    }

    fn is_row_selected(&self, y: i32) -> bool {
        self.selections.borrow().iter().any(|s| s.covers_row(y))
    }

    fn is_column_selected(&self, x: i32) -> bool {
        self.selections.borrow().iter().any(|s| s.covers_column(x))
    }

    fn is_cell_selected(&self, x: i32, y: i32) -> bool {
        self.selections.borrow().iter().any(|s| s.contains(x, y))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::local::subgrid::MergeRange;
    use crate::types::SubgridKind;

    fn selection_over_merge() -> LocalSelection {
        let schema = (0..6).map(|c| format!("c{c}")).collect();
        let rows = vec![serde_json::Map::new(); 6];
        let data = LocalSubgrid::new(SubgridKind::Data, schema)
            .unwrap()
            .with_rows(rows)
            .with_merges(&[MergeRange {
                start_row: 2,
                start_col: 1,
                end_row: 4,
                end_col: 3,
            }]);
        LocalSelection::new(Some(Rc::new(data)))
    }

    #[test]
    fn test_anchor_scan() {
        let selection = selection_over_merge();
        assert_eq!(selection.check_cell_left(3, 2), 1);
        assert_eq!(selection.check_cell_left(3, 4), 1);
        assert_eq!(selection.check_cell_top(1, 4), 2);
        assert_eq!(selection.check_cell_top(3, 3), 2);
        // Outside the merge nothing moves
        assert_eq!(selection.check_cell_left(5, 2), 5);
        assert_eq!(selection.check_cell_top(0, 4), 4);
    }

    #[test]
    fn test_anchor_without_data_subgrid() {
        let selection = LocalSelection::new(None);
        assert_eq!(selection.check_cell_left(3, 2), 3);
        assert_eq!(selection.check_cell_top(3, 2), 2);
    }

    #[test]
    fn test_selection_types() {
        let selection = LocalSelection::new(None);
        selection.select(Selection::cell_range(5, 3, 2, 1));
        assert!(selection.is_cell_selected(2, 4));
        assert!(!selection.is_cell_selected(4, 4));
        assert!(!selection.is_row_selected(4));
        assert!(!selection.is_column_selected(2));

        selection.select(Selection::row_range(7, 8));
        assert!(selection.is_row_selected(8));
        assert!(selection.is_cell_selected(100, 7));

        selection.select(Selection::column_range(9, 9));
        assert!(selection.is_column_selected(9));
        assert!(!selection.is_column_selected(10));

        selection.clear();
        assert!(!selection.is_row_selected(8));
        selection.select(Selection::all());
        assert!(selection.is_row_selected(1000));
        assert!(selection.is_column_selected(0));
    }
}
