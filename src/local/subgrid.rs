//! In-memory subgrid backed by JSON row objects.

use std::cell::RefCell;
use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::Subgrid;
use crate::error::Result;
use crate::types::{Column, PropertyBag, SearchType, SubgridKind};
use crate::value::is_truthy;

/// Field the row-number handle column reads; the value is synthesized.
pub const ROW_NUMBER_FIELD: &str = "$$row_number";

const CHILD_COLUMNS_KEY: &str = "childColumnDefs";
const OPEN_BY_DEFAULT_KEY: &str = "columnOpenByDefault";
const GROUP_SHOW_KEY: &str = "columnGroupShow";
const GROUP_ID_KEY: &str = "groupId";
const GROUP_SHOWN_WHEN_OPEN: [&str; 2] = ["always-showing", "open"];

const URL_PATTERN: &str =
    r"^(\s*(http|https|ftp|ftps|itmss)://[a-zA-Z0-9\-\.]+\.[a-zA-Z]{2,6}(/[^\s,;]*)?)$";

/// A merged rectangle in data coordinates, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRange {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

/// Merge membership of one data cell.
#[derive(Debug, Clone)]
pub struct MergeInfo {
    /// The cell is the merge anchor (first row, first column).
    pub is_origin: bool,
    /// Data y of the anchor.
    pub origin_row: u32,
    /// Data x of the anchor.
    pub origin_col: u32,
    /// Rows covered, anchor included.
    pub row_span: u32,
    /// Columns covered, anchor included.
    pub col_span: u32,
}

pub struct LocalSubgrid {
    kind: SubgridKind,
    /// Field names by data column index.
    schema: Vec<String>,
    /// Field names of the reserved (negative) columns.
    reserved: HashMap<i32, String>,
    rows: RefCell<Vec<Map<String, Value>>>,
    merges: HashMap<(u32, u32), MergeInfo>,
    defined: HashMap<(i32, i32), PropertyBag>,
    cell_own: RefCell<HashMap<(String, i32), PropertyBag>>,
    url_pattern: Regex,
    last_highlight: RefCell<Option<(String, SearchType, Regex)>>,
}

impl LocalSubgrid {
    pub fn new(kind: SubgridKind, schema: Vec<String>) -> Result<Self> {
        Ok(Self {
            kind,
            schema,
            reserved: HashMap::new(),
            rows: RefCell::new(Vec::new()),
            merges: HashMap::new(),
            defined: HashMap::new(),
            cell_own: RefCell::new(HashMap::new()),
            url_pattern: Regex::new(URL_PATTERN)?,
            last_highlight: RefCell::new(None),
        })
    }

    pub fn with_rows(mut self, rows: Vec<Map<String, Value>>) -> Self {
        self.rows = RefCell::new(rows);
        self
    }

    /// Map a reserved column index to the field it reads.
    pub fn with_reserved_field(mut self, index: i32, field: impl Into<String>) -> Self {
        self.reserved.insert(index, field.into());
        self
    }

    /// Register merged regions against the rows and schema already set.
    /// A range must be ordered and end inside the subgrid. Ranges failing
    /// that, or overlapping an earlier merge, are skipped with a warning.
    pub fn with_merges(mut self, ranges: &[MergeRange]) -> Self {
        let rows = self.row_count();
        let cols = self.schema.len();
        for range in ranges {
            if range.end_row < range.start_row || range.end_col < range.start_col {
                log::warn!("{:?} merge {range:?} is inverted, skipped", self.kind);
                continue;
            }
            let in_bounds = |end: u32, count: usize| usize::try_from(end).is_ok_and(|end| end < count);
            if !in_bounds(range.end_row, rows) || !in_bounds(range.end_col, cols) {
                log::warn!(
                    "{:?} merge {range:?} exceeds {rows} rows x {cols} columns, skipped",
                    self.kind
                );
                continue;
            }
            let cells = || {
                (range.start_row..=range.end_row)
                    .flat_map(move |r| (range.start_col..=range.end_col).map(move |c| (r, c)))
            };
            if cells().any(|cell| self.merges.contains_key(&cell)) {
                log::warn!("{:?} merge {range:?} overlaps another merge, skipped", self.kind);
                continue;
            }

            let row_span = (range.end_row - range.start_row).saturating_add(1);
            let col_span = (range.end_col - range.start_col).saturating_add(1);
            for (r, c) in cells() {
                self.merges.insert(
                    (r, c),
                    MergeInfo {
                        is_origin: r == range.start_row && c == range.start_col,
                        origin_row: range.start_row,
                        origin_col: range.start_col,
                        row_span,
                        col_span,
                    },
                );
            }
        }
        self
    }

    /// Declare sparse properties for the cell at data `(x, y)`.
    pub fn with_defined_properties(mut self, x: i32, y: i32, properties: PropertyBag) -> Self {
        self.defined.insert((x, y), properties);
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.borrow().len()
    }

    pub fn schema(&self) -> &[String] {
        &self.schema
    }

    pub fn merge_at(&self, x: i32, y: i32) -> Option<&MergeInfo> {
        let key = (u32::try_from(y).ok()?, u32::try_from(x).ok()?);
        self.merges.get(&key)
    }

    /// Field read at data `x`. Reserved columns win over the schema, so a
    /// reserved index may be non-negative.
    fn field(&self, x: i32) -> Option<&str> {
        if let Some(field) = self.reserved.get(&x) {
            return Some(field.as_str());
        }
        let i = usize::try_from(x).ok()?;
        self.schema.get(i).map(String::as_str)
    }

    /// Group description carried by the cell value, if it is an object.
    fn group_attribute(&self, x: i32, y: i32, key: &str) -> Option<Value> {
        match self.value(x, y) {
            Value::Object(mut group) => group.remove(key),
            _ => None,
        }
    }
}

fn highlight_pattern(text: &str, search_type: SearchType) -> Option<String> {
    let words: Vec<String> = text
        .split([' ', ','])
        .filter(|w| !w.is_empty())
        .map(regex::escape)
        .collect();
    if words.is_empty() {
        return None;
    }
    let alternation = words.join("|");
    let pattern = match search_type {
        SearchType::None => return None,
        SearchType::ExactMatch => format!(r"(?i)\b(?:{alternation})\b"),
        SearchType::Edge => format!(r"(?i)\b(?:{alternation})"),
        SearchType::Full => format!("(?i)(?:{alternation})"),
    };
    Some(pattern)
}

impl Subgrid for LocalSubgrid {
    fn kind(&self) -> SubgridKind {
        self.kind
    }

    fn value(&self, x: i32, y: i32) -> Value {
        let Some(field) = self.field(x) else {
            return Value::Null;
        };
        if field == ROW_NUMBER_FIELD {
            return if self.kind.is_data() {
                Value::from(i64::from(y) + 1)
            } else {
                Value::Null
            };
        }
        let Ok(row) = usize::try_from(y) else {
            return Value::Null;
        };
        self.rows
            .borrow()
            .get(row)
            .and_then(|r| r.get(field))
            .cloned()
            .unwrap_or(Value::Null)
    }

    fn set_value(&self, x: i32, y: i32, value: Value) {
        let (Some(field), Ok(row)) = (self.field(x), usize::try_from(y)) else {
            return;
        };
        if field == ROW_NUMBER_FIELD {
            return;
        }
        match self.rows.borrow_mut().get_mut(row) {
            Some(r) => {
                r.insert(field.to_owned(), value);
            }
            None => log::debug!("{:?} row {y} does not exist, value dropped", self.kind),
        }
    }

    /// Rows are flat, so every tree level reads the same object.
    fn row(&self, y: i32, _tree_level: Option<u32>) -> Option<Value> {
        let row = usize::try_from(y).ok()?;
        self.rows
            .borrow()
            .get(row)
            .map(|r| Value::Object(r.clone()))
    }

    fn data_row_object(&self, _x: i32, y: i32) -> Option<Value> {
        self.row(y, None)
    }

    fn colspan(&self, x: i32, y: i32) -> u32 {
        self.merge_at(x, y)
            .filter(|m| m.is_origin)
            .map_or(0, |m| m.col_span - 1)
    }

    fn rowspan(&self, x: i32, y: i32) -> u32 {
        self.merge_at(x, y)
            .filter(|m| m.is_origin)
            .map_or(0, |m| m.row_span - 1)
    }

    fn is_render_skip_needed(&self, x: i32, y: i32) -> bool {
        self.is_rowspaned_by_row(x, y) || self.is_colspaned_by_left_column(x, y)
    }

    fn is_colspaned_by_left_column(&self, x: i32, y: i32) -> bool {
        self.merge_at(x, y)
            .is_some_and(|m| i64::from(x) > i64::from(m.origin_col))
    }

    fn is_rowspaned_by_row(&self, x: i32, y: i32) -> bool {
        self.merge_at(x, y)
            .is_some_and(|m| i64::from(y) > i64::from(m.origin_row))
    }

    fn rowspan_main_row(&self, x: i32, y: i32) -> Option<i32> {
        let merge = self.merge_at(x, y)?;
        if i64::from(y) <= i64::from(merge.origin_row) {
            return None;
        }
        i32::try_from(merge.origin_row).ok()
    }

    fn colspan_main_column_name(&self, x: i32, y: i32) -> Option<String> {
        let merge = self.merge_at(x, y)?;
        if i64::from(x) <= i64::from(merge.origin_col) {
            return None;
        }
        let origin = usize::try_from(merge.origin_col).ok()?;
        self.schema.get(origin).cloned()
    }

    fn defined_cell_properties(&self, x: i32, y: i32) -> Option<PropertyBag> {
        self.defined.get(&(x, y)).cloned()
    }

    fn cell_own_properties(&self, column: &Column, y: i32) -> Option<PropertyBag> {
        self.cell_own
            .borrow()
            .get(&(column.name.clone(), y))
            .cloned()
    }

    fn set_cell_property(&self, column: &Column, y: i32, key: &str, value: Value) {
        self.cell_own
            .borrow_mut()
            .entry((column.name.clone(), y))
            .or_default()
            .insert(key, value);
    }

    fn highlight_regex(&self, text: &str, search_type: SearchType) -> Option<Regex> {
        if let Some((last_text, last_type, regex)) = self.last_highlight.borrow().as_ref() {
            if last_text == text && *last_type == search_type {
                return Some(regex.clone());
            }
        }
        let pattern = highlight_pattern(text, search_type)?;
        let regex = match Regex::new(&pattern) {
            Ok(regex) => regex,
            Err(err) => {
                log::warn!("highlight pattern for {text:?} rejected: {err}");
                return None;
            }
        };
        *self.last_highlight.borrow_mut() = Some((text.to_owned(), search_type, regex.clone()));
        Some(regex)
    }

    fn is_value_url(&self, value: &Value) -> bool {
        value
            .as_str()
            .is_some_and(|s| self.url_pattern.is_match(s))
    }

    fn child_columns(&self, x: i32, y: i32) -> Vec<Value> {
        match self.group_attribute(x, y, CHILD_COLUMNS_KEY) {
            Some(Value::Array(children)) => children,
            _ => Vec::new(),
        }
    }

    fn is_column_open_by_default(&self, x: i32, y: i32) -> bool {
        self.group_attribute(x, y, OPEN_BY_DEFAULT_KEY)
            .is_some_and(|v| is_truthy(&v))
    }

    /// An empty cell is never shown; a cell without a show mode always is.
    fn is_column_expanded(&self, x: i32, y: i32) -> bool {
        match self.value(x, y) {
            Value::Null => false,
            Value::Object(group) => match group.get(GROUP_SHOW_KEY) {
                None => true,
                Some(show) => show
                    .as_str()
                    .is_some_and(|s| GROUP_SHOWN_WHEN_OPEN.contains(&s)),
            },
            _ => true,
        }
    }

    fn column_group_id(&self, x: i32, y: i32) -> Option<Value> {
        self.group_attribute(x, y, GROUP_ID_KEY)
            .filter(|id| !id.is_null())
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
    use serde_json::json;

    fn schema() -> Vec<String> {
        ["a", "b", "c", "d"].iter().map(|s| (*s).to_owned()).collect()
    }

    fn rows() -> Vec<Map<String, Value>> {
        (0..4)
            .map(|r| {
                let value = json!({ "a": r, "b": format!("b{r}"), "c": null, "d": true });
                value.as_object().cloned().unwrap()
            })
            .collect()
    }

    fn merged() -> LocalSubgrid {
        LocalSubgrid::new(SubgridKind::Data, schema())
            .unwrap()
            .with_rows(rows())
            .with_merges(&[MergeRange {
                start_row: 1,
                start_col: 1,
                end_row: 2,
                end_col: 3,
            }])
    }

    #[test]
    fn test_values_by_field() {
        let subgrid = merged().with_reserved_field(-2, ROW_NUMBER_FIELD);
        assert_eq!(subgrid.value(0, 2), json!(2));
        assert_eq!(subgrid.value(1, 3), json!("b3"));
        assert_eq!(subgrid.value(9, 0), Value::Null);
        assert_eq!(subgrid.value(0, 9), Value::Null);
        assert_eq!(subgrid.value(-2, 4), json!(5));
        assert_eq!(subgrid.value(-1, 0), Value::Null);

        subgrid.set_value(2, 0, json!("set"));
        assert_eq!(subgrid.value(2, 0), json!("set"));
    }

    #[test]
    fn test_merge_origin_spans() {
        let subgrid = merged();
        assert_eq!(subgrid.colspan(1, 1), 2);
        assert_eq!(subgrid.rowspan(1, 1), 1);
        assert_eq!(subgrid.colspan(2, 1), 0);
        assert!(!subgrid.is_render_skip_needed(1, 1));
    }

    #[test]
    fn test_covered_cells() {
        let subgrid = merged();
        assert!(subgrid.is_colspaned_by_left_column(3, 1));
        assert!(!subgrid.is_rowspaned_by_row(3, 1));
        assert!(subgrid.is_rowspaned_by_row(1, 2));
        assert!(!subgrid.is_colspaned_by_left_column(1, 2));
        assert!(subgrid.is_render_skip_needed(2, 2));

        assert_eq!(subgrid.rowspan_main_row(2, 2), Some(1));
        assert_eq!(subgrid.rowspan_main_row(2, 1), None);
        assert_eq!(subgrid.colspan_main_column_name(3, 2), Some("b".to_owned()));
        assert_eq!(subgrid.colspan_main_column_name(1, 2), None);

        let info = subgrid.merge_at(3, 2).unwrap();
        assert!(!info.is_origin);
        assert_eq!((info.origin_col, info.origin_row), (1, 1));
        assert_eq!((info.col_span, info.row_span), (3, 2));
    }

    #[test]
    fn test_bad_merges_skipped() {
        let subgrid = merged().with_merges(&[
            MergeRange {
                start_row: 3,
                start_col: 2,
                end_row: 3,
                end_col: 0,
            },
            MergeRange {
                start_row: 2,
                start_col: 0,
                end_row: 3,
                end_col: 1,
            },
        ]);
        assert!(subgrid.merge_at(0, 3).is_none());
        assert_eq!(subgrid.merge_at(1, 2).map(|m| m.origin_col), Some(1));
    }

    #[test]
    fn test_merges_past_the_edge_skipped() {
        let subgrid = merged().with_merges(&[
            MergeRange {
                start_row: 3,
                start_col: 0,
                end_row: 3,
                end_col: 4,
            },
            MergeRange {
                start_row: 0,
                start_col: 0,
                end_row: u32::MAX,
                end_col: 0,
            },
        ]);
        assert!(subgrid.merge_at(0, 3).is_none());
        assert!(subgrid.merge_at(0, 0).is_none());
        assert_eq!(subgrid.colspan(0, 0), 0);
        assert_eq!(subgrid.rowspan(0, 0), 0);
    }

    #[test]
    fn test_reserved_field_at_data_index() {
        let subgrid = merged().with_reserved_field(0, ROW_NUMBER_FIELD);
        assert_eq!(subgrid.value(0, 1), json!(2));
        assert_eq!(subgrid.value(1, 1), json!("b1"));
        // The handle value is synthesized, never written
        subgrid.set_value(0, 1, json!("x"));
        assert_eq!(subgrid.value(0, 1), json!(2));
    }

    #[test]
    fn test_column_group_cells() {
        let header = LocalSubgrid::new(SubgridKind::Header, schema())
            .unwrap()
            .with_rows(vec![json!({
                "a": { "groupId": 7, "columnOpenByDefault": true,
                       "childColumnDefs": [{ "name": "a1" }, { "name": "a2" }] },
                "b": { "groupId": 7, "columnGroupShow": "closed" },
                "c": { "columnGroupShow": "open" },
                "d": "plain"
            })
            .as_object()
            .cloned()
            .unwrap()]);

        assert_eq!(header.child_columns(0, 0).len(), 2);
        assert!(header.child_columns(1, 0).is_empty());
        assert!(header.is_column_open_by_default(0, 0));
        assert!(!header.is_column_open_by_default(1, 0));
        assert_eq!(header.column_group_id(1, 0), Some(json!(7)));
        assert_eq!(header.column_group_id(2, 0), None);

        assert!(header.is_column_expanded(0, 0));
        assert!(!header.is_column_expanded(1, 0));
        assert!(header.is_column_expanded(2, 0));
        assert!(header.is_column_expanded(3, 0));
        assert!(!header.is_column_expanded(3, 5));
    }

    #[test]
    fn test_cell_own_store() {
        let subgrid = merged();
        let column = Column::new(1, "b");
        assert!(subgrid.cell_own_properties(&column, 0).is_none());
        subgrid.set_cell_property(&column, 0, "format", json!("integer"));
        let own = subgrid.cell_own_properties(&column, 0).unwrap();
        assert_eq!(own.get_str("format"), Some("integer"));
        assert!(subgrid.cell_own_properties(&column, 1).is_none());
    }

    #[test]
    fn test_url_detection() {
        let subgrid = merged();
        assert!(subgrid.is_value_url(&json!("https://example.com/path?q=1")));
        assert!(subgrid.is_value_url(&json!("ftp://files.example.org")));
        assert!(!subgrid.is_value_url(&json!("example.com")));
        assert!(!subgrid.is_value_url(&json!("https://example.com/a b")));
        assert!(!subgrid.is_value_url(&json!(42)));
    }

    #[test]
    fn test_highlight_regex_modes() {
        let subgrid = merged();
        let exact = subgrid.highlight_regex("app, pie", SearchType::ExactMatch).unwrap();
        assert!(exact.is_match("Apple PIE"));
        assert!(!exact.is_match("apple"));

        let edge = subgrid.highlight_regex("app", SearchType::Edge).unwrap();
        assert!(edge.is_match("Apple"));
        assert!(!edge.is_match("snapp"));

        let full = subgrid.highlight_regex("app", SearchType::Full).unwrap();
        assert!(full.is_match("snapp"));

        assert!(subgrid.highlight_regex("app", SearchType::None).is_none());
        assert!(subgrid.highlight_regex(" , ", SearchType::Full).is_none());
        // Metacharacters are literal
        assert!(subgrid.highlight_regex("a.c", SearchType::Full).unwrap().find("abc").is_none());
    }
}
