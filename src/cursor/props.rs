//! Effective cell properties and display classification.
//!
//! Resolution order, later wins:
//! 1. the column's base properties
//! 2. the column variant picked by row/column type ([`PropertyTier`])
//! 3. the cell-own overrides stored for (column, data row)
//! 4. properties the subgrid defines for the value cell
//!
//! The resolved bag is an immutable snapshot cached until the next retarget.
//! Writes go through [`CellCursor::set_cell_property`] into the subgrid's
//! cell-own store and never touch a bag already handed out.

use std::rc::Rc;

use serde_json::Value;

use crate::types::{HighlightRange, PropertyBag, PropertyTier, SearchType};
use crate::value::{display_string, is_big_string, is_json_like, is_xml_like};

use super::CellCursor;

/// Read-only editor for structured (JSON/XML) values.
pub const TEXT_COLORIZATION_EDITOR: &str = "textcolorization";

/// Read-only editor for very long values.
pub const BIG_TEXT_EDITOR: &str = "bigtext";

impl CellCursor {
    /// Which column variant applies to the current cell.
    pub fn property_tier(&self) -> Option<PropertyTier> {
        let column = self.column()?;
        let tier = if self.is_handle_column() {
            PropertyTier::RowHeader
        } else if self.is_tree_column() {
            let props = &column.properties;
            if self.is_header_row() && props.has_tree_header_column_header() {
                PropertyTier::TreeHeaderColumnHeader
            } else if self.data_cell.y == self.ctx.behavior.tree_header_row_index()
                && props.has_tree_header_properties()
            {
                PropertyTier::TreeHeaderRow
            } else {
                PropertyTier::TreeHeader
            }
        } else if self.is_data_row() {
            PropertyTier::Base
        } else if self.is_filter_row() {
            PropertyTier::Filter
        } else {
            PropertyTier::ColumnHeader
        };
        Some(tier)
    }

    /// Column-level properties for the current tier, without cell overrides.
    pub fn column_properties(&self) -> PropertyBag {
        match (self.column(), self.property_tier()) {
            (Some(column), Some(tier)) => column.properties.resolve(tier),
            _ => PropertyBag::new(),
        }
    }

    /// Cell-own overrides, or `None` when none were ever written for this cell.
    pub fn cell_own_properties(&self) -> Option<PropertyBag> {
        let subgrid = self.subgrid()?;
        let column = self.column()?;
        subgrid.cell_own_properties(column, self.data_cell.y)
    }

    /// Effective property bag of the current cell.
    pub fn properties(&self) -> Rc<PropertyBag> {
        self.cache
            .properties
            .get_or_insert_with(self.generation, || Rc::new(self.resolve_properties()))
    }

    fn resolve_properties(&self) -> PropertyBag {
        let mut bag = self.column_properties();
        if let Some(own) = self.cell_own_properties() {
            bag.overlay(&own);
        }
        if let Some(defined) = self
            .subgrid()
            .and_then(|s| s.defined_cell_properties(self.value_cell.x, self.value_cell.y))
        {
            bag.overlay(&defined);
        }
        bag
    }

    pub fn cell_property(&self, key: &str) -> Option<Value> {
        self.properties().get(key).cloned()
    }

    /// Write a cell-own override for the current cell.
    pub fn set_cell_property(&mut self, key: &str, value: Value) {
        let (Some(subgrid), Some(column)) = (self.subgrid(), self.column()) else {
            return;
        };
        subgrid.set_cell_property(column, self.data_cell.y, key, value);
        self.cache.properties.invalidate();
        self.cache.formatted_value.invalidate();
    }

    // ------------------------------------------------------------------
    // Row properties
    // ------------------------------------------------------------------

    pub fn row_own_properties(&self) -> Option<PropertyBag> {
        let kind = self.subgrid_kind()?;
        self.ctx.behavior.row_properties(kind, self.data_cell.y)
    }

    pub fn row_property(&self, key: &str) -> Option<Value> {
        self.row_own_properties()?.get(key).cloned()
    }

    /// Set one row property, creating the row's property object as needed.
    pub fn set_row_property(&mut self, key: &str, value: Value) {
        let mut props = self.row_own_properties().unwrap_or_default();
        props.insert(key, value);
        self.set_row_properties(props);
    }

    /// Replace the row's property object.
    pub fn set_row_properties(&mut self, properties: PropertyBag) {
        let Some(kind) = self.subgrid_kind() else {
            return;
        };
        self.ctx
            .behavior
            .set_row_properties(kind, self.data_cell.y, properties);
        self.cache.formatted_value.invalidate();
    }

    // ------------------------------------------------------------------
    // Display
    // ------------------------------------------------------------------

    /// Display string of the raw value.
    pub fn to_str_value(&self) -> String {
        display_string(&self.value())
    }

    /// Formatted value, cached until retarget.
    pub fn formatted_value(&self) -> Rc<str> {
        self.cache.formatted_value.get_or_insert_with(self.generation, || {
            let props = self.properties();
            let is_header_row = self
                .row_own_properties()
                .is_some_and(|p| p.is_truthy("headerRow"));
            let text = self
                .ctx
                .grid
                .format_value(props.get("format"), &self.value(), is_header_row);
            Rc::from(text)
        })
    }

    /// Byte ranges of the formatted value matching the `highLightText` property.
    pub fn highlighted_chars(&self) -> Vec<HighlightRange> {
        let props = self.properties();
        let Some(text) = props.get_str("highLightText").filter(|t| !t.is_empty()) else {
            return Vec::new();
        };
        let search_type = self.column().map_or(SearchType::None, |c| c.search_type);
        if search_type == SearchType::None {
            return Vec::new();
        }
        let formatted = self.formatted_value();
        if formatted.is_empty() {
            return Vec::new();
        }
        let Some(regex) = self
            .subgrid()
            .and_then(|s| s.highlight_regex(text, search_type))
        else {
            return Vec::new();
        };
        regex
            .find_iter(&formatted)
            .map(|m| HighlightRange {
                from: m.start(),
                to: m.end(),
            })
            .collect()
    }

    pub fn is_value_url(&self) -> bool {
        self.subgrid().is_some_and(|s| s.is_value_url(&self.value()))
    }

    /// Row object of the data row, at the column's tree level.
    pub fn data_row(&self) -> Option<Value> {
        let tree_level = self.column().and_then(|c| c.tree_level);
        self.subgrid()?.row(self.data_cell.y, tree_level)
    }

    /// Row object backing the value cell.
    pub fn cell_data(&self) -> Option<Value> {
        self.subgrid()?
            .data_row_object(self.value_cell.x, self.value_cell.y)
    }

    // ------------------------------------------------------------------
    // Overflow classification
    // ------------------------------------------------------------------

    /// True when the display string reached `max_chars` and the untruncated
    /// value has to be fetched separately.
    pub fn requires_full_value(&self) -> bool {
        self.cache
            .requires_full_value
            .get_or_insert_with(self.generation, || {
                let max = self.ctx.grid.properties().max_chars;
                self.to_str_value().chars().count() >= max
            })
    }

    /// Store a value fetched out of band for the current cell.
    pub fn set_full_value(&mut self, value: Value) {
        self.cache.full_value.set(self.generation, Rc::new(value));
        self.cache.is_big_string.invalidate();
    }

    pub fn full_value(&self) -> Option<Rc<Value>> {
        self.cache.full_value.get(self.generation)
    }

    pub fn to_str_full_value(&self) -> String {
        self.full_value()
            .map(|v| display_string(&v))
            .unwrap_or_default()
    }

    pub fn is_json_value(&self) -> bool {
        self.cache
            .is_json_value
            .get_or_insert_with(self.generation, || is_json_like(&self.value()))
    }

    pub fn is_xml_value(&self) -> bool {
        self.cache
            .is_xml_value
            .get_or_insert_with(self.generation, || is_xml_like(&self.value()))
    }

    /// Whether the fetched full value is too long for the regular editor.
    pub fn is_big_string(&self) -> bool {
        self.cache.is_big_string.get_or_insert_with(self.generation, || {
            self.full_value().is_some_and(|v| is_big_string(&v))
        })
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// `editable` on data rows, `filterable` elsewhere; a truthy row property wins.
    pub fn is_cell_editable(&self) -> bool {
        let key = if self.is_data_row() {
            "editable"
        } else {
            "filterable"
        };
        if self.row_own_properties().is_some_and(|p| p.is_truthy(key)) {
            return true;
        }
        self.properties().is_truthy(key)
    }

    /// Editor to open for this cell.
    pub fn editor(&self) -> Option<String> {
        let configured = self.properties().get_str("editor").map(str::to_owned);
        if self.is_cell_editable() {
            return configured;
        }
        if self.is_json_value() || self.is_xml_value() {
            Some(TEXT_COLORIZATION_EDITOR.to_owned())
        } else if self.is_big_string() {
            Some(BIG_TEXT_EDITOR.to_owned())
        } else {
            configured
        }
    }
}
