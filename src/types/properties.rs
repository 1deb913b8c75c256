use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::value::is_truthy;

/// Flat key/value property map.
///
/// Resolved bags handed out by a cursor are read-only snapshots; cell-level
/// writes go to the subgrid's cell-own store instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBag(Map<String, Value>);

impl PropertyBag {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// JavaScript-style truthiness of a property (missing keys are falsy).
    pub fn is_truthy(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(is_truthy)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Copy every entry of `other` on top of `self` (later wins).
    pub fn overlay(&mut self, other: &PropertyBag) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for PropertyBag {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Which variant of a column's properties applies to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyTier {
    /// Plain column properties (data rows).
    Base,
    /// Row-number handle column.
    RowHeader,
    /// Tree column.
    TreeHeader,
    /// Tree column on the tree header row.
    TreeHeaderRow,
    /// Tree column on a header row.
    TreeHeaderColumnHeader,
    /// Filter row.
    Filter,
    /// Header, summary, totals and any other non-data row.
    ColumnHeader,
}

/// Header-row overrides layered on top of the tree-header variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TreeHeaderProperties {
    pub own: PropertyBag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_header: Option<PropertyBag>,
}

/// A column's base properties plus its per-row-type variants.
///
/// Variants only hold the keys they change; [`ColumnProperties::resolve`]
/// layers them over `base`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnProperties {
    pub base: PropertyBag,
    pub row_header: PropertyBag,
    pub tree_header: PropertyBag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree_header_properties: Option<TreeHeaderProperties>,
    pub filter_properties: PropertyBag,
    pub column_header: PropertyBag,
}

impl ColumnProperties {
    pub fn has_tree_header_properties(&self) -> bool {
        self.tree_header_properties.is_some()
    }

    pub fn has_tree_header_column_header(&self) -> bool {
        self.tree_header_properties
            .as_ref()
            .is_some_and(|t| t.column_header.is_some())
    }

    /// Flatten the requested tier into a fresh bag.
    pub fn resolve(&self, tier: PropertyTier) -> PropertyBag {
        let mut bag = self.base.clone();
        match tier {
            PropertyTier::Base => {}
            PropertyTier::RowHeader => bag.overlay(&self.row_header),
            PropertyTier::Filter => bag.overlay(&self.filter_properties),
            PropertyTier::ColumnHeader => bag.overlay(&self.column_header),
            PropertyTier::TreeHeader => bag.overlay(&self.tree_header),
            PropertyTier::TreeHeaderRow => {
                bag.overlay(&self.tree_header);
                if let Some(thp) = &self.tree_header_properties {
                    bag.overlay(&thp.own);
                }
            }
            PropertyTier::TreeHeaderColumnHeader => {
                bag.overlay(&self.tree_header);
                if let Some(thp) = &self.tree_header_properties {
                    bag.overlay(&thp.own);
                    if let Some(ch) = &thp.column_header {
                        bag.overlay(ch);
                    }
                }
            }
        }
        bag
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag(v: Value) -> PropertyBag {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_variant_overlays_base() {
        let props = ColumnProperties {
            base: bag(json!({"format": "fixed:2", "color": "black"})),
            column_header: bag(json!({"color": "grey"})),
            ..ColumnProperties::default()
        };

        let header = props.resolve(PropertyTier::ColumnHeader);
        assert_eq!(header.get_str("color"), Some("grey"));
        assert_eq!(header.get_str("format"), Some("fixed:2"));

        let base = props.resolve(PropertyTier::Base);
        assert_eq!(base.get_str("color"), Some("black"));
    }

    #[test]
    fn test_tree_header_chain() {
        let props = ColumnProperties {
            base: bag(json!({"font": "base", "align": "left"})),
            tree_header: bag(json!({"font": "tree"})),
            tree_header_properties: Some(TreeHeaderProperties {
                own: bag(json!({"align": "center"})),
                column_header: Some(bag(json!({"font": "tree-header"}))),
            }),
            ..ColumnProperties::default()
        };

        let row = props.resolve(PropertyTier::TreeHeaderRow);
        assert_eq!(row.get_str("font"), Some("tree"));
        assert_eq!(row.get_str("align"), Some("center"));

        let header = props.resolve(PropertyTier::TreeHeaderColumnHeader);
        assert_eq!(header.get_str("font"), Some("tree-header"));
        assert_eq!(header.get_str("align"), Some("center"));
    }

    #[test]
    fn test_truthiness() {
        let b = bag(json!({"a": true, "b": 0, "c": "", "d": "x", "e": null}));
        assert!(b.is_truthy("a"));
        assert!(!b.is_truthy("b"));
        assert!(!b.is_truthy("c"));
        assert!(b.is_truthy("d"));
        assert!(!b.is_truthy("e"));
        assert!(!b.is_truthy("missing"));
    }
}
