use serde::{Deserialize, Serialize};

/// Role of a subgrid (a named partition of rows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubgridKind {
    Header,
    Filter,
    Summary,
    TopTotals,
    #[default]
    Data,
    BottomTotals,
}

impl SubgridKind {
    pub fn is_data(self) -> bool {
        self == Self::Data
    }

    pub fn is_header(self) -> bool {
        self == Self::Header
    }

    pub fn is_filter(self) -> bool {
        self == Self::Filter
    }

    /// Summary rows include both totals subgrids.
    pub fn is_summary(self) -> bool {
        matches!(self, Self::Summary | Self::TopTotals | Self::BottomTotals)
    }
}
