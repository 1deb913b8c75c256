//! Data types shared by the cursor and its collaborators.

mod column;
mod coords;
mod properties;
mod subgrid;

pub use column::*;
pub use coords::*;
pub use properties::*;
pub use subgrid::*;
