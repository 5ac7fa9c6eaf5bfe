pub mod handle;
pub mod panel;

pub use handle::{FacetFilterHandle, FacetView};
pub use panel::FacetFilterPanel;
