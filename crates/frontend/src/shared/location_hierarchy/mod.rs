pub mod directory;
pub mod handle;
pub mod pickers;

pub use directory::HttpLocationDirectory;
pub use handle::LocationHierarchyHandle;
pub use pickers::LocationPickers;
