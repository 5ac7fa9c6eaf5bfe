pub mod errors;
pub mod faceted_filter;
pub mod location_hierarchy;
