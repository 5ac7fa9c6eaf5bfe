pub mod api_utils;
pub mod components;
pub mod faceted_filter;
pub mod icons;
pub mod location_hierarchy;
