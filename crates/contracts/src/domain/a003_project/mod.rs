pub mod aggregate;

pub use aggregate::{project_facets, Project, ProjectStatus};
