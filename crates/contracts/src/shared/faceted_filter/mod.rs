pub mod engine;
pub mod query;

pub use engine::{Facet, FacetedFilterEngine, FilterEvent, FilterSubscriptionId, Locatable};
pub use query::{FacetOptions, FacetOptionsResponse, FacetSelectionQuery, FACET_PARAM_PREFIX};
