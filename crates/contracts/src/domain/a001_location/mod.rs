pub mod aggregate;
pub mod selection;

pub use aggregate::{LocationId, LocationNode, LocationNodeDto, LocationTier};
pub use selection::{LocationQuery, LocationSelection};
