pub mod controller;
pub mod directory;

pub use controller::{
    HierarchyRoot, LoadOutcome, LocationEvent, LocationHierarchyController, LocationSnapshot,
    PendingLoad, SubscriptionId, TierOptions, TierStatus,
};
pub use directory::{load_pending, LocationDirectory};
