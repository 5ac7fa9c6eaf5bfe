pub mod aggregate;

pub use aggregate::{supplier_facets, Supplier, SupplierDto};
