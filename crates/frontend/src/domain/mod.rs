pub mod a002_supplier;
pub mod a003_project;
