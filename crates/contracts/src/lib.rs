//! Общие типы и логика, разделяемые backend и frontend.
//!
//! Здесь живут модель локаций, контроллер каскадного выбора локации и
//! движок фасетных фильтров. Крейт не зависит ни от UI, ни от сети, поэтому
//! собирается и под wasm32, и нативно.

pub mod domain;
pub mod shared;
