//! Reusable view components.

pub mod pagination;

pub use pagination::Pagination;
