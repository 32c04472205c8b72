//! API types for the swap submitter

pub mod swap;
pub mod transactions;
