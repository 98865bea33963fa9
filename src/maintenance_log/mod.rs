//! Maintenance log module - stored issue records and their REST endpoints.

pub mod handlers;
pub mod models;
pub mod validation;

#[cfg(test)]
mod tests;
