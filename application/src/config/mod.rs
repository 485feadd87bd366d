//! Application-level configuration.
//!
//! - [`ReviewParams`] controls a review cycle (override threshold, deadline,
//!   explicit agent list)
//! - [`ReviewStandards`] is handed to every agent as its quality bar

pub mod review_params;

pub use review_params::{ReviewParams, ReviewStandards};
