//! Dashboard client for an EC2 instance backend.
//!
//! The library holds everything the `ec2dash` binary renders: a typed client for the
//! `/api/aws` backend, the [`services::InstanceController`] that drives list, create
//! and lifecycle actions, and the single [`models::DashboardState`] those actions update.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use error::{ApiError, ControllerError};
