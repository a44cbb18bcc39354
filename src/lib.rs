//! Artist Assist
//!
//! Paint mixing and color matching service built on `pigment-mix`.
//! This library exposes modules for integration testing.

pub mod api;
pub mod assets;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
