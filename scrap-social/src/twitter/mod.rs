//! Twitter v1.1 API integration surface.
//!
//! Submodules provide the signed HTTP client wrapper, normalization helpers,
//! the interactive authorization flow, and strongly typed response models.
pub mod auth;
pub mod client;
pub mod extract;
pub mod types;

pub use client::TwitterApi;
