//! Shared utilities for the scrap-journal workspace.
//!
//! Currently this only hosts [`observability`], the centralised tracing
//! initialisation used by the binary and by integration tests. It is
//! intentionally lightweight so every crate can depend on it without
//! dragging in heavy transitive costs.

pub mod observability;
