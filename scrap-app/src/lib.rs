//! Application wiring for the scrap-journal binary: the run controller and
//! the publishing dispatch. Split out of `main.rs` so integration tests can
//! drive a whole run against in-memory collaborators.

pub mod publish;
pub mod run;
