//! Domain models for Goal Breaker.
//!
//! Both entities are owned by the backend. The client only reads them and keeps
//! copies in memory for the lifetime of a session.
//!
//! - [`Goal`]: A user-submitted objective with its backend-generated breakdown.
//! - [`Task`]: One ordered step within a goal's breakdown.

mod goal;
mod task;

pub use goal::*;
pub use task::*;
