//! View state, view-model derivation and text rendering.
//!
//! The flow is one-way: an [`Action`] mutates the [`ViewState`] through the
//! [`Controller`], [`derive`] turns the state into a [`ViewModel`], and
//! [`render`] draws it.

pub mod controller;
pub mod render;
pub mod state;
pub mod view;

pub use controller::{Action, Completion, Controller};
pub use render::render;
pub use state::ViewState;
pub use view::{derive, ViewModel};
