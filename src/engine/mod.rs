//! Link classification and view-filtering engine.
//!
//! Everything here is synchronous and free of shared state; the API layer
//! feeds it snapshots and explicit parameters.

mod classify;
mod normalize;
mod theme;
mod vault;
mod view;

pub use classify::*;
pub use normalize::*;
pub use theme::*;
pub use vault::*;
pub use view::*;
