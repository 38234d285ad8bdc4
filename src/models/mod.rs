//! Data models for the LinkIt bookmark manager.
//!
//! These models match the frontend TypeScript interfaces for seamless interoperability.

mod link;
mod preview;
mod snapshot;
mod user;
mod view;

pub use link::*;
pub use preview::*;
pub use snapshot::*;
pub use user::*;
pub use view::*;
