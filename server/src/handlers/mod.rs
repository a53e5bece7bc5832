//! Request handlers for list operations.

mod items;

pub use items::*;
