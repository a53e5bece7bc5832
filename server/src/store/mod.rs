//! In-memory list storage.

mod item;
mod repository;

pub use item::*;
pub use repository::*;
