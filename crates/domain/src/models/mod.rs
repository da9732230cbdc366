//! Domain models, grouped by resource.

pub mod admin;
pub mod claim;
pub mod item;
pub mod user;

pub use admin::*;
pub use claim::*;
pub use item::*;
pub use user::*;
