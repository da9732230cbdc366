//! Repository implementations.

pub mod admin;
pub mod claim;
pub mod item;
pub mod user;

pub use admin::AdminRepository;
pub use claim::{ClaimLifecycleError, ClaimRepository};
pub use item::{ItemRepository, ItemUpdate};
pub use user::UserRepository;
