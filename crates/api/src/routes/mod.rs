pub mod admin;
pub mod claims;
pub mod health;
pub mod items;
pub mod users;
