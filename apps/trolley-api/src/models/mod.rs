pub mod item;
pub mod list;
pub mod user;
