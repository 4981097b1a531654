//! Shared building blocks: id generation schemes used across the workspace.

pub mod id;
pub mod snowflake;

pub use snowflake::SnowflakeGenerator;
