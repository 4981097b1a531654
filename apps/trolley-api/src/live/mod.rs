//! Real-time delivery of list mutations to connected viewers.

pub mod events;
pub mod groups;
pub mod publish;
pub mod server;
