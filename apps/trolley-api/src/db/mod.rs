pub mod kv;
pub mod store;
