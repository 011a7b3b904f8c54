//! Durable vote store adapters

mod json_store;

pub use json_store::JsonVoteStore;
