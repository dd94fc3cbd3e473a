pub mod client;
pub mod normalize;
pub mod tables;

pub use client::RowStoreClient;
