pub mod chunker;
pub mod extract;
pub mod fallback;
pub mod manager;
pub mod store;
pub mod types;
