// Library root: re-exports all modules so integration tests and embedding
// applications can access the engine's public API.

pub mod config;
pub mod draft;
pub mod error;
pub mod scoring;
pub mod sim;
pub mod teams;

pub use error::DraftError;
