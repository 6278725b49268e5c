mod api;
mod config;
mod provider;
mod session_store;
mod storage;

#[cfg(test)]
pub mod testing;

pub use api::*;
pub use config::*;
pub use provider::*;
pub use session_store::*;
pub use storage::*;
