pub mod backend;
pub mod config;
pub mod error;
pub mod repo;
pub mod search;
pub mod server;
pub mod session;
pub mod views;

pub use backend::BackendClient;
pub use error::JobBoardError;
