pub mod cli;
pub mod config;
pub mod error;
pub mod generate;
pub mod prompt;
pub mod session;
pub mod state;
pub mod store;

pub use error::{AppError, Result};
