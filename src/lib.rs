pub mod config;
pub mod error;
pub mod extract;
pub mod publisher;
pub mod remote;
pub mod upload;

mod types;

pub use config::PublishOptions;
pub use error::{PublishError, Result};
pub use types::*;
