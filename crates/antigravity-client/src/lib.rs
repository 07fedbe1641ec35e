#![doc = include_str!("../README.md")]

mod client;
mod error;
mod source;
mod types;

pub use client::AntigravityClient;
pub use error::ClientError;
pub use types::{ClientConfig, RetryConfig, ServerStatus};
