//! EC2 console output access.
//!
//! Defines the async interface for retrieving an instance's full console
//! output buffer, the error taxonomy the capture layer depends on, and a
//! concrete transport that drives the `aws` CLI as a subprocess.

pub mod api;
pub mod cli;

pub use api::{ConsoleOutputApi, Ec2Error};
pub use cli::AwsCliClient;
