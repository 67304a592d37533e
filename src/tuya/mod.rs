//! Client for the Tuya OpenAPI.
//!
//! - bootstrap with an initial access token
//! - sign and execute calls, retrying once after token expiry
//! - decode the device, command and channel endpoints

mod client;
mod config;
mod endpoints;
mod policy;
pub mod types;

pub use client::{TOKEN_EXPIRED_CODE, TuyaClient};
pub use config::{DEFAULT_TIMEOUT, RawCredentials, TuyaConfig};
pub use policy::RefreshPolicy;
pub use types::{Envelope, RequestDescriptor};
