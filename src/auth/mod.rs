//! Request signing and access-token lifecycle.

pub mod sign;
pub mod token;

use secrecy::SecretString;

use crate::Result;
use crate::error::Error;

pub use sign::Signature;
pub use token::{Token, TokenManager};

/// Static application credentials issued by the vendor.
#[derive(Clone, Debug)]
pub struct Credentials {
    access_id: String,
    access_secret: SecretString,
}

impl Credentials {
    pub fn new<S: Into<String>>(access_id: S, access_secret: SecretString) -> Result<Self> {
        let access_id = access_id.into();
        if access_id.trim().is_empty() {
            return Err(Error::validation("access id must not be empty"));
        }

        Ok(Self {
            access_id,
            access_secret,
        })
    }

    #[must_use]
    pub fn access_id(&self) -> &str {
        &self.access_id
    }

    pub(crate) fn access_secret(&self) -> &SecretString {
        &self.access_secret
    }
}
