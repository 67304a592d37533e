use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;
use crate::device::{DataPoint, Device, DeviceCloud, enrich};
use crate::error::Error;

/// Resolves a caller identity to the vendor user id linked to it.
///
/// Implementations return an [`Error::account_not_linked`] error when the
/// identity has no linked vendor account.
#[async_trait]
pub trait AccountResolver: Send + Sync {
    async fn vendor_user_id(&self, user_id: &str) -> Result<String>;
}

/// Caller-facing device operations.
pub struct DeviceService {
    accounts: Arc<dyn AccountResolver>,
    cloud: Arc<dyn DeviceCloud>,
}

impl DeviceService {
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountResolver>, cloud: Arc<dyn DeviceCloud>) -> Self {
        Self { accounts, cloud }
    }

    /// Devices of the caller, with channel names for multi-gang devices.
    pub async fn list(&self, user_id: &str) -> Result<Vec<Device>> {
        let vendor_user_id = self.accounts.vendor_user_id(user_id).await?;
        let devices = self.cloud.list_devices(&vendor_user_id).await?;
        if devices.is_empty() {
            return Ok(devices);
        }

        Ok(enrich(&self.cloud, devices).await)
    }

    /// Ids of the caller's devices.
    pub async fn device_ids(&self, user_id: &str) -> Result<Vec<String>> {
        let vendor_user_id = self.accounts.vendor_user_id(user_id).await?;
        self.owned_ids(&vendor_user_id).await
    }

    /// Sends commands to a device after checking the caller owns it.
    pub async fn send_commands(
        &self,
        user_id: &str,
        device_id: &str,
        commands: &[DataPoint],
    ) -> Result<Value> {
        if device_id.trim().is_empty() {
            return Err(Error::validation("device id is required"));
        }
        if commands.is_empty() {
            return Err(Error::validation("commands cannot be empty"));
        }

        let vendor_user_id = self.accounts.vendor_user_id(user_id).await?;
        let owned = self.owned_ids(&vendor_user_id).await?;
        if !owned.iter().any(|id| id == device_id) {
            return Err(Error::device_not_owned(device_id));
        }

        self.cloud.send_commands(device_id, commands).await
    }

    async fn owned_ids(&self, vendor_user_id: &str) -> Result<Vec<String>> {
        let devices = self.cloud.list_devices(vendor_user_id).await?;
        Ok(devices.into_iter().map(|d| d.id).collect())
    }
}
