use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::Result;
use crate::device::{Channel, DataPoint, Device, DeviceCloud};
use crate::error::Error;
use crate::tuya::TuyaClient;

const DEVICES_ENDPOINT: &str = "/v1.0/devices";
const USERS_ENDPOINT: &str = "/v1.0/users";
const HOMES_ENDPOINT: &str = "/v1.0/homes";
const CLOUD_THING_ENDPOINT: &str = "/v2.0/cloud/thing";

#[derive(Serialize)]
struct CommandBatch<'batch> {
    commands: &'batch [DataPoint],
}

impl TuyaClient {
    /// All devices bound to the vendor user.
    pub async fn user_devices(&self, vendor_user_id: &str) -> Result<Vec<Device>> {
        let path = format!("{USERS_ENDPOINT}/{vendor_user_id}/devices");
        let result = self.execute(Method::GET, &path, None).await?;
        crate::decode("device list", result)
    }

    /// Ids of all devices bound to the vendor user.
    pub async fn user_device_ids(&self, vendor_user_id: &str) -> Result<Vec<String>> {
        let devices = self.user_devices(vendor_user_id).await?;
        Ok(devices.into_iter().map(|d| d.id).collect())
    }

    /// Sends a batch of data points to one device. The result is opaque.
    pub async fn post_commands(&self, device_id: &str, commands: &[DataPoint]) -> Result<Value> {
        let path = format!("{DEVICES_ENDPOINT}/{device_id}/commands");
        let body = serde_json::to_string(&CommandBatch { commands })
            .map_err(|e| Error::validation(format!("unable to encode commands: {e}")))?;
        self.execute(Method::POST, &path, Some(body)).await
    }

    /// Channel names of a multi-gang device. A missing result means no channels.
    pub async fn multi_channel_names(&self, device_id: &str) -> Result<Vec<Channel>> {
        let path = format!("{DEVICES_ENDPOINT}/{device_id}/multiple-names");
        let result = self.execute(Method::GET, &path, None).await?;
        if result.is_null() {
            return Ok(Vec::new());
        }
        crate::decode("channel list", result)
    }

    /// Devices in a home. Not used by the device service.
    pub async fn home_devices(&self, home_id: &str) -> Result<Value> {
        let path = format!("{HOMES_ENDPOINT}/{home_id}/devices");
        self.execute(Method::GET, &path, None).await
    }

    /// Shadow properties of a device. Not used by the device service.
    pub async fn shadow_properties(&self, device_id: &str) -> Result<Value> {
        let path = format!("{CLOUD_THING_ENDPOINT}/{device_id}/shadow/properties");
        self.execute(Method::GET, &path, None).await
    }
}

#[async_trait]
impl DeviceCloud for TuyaClient {
    async fn list_devices(&self, vendor_user_id: &str) -> Result<Vec<Device>> {
        self.user_devices(vendor_user_id).await
    }

    async fn send_commands(&self, device_id: &str, commands: &[DataPoint]) -> Result<Value> {
        self.post_commands(device_id, commands).await
    }

    async fn channel_names(&self, device_id: &str) -> Result<Vec<Channel>> {
        self.multi_channel_names(device_id).await
    }
}
