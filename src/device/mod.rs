//! Device listing, channel-name enrichment and command dispatch.

mod enrich;
mod service;
mod types;

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;

pub use enrich::{OUTLET_CATEGORY_PREFIX, SWITCH_CATEGORY, enrich, is_enrichment_candidate};
pub use service::{AccountResolver, DeviceService};
pub use types::{Channel, DataPoint, Device};

/// Device operations offered by a cloud IoT vendor.
#[async_trait]
pub trait DeviceCloud: Send + Sync {
    async fn list_devices(&self, vendor_user_id: &str) -> Result<Vec<Device>>;

    async fn send_commands(&self, device_id: &str, commands: &[DataPoint]) -> Result<Value>;

    async fn channel_names(&self, device_id: &str) -> Result<Vec<Channel>>;
}
