use std::sync::Arc;

use tokio::task::JoinSet;

use crate::device::{Device, DeviceCloud};

/// Category of multi-gang wall switches.
pub const SWITCH_CATEGORY: &str = "kg";
/// Category prefix shared by socket and power-strip types.
pub const OUTLET_CATEGORY_PREFIX: &str = "cz";

#[must_use]
pub fn is_enrichment_candidate(device: &Device) -> bool {
    if device.id.is_empty() {
        return false;
    }
    let category = device.category.to_lowercase();
    category == SWITCH_CATEGORY || category.starts_with(OUTLET_CATEGORY_PREFIX)
}

/// Fills in channel names for switch and outlet devices.
///
/// Every device's channel mapping is reset first. Candidates are fetched
/// concurrently, one task per device and no width limit; only the transport
/// timeout bounds a fetch. A failed fetch leaves that device's mapping empty
/// and is reported as a warning, never to the caller.
pub async fn enrich<C>(cloud: &Arc<C>, mut devices: Vec<Device>) -> Vec<Device>
where
    C: DeviceCloud + ?Sized + 'static,
{
    let mut tasks = JoinSet::new();

    for (index, device) in devices.iter_mut().enumerate() {
        device.channel_mapping.clear();
        if !is_enrichment_candidate(device) {
            continue;
        }

        let cloud = Arc::clone(cloud);
        let device_id = device.id.clone();
        tasks.spawn(async move {
            let channels = cloud.channel_names(&device_id).await;
            (index, device_id, channels)
        });
    }

    if tasks.is_empty() {
        return devices;
    }

    let mut failures = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, _, Ok(channels))) => {
                if let Some(device) = devices.get_mut(index) {
                    device.channel_mapping = channels;
                }
            }
            Ok((_, device_id, Err(e))) => {
                failures.push(format!("device {device_id}: {e}"));
            }
            Err(e) => failures.push(format!("enrichment task: {e}")),
        }
    }

    if !failures.is_empty() {
        report(&failures);
    }

    devices
}

#[cfg(feature = "tracing")]
fn report(failures: &[String]) {
    tracing::warn!(
        failed = failures.len(),
        errors = %failures.join("; "),
        "channel name enrichment incomplete"
    );
}

#[cfg(not(feature = "tracing"))]
fn report(_failures: &[String]) {}
