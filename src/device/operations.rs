// Device identification and descriptor initialization

use std::sync::Arc;

use tracing::{debug, warn};

use super::pure::capabilities::plan_capabilities;
use super::pure::classify::identity;
use super::query::DeviceQuery;
use super::types::{CapturedDescriptor, DeviceIdentity, DeviceQueryError, MismatchLog, RawRange};
use crate::config::Section;

/// Name and numeric identity of an event device; failed queries use fallbacks.
pub fn identify(device: &impl DeviceQuery, index: u32) -> DeviceIdentity {
    identity(device.name().ok(), device.id().ok(), index)
}

/// Build the per-descriptor state for a device governed by `section`.
/// Each mismatch is warned about once per device and section in `reported`.
pub fn initialize(
    section: Arc<Section>,
    device: &impl DeviceQuery,
    identity: &DeviceIdentity,
    reported: &MismatchLog,
) -> Result<CapturedDescriptor, DeviceQueryError> {
    let real_keys = device.key_bits()?;
    let real_axes = device.abs_bits()?;
    let plan = plan_capabilities(&section, &real_keys, &real_axes);
    let key = format!("{}/{}", identity.pseudo_id, section.display_name());
    for mismatch in &plan.mismatches {
        if reported.first_report(&key, *mismatch) {
            warn!("{}: {mismatch}", identity.name);
        }
    }

    let mut desc = CapturedDescriptor::new(Arc::clone(&section), identity.name.clone());
    for source in plan.calibrate {
        let info = device.abs_info(source)?;
        desc.raw_ranges[source as usize] = Some(RawRange {
            minimum: info.minimum,
            maximum: info.maximum,
        });
    }
    if let Some(over) = &section.id {
        desc.id = over.apply(identity.id);
    }
    desc.keys = plan.keys;
    desc.axes = plan.axes;
    debug!(
        "{} via section {}: keys {:?} axes {:?}",
        identity.name,
        section.display_name(),
        desc.keys,
        desc.axes
    );
    Ok(desc)
}
