// Device class detection and section selection

use std::sync::Arc;

use crate::config::Section;
use crate::device::types::{DeviceClass, DeviceIdentity};
use crate::protocol::{
    EVDEV_MINOR0, EVDEV_NMINOR, INPUT_MAJOR, InputId, JSDEV_MINOR0, JSDEV_NMINOR, KernelStruct,
};

pub const NAME_UNAVAILABLE: &str = "ERROR: Device name unavailable";

/// Classify an `fstat` result. Anything but an input character device is `None`.
pub fn device_class(mode: libc::mode_t, rdev: libc::dev_t) -> Option<DeviceClass> {
    if mode & libc::S_IFMT != libc::S_IFCHR || libc::major(rdev) != INPUT_MAJOR {
        return None;
    }
    let minor = libc::minor(rdev);
    if (JSDEV_MINOR0..JSDEV_MINOR0 + JSDEV_NMINOR).contains(&minor) {
        Some(DeviceClass::Joystick {
            index: minor - JSDEV_MINOR0,
        })
    } else if (EVDEV_MINOR0..EVDEV_MINOR0 + EVDEV_NMINOR).contains(&minor) {
        Some(DeviceClass::Event {
            index: minor - EVDEV_MINOR0,
        })
    } else {
        None
    }
}

pub fn pseudo_id(id: &InputId, index: u32) -> String {
    format!(
        "{:04X}-{:04X}-{:04X}-{:04X}-{}",
        id.bustype, id.vendor, id.product, id.version, index
    )
}

/// Identity with the fallbacks used when a query fails.
pub fn identity(name: Option<String>, id: Option<InputId>, index: u32) -> DeviceIdentity {
    let id = id.unwrap_or_else(InputId::zeroed);
    DeviceIdentity {
        name: name.unwrap_or_else(|| NAME_UNAVAILABLE.to_string()),
        pseudo_id: pseudo_id(&id, index),
        id,
    }
}

/// Later sections take priority. A section is skipped when its reject pattern
/// matches either string, and selected when its match pattern matches either.
pub fn select_section<'a>(
    sections: &'a [Arc<Section>],
    identity: &DeviceIdentity,
) -> Option<&'a Arc<Section>> {
    let candidates = [identity.name.as_str(), identity.pseudo_id.as_str()];
    sections.iter().rev().find(|section| {
        let rejected = section
            .reject_pattern
            .as_ref()
            .is_some_and(|reject| candidates.iter().any(|s| reject.is_match(s)));
        !rejected && candidates.iter().any(|s| section.match_pattern.is_match(s))
    })
}
