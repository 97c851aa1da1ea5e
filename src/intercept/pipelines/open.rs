// Open: classify the new descriptor, then capture, alias, reject or pass it

use std::os::fd::RawFd;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn};

use crate::device::pure::classify::identity;
use crate::device::sysfs::{event_input_id, event_name, event_sibling};
use crate::device::{DeviceClass, DeviceQuery, JoystickAlias, identify, initialize, select_section};
use crate::intercept::Remapper;
use crate::intercept::host::Host;
use crate::intercept::registry::Captured;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenOutcome {
    /// Not ours; the caller gets the real descriptor untouched.
    Passed,
    /// Event device now translated through a section.
    Intercepted,
    /// Joystick device whose name query is overridden.
    Renamed,
    /// The caller must close the real descriptor and fail with EPERM.
    Rejected,
}

/// Decide what happens to a freshly opened `fd`. `call` and `path` only feed the log.
pub fn on_open(
    remapper: &Remapper,
    host: &impl Host,
    call: &str,
    path: &str,
    fd: RawFd,
) -> OpenOutcome {
    // a number reused behind our back (dup2, close_range) must not inherit state
    remapper.registry.remove(fd);

    let outcome = match host.device_class(fd) {
        None => OpenOutcome::Passed,
        Some(DeviceClass::Event { index }) => open_event(remapper, host, fd, index),
        Some(DeviceClass::Joystick { index }) => open_joystick(remapper, host, fd, index),
    };
    match outcome {
        OpenOutcome::Passed => {}
        OpenOutcome::Intercepted => info!("[{call}/{fd}] Intercepted {path}"),
        OpenOutcome::Renamed => info!("[{call}/{fd}] Renaming {path}"),
        OpenOutcome::Rejected => info!("[{call}/{fd}] Rejecting open of {path}"),
    }
    outcome
}

fn unmatched(remapper: &Remapper) -> OpenOutcome {
    if remapper.drop_unmatched {
        OpenOutcome::Rejected
    } else {
        OpenOutcome::Passed
    }
}

fn open_event(remapper: &Remapper, host: &impl Host, fd: RawFd, index: u32) -> OpenOutcome {
    let device = host.device(fd);
    let identity = identify(&device, index);
    let Some(section) = select_section(&remapper.sections, &identity) else {
        return unmatched(remapper);
    };
    match initialize(Arc::clone(section), &device, &identity, &remapper.mismatches) {
        Ok(desc) => {
            remapper
                .registry
                .insert(fd, Captured::Event(Arc::new(Mutex::new(desc))));
            OpenOutcome::Intercepted
        }
        Err(e) => {
            warn!("{}: {e}; passing through unmodified", identity.name);
            OpenOutcome::Passed
        }
    }
}

/// jsN is matched through its eventM sibling in sysfs, without opening it.
fn open_joystick(remapper: &Remapper, host: &impl Host, fd: RawFd, index: u32) -> OpenOutcome {
    let root = host.sysfs_root();
    let Some(event) = event_sibling(root, index) else {
        return OpenOutcome::Passed;
    };
    let name = event_name(root, event).or_else(|| host.device(fd).joystick_name().ok());
    let identity = identity(name, event_input_id(root, event), event);

    let Some(section) = select_section(&remapper.sections, &identity) else {
        return unmatched(remapper);
    };
    match (&section.rename, section.jsrename) {
        (Some(name), true) => {
            let alias = JoystickAlias {
                section_name: section.display_name().to_string(),
                name: name.clone(),
            };
            remapper
                .registry
                .insert(fd, Captured::Joystick(Arc::new(alias)));
            OpenOutcome::Renamed
        }
        _ => OpenOutcome::Passed,
    }
}
