use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use crate::config::Section;
use crate::protocol::{ABS_CNT, AbsBits, InputId, KernelStruct, KeyBits};

/// Which input protocol a character device speaks, by minor number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceClass {
    /// `/dev/input/eventN`
    Event { index: u32 },
    /// `/dev/input/jsN`
    Joystick { index: u32 },
}

/// What the classifier matches sections against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub name: String,
    pub id: InputId,
    /// `BBBB-VVVV-PPPP-RRRR-N`
    pub pseudo_id: String,
}

/// Raw range of a source axis, fetched once per descriptor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawRange {
    pub minimum: i32,
    pub maximum: i32,
}

/// Press memory of the two threshold halves of one source axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThresholdState {
    pub low: bool,
    pub high: bool,
}

/// Everything an intercepted event device needs between open and close.
#[derive(Debug)]
pub struct CapturedDescriptor {
    pub section: Arc<Section>,
    pub device_name: String,
    /// Answer to EVIOCGID when the section overrides identity.
    pub id: InputId,
    pub keys: KeyBits,
    pub axes: AbsBits,
    pub raw_ranges: [Option<RawRange>; ABS_CNT],
    /// Last value of each button-driven axis.
    pub synthetic: [i32; ABS_CNT],
    pub thresholds: [ThresholdState; ABS_CNT],
    /// Trailing bytes of an incomplete raw event.
    pub carry: Vec<u8>,
    /// Translated bytes the caller had no room for yet.
    pub pending: Vec<u8>,
}

impl CapturedDescriptor {
    pub fn new(section: Arc<Section>, device_name: String) -> Self {
        Self {
            section,
            device_name,
            id: InputId::zeroed(),
            keys: KeyBits::new(),
            axes: AbsBits::new(),
            raw_ranges: [None; ABS_CNT],
            synthetic: [0; ABS_CNT],
            thresholds: [ThresholdState::default(); ABS_CNT],
            carry: Vec::new(),
            pending: Vec::new(),
        }
    }
}

/// A legacy joystick handle whose JSIOCGNAME answer is overridden.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoystickAlias {
    pub section_name: String,
    pub name: String,
}

/// A rule whose source the real device does not report; the rule is skipped.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
pub enum CapabilityMismatch {
    #[error("disabling button {target} due to missing button {missing}")]
    Button { missing: u16, target: u16 },
    #[error("disabling button {target} due to missing axis {missing}")]
    AxisButton { missing: u16, target: u16 },
    #[error("disabling axis {target} due to missing axis {missing}")]
    Axis { missing: u16, target: u16 },
    #[error("disabling axis {target} due to missing button {missing}")]
    ButtonAxis { missing: u16, target: u16 },
}

/// Mismatches already warned about. A device reopened under the same section
/// stays quiet.
#[derive(Debug, Default)]
pub struct MismatchLog {
    seen: Mutex<HashSet<(String, CapabilityMismatch)>>,
}

impl MismatchLog {
    /// True the first time `mismatch` is reported for `device`.
    pub fn first_report(&self, device: &str, mismatch: CapabilityMismatch) -> bool {
        self.seen.lock().insert((device.to_string(), mismatch))
    }
}

#[derive(Debug, Error)]
#[error("{query}: {source}")]
pub struct DeviceQueryError {
    pub query: &'static str,
    #[source]
    pub source: std::io::Error,
}

impl DeviceQueryError {
    pub fn raw_os_error(&self) -> i32 {
        self.source.raw_os_error().unwrap_or(libc::EIO)
    }
}
