pub mod operations;
pub mod pure;
pub mod query;
pub mod sysfs;
pub mod types;

#[cfg(test)]
pub mod fake;

pub use operations::{identify, initialize};
pub use pure::classify::{device_class, select_section};
pub use query::{DeviceQuery, RawIoctl, RealDevice};
pub use types::{
    CapabilityMismatch, CapturedDescriptor, DeviceClass, DeviceIdentity, DeviceQueryError,
    JoystickAlias, MismatchLog, RawRange, ThresholdState,
};
