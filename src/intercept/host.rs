// The uninstrumented operations the interception pipelines run against

use std::io;
use std::os::fd::RawFd;
use std::path::Path;

use crate::device::{DeviceClass, DeviceQuery};

pub trait Host {
    /// Capability queries on `fd`, bypassing interception.
    fn device(&self, fd: RawFd) -> impl DeviceQuery + '_;

    /// `None` for anything that is not an input character device.
    fn device_class(&self, fd: RawFd) -> Option<DeviceClass>;

    fn read(&self, fd: RawFd, buf: &mut [u8]) -> io::Result<usize>;

    /// Where `jsN`/`eventM` siblings are looked up.
    fn sysfs_root(&self) -> &Path;
}
