// Scripted host: fake devices per fd and queued read results

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::io;
use std::os::fd::RawFd;
use std::path::{Path, PathBuf};

use super::host::Host;
use crate::device::fake::FakeDevice;
use crate::device::{DeviceClass, DeviceQuery};
use crate::protocol::{EVENT_SIZE, InputEvent, KernelStruct};

#[derive(Debug, Default)]
pub struct FakeHost {
    pub devices: BTreeMap<RawFd, (DeviceClass, FakeDevice)>,
    /// Each real read consumes the front chunk, or part of it. Empty means EAGAIN.
    pub reads: RefCell<VecDeque<io::Result<Vec<u8>>>>,
    pub sysfs: PathBuf,
    missing: FakeDevice,
}

impl FakeHost {
    pub fn with_event(fd: RawFd, index: u32, device: FakeDevice) -> Self {
        let mut host = Self::default();
        host.devices.insert(fd, (DeviceClass::Event { index }, device));
        host
    }

    pub fn queue_events(&self, events: &[InputEvent]) {
        let mut bytes = vec![0u8; events.len() * EVENT_SIZE];
        for (ev, chunk) in events.iter().zip(bytes.chunks_exact_mut(EVENT_SIZE)) {
            ev.write_to(chunk);
        }
        self.reads.borrow_mut().push_back(Ok(bytes));
    }

    pub fn queue_bytes(&self, bytes: &[u8]) {
        self.reads.borrow_mut().push_back(Ok(bytes.to_vec()));
    }

    pub fn queue_error(&self, errno: i32) {
        self.reads
            .borrow_mut()
            .push_back(Err(io::Error::from_raw_os_error(errno)));
    }
}

impl Host for FakeHost {
    fn device(&self, fd: RawFd) -> impl DeviceQuery + '_ {
        self.devices
            .get(&fd)
            .map_or(&self.missing, |(_, device)| device)
    }

    fn device_class(&self, fd: RawFd) -> Option<DeviceClass> {
        self.devices.get(&fd).map(|(class, _)| *class)
    }

    fn read(&self, _fd: RawFd, buf: &mut [u8]) -> io::Result<usize> {
        let mut reads = self.reads.borrow_mut();
        let mut chunk = match reads.pop_front() {
            Some(Ok(chunk)) => chunk,
            Some(Err(e)) => return Err(e),
            None => return Err(io::Error::from_raw_os_error(libc::EAGAIN)),
        };
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n < chunk.len() {
            reads.push_front(Ok(chunk.split_off(n)));
        }
        Ok(n)
    }

    fn sysfs_root(&self) -> &Path {
        &self.sysfs
    }
}
