// Open descriptors under interception, keyed by fd

use std::collections::BTreeMap;
use std::os::fd::RawFd;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::device::{CapturedDescriptor, JoystickAlias};

pub type SharedDescriptor = Arc<Mutex<CapturedDescriptor>>;

#[derive(Clone, Debug)]
pub enum Captured {
    Event(SharedDescriptor),
    Joystick(Arc<JoystickAlias>),
}

/// The registry lock is only held for map operations, never across device I/O.
#[derive(Debug, Default)]
pub struct Registry {
    open: Mutex<BTreeMap<RawFd, Captured>>,
}

impl Registry {
    /// Returns the entry a reused fd number left behind, if any.
    pub fn insert(&self, fd: RawFd, captured: Captured) -> Option<Captured> {
        self.open.lock().insert(fd, captured)
    }

    pub fn get(&self, fd: RawFd) -> Option<Captured> {
        self.open.lock().get(&fd).cloned()
    }

    pub fn descriptor(&self, fd: RawFd) -> Option<SharedDescriptor> {
        match self.get(fd)? {
            Captured::Event(desc) => Some(desc),
            Captured::Joystick(_) => None,
        }
    }

    pub fn remove(&self, fd: RawFd) -> Option<Captured> {
        self.open.lock().remove(&fd)
    }

    pub fn len(&self) -> usize {
        self.open.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
