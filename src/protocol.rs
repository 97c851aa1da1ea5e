// Linux input protocol ABI: event records, identity/axis structs, device numbers

pub mod bits;
pub mod ioctl;
pub mod names;

pub use bits::{AbsBits, BitSet, KeyBits};
pub use ioctl::{EvdevQuery, IoctlRequest, JoydevQuery};

use evdev::{EventType, KeyCode, SynchronizationCode};

/// Character-device major shared by evdev and joydev nodes.
pub const INPUT_MAJOR: u32 = 13;
/// First minor of `/dev/input/jsN` (see drivers/input/joydev.c).
pub const JSDEV_MINOR0: u32 = 0;
pub const JSDEV_NMINOR: u32 = 16;
/// First minor of `/dev/input/eventN` (see drivers/input/evdev.c).
pub const EVDEV_MINOR0: u32 = 64;
pub const EVDEV_NMINOR: u32 = 32;

pub const ABS_MAX: u16 = 0x3f;
pub const ABS_CNT: usize = ABS_MAX as usize + 1;
pub const KEY_MAX: u16 = 0x2ff;
pub const KEY_CNT: usize = KEY_MAX as usize + 1;

pub const EV_SYN: u16 = EventType::SYNCHRONIZATION.0;
pub const EV_KEY: u16 = EventType::KEY.0;
pub const EV_ABS: u16 = EventType::ABSOLUTE.0;
pub const SYN_DROPPED: u16 = SynchronizationCode::SYN_DROPPED.0;

/// First output of button auto-assignment.
pub const BTN_SOUTH: u16 = KeyCode::BTN_SOUTH.0;

/// `struct input_event` exactly as read(2) returns it.
pub use libc::input_event as InputEvent;
/// `struct input_id`
pub use libc::input_id as InputId;
/// `struct input_absinfo`
pub use libc::input_absinfo as AbsInfo;

pub const EVENT_SIZE: usize = std::mem::size_of::<InputEvent>();

/// Kernel ABI structs exchanged with read(2) and ioctl(2) as raw bytes.
///
/// # Safety
///
/// Implementors are `repr(C)` without padding, and every bit pattern is a
/// valid value.
pub unsafe trait KernelStruct: Copy {
    fn zeroed() -> Self {
        // SAFETY: all-zero is a valid bit pattern per the trait contract.
        unsafe { std::mem::zeroed() }
    }

    fn as_bytes(&self) -> &[u8] {
        let len = std::mem::size_of::<Self>();
        // SAFETY: no padding; the slice covers exactly one Self.
        unsafe { std::slice::from_raw_parts((self as *const Self).cast::<u8>(), len) }
    }

    fn as_mut_bytes(&mut self) -> &mut [u8] {
        let len = std::mem::size_of::<Self>();
        // SAFETY: as above, and any bytes written form a valid Self.
        unsafe { std::slice::from_raw_parts_mut((self as *mut Self).cast::<u8>(), len) }
    }

    /// Decode one value from the front of `bytes`.
    fn read_from(bytes: &[u8]) -> Option<Self> {
        let mut value = Self::zeroed();
        let len = std::mem::size_of::<Self>();
        value.as_mut_bytes().copy_from_slice(bytes.get(..len)?);
        Some(value)
    }

    fn write_to(&self, out: &mut [u8]) {
        out[..std::mem::size_of::<Self>()].copy_from_slice(self.as_bytes());
    }
}

unsafe impl KernelStruct for InputEvent {}
unsafe impl KernelStruct for InputId {}
unsafe impl KernelStruct for AbsInfo {}

/// An event with a zero timestamp.
pub fn event(kind: u16, code: u16, value: i32) -> InputEvent {
    InputEvent {
        type_: kind,
        code,
        value,
        ..InputEvent::zeroed()
    }
}

/// Copy a C string answer the way the kernel's `str_to_user` does:
/// at most `out.len()` bytes including the terminating NUL. Returns bytes written.
pub fn copy_c_string(s: &str, out: &mut [u8]) -> usize {
    let mut len = s.len() + 1;
    if len > out.len() {
        len = out.len();
    }
    let body = len.min(s.len());
    out[..body].copy_from_slice(&s.as_bytes()[..body]);
    if len > s.len() {
        out[s.len()] = 0;
    }
    len
}

/// Copy a fixed-size answer, truncated to the caller's buffer. Returns bytes written.
pub fn copy_truncated(src: &[u8], out: &mut [u8]) -> usize {
    let len = src.len().min(out.len());
    out[..len].copy_from_slice(&src[..len]);
    len
}
