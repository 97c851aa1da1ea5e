// ioctl request encoding (asm-generic layout used by x86 and arm)

use libc::c_ulong;

use super::{AbsInfo, EV_ABS, EV_KEY, InputId};

const NR_BITS: u32 = 8;
const TYPE_BITS: u32 = 8;
const SIZE_BITS: u32 = 14;

const NR_SHIFT: u32 = 0;
const TYPE_SHIFT: u32 = NR_SHIFT + NR_BITS;
const SIZE_SHIFT: u32 = TYPE_SHIFT + TYPE_BITS;
const DIR_SHIFT: u32 = SIZE_SHIFT + SIZE_BITS;

pub const IOC_WRITE: u32 = 1;
pub const IOC_READ: u32 = 2;

const EVDEV_TYPE: u8 = b'E';
const JOYDEV_TYPE: u8 = b'j';

const NR_GID: u8 = 0x02;
const NR_GNAME: u8 = 0x06;
const NR_GUNIQ: u8 = 0x08;
const NR_GKEY: u8 = 0x18;
const NR_GBIT: u8 = 0x20;
const NR_GABS: u8 = 0x40;
const NR_JSGNAME: u8 = 0x13;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IoctlRequest(pub c_ulong);

impl IoctlRequest {
    pub const fn new(dir: u32, kind: u8, nr: u8, size: usize) -> Self {
        Self(
            ((dir as c_ulong) << DIR_SHIFT)
                | ((kind as c_ulong) << TYPE_SHIFT)
                | ((nr as c_ulong) << NR_SHIFT)
                | ((size as c_ulong) << SIZE_SHIFT),
        )
    }

    pub const fn dir(self) -> u32 {
        ((self.0 >> DIR_SHIFT) & 0x3) as u32
    }

    pub const fn kind(self) -> u8 {
        ((self.0 >> TYPE_SHIFT) & 0xff) as u8
    }

    pub const fn nr(self) -> u8 {
        ((self.0 >> NR_SHIFT) & 0xff) as u8
    }

    /// Size of the caller's argument buffer encoded in the request.
    pub const fn size(self) -> usize {
        ((self.0 >> SIZE_SHIFT) & ((1 << SIZE_BITS) - 1)) as usize
    }

    pub const fn eviocgid() -> Self {
        Self::new(IOC_READ, EVDEV_TYPE, NR_GID, std::mem::size_of::<InputId>())
    }

    pub const fn eviocgname(len: usize) -> Self {
        Self::new(IOC_READ, EVDEV_TYPE, NR_GNAME, len)
    }

    pub const fn eviocguniq(len: usize) -> Self {
        Self::new(IOC_READ, EVDEV_TYPE, NR_GUNIQ, len)
    }

    pub const fn eviocgkey(len: usize) -> Self {
        Self::new(IOC_READ, EVDEV_TYPE, NR_GKEY, len)
    }

    pub const fn eviocgbit(ev: u16, len: usize) -> Self {
        Self::new(IOC_READ, EVDEV_TYPE, NR_GBIT + ev as u8, len)
    }

    pub const fn eviocgabs(axis: u16) -> Self {
        Self::new(
            IOC_READ,
            EVDEV_TYPE,
            NR_GABS + axis as u8,
            std::mem::size_of::<AbsInfo>(),
        )
    }

    pub const fn jsiocgname(len: usize) -> Self {
        Self::new(IOC_READ, JOYDEV_TYPE, NR_JSGNAME, len)
    }
}

/// evdev queries whose answers a captured descriptor may rewrite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvdevQuery {
    Name,
    Id,
    Uniq,
    KeyState,
    KeyBits,
    AbsBits,
    AbsInfo(u16),
}

impl EvdevQuery {
    pub fn classify(req: IoctlRequest) -> Option<Self> {
        if req.kind() != EVDEV_TYPE || req.dir() != IOC_READ {
            return None;
        }
        match req.nr() {
            NR_GNAME => Some(Self::Name),
            NR_GID => Some(Self::Id),
            NR_GUNIQ => Some(Self::Uniq),
            NR_GKEY => Some(Self::KeyState),
            nr if nr == NR_GBIT + EV_KEY as u8 => Some(Self::KeyBits),
            nr if nr == NR_GBIT + EV_ABS as u8 => Some(Self::AbsBits),
            nr if (NR_GABS..NR_GABS + super::ABS_CNT as u8).contains(&nr) => {
                Some(Self::AbsInfo((nr - NR_GABS) as u16))
            }
            _ => None,
        }
    }
}

/// joydev queries a legacy alias may rewrite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoydevQuery {
    Name,
}

impl JoydevQuery {
    pub fn classify(req: IoctlRequest) -> Option<Self> {
        (req.kind() == JOYDEV_TYPE && req.dir() == IOC_READ && req.nr() == NR_JSGNAME)
            .then_some(Self::Name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Values from <linux/input.h> on x86_64.
    #[test]
    fn known_request_numbers() {
        assert_eq!(IoctlRequest::eviocgid().0, 0x8008_4502);
        assert_eq!(IoctlRequest::eviocgname(256).0, 0x8100_4506);
        assert_eq!(IoctlRequest::eviocgbit(EV_KEY, 96).0, 0x8060_4521);
        assert_eq!(IoctlRequest::eviocgabs(0).0, 0x8018_4540);
        assert_eq!(IoctlRequest::jsiocgname(128).0, 0x8080_6a13);
    }

    #[test]
    fn decode_fields() {
        let req = IoctlRequest::eviocgkey(96);
        assert_eq!(req.dir(), IOC_READ);
        assert_eq!(req.kind(), b'E');
        assert_eq!(req.nr(), 0x18);
        assert_eq!(req.size(), 96);
    }

    #[test]
    fn classify_evdev_queries() {
        assert_eq!(
            EvdevQuery::classify(IoctlRequest::eviocgname(64)),
            Some(EvdevQuery::Name)
        );
        assert_eq!(
            EvdevQuery::classify(IoctlRequest::eviocgid()),
            Some(EvdevQuery::Id)
        );
        assert_eq!(
            EvdevQuery::classify(IoctlRequest::eviocguniq(64)),
            Some(EvdevQuery::Uniq)
        );
        assert_eq!(
            EvdevQuery::classify(IoctlRequest::eviocgkey(96)),
            Some(EvdevQuery::KeyState)
        );
        assert_eq!(
            EvdevQuery::classify(IoctlRequest::eviocgbit(EV_KEY, 96)),
            Some(EvdevQuery::KeyBits)
        );
        assert_eq!(
            EvdevQuery::classify(IoctlRequest::eviocgbit(EV_ABS, 8)),
            Some(EvdevQuery::AbsBits)
        );
        assert_eq!(
            EvdevQuery::classify(IoctlRequest::eviocgabs(0x11)),
            Some(EvdevQuery::AbsInfo(0x11))
        );
    }

    #[test]
    fn writes_and_other_types_are_not_queries() {
        // EVIOCSABS(0)
        let set_abs = IoctlRequest::new(IOC_WRITE, b'E', 0xc0, 24);
        assert_eq!(EvdevQuery::classify(set_abs), None);
        // EVIOCGBIT(EV_SYN, ...) is forwarded untouched
        assert_eq!(EvdevQuery::classify(IoctlRequest::eviocgbit(0, 4)), None);
        assert_eq!(EvdevQuery::classify(IoctlRequest::jsiocgname(64)), None);
        assert_eq!(
            JoydevQuery::classify(IoctlRequest::jsiocgname(64)),
            Some(JoydevQuery::Name)
        );
        assert_eq!(JoydevQuery::classify(IoctlRequest::eviocgname(64)), None);
    }
}
