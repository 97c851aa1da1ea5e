// In-memory device answering queries the way the kernel does

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;

use libc::c_int;

use super::query::DeviceQuery;
use crate::protocol::{
    AbsBits, AbsInfo, EvdevQuery, InputId, IoctlRequest, JoydevQuery, KernelStruct, KeyBits,
    copy_c_string, copy_truncated,
};

#[derive(Clone, Debug)]
pub struct FakeDevice {
    pub name: String,
    pub id: InputId,
    pub uniq: String,
    pub keys: KeyBits,
    pub axes: AbsBits,
    pub abs_info: BTreeMap<u16, AbsInfo>,
    pub key_state: KeyBits,
    /// Queries that fail with EIO.
    pub broken: Vec<EvdevQuery>,
    /// Every request seen, for forwarding checks.
    pub seen: RefCell<Vec<IoctlRequest>>,
}

impl Default for FakeDevice {
    fn default() -> Self {
        Self {
            name: String::new(),
            id: InputId::zeroed(),
            uniq: String::new(),
            keys: KeyBits::new(),
            axes: AbsBits::new(),
            abs_info: BTreeMap::new(),
            key_state: KeyBits::new(),
            broken: Vec::new(),
            seen: RefCell::default(),
        }
    }
}

impl FakeDevice {
    /// Two sticks (axes 0,1,3,4), triggers (2,5), hat (16,17) and the usual buttons.
    pub fn gamepad() -> Self {
        let stick = AbsInfo {
            minimum: -32768,
            maximum: 32767,
            fuzz: 16,
            flat: 128,
            ..AbsInfo::zeroed()
        };
        let trigger = AbsInfo {
            minimum: 0,
            maximum: 255,
            ..AbsInfo::zeroed()
        };
        let hat = AbsInfo {
            minimum: -1,
            maximum: 1,
            ..AbsInfo::zeroed()
        };
        let abs_info: BTreeMap<u16, AbsInfo> = [
            (0, stick),
            (1, stick),
            (2, trigger),
            (3, stick),
            (4, stick),
            (5, trigger),
            (16, hat),
            (17, hat),
        ]
        .into_iter()
        .collect();
        Self {
            name: "Test Pad".into(),
            id: InputId {
                bustype: 3,
                vendor: 0x045e,
                product: 0x028e,
                version: 0x110,
            },
            uniq: "00:11:22".into(),
            keys: (0x130..=0x13e).filter(|c| *c != 0x132 && *c != 0x135).collect(),
            axes: abs_info.keys().copied().collect(),
            abs_info,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.into();
        self
    }

    pub fn forwarded(&self, request: IoctlRequest) -> bool {
        self.seen.borrow().contains(&request)
    }
}

impl DeviceQuery for FakeDevice {
    fn ioctl(&self, request: IoctlRequest, buf: &mut [u8]) -> io::Result<c_int> {
        self.seen.borrow_mut().push(request);
        if JoydevQuery::classify(request).is_some() {
            return Ok(copy_c_string(&self.name, buf) as c_int);
        }
        let Some(query) = EvdevQuery::classify(request) else {
            return Err(io::Error::from_raw_os_error(libc::ENOTTY));
        };
        if self.broken.contains(&query) {
            return Err(io::Error::from_raw_os_error(libc::EIO));
        }
        let len = match query {
            EvdevQuery::Name => copy_c_string(&self.name, buf),
            EvdevQuery::Uniq => copy_c_string(&self.uniq, buf),
            EvdevQuery::Id => {
                copy_truncated(self.id.as_bytes(), buf);
                0
            }
            EvdevQuery::KeyState => copy_truncated(self.key_state.as_bytes(), buf),
            EvdevQuery::KeyBits => copy_truncated(self.keys.as_bytes(), buf),
            EvdevQuery::AbsBits => copy_truncated(self.axes.as_bytes(), buf),
            EvdevQuery::AbsInfo(axis) => match self.abs_info.get(&axis) {
                Some(info) => {
                    copy_truncated(info.as_bytes(), buf);
                    0
                }
                None => return Err(io::Error::from_raw_os_error(libc::EINVAL)),
            },
        };
        Ok(len as c_int)
    }
}
