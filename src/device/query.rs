// Capability and identity queries against a device handle

use std::io;
use std::os::fd::RawFd;

use libc::c_int;

use super::types::DeviceQueryError;
use crate::protocol::{
    AbsBits, AbsInfo, EV_ABS, EV_KEY, InputId, IoctlRequest, KernelStruct, KeyBits,
};

pub const NAME_BUF_LEN: usize = 256;

/// Every query goes through `ioctl`; the provided methods decode the answers.
pub trait DeviceQuery {
    fn ioctl(&self, request: IoctlRequest, buf: &mut [u8]) -> io::Result<c_int>;

    fn name(&self) -> Result<String, DeviceQueryError> {
        let mut buf = [0u8; NAME_BUF_LEN];
        self.ioctl(IoctlRequest::eviocgname(buf.len()), &mut buf)
            .map_err(failed("EVIOCGNAME"))?;
        Ok(c_string(&buf))
    }

    fn id(&self) -> Result<InputId, DeviceQueryError> {
        let mut id = InputId::zeroed();
        self.ioctl(IoctlRequest::eviocgid(), id.as_mut_bytes())
            .map_err(failed("EVIOCGID"))?;
        Ok(id)
    }

    fn key_bits(&self) -> Result<KeyBits, DeviceQueryError> {
        let mut bits = KeyBits::new();
        let len = bits.as_bytes().len();
        self.ioctl(IoctlRequest::eviocgbit(EV_KEY, len), bits.as_mut_bytes())
            .map_err(failed("EVIOCGBIT(EV_KEY)"))?;
        Ok(bits)
    }

    fn abs_bits(&self) -> Result<AbsBits, DeviceQueryError> {
        let mut bits = AbsBits::new();
        let len = bits.as_bytes().len();
        self.ioctl(IoctlRequest::eviocgbit(EV_ABS, len), bits.as_mut_bytes())
            .map_err(failed("EVIOCGBIT(EV_ABS)"))?;
        Ok(bits)
    }

    fn abs_info(&self, axis: u16) -> Result<AbsInfo, DeviceQueryError> {
        let mut info = AbsInfo::zeroed();
        self.ioctl(IoctlRequest::eviocgabs(axis), info.as_mut_bytes())
            .map_err(failed("EVIOCGABS"))?;
        Ok(info)
    }

    fn key_state(&self) -> Result<KeyBits, DeviceQueryError> {
        let mut bits = KeyBits::new();
        let len = bits.as_bytes().len();
        self.ioctl(IoctlRequest::eviocgkey(len), bits.as_mut_bytes())
            .map_err(failed("EVIOCGKEY"))?;
        Ok(bits)
    }

    fn joystick_name(&self) -> Result<String, DeviceQueryError> {
        let mut buf = [0u8; NAME_BUF_LEN];
        self.ioctl(IoctlRequest::jsiocgname(buf.len()), &mut buf)
            .map_err(failed("JSIOCGNAME"))?;
        Ok(c_string(&buf))
    }
}

impl<T: DeviceQuery + ?Sized> DeviceQuery for &T {
    fn ioctl(&self, request: IoctlRequest, buf: &mut [u8]) -> io::Result<c_int> {
        (**self).ioctl(request, buf)
    }
}

fn failed(query: &'static str) -> impl FnOnce(io::Error) -> DeviceQueryError {
    move |source| DeviceQueryError { query, source }
}

fn c_string(buf: &[u8]) -> String {
    let end = buf.iter().position(|b| *b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

/// Uninstrumented `ioctl` entry point.
pub type RawIoctl = fn(RawFd, IoctlRequest, &mut [u8]) -> io::Result<c_int>;

/// A live descriptor queried through the original libc entry point.
#[derive(Clone, Copy)]
pub struct RealDevice {
    pub fd: RawFd,
    pub ioctl: RawIoctl,
}

impl DeviceQuery for RealDevice {
    fn ioctl(&self, request: IoctlRequest, buf: &mut [u8]) -> io::Result<c_int> {
        (self.ioctl)(self.fd, request, buf)
    }
}
