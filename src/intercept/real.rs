// Original libc entry points, resolved with dlsym(RTLD_NEXT)

use std::ffi::{CStr, c_void};
use std::io;
use std::mem;
use std::os::fd::RawFd;
use std::path::Path;
use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};

use libc::{FILE, c_char, c_int, c_ulong, mode_t, size_t, ssize_t};

use super::host::Host;
use crate::device::sysfs::SYSFS_INPUT;
use crate::device::{DeviceClass, RealDevice, device_class};
use crate::protocol::IoctlRequest;

/// Lazily resolved address of the next definition of `name`. Lookups are
/// lock-free so hooks may run before or during the library constructor.
pub struct RealFn {
    name: &'static CStr,
    slot: AtomicPtr<c_void>,
}

impl RealFn {
    pub const fn new(name: &'static CStr) -> Self {
        Self {
            name,
            slot: AtomicPtr::new(ptr::null_mut()),
        }
    }

    pub fn get(&self) -> Option<*mut c_void> {
        let cached = self.slot.load(Ordering::Acquire);
        if !cached.is_null() {
            return Some(cached);
        }
        let found = unsafe { libc::dlsym(libc::RTLD_NEXT, self.name.as_ptr()) };
        if found.is_null() {
            return None;
        }
        self.slot.store(found, Ordering::Release);
        Some(found)
    }
}

static OPEN: RealFn = RealFn::new(c"open");
static OPEN64: RealFn = RealFn::new(c"open64");
static OPENAT: RealFn = RealFn::new(c"openat");
static OPENAT64: RealFn = RealFn::new(c"openat64");
static FOPEN: RealFn = RealFn::new(c"fopen");
static FOPEN64: RealFn = RealFn::new(c"fopen64");
static FCLOSE: RealFn = RealFn::new(c"fclose");
static CLOSE: RealFn = RealFn::new(c"close");
static READ: RealFn = RealFn::new(c"read");
static READ_CHK: RealFn = RealFn::new(c"__read_chk");
static IOCTL: RealFn = RealFn::new(c"ioctl");
#[cfg(all(feature = "syscall-hook", target_os = "linux", target_arch = "x86_64"))]
static SYSCALL: RealFn = RealFn::new(c"syscall");

type OpenFn = unsafe extern "C" fn(*const c_char, c_int, ...) -> c_int;
type OpenAtFn = unsafe extern "C" fn(c_int, *const c_char, c_int, ...) -> c_int;
type FopenFn = unsafe extern "C" fn(*const c_char, *const c_char) -> *mut FILE;
type FcloseFn = unsafe extern "C" fn(*mut FILE) -> c_int;
type CloseFn = unsafe extern "C" fn(c_int) -> c_int;
type ReadFn = unsafe extern "C" fn(c_int, *mut c_void, size_t) -> ssize_t;
type ReadChkFn = unsafe extern "C" fn(c_int, *mut c_void, size_t, size_t) -> ssize_t;
type IoctlFn = unsafe extern "C" fn(c_int, c_ulong, ...) -> c_int;
#[cfg(all(feature = "syscall-hook", target_os = "linux", target_arch = "x86_64"))]
type SyscallFn = unsafe extern "C" fn(libc::c_long, ...) -> libc::c_long;

pub fn errno() -> c_int {
    unsafe { *libc::__errno_location() }
}

pub fn set_errno(value: c_int) {
    unsafe { *libc::__errno_location() = value }
}

/// The address as a function pointer of type `F`, or ENOSYS.
///
/// # Safety
///
/// `F` must be the C signature of the symbol `real` names.
unsafe fn resolve<F: Copy>(real: &RealFn) -> Option<F> {
    match real.get() {
        Some(addr) => Some(unsafe { mem::transmute_copy::<*mut c_void, F>(&addr) }),
        None => {
            set_errno(libc::ENOSYS);
            None
        }
    }
}

pub unsafe fn open(path: *const c_char, flags: c_int, mode: mode_t) -> c_int {
    match unsafe { resolve::<OpenFn>(&OPEN) } {
        Some(f) => unsafe { f(path, flags, mode) },
        None => -1,
    }
}

pub unsafe fn open64(path: *const c_char, flags: c_int, mode: mode_t) -> c_int {
    match unsafe { resolve::<OpenFn>(&OPEN64) } {
        Some(f) => unsafe { f(path, flags, mode) },
        None => -1,
    }
}

pub unsafe fn openat(dirfd: c_int, path: *const c_char, flags: c_int, mode: mode_t) -> c_int {
    match unsafe { resolve::<OpenAtFn>(&OPENAT) } {
        Some(f) => unsafe { f(dirfd, path, flags, mode) },
        None => -1,
    }
}

pub unsafe fn openat64(dirfd: c_int, path: *const c_char, flags: c_int, mode: mode_t) -> c_int {
    match unsafe { resolve::<OpenAtFn>(&OPENAT64) } {
        Some(f) => unsafe { f(dirfd, path, flags, mode) },
        None => -1,
    }
}

pub unsafe fn fopen(path: *const c_char, mode: *const c_char) -> *mut FILE {
    match unsafe { resolve::<FopenFn>(&FOPEN) } {
        Some(f) => unsafe { f(path, mode) },
        None => ptr::null_mut(),
    }
}

pub unsafe fn fopen64(path: *const c_char, mode: *const c_char) -> *mut FILE {
    match unsafe { resolve::<FopenFn>(&FOPEN64) } {
        Some(f) => unsafe { f(path, mode) },
        None => ptr::null_mut(),
    }
}

pub unsafe fn fclose(file: *mut FILE) -> c_int {
    match unsafe { resolve::<FcloseFn>(&FCLOSE) } {
        Some(f) => unsafe { f(file) },
        None => libc::EOF,
    }
}

pub fn close(fd: c_int) -> c_int {
    match unsafe { resolve::<CloseFn>(&CLOSE) } {
        Some(f) => unsafe { f(fd) },
        None => -1,
    }
}

pub unsafe fn read(fd: c_int, buf: *mut c_void, count: size_t) -> ssize_t {
    match unsafe { resolve::<ReadFn>(&READ) } {
        Some(f) => unsafe { f(fd, buf, count) },
        None => -1,
    }
}

pub unsafe fn read_chk(fd: c_int, buf: *mut c_void, count: size_t, buflen: size_t) -> ssize_t {
    match unsafe { resolve::<ReadChkFn>(&READ_CHK) } {
        Some(f) => unsafe { f(fd, buf, count, buflen) },
        None => -1,
    }
}

pub unsafe fn ioctl(fd: c_int, request: c_ulong, argp: *mut c_void) -> c_int {
    match unsafe { resolve::<IoctlFn>(&IOCTL) } {
        Some(f) => unsafe { f(fd, request, argp) },
        None => -1,
    }
}

#[cfg(all(feature = "syscall-hook", target_os = "linux", target_arch = "x86_64"))]
pub unsafe fn syscall(number: libc::c_long, args: [libc::c_long; 6]) -> libc::c_long {
    match unsafe { resolve::<SyscallFn>(&SYSCALL) } {
        Some(f) => unsafe { f(number, args[0], args[1], args[2], args[3], args[4], args[5]) },
        None => -1,
    }
}

/// Buffer-typed ioctl for [`RealDevice`]. `buf` covers the size encoded in `request`.
pub fn ioctl_into(fd: RawFd, request: IoctlRequest, buf: &mut [u8]) -> io::Result<c_int> {
    if buf.len() < request.size() {
        return Err(io::Error::from_raw_os_error(libc::EINVAL));
    }
    let ret = unsafe { ioctl(fd, request.0, buf.as_mut_ptr().cast()) };
    if ret < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(ret)
}

/// The process's own libc and sysfs.
#[derive(Clone, Copy, Debug, Default)]
pub struct LibcHost;

impl Host for LibcHost {
    fn device(&self, fd: RawFd) -> impl crate::device::DeviceQuery + '_ {
        RealDevice {
            fd,
            ioctl: ioctl_into,
        }
    }

    fn device_class(&self, fd: RawFd) -> Option<DeviceClass> {
        let mut st: libc::stat = unsafe { mem::zeroed() };
        if unsafe { libc::fstat(fd, &mut st) } != 0 {
            return None;
        }
        device_class(st.st_mode, st.st_rdev)
    }

    fn read(&self, fd: RawFd, buf: &mut [u8]) -> io::Result<usize> {
        let n = unsafe { read(fd, buf.as_mut_ptr().cast(), buf.len()) };
        if n < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(n as usize)
    }

    fn sysfs_root(&self) -> &Path {
        Path::new(SYSFS_INPUT)
    }
}
