// Exported libc entry points that shadow the originals under LD_PRELOAD
//
// Optional arguments of variadic entry points (open's mode, ioctl's argp) are
// taken as fixed parameters; both supported ABIs pass them in the same registers.

#[cfg(all(feature = "syscall-hook", target_os = "linux", target_arch = "x86_64"))]
mod syscall;

use std::borrow::Cow;
use std::ffi::{CStr, c_void};
use std::io;
use std::slice;

use libc::{FILE, c_char, c_int, c_ulong, mode_t, size_t, ssize_t};

use super::pipelines::{OpenOutcome, answer_query, forget, on_open, query_of, read_captured};
use super::real::{self, LibcHost, errno, set_errno};
use super::state;
use crate::protocol::IoctlRequest;
use crate::translate::Answer;

unsafe fn path_text<'a>(path: *const c_char) -> Cow<'a, str> {
    if path.is_null() {
        return Cow::Borrowed("");
    }
    unsafe { CStr::from_ptr(path) }.to_string_lossy()
}

/// Run the open pipeline on a descriptor the real call returned. The caller's
/// errno survives unless the open is rejected.
unsafe fn after_open(call: &str, path: *const c_char, fd: c_int) -> Option<OpenOutcome> {
    let remapper = state()?;
    if fd < 0 {
        return None;
    }
    let saved = errno();
    let outcome = on_open(remapper, &LibcHost, call, &unsafe { path_text(path) }, fd);
    set_errno(saved);
    Some(outcome)
}

unsafe fn finish_open(call: &str, path: *const c_char, fd: c_int) -> c_int {
    match unsafe { after_open(call, path, fd) } {
        Some(OpenOutcome::Rejected) => {
            real::close(fd);
            set_errno(libc::EPERM);
            -1
        }
        _ => fd,
    }
}

unsafe fn finish_fopen(call: &str, path: *const c_char, file: *mut FILE) -> *mut FILE {
    if file.is_null() {
        return file;
    }
    let fd = unsafe { libc::fileno(file) };
    match unsafe { after_open(call, path, fd) } {
        Some(OpenOutcome::Rejected) => {
            unsafe { real::fclose(file) };
            set_errno(libc::EPERM);
            std::ptr::null_mut()
        }
        _ => file,
    }
}

fn finish_read(result: io::Result<usize>) -> ssize_t {
    match result {
        Ok(n) => n as ssize_t,
        Err(e) => {
            set_errno(e.raw_os_error().unwrap_or(libc::EIO));
            -1
        }
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn open(path: *const c_char, flags: c_int, mode: mode_t) -> c_int {
    let fd = unsafe { real::open(path, flags, mode) };
    unsafe { finish_open("open", path, fd) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn open64(path: *const c_char, flags: c_int, mode: mode_t) -> c_int {
    let fd = unsafe { real::open64(path, flags, mode) };
    unsafe { finish_open("open64", path, fd) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn openat(
    dirfd: c_int,
    path: *const c_char,
    flags: c_int,
    mode: mode_t,
) -> c_int {
    let fd = unsafe { real::openat(dirfd, path, flags, mode) };
    unsafe { finish_open("openat", path, fd) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn openat64(
    dirfd: c_int,
    path: *const c_char,
    flags: c_int,
    mode: mode_t,
) -> c_int {
    let fd = unsafe { real::openat64(dirfd, path, flags, mode) };
    unsafe { finish_open("openat64", path, fd) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn fopen(path: *const c_char, mode: *const c_char) -> *mut FILE {
    let file = unsafe { real::fopen(path, mode) };
    unsafe { finish_fopen("fopen", path, file) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn fopen64(path: *const c_char, mode: *const c_char) -> *mut FILE {
    let file = unsafe { real::fopen64(path, mode) };
    unsafe { finish_fopen("fopen64", path, file) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn fclose(file: *mut FILE) -> c_int {
    if let Some(remapper) = state() {
        if !file.is_null() {
            forget(remapper, unsafe { libc::fileno(file) });
        }
    }
    unsafe { real::fclose(file) }
}

#[unsafe(no_mangle)]
pub extern "C" fn close(fd: c_int) -> c_int {
    if let Some(remapper) = state() {
        forget(remapper, fd);
    }
    real::close(fd)
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn read(fd: c_int, buf: *mut c_void, count: size_t) -> ssize_t {
    let desc = state().and_then(|r| r.registry.descriptor(fd));
    match desc {
        Some(desc) if !buf.is_null() => {
            let out = unsafe { slice::from_raw_parts_mut(buf.cast::<u8>(), count) };
            finish_read(read_captured(&LibcHost, fd, &desc, out))
        }
        _ => unsafe { real::read(fd, buf, count) },
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn __read_chk(
    fd: c_int,
    buf: *mut c_void,
    count: size_t,
    buflen: size_t,
) -> ssize_t {
    let desc = state().and_then(|r| r.registry.descriptor(fd));
    match desc {
        // an overflowing request still reaches the real check and aborts there
        Some(desc) if !buf.is_null() && count <= buflen => {
            let out = unsafe { slice::from_raw_parts_mut(buf.cast::<u8>(), count) };
            finish_read(read_captured(&LibcHost, fd, &desc, out))
        }
        _ => unsafe { real::read_chk(fd, buf, count, buflen) },
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn ioctl(fd: c_int, request: c_ulong, argp: *mut c_void) -> c_int {
    let Some(captured) = state().and_then(|r| r.registry.get(fd)) else {
        return unsafe { real::ioctl(fd, request, argp) };
    };
    let req = IoctlRequest(request);
    let query = query_of(&captured, req);
    let Some(query) = query.filter(|_| !argp.is_null()) else {
        return unsafe { real::ioctl(fd, request, argp) };
    };
    let arg = unsafe { slice::from_raw_parts_mut(argp.cast::<u8>(), req.size()) };
    match answer_query(&LibcHost, fd, &captured, query, arg) {
        Answer::Forward => unsafe { real::ioctl(fd, request, argp) },
        Answer::Reply(ret) => ret,
        Answer::Fail(code) => {
            set_errno(code);
            -1
        }
    }
}
