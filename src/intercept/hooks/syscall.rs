// Raw syscall(2) fallback for runtimes that open devices without open()

use libc::{c_char, c_int, c_long};

use super::{OpenOutcome, after_open};
use crate::intercept::real::{self, set_errno};

/// Only `SYS_open` and `SYS_openat` are inspected; every other number is forwarded as is.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn syscall(
    number: c_long,
    a1: c_long,
    a2: c_long,
    a3: c_long,
    a4: c_long,
    a5: c_long,
    a6: c_long,
) -> c_long {
    let ret = unsafe { real::syscall(number, [a1, a2, a3, a4, a5, a6]) };
    let (call, path) = match number {
        libc::SYS_open => ("syscall(open)", a1 as *const c_char),
        libc::SYS_openat => ("syscall(openat)", a2 as *const c_char),
        _ => return ret,
    };
    match unsafe { after_open(call, path, ret as c_int) } {
        Some(OpenOutcome::Rejected) => {
            real::close(ret as c_int);
            set_errno(libc::EPERM);
            -1
        }
        _ => ret,
    }
}
