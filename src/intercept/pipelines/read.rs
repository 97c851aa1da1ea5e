// read: translate the raw event stream of a captured descriptor

use std::io;
use std::mem;
use std::os::fd::RawFd;

use crate::intercept::host::Host;
use crate::intercept::registry::SharedDescriptor;
use crate::translate::{absorb, raw_request_len, serve_pending};

/// Fill `out` with translated events. Undelivered output is served first; a
/// read whose events were all dropped is reissued. The descriptor lock is
/// released around the real read, which may block.
pub fn read_captured(
    host: &impl Host,
    fd: RawFd,
    desc: &SharedDescriptor,
    out: &mut [u8],
) -> io::Result<usize> {
    if out.is_empty() {
        return host.read(fd, out);
    }
    let want = raw_request_len(out.len());
    loop {
        let mut raw = {
            let mut d = desc.lock();
            if !d.pending.is_empty() {
                return Ok(serve_pending(&mut d, out));
            }
            mem::take(&mut d.carry)
        };
        let carried = raw.len();
        raw.resize(carried + want, 0);

        let n = match host.read(fd, &mut raw[carried..]) {
            Ok(n) => n,
            Err(e) => {
                raw.truncate(carried);
                desc.lock().carry = raw;
                return Err(e);
            }
        };
        raw.truncate(carried + n);
        if n == 0 {
            desc.lock().carry = raw;
            return Ok(0);
        }
        let delivered = absorb(&mut desc.lock(), raw, out);
        if delivered > 0 {
            return Ok(delivered);
        }
    }
}
