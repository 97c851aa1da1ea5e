// Byte-stream side of reads: carry partial raw records, hold undelivered output

use crate::device::CapturedDescriptor;
use crate::protocol::{EVENT_SIZE, InputEvent, KernelStruct};

use super::event::translate_or_mark;

/// Most events fetched by one real read, whatever the caller asked for.
pub const MAX_RAW_EVENTS: usize = 64;

/// Size of the real read for a caller asking for `count` bytes: whole events only.
pub fn raw_request_len(count: usize) -> usize {
    count.max(1).div_ceil(EVENT_SIZE).min(MAX_RAW_EVENTS) * EVENT_SIZE
}

/// Copy already-translated bytes to `out`. Returns how many were delivered.
pub fn serve_pending(desc: &mut CapturedDescriptor, out: &mut [u8]) -> usize {
    let n = desc.pending.len().min(out.len());
    out[..n].copy_from_slice(&desc.pending[..n]);
    desc.pending.drain(..n);
    n
}

/// Translate `raw` (carried bytes followed by a fresh real read), keep the
/// trailing incomplete record, deliver what fits and keep the rest pending.
/// Returns the delivered length; zero means every event was dropped.
pub fn absorb(desc: &mut CapturedDescriptor, mut raw: Vec<u8>, out: &mut [u8]) -> usize {
    let whole = raw.len() - raw.len() % EVENT_SIZE;
    desc.carry = raw.split_off(whole);

    let mut translated = Vec::with_capacity(whole);
    let mut record = [0u8; EVENT_SIZE];
    for chunk in raw.chunks_exact(EVENT_SIZE) {
        let Some(event) = InputEvent::read_from(chunk) else {
            continue;
        };
        if let Some(kept) = translate_or_mark(desc, event) {
            kept.write_to(&mut record);
            translated.extend_from_slice(&record);
        }
    }
    desc.pending = translated;
    serve_pending(desc, out)
}
