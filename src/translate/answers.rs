// Capability and identity answers for captured descriptors

use tracing::debug;

use crate::config::{AxisRule, ButtonRule};
use crate::device::{CapturedDescriptor, DeviceQuery};
use crate::protocol::{AbsInfo, EvdevQuery, KernelStruct, KeyBits, copy_c_string, copy_truncated};

use super::event::emitted;
use super::math::{invert_within, map_axis_value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Answer {
    /// Let the real device answer.
    Forward,
    /// Answer written to the caller's buffer; this is the ioctl return value.
    Reply(i32),
    /// Fail with this errno.
    Fail(i32),
}

pub fn answer(
    desc: &CapturedDescriptor,
    query: EvdevQuery,
    out: &mut [u8],
    device: &impl DeviceQuery,
) -> Answer {
    let section = &desc.section;
    let reply = match query {
        EvdevQuery::Name => match &section.rename {
            Some(name) => copy_c_string(name, out) as i32,
            None => return Answer::Forward,
        },
        EvdevQuery::Uniq => match &section.uniq {
            Some(uniq) => copy_c_string(uniq, out) as i32,
            None => return Answer::Forward,
        },
        EvdevQuery::Id => {
            if section.id.is_none() {
                return Answer::Forward;
            }
            copy_truncated(desc.id.as_bytes(), out);
            0
        }
        EvdevQuery::KeyBits => copy_truncated(desc.keys.as_bytes(), out) as i32,
        EvdevQuery::AbsBits => copy_truncated(desc.axes.as_bytes(), out) as i32,
        EvdevQuery::KeyState => match device.key_state() {
            Ok(real) => copy_truncated(key_snapshot(desc, &real).as_bytes(), out) as i32,
            Err(e) => return Answer::Fail(e.raw_os_error()),
        },
        EvdevQuery::AbsInfo(target) => match abs_info(desc, target, device) {
            Ok(Some(info)) => {
                copy_truncated(info.as_bytes(), out);
                0
            }
            Ok(None) => return Answer::Forward,
            Err(errno) => return Answer::Fail(errno),
        },
    };
    debug!("{}: answered {query:?}", desc.device_name);
    Answer::Reply(reply)
}

/// Real key state moved through the button rules.
pub fn key_snapshot(desc: &CapturedDescriptor, real: &KeyBits) -> KeyBits {
    let section = &desc.section;
    let mut snapshot = KeyBits::new();
    let mut spare = *real;

    for (source, rule) in section.buttons.iter() {
        match rule {
            ButtonRule::Unmapped => {}
            ButtonRule::Disabled | ButtonRule::Axis(_) => spare.clear(source),
            ButtonRule::Button(map) => {
                if desc.keys.test(map.target) && real.test(source) != map.invert {
                    snapshot.set(map.target);
                }
                spare.clear(source);
            }
        }
    }
    for (source, rule) in section.axes.iter() {
        if let AxisRule::Buttons(map) = rule {
            let state = desc.thresholds[source as usize];
            let halves = [(map.low, state.low), (map.high, state.high)];
            for (half, pressed) in halves {
                if let Some(half) = half {
                    if desc.keys.test(half.target) && emitted(&half, pressed) {
                        snapshot.set(half.target);
                    }
                }
            }
        }
    }
    if !section.drop_unmapped_buttons {
        snapshot.union_with(&spare);
    }
    snapshot
}

/// Axis info for an emulated axis index. `Ok(None)` forwards the query.
fn abs_info(
    desc: &CapturedDescriptor,
    target: u16,
    device: &impl DeviceQuery,
) -> Result<Option<AbsInfo>, i32> {
    let section = &desc.section;
    if desc.axes.test(target) {
        if let Some((source, map)) = section.axis_source_for(target) {
            let real = device.abs_info(source).map_err(|e| e.raw_os_error())?;
            let raw = desc.raw_ranges[source as usize];
            let info = match (map.rescale, raw) {
                (Some(to), Some(_)) => to.absinfo(map_axis_value(real.value, map, raw)),
                (None, _) if map.invert => AbsInfo {
                    value: invert_within(real.value, real.minimum, real.maximum),
                    ..real
                },
                _ => real,
            };
            return Ok(Some(info));
        }
        if section.is_synthetic_axis(target) {
            return Ok(Some(AbsInfo {
                value: desc.synthetic[target as usize],
                minimum: -1,
                maximum: 1,
                ..AbsInfo::zeroed()
            }));
        }
    }
    if *section.axis(target) == AxisRule::Unmapped && !section.drop_unmapped_axes {
        return Ok(None);
    }
    Err(libc::EINVAL)
}
