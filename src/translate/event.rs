// One raw event in, at most one event out

use crate::config::{AxisRule, AxisToButtons, ButtonRule, ThresholdButton};
use crate::device::{CapturedDescriptor, ThresholdState};
use crate::protocol::{EV_ABS, EV_KEY, EV_SYN, InputEvent, SYN_DROPPED};

use super::math::map_axis_value;

/// Translate one event; `None` means the event is dropped.
pub fn translate(desc: &mut CapturedDescriptor, event: InputEvent) -> Option<InputEvent> {
    match event.type_ {
        EV_KEY => translate_button(desc, event),
        EV_ABS => translate_axis(desc, event),
        _ => Some(event),
    }
}

/// Like [`translate`], but a dropped event becomes SYN_DROPPED when the section asks for it.
pub fn translate_or_mark(desc: &mut CapturedDescriptor, event: InputEvent) -> Option<InputEvent> {
    match translate(desc, event) {
        Some(out) => Some(out),
        None if desc.section.syn_drop => Some(InputEvent {
            type_: EV_SYN,
            code: SYN_DROPPED,
            value: 0,
            ..event
        }),
        None => None,
    }
}

fn translate_button(desc: &mut CapturedDescriptor, event: InputEvent) -> Option<InputEvent> {
    match *desc.section.button(event.code) {
        ButtonRule::Unmapped if desc.section.drop_unmapped_buttons => None,
        ButtonRule::Unmapped => Some(event),
        ButtonRule::Disabled => None,
        ButtonRule::Button(map) => Some(InputEvent {
            code: map.target,
            value: if map.invert { 1 - event.value } else { event.value },
            ..event
        }),
        ButtonRule::Axis(map) => {
            let edge = if event.value != 0 {
                map.on_press
            } else {
                map.on_release
            }?;
            desc.synthetic[edge.axis as usize] = edge.value;
            Some(InputEvent {
                type_: EV_ABS,
                code: edge.axis,
                value: edge.value,
                ..event
            })
        }
    }
}

fn translate_axis(desc: &mut CapturedDescriptor, event: InputEvent) -> Option<InputEvent> {
    let source = event.code as usize;
    match *desc.section.axis(event.code) {
        AxisRule::Unmapped if desc.section.drop_unmapped_axes => None,
        AxisRule::Unmapped => Some(event),
        AxisRule::Disabled => None,
        AxisRule::Axis(map) => {
            let raw = desc.raw_ranges.get(source).copied().flatten();
            Some(InputEvent {
                code: map.target,
                value: map_axis_value(event.value, &map, raw),
                ..event
            })
        }
        AxisRule::Buttons(map) => {
            let state = desc.thresholds.get_mut(source)?;
            let (target, pressed) = step_thresholds(state, &map, event.value)?;
            Some(InputEvent {
                type_: EV_KEY,
                code: target,
                value: i32::from(pressed),
                ..event
            })
        }
    }
}

/// Advance the hysteresis of one axis. Returns the button and its new emitted
/// value when a half changes state; the low half is checked first and only the
/// half that emits changes its state.
pub fn step_thresholds(
    state: &mut ThresholdState,
    map: &AxisToButtons,
    value: i32,
) -> Option<(u16, bool)> {
    // Low half wins ties: keep it ahead of the high half.
    if let Some(low) = map.low {
        let next = if state.low {
            value < low.release
        } else {
            value <= low.press
        };
        if next != state.low {
            state.low = next;
            return Some((low.target, emitted(&low, next)));
        }
    }
    if let Some(high) = map.high {
        let next = if state.high {
            value > high.release
        } else {
            value >= high.press
        };
        if next != state.high {
            state.high = next;
            return Some((high.target, emitted(&high, next)));
        }
    }
    None
}

/// Button value reported for a half in the given press state.
pub fn emitted(half: &ThresholdButton, pressed: bool) -> bool {
    pressed != half.invert
}
