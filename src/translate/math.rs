// Integer rescale and inversion of axis values

use crate::config::{AxisToAxis, Rescale};
use crate::device::RawRange;

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Reflect `value` around the centre of `[minimum, maximum]`.
pub fn invert_within(value: i32, minimum: i32, maximum: i32) -> i32 {
    saturate(i64::from(minimum) + i64::from(maximum) - i64::from(value))
}

/// `(v - old_min) * (new_max - new_min + 1) / (old_max - old_min + 1) + new_min`
pub fn rescale(value: i32, raw: RawRange, to: &Rescale) -> i32 {
    let old_span = i64::from(raw.maximum) - i64::from(raw.minimum) + 1;
    let new_span = i64::from(to.maximum) - i64::from(to.minimum) + 1;
    if old_span <= 0 {
        return to.minimum;
    }
    saturate((i64::from(value) - i64::from(raw.minimum)) * new_span / old_span + i64::from(to.minimum))
}

/// Output value of an axis→axis rule; `raw` is `None` when uncalibrated.
pub fn map_axis_value(value: i32, rule: &AxisToAxis, raw: Option<RawRange>) -> i32 {
    match (rule.rescale, raw) {
        (Some(to), Some(raw)) => {
            let scaled = rescale(value, raw, &to);
            if rule.invert {
                invert_within(scaled, to.minimum, to.maximum)
            } else {
                scaled
            }
        }
        (None, Some(raw)) if rule.invert => invert_within(value, raw.minimum, raw.maximum),
        _ => value,
    }
}
