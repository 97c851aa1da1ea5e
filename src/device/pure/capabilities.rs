// Emulated capability sets derived from a section and the real device bits

use crate::config::{AxisRule, ButtonRule, Section};
use crate::device::types::CapabilityMismatch;
use crate::protocol::{AbsBits, KeyBits};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CapabilityPlan {
    pub keys: KeyBits,
    pub axes: AbsBits,
    /// Source axes whose raw range the translator needs (invert or rescale).
    pub calibrate: Vec<u16>,
    pub mismatches: Vec<CapabilityMismatch>,
}

pub fn plan_capabilities(section: &Section, real_keys: &KeyBits, real_axes: &AbsBits) -> CapabilityPlan {
    let mut plan = CapabilityPlan::default();
    // Real capabilities not consumed by any rule.
    let mut spare_keys = *real_keys;
    let mut spare_axes = *real_axes;

    for (source, rule) in section.buttons.iter() {
        match rule {
            ButtonRule::Unmapped => {}
            ButtonRule::Disabled => spare_keys.clear(source),
            ButtonRule::Button(map) => {
                if !real_keys.test(source) {
                    plan.mismatches.push(CapabilityMismatch::Button {
                        missing: source,
                        target: map.target,
                    });
                    continue;
                }
                plan.keys.set(map.target);
                spare_keys.clear(source);
            }
            ButtonRule::Axis(map) => {
                if !real_keys.test(source) {
                    plan.mismatches.extend(map.axes().map(|target| {
                        CapabilityMismatch::ButtonAxis {
                            missing: source,
                            target,
                        }
                    }));
                    continue;
                }
                for axis in map.axes() {
                    plan.axes.set(axis);
                }
                spare_keys.clear(source);
            }
        }
    }

    for (source, rule) in section.axes.iter() {
        match rule {
            AxisRule::Unmapped => {}
            AxisRule::Disabled => spare_axes.clear(source),
            AxisRule::Axis(map) => {
                if !real_axes.test(source) {
                    plan.mismatches.push(CapabilityMismatch::Axis {
                        missing: source,
                        target: map.target,
                    });
                    continue;
                }
                plan.axes.set(map.target);
                spare_axes.clear(source);
                if map.invert || map.rescale.is_some() {
                    plan.calibrate.push(source);
                }
            }
            AxisRule::Buttons(map) => {
                let targets = [map.low, map.high].into_iter().flatten().map(|h| h.target);
                if !real_axes.test(source) {
                    plan.mismatches.extend(targets.map(|target| {
                        CapabilityMismatch::AxisButton {
                            missing: source,
                            target,
                        }
                    }));
                    continue;
                }
                for target in targets {
                    plan.keys.set(target);
                }
                spare_axes.clear(source);
            }
        }
    }

    if !section.drop_unmapped_buttons {
        plan.keys.union_with(&spare_keys);
    }
    if !section.drop_unmapped_axes {
        plan.axes.union_with(&spare_axes);
    }
    plan
}
