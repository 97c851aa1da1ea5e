// Compiled remap configuration

use regex::Regex;

use crate::protocol::{AbsInfo, InputId};

/// What happens to one raw absolute axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AxisRule {
    #[default]
    Unmapped,
    Disabled,
    Axis(AxisToAxis),
    Buttons(AxisToButtons),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisToAxis {
    pub target: u16,
    pub invert: bool,
    pub rescale: Option<Rescale>,
}

/// Output calibration of a rescaled axis (`rescale T=min:max:fuzz:flat:res`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rescale {
    pub minimum: i32,
    pub maximum: i32,
    pub fuzz: i32,
    pub flat: i32,
    pub resolution: i32,
}

impl Rescale {
    pub fn absinfo(&self, value: i32) -> AbsInfo {
        AbsInfo {
            value,
            minimum: self.minimum,
            maximum: self.maximum,
            fuzz: self.fuzz,
            flat: self.flat,
            resolution: self.resolution,
        }
    }
}

/// Up to two buttons driven by threshold crossings of one axis.
/// The low half is pressed at or below its press threshold, the high half at or above.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AxisToButtons {
    pub low: Option<ThresholdButton>,
    pub high: Option<ThresholdButton>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThresholdButton {
    pub target: u16,
    pub press: i32,
    pub release: i32,
    pub invert: bool,
}

/// What happens to one raw key/button code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonRule {
    #[default]
    Unmapped,
    Disabled,
    Button(ButtonToButton),
    Axis(ButtonToAxis),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonToButton {
    pub target: u16,
    pub invert: bool,
}

/// Synthetic axis values emitted on each edge of a button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonToAxis {
    pub on_press: Option<AxisValue>,
    pub on_release: Option<AxisValue>,
}

impl ButtonToAxis {
    pub fn axes(&self) -> impl Iterator<Item = u16> + '_ {
        self.on_press
            .iter()
            .chain(self.on_release.iter())
            .map(|edge| edge.axis)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisValue {
    pub axis: u16,
    pub value: i32,
}

/// Rules indexed by raw source code; grows on demand, unset codes are `Default`.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleTable<R> {
    rules: Vec<R>,
}

impl<R> Default for RuleTable<R> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<R: Copy + Default + PartialEq> RuleTable<R> {
    pub fn get(&self, code: u16) -> Option<&R> {
        self.rules
            .get(code as usize)
            .filter(|rule| **rule != R::default())
    }

    pub fn set(&mut self, code: u16, rule: R) {
        let index = code as usize;
        if self.rules.len() <= index {
            self.rules.resize(index + 1, R::default());
        }
        self.rules[index] = rule;
    }

    pub fn is_set(&self, code: u16) -> bool {
        self.get(code).is_some()
    }

    /// Every code with a rule, in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &R)> + '_ {
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| **rule != R::default())
            .map(|(code, rule)| (code as u16, rule))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// `id B:V:P:R` override; `None` fields keep the device's real value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IdOverride {
    pub bustype: Option<u16>,
    pub vendor: Option<u16>,
    pub product: Option<u16>,
    pub version: Option<u16>,
}

impl IdOverride {
    pub fn apply(&self, real: InputId) -> InputId {
        InputId {
            bustype: self.bustype.unwrap_or(real.bustype),
            vendor: self.vendor.unwrap_or(real.vendor),
            product: self.product.unwrap_or(real.product),
            version: self.version.unwrap_or(real.version),
        }
    }
}

/// One configuration block. Immutable once compiled.
#[derive(Clone, Debug)]
pub struct Section {
    pub name: Option<String>,
    pub match_pattern: Regex,
    pub reject_pattern: Option<Regex>,
    pub axes: RuleTable<AxisRule>,
    pub buttons: RuleTable<ButtonRule>,
    pub rename: Option<String>,
    pub id: Option<IdOverride>,
    pub uniq: Option<String>,
    pub jsrename: bool,
    pub drop_unmapped_axes: bool,
    pub drop_unmapped_buttons: bool,
    pub drop_unmatched_devices: bool,
    pub syn_drop: bool,
}

impl Section {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("[unnamed]")
    }

    pub fn axis(&self, code: u16) -> &AxisRule {
        self.axes.get(code).unwrap_or(&AxisRule::Unmapped)
    }

    pub fn button(&self, code: u16) -> &ButtonRule {
        self.buttons.get(code).unwrap_or(&ButtonRule::Unmapped)
    }

    /// The axis→axis rule whose output is `target`, with its source axis.
    pub fn axis_source_for(&self, target: u16) -> Option<(u16, &AxisToAxis)> {
        self.axes.iter().find_map(|(source, rule)| match rule {
            AxisRule::Axis(map) if map.target == target => Some((source, map)),
            _ => None,
        })
    }

    /// True when some button synthesises axis `target`.
    pub fn is_synthetic_axis(&self, target: u16) -> bool {
        self.buttons.iter().any(|(_, rule)| match rule {
            ButtonRule::Axis(map) => map.axes().any(|axis| axis == target),
            _ => false,
        })
    }
}
