// Parse-time section state and the post-pass that produces a Section

use std::collections::BTreeSet;

use regex::Regex;

use crate::config::error::ConfigError;
use crate::config::types::{AxisRule, ButtonRule, IdOverride, RuleTable, Section};
use crate::protocol::{ABS_MAX, BTN_SOUTH, KEY_MAX};

#[derive(Clone, Debug)]
pub struct SectionBuilder {
    pub name: Option<String>,
    pub match_pattern: Option<Regex>,
    pub reject_pattern: Option<Regex>,
    pub axes: RuleTable<AxisRule>,
    pub buttons: RuleTable<ButtonRule>,
    pub rename: Option<String>,
    pub id: Option<IdOverride>,
    pub uniq: Option<String>,
    pub jsrename: bool,
    pub filter: bool,
    pub syn_drop: bool,
    pub axes_listed: bool,
    pub buttons_listed: bool,
    pub pass_axes: bool,
    pub pass_buttons: bool,
    // Last auto-assigned outputs; `None` before the first assignment.
    auto_axis: Option<u16>,
    auto_button: Option<u16>,
}

impl SectionBuilder {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            match_pattern: None,
            reject_pattern: None,
            axes: RuleTable::default(),
            buttons: RuleTable::default(),
            rename: None,
            id: None,
            uniq: None,
            jsrename: false,
            filter: false,
            syn_drop: false,
            axes_listed: false,
            buttons_listed: false,
            pass_axes: false,
            pass_buttons: false,
            auto_axis: None,
            auto_button: None,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("[unnamed]")
    }

    /// Output axes already produced by some rule of either table.
    pub fn axis_targets(&self) -> BTreeSet<u16> {
        let from_axes = self.axes.iter().filter_map(|(_, rule)| match rule {
            AxisRule::Axis(map) => Some(map.target),
            _ => None,
        });
        let from_buttons = self
            .buttons
            .iter()
            .flat_map(|(_, rule)| match rule {
                ButtonRule::Axis(map) => map.axes().collect::<Vec<_>>(),
                _ => Vec::new(),
            });
        from_axes.chain(from_buttons).collect()
    }

    /// Output buttons already produced by some rule of either table.
    pub fn button_targets(&self) -> BTreeSet<u16> {
        let from_buttons = self.buttons.iter().filter_map(|(_, rule)| match rule {
            ButtonRule::Button(map) => Some(map.target),
            _ => None,
        });
        let from_axes = self.axes.iter().flat_map(|(_, rule)| match rule {
            AxisRule::Buttons(map) => [map.low, map.high]
                .into_iter()
                .flatten()
                .map(|half| half.target)
                .collect::<Vec<_>>(),
            _ => Vec::new(),
        });
        from_buttons.chain(from_axes).collect()
    }

    pub fn next_auto_axis(&mut self) -> Result<u16, String> {
        let used = self.axis_targets();
        let mut next = self.auto_axis.map_or(0, |last| last + 1);
        while used.contains(&next) {
            next += 1;
        }
        if next > ABS_MAX {
            return Err("no free output axis".into());
        }
        self.auto_axis = Some(next);
        Ok(next)
    }

    pub fn next_auto_button(&mut self) -> Result<u16, String> {
        let used = self.button_targets();
        let mut next = self.auto_button.map_or(BTN_SOUTH, |last| last + 1);
        while used.contains(&next) {
            next += 1;
        }
        if next > KEY_MAX {
            return Err("no free output button".into());
        }
        self.auto_button = Some(next);
        Ok(next)
    }

    /// Disable every rule target whose own slot is still unmapped, check the
    /// match pattern and derive the drop flags.
    pub fn finish(mut self) -> Result<Section, ConfigError> {
        for axis in self.axis_targets() {
            if !self.axes.is_set(axis) {
                self.axes.set(axis, AxisRule::Disabled);
            }
        }
        for button in self.button_targets() {
            if !self.buttons.is_set(button) {
                self.buttons.set(button, ButtonRule::Disabled);
            }
        }

        let Some(match_pattern) = self.match_pattern else {
            return Err(ConfigError::MissingMatch {
                section: self.name.unwrap_or_else(|| "[unnamed]".into()),
            });
        };

        Ok(Section {
            name: self.name,
            match_pattern,
            reject_pattern: self.reject_pattern,
            axes: self.axes,
            buttons: self.buttons,
            rename: self.rename,
            id: self.id,
            uniq: self.uniq,
            jsrename: self.jsrename,
            drop_unmapped_axes: self.axes_listed && !self.pass_axes,
            drop_unmapped_buttons: self.buttons_listed && !self.pass_buttons,
            drop_unmatched_devices: self.filter,
            syn_drop: self.syn_drop,
        })
    }
}

pub fn axis_index(value: u32) -> Result<u16, String> {
    u16::try_from(value)
        .ok()
        .filter(|axis| *axis <= ABS_MAX)
        .ok_or_else(|| format!("axis {value} out of range"))
}

pub fn button_index(value: u32) -> Result<u16, String> {
    u16::try_from(value)
        .ok()
        .filter(|button| *button <= KEY_MAX)
        .ok_or_else(|| format!("button {value} out of range"))
}

/// `B:V:P:R` in hex; blank fields keep the device's value.
pub fn parse_id(text: &str) -> Result<IdOverride, String> {
    let mut fields = text.split(':').map(str::trim);
    let mut next = || -> Result<Option<u16>, String> {
        match fields.next() {
            None | Some("") => Ok(None),
            Some(field) => u16::from_str_radix(field, 16)
                .map(Some)
                .map_err(|_| format!("invalid id field {field:?}")),
        }
    };
    let id = IdOverride {
        bustype: next()?,
        vendor: next()?,
        product: next()?,
        version: next()?,
    };
    if fields.next().is_some() {
        return Err("garbage at end of id".into());
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{AxisToAxis, ButtonToButton};

    #[test]
    fn auto_axes_skip_used_targets() {
        let mut b = SectionBuilder::new(None);
        b.axes.set(
            5,
            AxisRule::Axis(AxisToAxis {
                target: 0,
                invert: false,
                rescale: None,
            }),
        );
        assert_eq!(b.next_auto_axis(), Ok(1));
        assert_eq!(b.next_auto_axis(), Ok(2));
    }

    #[test]
    fn auto_buttons_start_at_south() {
        let mut b = SectionBuilder::new(None);
        assert_eq!(b.next_auto_button(), Ok(0x130));
        b.buttons.set(
            0x100,
            ButtonRule::Button(ButtonToButton {
                target: 0x131,
                invert: false,
            }),
        );
        assert_eq!(b.next_auto_button(), Ok(0x132));
    }

    #[test]
    fn auto_axes_run_out() {
        let mut b = SectionBuilder::new(None);
        for _ in 0..=ABS_MAX {
            assert!(b.next_auto_axis().is_ok());
        }
        assert!(b.next_auto_axis().is_err());
    }

    #[test]
    fn finish_disables_unmapped_targets() {
        let mut b = SectionBuilder::new(Some("pad".into()));
        b.match_pattern = Some(Regex::new("pad").unwrap());
        b.axes.set(
            0,
            AxisRule::Axis(AxisToAxis {
                target: 1,
                invert: false,
                rescale: None,
            }),
        );
        b.axes_listed = true;
        let section = b.finish().unwrap();
        assert_eq!(section.axis(1), &AxisRule::Disabled);
        assert!(section.drop_unmapped_axes);
        assert!(!section.drop_unmapped_buttons);
    }

    #[test]
    fn finish_requires_match() {
        let err = SectionBuilder::new(Some("pad".into())).finish().unwrap_err();
        assert_eq!(err.to_string(), "section pad: match pattern required");
    }

    #[test]
    fn id_fields() {
        assert_eq!(
            parse_id("3:45e::110"),
            Ok(IdOverride {
                bustype: Some(3),
                vendor: Some(0x45e),
                product: None,
                version: Some(0x110),
            })
        );
        assert_eq!(parse_id(":054c"), Ok(IdOverride {
            vendor: Some(0x54c),
            ..IdOverride::default()
        }));
        assert!(parse_id("zz").is_err());
        assert!(parse_id("1:2:3:4:5").is_err());
    }

    #[test]
    fn index_limits() {
        assert_eq!(axis_index(0x3f), Ok(0x3f));
        assert!(axis_index(0x40).is_err());
        assert_eq!(button_index(0x2ff), Ok(0x2ff));
        assert!(button_index(0x300).is_err());
    }
}
