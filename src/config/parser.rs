//! Line-oriented remap configuration compiler.
//!
//! One statement per line: a case-insensitive keyword, whitespace, then the
//! rest of the line. Blank lines and lines starting with `#` are ignored.
//! Statements before the first `section` go to the unnamed section.

use regex::Regex;

use super::error::ConfigError;
use super::pure::axes::apply_axes;
use super::pure::builder::{SectionBuilder, parse_id};
use super::pure::buttons::apply_buttons;
use super::pure::rescale::apply_rescale;
use super::types::Section;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Keyword {
    Section,
    Use,
    Match,
    Reject,
    Filter,
    Name,
    Id,
    Uniq,
    JsRename,
    Axes,
    Buttons,
    Rescale,
    PassAxes,
    PassButtons,
    SynDrop,
}

impl Keyword {
    fn parse(word: &str) -> Option<Self> {
        const KEYWORDS: &[(&str, Keyword)] = &[
            ("section", Keyword::Section),
            ("use", Keyword::Use),
            ("match", Keyword::Match),
            ("reject", Keyword::Reject),
            ("filter", Keyword::Filter),
            ("name", Keyword::Name),
            ("id", Keyword::Id),
            ("uniq", Keyword::Uniq),
            ("jsrename", Keyword::JsRename),
            ("axes", Keyword::Axes),
            ("buttons", Keyword::Buttons),
            ("rescale", Keyword::Rescale),
            ("pass_axes", Keyword::PassAxes),
            ("pass_buttons", Keyword::PassButtons),
            ("syn_drop", Keyword::SynDrop),
        ];
        KEYWORDS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(word))
            .map(|(_, kw)| *kw)
    }

    fn flag_name(self) -> Option<&'static str> {
        match self {
            Keyword::Filter => Some("filter"),
            Keyword::JsRename => Some("jsrename"),
            Keyword::PassAxes => Some("pass_axes"),
            Keyword::PassButtons => Some("pass_buttons"),
            Keyword::SynDrop => Some("syn_drop"),
            _ => None,
        }
    }
}

/// Compile configuration text into sections, in file order.
pub fn compile(text: &str) -> Result<Vec<Section>, ConfigError> {
    let mut builders = vec![SectionBuilder::new(None)];
    let mut current = 0;
    let mut statements = 0usize;
    // `use` is only valid right after a `section` line that opened a new section.
    let mut use_allowed = false;

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let (word, arg) = match trimmed.split_once(char::is_whitespace) {
            Some((word, arg)) => (word, arg.trim()),
            None => (trimmed, ""),
        };
        let keyword =
            Keyword::parse(word).ok_or_else(|| ConfigError::parse(line, "unknown keyword"))?;
        let fresh_section = std::mem::take(&mut use_allowed);
        statements += 1;

        if let Some(flag) = keyword.flag_name() {
            if !arg.is_empty() {
                return Err(ConfigError::parse(line, format!("{flag} takes no parameter")));
            }
        }

        let err = |message: String| ConfigError::parse(line, message);
        match keyword {
            Keyword::Section => {
                let name = (!arg.is_empty()).then(|| arg.to_string());
                if let Some(found) = builders.iter().position(|b| b.name == name) {
                    current = found;
                } else if statements == 1 && builders.len() == 1 {
                    builders[0].name = name;
                    use_allowed = true;
                } else {
                    builders.push(SectionBuilder::new(name));
                    current = builders.len() - 1;
                    use_allowed = true;
                }
            }
            Keyword::Use => {
                if !fresh_section {
                    return Err(err("use must be first in a section".into()));
                }
                let name = (!arg.is_empty()).then_some(arg);
                let source = builders
                    .iter()
                    .position(|b| b.name.as_deref() == name)
                    .ok_or_else(|| err("unknown section".into()))?;
                if source == current {
                    return Err(err("can't include self".into()));
                }
                let mut copy = builders[source].clone();
                copy.name = builders[current].name.take();
                builders[current] = copy;
            }
            Keyword::Match => {
                builders[current].match_pattern = Some(pattern(line, "match", arg)?);
            }
            Keyword::Reject => {
                builders[current].reject_pattern = Some(pattern(line, "reject", arg)?);
            }
            Keyword::Filter => builders[current].filter = true,
            Keyword::JsRename => builders[current].jsrename = true,
            Keyword::PassAxes => builders[current].pass_axes = true,
            Keyword::PassButtons => builders[current].pass_buttons = true,
            Keyword::SynDrop => builders[current].syn_drop = true,
            Keyword::Name => builders[current].rename = Some(arg.to_string()),
            Keyword::Uniq => builders[current].uniq = Some(arg.to_string()),
            Keyword::Id => builders[current].id = Some(parse_id(arg).map_err(err)?),
            Keyword::Axes => apply_axes(&mut builders[current], arg).map_err(err)?,
            Keyword::Buttons => apply_buttons(&mut builders[current], arg).map_err(err)?,
            Keyword::Rescale => apply_rescale(&mut builders[current], arg).map_err(err)?,
        }
    }

    builders.into_iter().map(SectionBuilder::finish).collect()
}

fn pattern(line: usize, kind: &'static str, arg: &str) -> Result<Regex, ConfigError> {
    Regex::new(arg).map_err(|source| ConfigError::Pattern { line, kind, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{AxisRule, AxisToAxis, ButtonRule, ButtonToButton, IdOverride};

    fn parse_error(text: &str) -> (usize, String) {
        match compile(text) {
            Err(ConfigError::Parse { line, message }) => (line, message),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn unnamed_section() {
        let sections = compile("# pad\nmatch Xbox\naxes 1,0\n\nbuttons b,a\n").unwrap();
        assert_eq!(sections.len(), 1);
        let s = &sections[0];
        assert_eq!(s.name, None);
        assert!(s.match_pattern.is_match("Microsoft Xbox Controller"));
        assert!(s.drop_unmapped_axes);
        assert!(s.drop_unmapped_buttons);
        assert_eq!(
            s.axis(1),
            &AxisRule::Axis(AxisToAxis {
                target: 0,
                invert: false,
                rescale: None
            })
        );
        assert_eq!(
            s.button(0x131),
            &ButtonRule::Button(ButtonToButton {
                target: 0x130,
                invert: false
            })
        );
    }

    #[test]
    fn first_section_line_names_the_unnamed_section() {
        let sections = compile("section pad\nmatch x\n").unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name.as_deref(), Some("pad"));
    }

    #[test]
    fn section_after_statements_is_new() {
        let sections = compile("match a\nsection pad\nmatch b\n").unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, None);
        assert_eq!(sections[1].name.as_deref(), Some("pad"));
    }

    #[test]
    fn sections_reopen() {
        let text = "section one\nmatch a\nsection two\nmatch b\nsection one\nfilter\n";
        let sections = compile(text).unwrap();
        assert_eq!(sections.len(), 2);
        assert!(sections[0].drop_unmatched_devices);
        assert!(!sections[1].drop_unmatched_devices);
    }

    #[test]
    fn use_copies_everything_but_the_name() {
        let text = "section base\nmatch pad\naxes -0\nid 3::\nsection derived\nuse base\nbuttons b\n";
        let sections = compile(text).unwrap();
        let derived = &sections[1];
        assert_eq!(derived.name.as_deref(), Some("derived"));
        assert!(derived.match_pattern.is_match("pad"));
        assert_eq!(derived.axes, sections[0].axes);
        assert_eq!(
            derived.id,
            Some(IdOverride {
                bustype: Some(3),
                ..IdOverride::default()
            })
        );
        assert!(derived.drop_unmapped_buttons);
        assert!(!sections[0].drop_unmapped_buttons);
    }

    /// Everything but the name, with patterns compared by source text.
    fn assert_same_rules(a: &Section, b: &Section) {
        assert_eq!(a.match_pattern.as_str(), b.match_pattern.as_str());
        assert_eq!(
            a.reject_pattern.as_ref().map(Regex::as_str),
            b.reject_pattern.as_ref().map(Regex::as_str)
        );
        assert_eq!(a.axes, b.axes);
        assert_eq!(a.buttons, b.buttons);
        assert_eq!(a.rename, b.rename);
        assert_eq!(a.id, b.id);
        assert_eq!(a.uniq, b.uniq);
        assert_eq!(a.jsrename, b.jsrename);
        assert_eq!(a.drop_unmapped_axes, b.drop_unmapped_axes);
        assert_eq!(a.drop_unmapped_buttons, b.drop_unmapped_buttons);
        assert_eq!(a.drop_unmatched_devices, b.drop_unmatched_devices);
        assert_eq!(a.syn_drop, b.syn_drop);
    }

    #[test]
    fn use_equals_writing_the_base_out() {
        let body = "match pad\nreject Motion\nname Renamed\nuniq u1\nid 3::\njsrename\n\
                    filter\nsyn_drop\npass_buttons\naxes 1,-0,3=b<<start\n\
                    buttons b=a,ax2>200<100\nrescale 1=0:255:1:2:3\n";
        // auto-assigned entries continue from the base's last assignment
        let extra = "axes 4\nbuttons 0x13b\n";
        let text = format!(
            "section a\n{body}section b\nuse a\n{extra}section c\n{body}{extra}"
        );
        let sections = compile(&text).unwrap();
        let (derived, written) = (&sections[1], &sections[2]);
        assert_eq!(derived.name.as_deref(), Some("b"));
        assert_same_rules(derived, written);

        assert_eq!(
            derived.axis(4),
            &AxisRule::Axis(AxisToAxis {
                target: 2,
                invert: false,
                rescale: None
            })
        );
        assert_eq!(
            derived.button(0x13b),
            &ButtonRule::Button(ButtonToButton {
                target: 0x132,
                invert: false
            })
        );
        assert!(derived.syn_drop && derived.jsrename && derived.drop_unmatched_devices);
        assert!(!derived.drop_unmapped_buttons);
        assert!(matches!(
            derived.axis(0),
            AxisRule::Axis(AxisToAxis {
                invert: true,
                rescale: Some(_),
                ..
            })
        ));
    }

    #[test]
    fn use_errors() {
        assert_eq!(
            parse_error("section a\nmatch x\nuse b\n"),
            (3, "use must be first in a section".into())
        );
        assert_eq!(
            parse_error("section a\nuse nowhere\n"),
            (2, "unknown section".into())
        );
        assert_eq!(
            parse_error("section a\nmatch x\nsection b\nmatch y\nsection a\nuse b\n"),
            (6, "use must be first in a section".into())
        );
        assert_eq!(
            parse_error("match x\nsection b\nuse b\n"),
            (3, "can't include self".into())
        );
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let sections = compile("MATCH pad\nSyn_Drop\nPASS_AXES\nAxes 0\n").unwrap();
        assert!(sections[0].syn_drop);
        assert!(!sections[0].drop_unmapped_axes);
    }

    #[test]
    fn statement_errors() {
        assert_eq!(parse_error("bogus 1\n"), (1, "unknown keyword".into()));
        assert_eq!(
            parse_error("match x\nfilter yes\n"),
            (2, "filter takes no parameter".into())
        );
        assert_eq!(parse_error("match x\naxes 0,q\n"), (2, "invalid mapping entry".into()));
        assert!(matches!(
            compile("match (\n"),
            Err(ConfigError::Pattern { line: 1, kind: "match", .. })
        ));
        assert!(matches!(
            compile("axes 0\n"),
            Err(ConfigError::MissingMatch { .. })
        ));
    }

    #[test]
    fn rename_uniq_reject_jsrename() {
        let text = "match pad\nreject Motion\nname My Pad\nuniq 00:11\njsrename\n";
        let s = &compile(text).unwrap()[0];
        assert_eq!(s.rename.as_deref(), Some("My Pad"));
        assert_eq!(s.uniq.as_deref(), Some("00:11"));
        assert!(s.jsrename);
        assert!(s.reject_pattern.as_ref().unwrap().is_match("pad Motion Sensors"));
    }

    #[test]
    fn targets_become_disabled_sources() {
        let s = &compile("match pad\naxes 0=1\n").unwrap()[0];
        assert_eq!(s.axis(0), &AxisRule::Disabled);
    }

    #[test]
    fn blank_axes_statement_does_not_filter() {
        let s = &compile("match pad\naxes\naxes 3\n").unwrap()[0];
        assert!(s.drop_unmapped_axes);
        assert_eq!(
            s.axis(3),
            &AxisRule::Axis(AxisToAxis {
                target: 1,
                invert: false,
                rescale: None
            })
        );
        let s = &compile("match pad\naxes\n").unwrap()[0];
        assert!(!s.drop_unmapped_axes);
    }
}
