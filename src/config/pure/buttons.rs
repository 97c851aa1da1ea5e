// `buttons` list entries, including axis thresholds that drive a button

use super::builder::{SectionBuilder, axis_index, button_index};
use super::cursor::Cursor;
use crate::config::types::{AxisRule, AxisToButtons, ButtonRule, ButtonToButton, ThresholdButton};

pub fn apply_buttons(builder: &mut SectionBuilder, list: &str) -> Result<(), String> {
    let list = list.trim();
    if list.is_empty() {
        builder.next_auto_button()?;
        return Ok(());
    }
    builder.buttons_listed = true;
    for entry in list.split(',') {
        apply_button_entry(builder, entry.trim())?;
    }
    Ok(())
}

fn apply_button_entry(builder: &mut SectionBuilder, entry: &str) -> Result<(), String> {
    if entry.is_empty() {
        builder.next_auto_button()?;
        return Ok(());
    }
    let mut cur = Cursor::new(entry);

    if cur.eat('!') {
        let source = cur.button().ok_or("invalid !")?;
        if !cur.is_empty() {
            return Err("invalid !".into());
        }
        builder.buttons.set(button_index(source)?, ButtonRule::Disabled);
        return Ok(());
    }

    let explicit = explicit_target(&mut cur)?;
    let invert = cur.eat('-');

    if let Some(first) = cur.button() {
        let first = button_index(first)?;
        let last = range_end(&mut cur, first)?;
        let mut target = match explicit {
            Some(target) => target,
            None => builder.next_auto_button()?,
        };
        for source in first..=last {
            if source != first {
                target = match explicit {
                    Some(_) => button_index(u32::from(target) + 1)?,
                    None => builder.next_auto_button()?,
                };
            }
            builder
                .buttons
                .set(source, ButtonRule::Button(ButtonToButton { target, invert }));
        }
    } else if cur.eat_ignore_case("ax") && cur.at_digit() {
        let axis = axis_index(cur.unsigned().ok_or("invalid axis-to-button")?)?;
        let (press, release) = thresholds(&mut cur)?;
        let target = match explicit {
            Some(target) => target,
            None => builder.next_auto_button()?,
        };
        let half = ThresholdButton {
            target,
            press,
            release,
            invert,
        };
        let mut map = match builder.axes.get(axis) {
            Some(AxisRule::Buttons(map)) => *map,
            _ => AxisToButtons::default(),
        };
        if press > release {
            map.high = Some(half);
        } else {
            map.low = Some(half);
        }
        builder.axes.set(axis, AxisRule::Buttons(map));
    } else if invert {
        return Err("unexpected -".into());
    } else {
        return Err("invalid mapping entry".into());
    }

    if !cur.is_empty() {
        return Err("garbage at end of mapping".into());
    }
    Ok(())
}

fn explicit_target(cur: &mut Cursor<'_>) -> Result<Option<u16>, String> {
    let start = *cur;
    match cur.button() {
        Some(target) if cur.eat('=') => {
            if cur.is_empty() {
                return Err("unexpected =".into());
            }
            Ok(Some(button_index(target)?))
        }
        _ => {
            *cur = start;
            Ok(None)
        }
    }
}

fn range_end(cur: &mut Cursor<'_>, first: u16) -> Result<u16, String> {
    if cur.peek() != Some('-') || !cur.peek_second().is_some_and(|c| c.is_ascii_alphanumeric()) {
        return Ok(first);
    }
    cur.eat('-');
    let last = button_index(cur.button().ok_or("invalid range")?)?;
    if last < first {
        return Err("invalid range".into());
    }
    Ok(last)
}

/// `>P<R`: both thresholds, signed, and distinct.
fn thresholds(cur: &mut Cursor<'_>) -> Result<(i32, i32), String> {
    if !cur.eat('>') {
        return Err("invalid axis-to-button".into());
    }
    let press = cur.integer().ok_or("invalid axis-to-button")?;
    if !cur.eat('<') {
        return Err("invalid axis-to-button".into());
    }
    let release = cur.integer().ok_or("invalid axis-to-button")?;
    if press == release {
        return Err("invalid axis-to-button thresholds".into());
    }
    Ok((press, release))
}
