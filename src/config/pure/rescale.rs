// `rescale T=min:max:fuzz:flat:res` entries

use super::builder::{SectionBuilder, axis_index};
use super::cursor::Cursor;
use crate::config::types::{AxisRule, AxisToAxis, Rescale};

pub fn apply_rescale(builder: &mut SectionBuilder, list: &str) -> Result<(), String> {
    for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (target, rescale) = parse_entry(entry)?;
        attach(builder, target, rescale)?;
    }
    Ok(())
}

fn parse_entry(entry: &str) -> Result<(u16, Rescale), String> {
    let mut cur = Cursor::new(entry);
    let target = axis_index(cur.unsigned().ok_or("invalid rescale axis")?)?;
    if !cur.eat('=') {
        return Err("rescale w/o =".into());
    }

    let mut fields = [0i32; 5];
    for (i, field) in fields.iter_mut().enumerate() {
        if i > 0 && !cur.eat(':') {
            break;
        }
        *field = cur.integer().unwrap_or(0);
    }
    if !cur.is_empty() {
        return Err("invalid rescale entry".into());
    }

    let [minimum, maximum, fuzz, flat, resolution] = fields;
    if maximum <= minimum {
        return Err("invalid rescale range".into());
    }
    Ok((
        target,
        Rescale {
            minimum,
            maximum,
            fuzz,
            flat,
            resolution,
        },
    ))
}

/// Attach to the lowest source already mapped onto `target`, else map `target` onto itself.
fn attach(builder: &mut SectionBuilder, target: u16, rescale: Rescale) -> Result<(), String> {
    let existing = builder.axes.iter().find_map(|(source, rule)| match rule {
        AxisRule::Axis(map) if map.target == target => Some((source, *map)),
        _ => None,
    });
    match existing {
        Some((source, map)) => builder.axes.set(
            source,
            AxisRule::Axis(AxisToAxis {
                rescale: Some(rescale),
                ..map
            }),
        ),
        None if builder.axes.is_set(target) => {
            return Err("rescale target unavailable".into());
        }
        None => builder.axes.set(
            target,
            AxisRule::Axis(AxisToAxis {
                target,
                invert: false,
                rescale: Some(rescale),
            }),
        ),
    }
    Ok(())
}
