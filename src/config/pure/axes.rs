// `axes` list entries, including button triplets that synthesise an axis

use super::builder::{SectionBuilder, axis_index, button_index};
use super::cursor::Cursor;
use crate::config::types::{AxisRule, AxisToAxis, AxisValue, ButtonRule, ButtonToAxis};

pub fn apply_axes(builder: &mut SectionBuilder, list: &str) -> Result<(), String> {
    let list = list.trim();
    if list.is_empty() {
        builder.next_auto_axis()?;
        return Ok(());
    }
    builder.axes_listed = true;
    for entry in list.split(',') {
        apply_axis_entry(builder, entry.trim())?;
    }
    Ok(())
}

fn apply_axis_entry(builder: &mut SectionBuilder, entry: &str) -> Result<(), String> {
    if entry.is_empty() {
        builder.next_auto_axis()?;
        return Ok(());
    }
    let mut cur = Cursor::new(entry);

    if cur.eat('!') {
        let source = cur.unsigned().ok_or("invalid !")?;
        if !cur.is_empty() {
            return Err("invalid !".into());
        }
        builder.axes.set(axis_index(source)?, AxisRule::Disabled);
        return Ok(());
    }

    let explicit = explicit_target(&mut cur)?;
    let invert = cur.eat('-');
    if invert && !cur.at_digit() {
        return Err("unexpected -".into());
    }

    if let Some(first) = cur.unsigned() {
        let first = axis_index(first)?;
        let last = range_end(&mut cur, first)?;
        let mut target = match explicit {
            Some(target) => target,
            None => builder.next_auto_axis()?,
        };
        for source in first..=last {
            if source != first {
                target = match explicit {
                    Some(_) => axis_index(u32::from(target) + 1)?,
                    None => builder.next_auto_axis()?,
                };
            }
            builder.axes.set(
                source,
                AxisRule::Axis(AxisToAxis {
                    target,
                    invert,
                    rescale: None,
                }),
            );
        }
    } else if cur.eat_ignore_case("b") {
        let triplet = parse_triplet(&mut cur)?;
        let target = match explicit {
            Some(target) => target,
            None if cur.eat('=') => axis_index(cur.unsigned().ok_or("unexpected =")?)?,
            None => builder.next_auto_axis()?,
        };
        apply_triplet(builder, target, triplet)?;
    } else {
        return Err("invalid mapping entry".into());
    }

    if !cur.is_empty() {
        return Err("garbage at end of mapping".into());
    }
    Ok(())
}

/// `T=` prefix; the cursor is left untouched when there is none.
fn explicit_target(cur: &mut Cursor<'_>) -> Result<Option<u16>, String> {
    let start = *cur;
    match cur.unsigned() {
        Some(target) if cur.eat('=') => {
            if cur.is_empty() {
                return Err("unexpected =".into());
            }
            Ok(Some(axis_index(target)?))
        }
        _ => {
            *cur = start;
            Ok(None)
        }
    }
}

fn range_end(cur: &mut Cursor<'_>, first: u16) -> Result<u16, String> {
    if cur.peek() != Some('-') || !cur.peek_second().is_some_and(|c| c.is_ascii_digit()) {
        return Ok(first);
    }
    cur.eat('-');
    let last = axis_index(cur.unsigned().ok_or("invalid range")?)?;
    if last < first {
        return Err("invalid range".into());
    }
    Ok(last)
}

/// One button of a `bL<M<H` triplet; `on_release` when written with a leading `-`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub button: u16,
    pub on_release: bool,
}

impl Edge {
    fn opposite(self) -> Self {
        Self {
            on_release: !self.on_release,
            ..self
        }
    }
}

pub type Triplet = [Option<Edge>; 3];

fn parse_triplet(cur: &mut Cursor<'_>) -> Result<Triplet, String> {
    let low = triplet_edge(cur)?;
    if !cur.eat('<') {
        return Err("invalid axis button".into());
    }
    let middle = triplet_edge(cur)?;
    if !cur.eat('<') {
        return Err("invalid axis button".into());
    }
    let high = triplet_edge(cur)?;
    if low.is_none() && middle.is_none() && high.is_none() {
        return Err("invalid axis button".into());
    }
    Ok([low, middle, high])
}

fn triplet_edge(cur: &mut Cursor<'_>) -> Result<Option<Edge>, String> {
    let on_release = cur.eat('-');
    match cur.button() {
        Some(button) => Ok(Some(Edge {
            button: button_index(button)?,
            on_release,
        })),
        None if on_release => Err("invalid axis button".into()),
        None => Ok(None),
    }
}

/// Resolve a triplet into per-button edge values (-1 / 0 / 1) on `target`.
pub fn resolve_triplet(triplet: Triplet) -> Result<Vec<(Edge, i32)>, String> {
    let [mut low, middle, mut high] = triplet;

    let present: Vec<Edge> = triplet.iter().flatten().copied().collect();
    for (i, a) in present.iter().enumerate() {
        if present[i + 1..].contains(a) {
            return Err("same key event gives different axis events".into());
        }
    }

    let shares_middle = |edge: Edge| middle.is_some_and(|m| m.button == edge.button);
    if low.is_none() {
        low = high.filter(|h| !shares_middle(*h)).map(Edge::opposite);
    }
    if high.is_none() {
        high = low.filter(|l| !shares_middle(*l)).map(Edge::opposite);
    }

    let mut values = Vec::new();
    values.extend(low.map(|edge| (edge, -1)));
    values.extend(middle.map(|edge| (edge, 0)));
    values.extend(high.map(|edge| (edge, 1)));
    if middle.is_none() {
        if let (Some(l), Some(h)) = (low, high) {
            if l.button != h.button {
                values.push((l.opposite(), 0));
                values.push((h.opposite(), 0));
            }
        }
    }
    Ok(values)
}

fn apply_triplet(builder: &mut SectionBuilder, target: u16, triplet: Triplet) -> Result<(), String> {
    let values = resolve_triplet(triplet)?;

    let mut maps: Vec<(u16, ButtonToAxis)> = Vec::new();
    for (edge, value) in values {
        let index = match maps.iter().position(|(button, _)| *button == edge.button) {
            Some(index) => index,
            None => {
                maps.push((edge.button, ButtonToAxis::default()));
                maps.len() - 1
            }
        };
        let slot = AxisValue {
            axis: target,
            value,
        };
        if edge.on_release {
            maps[index].1.on_release = Some(slot);
        } else {
            maps[index].1.on_press = Some(slot);
        }
    }
    for (button, map) in maps {
        builder.buttons.set(button, ButtonRule::Axis(map));
    }
    Ok(())
}
