// Symbolic gamepad/joystick button names accepted in button lists

use evdev::KeyCode;

/// Names are matched case-insensitively, without the `BTN_` prefix.
const BUTTON_NAMES: &[(&str, KeyCode)] = &[
    ("a", KeyCode::BTN_SOUTH),
    ("b", KeyCode::BTN_EAST),
    ("base", KeyCode::BTN_BASE),
    ("base2", KeyCode::BTN_BASE2),
    ("base3", KeyCode::BTN_BASE3),
    ("base4", KeyCode::BTN_BASE4),
    ("base5", KeyCode::BTN_BASE5),
    ("base6", KeyCode::BTN_BASE6),
    ("c", KeyCode::BTN_C),
    ("dead", KeyCode::BTN_DEAD),
    ("east", KeyCode::BTN_EAST),
    ("mode", KeyCode::BTN_MODE),
    ("north", KeyCode::BTN_NORTH),
    ("pinkie", KeyCode::BTN_PINKIE),
    ("select", KeyCode::BTN_SELECT),
    ("south", KeyCode::BTN_SOUTH),
    ("start", KeyCode::BTN_START),
    ("thumb", KeyCode::BTN_THUMB),
    ("thumb2", KeyCode::BTN_THUMB2),
    ("thumbl", KeyCode::BTN_THUMBL),
    ("thumbr", KeyCode::BTN_THUMBR),
    ("tl", KeyCode::BTN_TL),
    ("tl2", KeyCode::BTN_TL2),
    ("top", KeyCode::BTN_TOP),
    ("top2", KeyCode::BTN_TOP2),
    ("tr", KeyCode::BTN_TR),
    ("tr2", KeyCode::BTN_TR2),
    ("trigger", KeyCode::BTN_TRIGGER),
    ("west", KeyCode::BTN_WEST),
    ("x", KeyCode::BTN_NORTH),
    ("y", KeyCode::BTN_WEST),
    ("z", KeyCode::BTN_Z),
];

pub fn button_code(name: &str) -> Option<u16> {
    BUTTON_NAMES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name))
        .map(|(_, code)| code.0)
}
