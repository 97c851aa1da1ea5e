// sysfs lookups linking a joystick node to its event node

use std::fs;
use std::path::Path;

use crate::protocol::InputId;

pub const SYSFS_INPUT: &str = "/sys/class/input";

/// Index of the `eventM` sibling of `jsN`, from `<root>/jsN/device/`.
pub fn event_sibling(root: &Path, js_index: u32) -> Option<u32> {
    let device = root.join(format!("js{js_index}")).join("device");
    fs::read_dir(device)
        .ok()?
        .filter_map(Result::ok)
        .find_map(|entry| {
            let name = entry.file_name();
            let digits = name.to_str()?.strip_prefix("event")?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            digits.parse().ok()
        })
}

/// `id/{bustype,vendor,product,version}` of `<root>/eventM/device`; hex text files.
pub fn event_input_id(root: &Path, event_index: u32) -> Option<InputId> {
    let id_dir = root.join(format!("event{event_index}")).join("device").join("id");
    let field = |name: &str| -> Option<u16> {
        let text = fs::read_to_string(id_dir.join(name)).ok()?;
        u16::from_str_radix(text.trim(), 16).ok()
    };
    Some(InputId {
        bustype: field("bustype")?,
        vendor: field("vendor")?,
        product: field("product")?,
        version: field("version")?,
    })
}

/// `<root>/eventM/device/name`
pub fn event_name(root: &Path, event_index: u32) -> Option<String> {
    let path = root.join(format!("event{event_index}")).join("device").join("name");
    fs::read_to_string(path)
        .ok()
        .map(|name| name.trim_end_matches('\n').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_sysfs() -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        let js = root.path().join("js0/device");
        fs::create_dir_all(js.join("event12")).unwrap();
        fs::create_dir_all(js.join("capabilities")).unwrap();
        fs::create_dir_all(js.join("eventx")).unwrap();
        let id = root.path().join("event12/device/id");
        fs::create_dir_all(&id).unwrap();
        for (file, value) in [
            ("bustype", "0003\n"),
            ("vendor", "045e\n"),
            ("product", "028e\n"),
            ("version", "0110\n"),
        ] {
            fs::write(id.join(file), value).unwrap();
        }
        fs::write(root.path().join("event12/device/name"), "Test Pad\n").unwrap();
        root
    }

    #[test]
    fn finds_event_sibling_of_joystick() {
        let root = fake_sysfs();
        assert_eq!(event_sibling(root.path(), 0), Some(12));
        assert_eq!(event_sibling(root.path(), 1), None);
    }

    #[test]
    fn reads_identity_files() {
        let root = fake_sysfs();
        assert_eq!(
            event_input_id(root.path(), 12),
            Some(InputId {
                bustype: 3,
                vendor: 0x45e,
                product: 0x28e,
                version: 0x110,
            })
        );
        assert_eq!(event_name(root.path(), 12).as_deref(), Some("Test Pad"));
        assert_eq!(event_input_id(root.path(), 3), None);
    }
}
