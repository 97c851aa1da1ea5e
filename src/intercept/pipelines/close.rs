// Close: drop interception state before the real close

use std::os::fd::RawFd;

use tracing::info;

use crate::intercept::Remapper;

/// Forget `fd`. Runs before the real close so a concurrent open that reuses
/// the number cannot lose its fresh entry.
pub fn forget(remapper: &Remapper, fd: RawFd) -> bool {
    let known = remapper.registry.remove(fd).is_some();
    if known {
        info!("closing {fd}");
    }
    known
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::compile;
    use crate::device::JoystickAlias;
    use crate::intercept::registry::Captured;
    use std::sync::Arc;

    #[test]
    fn forgets_only_known_descriptors() {
        let remapper = Remapper::new(compile("match .\n").unwrap());
        remapper.registry.insert(
            4,
            Captured::Joystick(Arc::new(JoystickAlias {
                section_name: "[unnamed]".into(),
                name: "pad".into(),
            })),
        );
        assert!(!forget(&remapper, 3));
        assert!(forget(&remapper, 4));
        assert!(remapper.registry.is_empty());
    }
}
