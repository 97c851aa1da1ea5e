//! Preloadable gamepad remapper for evdev and joydev devices.
//!
//! Loaded with `LD_PRELOAD`, the library compiles its configuration once from
//! a constructor, then rewrites the events and capability answers of every
//! matching `/dev/input/event*` device the host program opens.

pub mod config;
pub mod device;
pub mod intercept;
pub mod logging;
pub mod paths;
pub mod protocol;
pub mod translate;

#[cfg(not(test))]
#[used]
#[unsafe(link_section = ".init_array")]
static INSTALL: extern "C" fn() = install;

#[cfg(not(test))]
extern "C" fn install() {
    logging::init();
    if intercept::install() {
        tracing::info!("Installed event device remapper");
    }
}
