// ioctl: which requests a captured descriptor answers itself

use std::os::fd::RawFd;

use tracing::debug;

use crate::intercept::host::Host;
use crate::intercept::registry::Captured;
use crate::protocol::{EvdevQuery, IoctlRequest, JoydevQuery, copy_c_string};
use crate::translate::{Answer, answer};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Query {
    Evdev(EvdevQuery),
    Joydev(JoydevQuery),
}

/// `None` sends the request to the real ioctl without touching its argument.
pub fn query_of(captured: &Captured, request: IoctlRequest) -> Option<Query> {
    match captured {
        Captured::Event(_) => EvdevQuery::classify(request).map(Query::Evdev),
        Captured::Joystick(_) => JoydevQuery::classify(request).map(Query::Joydev),
    }
}

/// Answer `query` into `arg`, the caller's buffer of the size the request encodes.
pub fn answer_query(
    host: &impl Host,
    fd: RawFd,
    captured: &Captured,
    query: Query,
    arg: &mut [u8],
) -> Answer {
    match (captured, query) {
        (Captured::Event(desc), Query::Evdev(query)) => {
            answer(&desc.lock(), query, arg, &host.device(fd))
        }
        (Captured::Joystick(alias), Query::Joydev(JoydevQuery::Name)) => {
            debug!("{fd}: altered JSIOCGNAME via {}", alias.section_name);
            Answer::Reply(copy_c_string(&alias.name, arg) as i32)
        }
        _ => Answer::Forward,
    }
}
