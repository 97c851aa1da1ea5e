//! Interception pipelines
//!
//! What each hooked call does with a descriptor, written against [`Host`]
//! so the flows run the same on libc and on a scripted fake.
//!
//! [`Host`]: super::host::Host

mod close;
mod ioctl;
mod open;
mod read;

pub use close::forget;
pub use ioctl::{Query, answer_query, query_of};
pub use open::{OpenOutcome, on_open};
pub use read::read_captured;
