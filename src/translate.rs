pub mod answers;
pub mod event;
pub mod math;
pub mod stream;

pub use answers::{Answer, answer, key_snapshot};
pub use event::{translate, translate_or_mark};
pub use stream::{absorb, raw_request_len, serve_pending};
