pub mod axes;
pub mod builder;
pub mod buttons;
pub mod cursor;
pub mod rescale;
