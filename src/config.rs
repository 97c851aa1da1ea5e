pub mod error;
pub mod operations;
pub mod parser;
pub mod pure;
pub mod types;

pub use error::ConfigError;
pub use operations::{enabled_sections, load_sections, read_config};
pub use parser::compile;
pub use types::{
    AxisRule, AxisToAxis, AxisToButtons, AxisValue, ButtonRule, ButtonToAxis, ButtonToButton,
    IdOverride, Rescale, RuleTable, Section, ThresholdButton,
};
