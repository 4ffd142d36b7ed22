//! Interactive terminal prompts

mod select;

pub use select::{fuzzy_match, select, SelectEvent, SelectState, SelectStatus};
