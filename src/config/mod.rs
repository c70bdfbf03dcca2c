mod r#impl;
mod structs;
mod validators;

pub use r#impl::{init_config, try_get_config};
pub use structs::*;
