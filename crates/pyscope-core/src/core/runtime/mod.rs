pub mod effects;
mod facade;
pub mod process;
pub mod resolver;
pub mod tasks;

#[cfg(test)]
pub(crate) mod test_support;

pub use facade::{
    config_error_outcome, exit_code, format_status_message, to_json_response, CommandGroup,
};

pub const PYSCOPE_VERSION: &str = env!("CARGO_PKG_VERSION");
