//! Command handlers. Each returns an [`ExecutionOutcome`](crate::ExecutionOutcome)
//! whose `details` carry the machine-readable result.

pub mod config;
pub mod detect;
pub mod env;
pub mod packages;
pub mod python;
pub mod tools;

#[cfg(test)]
pub(crate) mod test_context;

pub use config::config_show;
pub use detect::detect;
pub use env::env_list;
pub use packages::{packages_list, PackagesRequest};
pub use python::python_info;
pub use tools::{tools_check, tools_list, ToolCheckRequest, ToolsListRequest};
