pub mod probe;

pub use probe::{ToolProbe, ToolStatus};
