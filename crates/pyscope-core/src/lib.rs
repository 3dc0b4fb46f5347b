#![deny(clippy::all)]

//! Resolution engine behind `pyscope`: classifies a directory as a Python
//! project, finds its virtual environment and interpreter, and probes which
//! development tools are usable.

mod core;

pub(crate) use crate::core::config;
pub(crate) use crate::core::config::context;
pub(crate) use crate::core::runtime::{effects, process, resolver};
pub(crate) use crate::core::tooling::outcome;
pub(crate) use crate::core::{fs, project, python, tools};

pub use crate::core::commands::{
    config_show, detect, env_list, packages_list, python_info, tools_check, tools_list,
    PackagesRequest, ToolCheckRequest, ToolsListRequest,
};
pub use crate::core::config::context::{CommandContext, CommandInfo};
pub use crate::core::config::{
    ConfigError, ConfigLoader, ConfigOverrides, ConfigSource, EnvSnapshot, GlobalOptions, Settings,
    DEFAULT_PROBE_TIMEOUT,
};
pub use crate::core::fs::{join_path, parent_of, PathTools};
pub use crate::core::project::ProjectClassifier;
pub use crate::core::python::{
    parse_freeze, parse_version, ActivationEnv, InterpreterResolver, VenvLocator, VersionProbe,
    FALLBACK_COMMANDS, MAX_ANCESTOR_DEPTH,
};
pub use crate::core::runtime::effects::{
    Effects, FileSystemProbe, PathLookup, ProcessRunner, SharedEffects, SystemEffects,
};
pub use crate::core::runtime::process::{
    run_command, CancelToken, ProcessError, RunLimits, RunOutput,
};
pub use crate::core::runtime::resolver::Resolver;
pub use crate::core::runtime::tasks::{probe_version_async, resolve_project_async};
pub use crate::core::runtime::{
    config_error_outcome, exit_code, format_status_message, to_json_response, CommandGroup,
    PYSCOPE_VERSION,
};
pub use crate::core::tooling::outcome::{CommandStatus, ExecutionOutcome};
pub use crate::core::tools::{ToolProbe, ToolStatus};

pub use pyscope_domain::{
    EnvironmentKind, PackageManager, ProjectInfo, PythonVersion, ResolutionConfig, ToolKind,
    VirtualEnvironment,
};
