use std::path::{Path, PathBuf};

use pyscope_domain::{
    ProjectInfo, PythonVersion, ResolutionConfig, ToolKind, VirtualEnvironment,
};

use crate::effects::SharedEffects;
use crate::fs::PathTools;
use crate::process::RunLimits;
use crate::project::ProjectClassifier;
use crate::python::{ActivationEnv, InterpreterResolver, VenvLocator, VersionProbe};
use crate::tools::{ToolProbe, ToolStatus};

/// Entry point to the resolution engine.
///
/// Holds no mutable state: every call re-reads the filesystem and search
/// path, so a `Resolver` can be cloned freely and shared across threads.
#[derive(Clone)]
pub struct Resolver {
    effects: SharedEffects,
    cwd: PathBuf,
    activation: ActivationEnv,
    limits: RunLimits,
}

impl Resolver {
    /// `cwd` is where interpreter probes run.
    #[must_use]
    pub fn new(effects: SharedEffects, cwd: impl Into<PathBuf>) -> Self {
        Self {
            effects,
            cwd: cwd.into(),
            activation: ActivationEnv::default(),
            limits: RunLimits::default(),
        }
    }

    #[must_use]
    pub fn with_activation(mut self, activation: ActivationEnv) -> Self {
        self.activation = activation;
        self
    }

    #[must_use]
    pub fn with_limits(mut self, limits: RunLimits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    #[must_use]
    pub fn activation(&self) -> &ActivationEnv {
        &self.activation
    }

    fn paths(&self) -> PathTools<'_> {
        PathTools::new(self.effects.as_ref())
    }

    fn versions(&self) -> VersionProbe<'_> {
        VersionProbe::new(self.effects.process(), &self.cwd, self.limits.clone())
    }

    #[must_use]
    pub fn classify(&self, cwd: &Path, config: &ResolutionConfig) -> ProjectInfo {
        ProjectClassifier::new(self.paths(), &self.activation).classify(cwd, config)
    }

    /// Judged against the interpreter [`Resolver::classify`] picks for the
    /// resolver's working directory.
    #[must_use]
    pub fn is_venv_active(&self, config: &ResolutionConfig) -> bool {
        ProjectClassifier::new(self.paths(), &self.activation).is_venv_active(&self.cwd, config)
    }

    #[must_use]
    pub fn locate_venv(&self, start_dir: &Path, enabled: bool) -> Option<PathBuf> {
        VenvLocator::new(self.paths()).locate(start_dir, enabled)
    }

    #[must_use]
    pub fn resolve_from_venv(&self, venv_root: &Path) -> Option<PathBuf> {
        InterpreterResolver::new(self.paths()).resolve_from_venv(venv_root)
    }

    #[must_use]
    pub fn resolve_system_interpreter(&self, preferred: &str) -> Option<PathBuf> {
        InterpreterResolver::new(self.paths()).resolve_system_interpreter(preferred)
    }

    #[must_use]
    pub fn describe_environment(&self, venv_root: &Path) -> VirtualEnvironment {
        InterpreterResolver::new(self.paths()).describe_environment(venv_root, &self.activation)
    }

    #[must_use]
    pub fn discover_environments(
        &self,
        start_dir: &Path,
        config: &ResolutionConfig,
    ) -> Vec<VirtualEnvironment> {
        InterpreterResolver::new(self.paths()).discover_environments(
            start_dir,
            config,
            &self.activation,
        )
    }

    #[must_use]
    pub fn is_tool_available(&self, kind: ToolKind, name: &str) -> bool {
        ToolProbe::new(self.paths()).is_available(kind, name)
    }

    #[must_use]
    pub fn probe_tools(&self, kind: ToolKind) -> Vec<ToolStatus> {
        ToolProbe::new(self.paths()).probe_all(kind)
    }

    #[must_use]
    pub fn get_version(&self, interpreter: Option<&Path>) -> Option<String> {
        self.versions().get_version(interpreter)
    }

    #[must_use]
    pub fn python_version(&self, interpreter: Option<&Path>) -> Option<PythonVersion> {
        self.versions().python_version(interpreter)
    }

    #[must_use]
    pub fn list_installed_packages(&self, interpreter: Option<&Path>) -> Vec<String> {
        self.versions().list_installed_packages(interpreter)
    }
}
