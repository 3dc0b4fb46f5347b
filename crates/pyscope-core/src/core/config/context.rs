use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pyscope_domain::ResolutionConfig;

use super::settings::{ConfigLoader, ConfigOverrides, EnvSnapshot, GlobalOptions, Settings};
use crate::effects::{Effects, SharedEffects};
use crate::python::ActivationEnv;
use crate::resolver::Resolver;
use crate::CommandGroup;

#[derive(Clone, Copy, Debug)]
pub struct CommandInfo {
    pub group: CommandGroup,
    pub name: &'static str,
}

impl CommandInfo {
    #[must_use]
    pub const fn new(group: CommandGroup, name: &'static str) -> Self {
        Self { group, name }
    }
}

/// Everything a command handler needs, captured once per invocation.
pub struct CommandContext<'a> {
    pub global: &'a GlobalOptions,
    env: EnvSnapshot,
    cwd: PathBuf,
    settings: Settings,
    activation: ActivationEnv,
    effects: SharedEffects,
}

impl<'a> CommandContext<'a> {
    /// Creates a context from the live process environment and working
    /// directory.
    ///
    /// # Errors
    /// Returns an error if the working directory cannot be read or the
    /// configuration is invalid (a [`crate::ConfigError`] in the chain).
    pub fn new(
        global: &'a GlobalOptions,
        overrides: &ConfigOverrides,
        effects: SharedEffects,
    ) -> Result<Self> {
        let env = EnvSnapshot::capture();
        let cwd = std::env::current_dir().context("failed to read the working directory")?;
        Self::with_environment(global, overrides, effects, env, cwd, dirs_next::home_dir())
    }

    /// Same as [`CommandContext::new`] with every ambient input supplied.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn with_environment(
        global: &'a GlobalOptions,
        overrides: &ConfigOverrides,
        effects: SharedEffects,
        env: EnvSnapshot,
        cwd: PathBuf,
        home: Option<PathBuf>,
    ) -> Result<Self> {
        let explicit = global.config.as_deref().map(Path::new);
        let settings = ConfigLoader::new(&env, &cwd)
            .with_home(home)
            .load(explicit, overrides)?;
        let activation = ActivationEnv::from_snapshot(&env);
        Ok(Self {
            global,
            env,
            cwd,
            settings,
            activation,
            effects,
        })
    }

    pub fn effects(&self) -> &dyn Effects {
        self.effects.as_ref()
    }

    pub fn shared_effects(&self) -> SharedEffects {
        self.effects.clone()
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn resolution(&self) -> &ResolutionConfig {
        self.settings.resolution()
    }

    pub fn activation(&self) -> &ActivationEnv {
        &self.activation
    }

    pub fn env_contains(&self, key: &str) -> bool {
        self.env.contains(key)
    }

    /// A resolver bound to this invocation's directory, activation state and
    /// probe limits.
    pub fn resolver(&self) -> Resolver {
        Resolver::new(self.shared_effects(), self.cwd.clone())
            .with_activation(self.activation.clone())
            .with_limits(self.settings.run_limits())
    }
}
