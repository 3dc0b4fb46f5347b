use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;

use crate::config::{ConfigOverrides, EnvSnapshot, GlobalOptions};
use crate::context::CommandContext;
use crate::core::runtime::test_support::FakeEffects;

/// A temp project directory plus the knobs a command context is built from.
pub(crate) struct TestContext {
    _temp: TempDir,
    root: PathBuf,
    pub(crate) effects: Option<FakeEffects>,
    pub(crate) env: Vec<(String, String)>,
    pub(crate) overrides: ConfigOverrides,
}

impl TestContext {
    pub(crate) fn new() -> Result<Self> {
        let temp = tempfile::tempdir()?;
        let root = temp.path().join("project");
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            _temp: temp,
            root,
            effects: None,
            env: Vec::new(),
            overrides: ConfigOverrides::default(),
        })
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    pub(crate) fn with_effects(mut self, effects: FakeEffects) -> Self {
        self.effects = Some(effects);
        self
    }

    pub(crate) fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    pub(crate) fn global(&self) -> GlobalOptions {
        GlobalOptions::default()
    }

    /// Consumes the scripted effects; call once per fixture.
    pub(crate) fn context<'a>(&mut self, global: &'a GlobalOptions) -> Result<CommandContext<'a>> {
        let pairs: Vec<(&str, &str)> = self
            .env
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let effects = self.effects.take().unwrap_or_else(FakeEffects::new);
        CommandContext::with_environment(
            global,
            &self.overrides,
            effects.shared(),
            EnvSnapshot::testing(&pairs),
            self.root.clone(),
            None,
        )
    }
}
