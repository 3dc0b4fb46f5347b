use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use pyscope_domain::PythonVersion;
use regex::Regex;
use tracing::{debug, warn};

use crate::effects::ProcessRunner;
use crate::process::RunLimits;

/// Runs an interpreter to learn its version and installed packages.
pub struct VersionProbe<'a> {
    runner: &'a dyn ProcessRunner,
    cwd: PathBuf,
    limits: RunLimits,
}

impl<'a> VersionProbe<'a> {
    #[must_use]
    pub fn new(runner: &'a dyn ProcessRunner, cwd: impl Into<PathBuf>, limits: RunLimits) -> Self {
        Self {
            runner,
            cwd: cwd.into(),
            limits,
        }
    }

    /// `MAJOR.MINOR.PATCH` reported by `<python> --version`.
    #[must_use]
    pub fn get_version(&self, interpreter: Option<&Path>) -> Option<String> {
        let text = self.capture(interpreter?, &["--version"])?;
        let version = first_dotted_triple(&text).map(ToString::to_string);
        if version.is_none() {
            debug!(output = %text.trim(), "no version in interpreter output");
        }
        version
    }

    /// Parsed form of [`VersionProbe::get_version`].
    #[must_use]
    pub fn python_version(&self, interpreter: Option<&Path>) -> Option<PythonVersion> {
        let text = self.capture(interpreter?, &["--version"])?;
        parse_version(&text)
    }

    /// Package names from `<python> -m pip freeze`, in listing order.
    #[must_use]
    pub fn list_installed_packages(&self, interpreter: Option<&Path>) -> Vec<String> {
        let Some(python) = interpreter else {
            return Vec::new();
        };
        self.capture(python, &["-m", "pip", "freeze"])
            .map(|text| parse_freeze(&text))
            .unwrap_or_default()
    }

    // Failure of any kind collapses to `None`: spawn errors, timeouts,
    // non-zero exits and silent runs all mean "no output".
    fn capture(&self, python: &Path, args: &[&str]) -> Option<String> {
        let args: Vec<String> = args.iter().map(ToString::to_string).collect();
        let output = match self.runner.run(python, &args, &self.cwd, &self.limits) {
            Ok(output) => output,
            Err(err) => {
                warn!(python = %python.display(), "interpreter probe failed: {err}");
                return None;
            }
        };
        if !output.success() {
            debug!(
                python = %python.display(),
                code = output.code,
                stderr = %output.stderr.trim(),
                "interpreter probe exited unsuccessfully"
            );
            return None;
        }
        let text = output.combined();
        (!text.trim().is_empty()).then_some(text)
    }
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d+)\.(\d+)\.(\d+)").expect("version pattern is a valid regex")
    })
}

fn first_dotted_triple(text: &str) -> Option<&str> {
    version_pattern().find(text).map(|found| found.as_str())
}

/// First dotted triple in `text`, e.g. `Python 3.11.4` → `3.11.4`.
#[must_use]
pub fn parse_version(text: &str) -> Option<PythonVersion> {
    let captures = version_pattern().captures(text)?;
    let part = |idx: usize| captures.get(idx)?.as_str().parse::<u64>().ok();
    Some(PythonVersion {
        major: part(1)?,
        minor: part(2)?,
        patch: part(3)?,
    })
}

/// Names from a freeze-format listing. Lines without `==` are skipped.
#[must_use]
pub fn parse_freeze(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.starts_with('#') || !line.contains("==") {
                return None;
            }
            let name = line.split('=').next()?.trim();
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}
