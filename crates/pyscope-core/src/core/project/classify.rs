use std::path::{Path, PathBuf};

use pyscope_domain::{MarkerFile, PackageManager, ProjectInfo, ResolutionConfig, MARKER_FILES};
use tracing::debug;

use crate::fs::PathTools;
use crate::python::{ActivationEnv, InterpreterResolver, VenvLocator};

const UV_LOCK: &str = "uv.lock";

/// Path segments that suggest an interpreter lives inside a virtual env.
const VENV_PATH_SEGMENTS: [&str; 3] = ["/venv/", "/env/", "/virtualenv/"];

/// Turns a directory plus configuration into a [`ProjectInfo`] snapshot.
pub struct ProjectClassifier<'a> {
    paths: PathTools<'a>,
    activation: &'a ActivationEnv,
}

impl<'a> ProjectClassifier<'a> {
    #[must_use]
    pub fn new(paths: PathTools<'a>, activation: &'a ActivationEnv) -> Self {
        Self { paths, activation }
    }

    #[must_use]
    pub fn classify(&self, cwd: &Path, config: &ResolutionConfig) -> ProjectInfo {
        // Every marker is checked so each flag is accurate on its own.
        let present: Vec<MarkerFile> = MARKER_FILES
            .into_iter()
            .filter(|marker| self.paths.file_exists(&cwd.join(marker.file_name())))
            .collect();
        let has = |marker: MarkerFile| present.contains(&marker);

        let (venv_path, python_path) = self.resolve_python(cwd, config);

        let info = ProjectInfo {
            root: cwd.to_path_buf(),
            is_python_project: !present.is_empty(),
            has_requirements: has(MarkerFile::Requirements),
            has_pyproject: has(MarkerFile::Pyproject),
            has_setup_py: has(MarkerFile::SetupPy),
            has_setup_cfg: has(MarkerFile::SetupCfg),
            has_pipfile: has(MarkerFile::Pipfile),
            has_poetry_lock: has(MarkerFile::PoetryLock),
            has_venv: venv_path.is_some(),
            venv_path,
            python_path,
            package_manager: self.package_manager(cwd, config.package_manager, &has),
        };
        debug!(
            root = %info.root.display(),
            python_project = info.is_python_project,
            venv = ?info.venv_path,
            python = ?info.python_path,
            "classified directory"
        );
        info
    }

    /// Best-effort guess at whether a virtual environment is active.
    ///
    /// Trusts the activation variable when it names an existing directory,
    /// otherwise looks for venv-style segments in the interpreter `classify`
    /// would pick for `cwd`.
    #[must_use]
    pub fn is_venv_active(&self, cwd: &Path, config: &ResolutionConfig) -> bool {
        if let Some(active) = self.activation.virtual_env.as_deref() {
            if self.paths.directory_exists(active) {
                return true;
            }
        }
        self.resolve_python(cwd, config)
            .1
            .is_some_and(|python| looks_like_venv_interpreter(&python))
    }

    fn resolve_python(
        &self,
        cwd: &Path,
        config: &ResolutionConfig,
    ) -> (Option<PathBuf>, Option<PathBuf>) {
        let venv_path = self.resolve_venv(cwd, config);
        let interpreters = InterpreterResolver::new(self.paths);
        let python_path = match venv_path.as_deref() {
            Some(venv) => interpreters.resolve_from_venv(venv),
            None => interpreters.resolve_system_interpreter(&config.python_command),
        };
        (venv_path, python_path)
    }

    fn resolve_venv(&self, cwd: &Path, config: &ResolutionConfig) -> Option<PathBuf> {
        if !config.enable_virtual_env {
            return None;
        }
        VenvLocator::new(self.paths)
            .locate(cwd, config.searches_for_venv())
            .or_else(|| {
                let active = self.activation.virtual_env.as_deref()?;
                self.paths.directory_exists(active).then(|| {
                    debug!(venv = %active.display(), "using externally activated environment");
                    active.to_path_buf()
                })
            })
    }

    fn package_manager(
        &self,
        cwd: &Path,
        configured: PackageManager,
        has: &dyn Fn(MarkerFile) -> bool,
    ) -> PackageManager {
        if configured != PackageManager::Auto {
            return configured;
        }
        if has(MarkerFile::PoetryLock) {
            PackageManager::Poetry
        } else if has(MarkerFile::Pipfile) {
            PackageManager::Pipenv
        } else if self.paths.file_exists(&cwd.join(UV_LOCK)) {
            PackageManager::Uv
        } else {
            PackageManager::Pip
        }
    }
}

fn looks_like_venv_interpreter(python: &Path) -> bool {
    let text = python.to_string_lossy().replace('\\', "/");
    VENV_PATH_SEGMENTS
        .iter()
        .any(|segment| text.contains(segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::runtime::test_support::{touch, FakeEffects};
    use std::fs;
    use tempfile::tempdir;

    fn classify_with(
        effects: &FakeEffects,
        activation: &ActivationEnv,
        cwd: &Path,
        config: &ResolutionConfig,
    ) -> ProjectInfo {
        ProjectClassifier::new(PathTools::new(effects), activation).classify(cwd, config)
    }

    #[test]
    fn directory_without_markers_is_not_a_project() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("README.md"));
        let effects = FakeEffects::new();
        let info = classify_with(
            &effects,
            &ActivationEnv::default(),
            temp.path(),
            &ResolutionConfig::default(),
        );
        assert!(!info.is_python_project);
        assert!(info.markers().is_empty());
        assert!(!info.has_venv);
        assert_eq!(info.python_path, None);
    }

    #[test]
    fn each_marker_sets_exactly_its_flag() {
        for marker in MARKER_FILES {
            let temp = tempdir().expect("tempdir");
            touch(&temp.path().join(marker.file_name()));
            let effects = FakeEffects::new();
            let info = classify_with(
                &effects,
                &ActivationEnv::default(),
                temp.path(),
                &ResolutionConfig::default(),
            );
            assert!(info.is_python_project, "{marker:?}");
            assert_eq!(info.markers(), vec![marker.file_name()]);
        }
    }

    #[test]
    fn all_markers_are_reported_together() {
        let temp = tempdir().expect("tempdir");
        for marker in MARKER_FILES.iter().rev() {
            touch(&temp.path().join(marker.file_name()));
        }
        let effects = FakeEffects::new();
        let info = classify_with(
            &effects,
            &ActivationEnv::default(),
            temp.path(),
            &ResolutionConfig::default(),
        );
        assert!(info.has_requirements && info.has_pyproject && info.has_setup_py);
        assert!(info.has_setup_cfg && info.has_pipfile && info.has_poetry_lock);
    }

    #[test]
    fn marker_directories_do_not_count() {
        let temp = tempdir().expect("tempdir");
        fs::create_dir(temp.path().join("requirements.txt")).expect("dir");
        let effects = FakeEffects::new();
        let info = classify_with(
            &effects,
            &ActivationEnv::default(),
            temp.path(),
            &ResolutionConfig::default(),
        );
        assert!(!info.is_python_project);
    }

    #[test]
    fn venv_interpreter_beats_system_interpreter() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("pyproject.toml"));
        let python = temp.path().join(".venv").join("bin").join("python");
        touch(&python);
        let effects = FakeEffects::new().with_command("python3", "/usr/bin/python3");
        let info = classify_with(
            &effects,
            &ActivationEnv::default(),
            temp.path(),
            &ResolutionConfig::default(),
        );
        assert!(info.has_venv);
        assert_eq!(info.venv_path, Some(temp.path().join(".venv")));
        assert_eq!(info.python_path, Some(python));
    }

    #[test]
    fn system_interpreter_used_without_venv() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("setup.py"));
        let effects = FakeEffects::new()
            .with_command("python3.11", "/opt/py/bin/python3.11")
            .with_command("python3", "/usr/bin/python3");
        let config = ResolutionConfig {
            python_command: "python3.11".to_string(),
            ..ResolutionConfig::default()
        };
        let info = classify_with(&effects, &ActivationEnv::default(), temp.path(), &config);
        assert!(!info.has_venv);
        assert_eq!(info.python_path, Some(PathBuf::from("/opt/py/bin/python3.11")));
    }

    #[test]
    fn disabled_venv_support_ignores_local_venv() {
        let temp = tempdir().expect("tempdir");
        fs::create_dir_all(temp.path().join(".venv").join("bin")).expect("venv");
        let effects = FakeEffects::new().with_command("python3", "/usr/bin/python3");
        let config = ResolutionConfig {
            enable_virtual_env: false,
            ..ResolutionConfig::default()
        };
        let activation = ActivationEnv {
            virtual_env: Some(temp.path().join(".venv")),
            conda_prefix: None,
        };
        let info = classify_with(&effects, &activation, temp.path(), &config);
        assert!(!info.has_venv);
        assert_eq!(info.python_path, Some(PathBuf::from("/usr/bin/python3")));
    }

    #[test]
    fn activated_env_fills_in_when_auto_detect_is_off() {
        let temp = tempdir().expect("tempdir");
        let project = temp.path().join("project");
        fs::create_dir_all(project.join(".venv")).expect("local venv");
        let shared = temp.path().join("shared");
        touch(&shared.join("bin").join("python"));
        let activation = ActivationEnv {
            virtual_env: Some(shared.clone()),
            conda_prefix: None,
        };
        let config = ResolutionConfig {
            auto_detect_venv: false,
            ..ResolutionConfig::default()
        };
        let effects = FakeEffects::new();
        let info = classify_with(&effects, &activation, &project, &config);
        assert_eq!(info.venv_path, Some(shared.clone()));
        assert_eq!(info.python_path, Some(shared.join("bin").join("python")));
    }

    #[test]
    fn auto_package_manager_follows_markers() {
        let cases = [
            (vec!["pyproject.toml", "poetry.lock"], PackageManager::Poetry),
            (vec!["Pipfile"], PackageManager::Pipenv),
            (vec!["pyproject.toml", "uv.lock"], PackageManager::Uv),
            (vec!["requirements.txt"], PackageManager::Pip),
        ];
        for (files, expected) in cases {
            let temp = tempdir().expect("tempdir");
            for file in &files {
                touch(&temp.path().join(file));
            }
            let config = ResolutionConfig {
                package_manager: PackageManager::Auto,
                ..ResolutionConfig::default()
            };
            let effects = FakeEffects::new();
            let info = classify_with(&effects, &ActivationEnv::default(), temp.path(), &config);
            assert_eq!(info.package_manager, expected, "{files:?}");
        }
    }

    #[test]
    fn explicit_package_manager_is_kept() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("poetry.lock"));
        let config = ResolutionConfig {
            package_manager: PackageManager::Conda,
            ..ResolutionConfig::default()
        };
        let effects = FakeEffects::new();
        let info = classify_with(&effects, &ActivationEnv::default(), temp.path(), &config);
        assert_eq!(info.package_manager, PackageManager::Conda);
    }

    #[test]
    fn venv_active_when_activation_dir_exists() {
        let temp = tempdir().expect("tempdir");
        let effects = FakeEffects::new();
        let activation = ActivationEnv {
            virtual_env: Some(temp.path().to_path_buf()),
            conda_prefix: None,
        };
        let classifier = ProjectClassifier::new(PathTools::new(&effects), &activation);
        assert!(classifier.is_venv_active(temp.path(), &ResolutionConfig::default()));

        let stale = ActivationEnv {
            virtual_env: Some(temp.path().join("gone")),
            conda_prefix: None,
        };
        let classifier = ProjectClassifier::new(PathTools::new(&effects), &stale);
        assert!(!classifier.is_venv_active(temp.path(), &ResolutionConfig::default()));
    }

    #[test]
    fn venv_active_from_interpreter_path_segments() {
        let temp = tempdir().expect("tempdir");
        let activation = ActivationEnv::default();
        let effects = FakeEffects::new().with_command("python3", "/home/dev/app/venv/bin/python3");
        let classifier = ProjectClassifier::new(PathTools::new(&effects), &activation);
        assert!(classifier.is_venv_active(temp.path(), &ResolutionConfig::default()));

        let system = FakeEffects::new().with_command("python3", "/usr/bin/python3");
        let classifier = ProjectClassifier::new(PathTools::new(&system), &activation);
        assert!(!classifier.is_venv_active(temp.path(), &ResolutionConfig::default()));
    }

    #[test]
    fn venv_active_follows_located_venv_interpreter() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("requirements.txt"));
        let python = temp.path().join("venv").join("bin").join("python");
        touch(&python);
        let effects = FakeEffects::new().with_command("python3", "/usr/bin/python3");
        let activation = ActivationEnv::default();
        let classifier = ProjectClassifier::new(PathTools::new(&effects), &activation);
        let config = ResolutionConfig::default();

        let info = classifier.classify(temp.path(), &config);
        assert_eq!(info.python_path, Some(python));
        assert!(classifier.is_venv_active(temp.path(), &config));

        let disabled = ResolutionConfig {
            enable_virtual_env: false,
            ..ResolutionConfig::default()
        };
        assert!(!classifier.is_venv_active(temp.path(), &disabled));
    }

    #[test]
    fn venv_segment_heuristic_handles_windows_separators() {
        assert!(looks_like_venv_interpreter(Path::new(
            r"C:\work\app\env\Scripts\python.exe"
        )));
        assert!(looks_like_venv_interpreter(Path::new("/opt/virtualenv/bin/python")));
        assert!(!looks_like_venv_interpreter(Path::new("/opt/venvs/bin/python")));
    }
}
