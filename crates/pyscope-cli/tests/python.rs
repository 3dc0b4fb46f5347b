mod common;

use common::{parse_json, Sandbox};

#[test]
#[serial_test::serial]
fn missing_interpreter_exits_with_user_error() {
    let sandbox = Sandbox::new("pyscope-nopython");
    let assert = sandbox
        .cmd()
        .args(["--json", "python"])
        .assert()
        .code(1);
    let payload = parse_json(&assert);
    assert_eq!(payload["details"]["reason"], "python_not_found");
    assert_eq!(
        payload["details"]["tried"],
        serde_json::json!(["python3", "python", "py"])
    );
}

#[cfg(unix)]
#[test]
#[serial_test::serial]
fn venv_interpreter_version_and_packages_are_probed() {
    let sandbox = Sandbox::new("pyscope-venv-python");
    let venv_bin = sandbox.project.join(".venv").join("bin");
    let python = sandbox.executable(
        &venv_bin,
        "python",
        r#"if [ "$1" = "--version" ]; then echo "Python 3.11.4"; exit 0; fi
if [ "$1" = "-m" ] && [ "$2" = "pip" ] && [ "$3" = "freeze" ]; then
  printf 'requests==2.31.0\n# comment\nflask==2.3.2\n'
  exit 0
fi
exit 3"#,
    );

    let assert = sandbox
        .cmd()
        .args(["--json", "python"])
        .assert()
        .success();
    let details = &parse_json(&assert)["details"];
    assert_eq!(details["python"], serde_json::json!(python));
    assert_eq!(details["version"], "3.11.4");
    assert_eq!(details["source"], "venv");

    let assert = sandbox
        .cmd()
        .args(["--json", "packages"])
        .assert()
        .success();
    let details = &parse_json(&assert)["details"];
    assert_eq!(
        details["packages"],
        serde_json::json!(["requests", "flask"])
    );
}

#[cfg(unix)]
#[test]
#[serial_test::serial]
fn hanging_interpreter_is_bounded_by_probe_timeout() {
    let sandbox = Sandbox::new("pyscope-hang");
    sandbox.executable(&sandbox.bin, "python3", "PATH=/usr/bin:/bin exec sleep 30");

    let started = std::time::Instant::now();
    let assert = sandbox
        .cmd()
        .env("PYSCOPE_PROBE_TIMEOUT_SECS", "1")
        .args(["--json", "python"])
        .assert()
        .success();
    assert!(started.elapsed() < std::time::Duration::from_secs(15));
    let details = &parse_json(&assert)["details"];
    assert_eq!(details["source"], "system");
    assert_eq!(details["version"], serde_json::Value::Null);
}
