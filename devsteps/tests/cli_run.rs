//! CLI tests for `devsteps run`, `list` and `config`.
//!
//! Spawns the devsteps binary inside temporary projects and checks exit codes,
//! progress output and the effect of steps on later commands.

use std::fs;
use std::process::{Command, Output};

use devsteps::core::step::Step;
use devsteps::exit_codes;
use devsteps::test_support::TempProject;

fn devsteps(project: &TempProject, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_devsteps"))
        .current_dir(project.path())
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("spawn devsteps")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn list_prints_every_step() {
    let project = TempProject::new().expect("project");
    let output = devsteps(&project, &["list"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let listing = stdout(&output);
    for step in Step::ALL {
        assert!(listing.contains(step.name()), "missing {}", step.name());
    }
}

#[test]
fn guarded_steps_in_empty_project_exit_ok_silently() {
    let project = TempProject::new().expect("project");
    let output = devsteps(
        &project,
        &[
            "run",
            "composer-install",
            "npm-install",
            "load-env",
            "xdebug-coverage",
            "setup-db",
            "update-db",
        ],
    );
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(stdout(&output).is_empty());
}

#[test]
fn malformed_env_file_fails_with_format_error() {
    let project = TempProject::new().expect("project");
    project.file(".env", "FOO=bar\nNOEQUALS\n").expect("env");
    let output = devsteps(&project, &["run", "load-env"]);
    assert_eq!(output.status.code(), Some(exit_codes::FAILURE));
    assert!(stdout(&output).contains("==> Setting up environment variables..."));
    let stderr = stderr(&output);
    assert_eq!(stderr.lines().count(), 1, "{stderr}");
    assert!(stderr.contains("malformed environment line \"NOEQUALS\""));
}

#[test]
fn config_prints_defaults() {
    let project = TempProject::new().expect("project");
    let output = devsteps(&project, &["config"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let rendered = stdout(&output);
    assert!(rendered.contains("env_file = \".env\""));
    assert!(rendered.contains("bootstrap_policy = \"unguarded\""));
}

#[test]
fn invalid_config_file_fails() {
    let project = TempProject::new().expect("project");
    project
        .file("devsteps.toml", "command_timeout_secs = 0\n")
        .expect("config");
    let output = devsteps(&project, &["run", "xdebug-coverage"]);
    assert_eq!(output.status.code(), Some(exit_codes::FAILURE));
    assert!(stderr(&output).contains("command_timeout_secs must be > 0"));
}

#[cfg(unix)]
mod scripts {
    use super::*;

    #[test]
    fn loaded_variables_reach_later_scripts() {
        let project = TempProject::new().expect("project");
        project.file(".env", "FOO=bar\nBAZ=1=2\n").expect("env");
        project
            .script(
                "script/setup-db",
                "printf '%s %s %s' \"$FOO\" \"$BAZ\" \"$XDEBUG_MODE\" > seen.txt",
            )
            .expect("script");

        let output = devsteps(&project, &["run", "load-env", "xdebug-coverage", "setup-db"]);

        assert_eq!(output.status.code(), Some(exit_codes::OK), "{}", stderr(&output));
        let seen = fs::read_to_string(project.path().join("seen.txt")).expect("seen");
        assert_eq!(seen, "bar 1=2 coverage");
        assert_eq!(
            stdout(&output),
            "==> Setting up environment variables...\n==> Setting up database...\n"
        );
    }

    #[test]
    fn failing_script_stops_sequence_and_propagates_code() {
        let project = TempProject::new().expect("project");
        project.script("script/setup-db", "exit 7").expect("setup");
        project
            .script("script/update-db", "touch updated.txt")
            .expect("update");

        let output = devsteps(&project, &["run", "setup-db", "update-db"]);

        assert_eq!(output.status.code(), Some(7));
        let script = project.path().join("script/setup-db");
        assert_eq!(
            stderr(&output),
            format!(
                "error: set up database: `{}` exited with status 7\n",
                script.display()
            )
        );
        assert!(!project.path().join("updated.txt").exists());
    }

    #[test]
    fn missing_bootstrap_fails_unless_guarded() {
        let project = TempProject::new().expect("project");

        let output = devsteps(&project, &["run", "bootstrap"]);
        assert_eq!(output.status.code(), Some(exit_codes::FAILURE));
        let script = project.path().join("script/bootstrap");
        assert_eq!(
            stderr(&output),
            format!(
                "error: run bootstrap script: failed to start `{}`: \
                 No such file or directory (os error 2)\n",
                script.display()
            )
        );
        assert!(stdout(&output).is_empty());

        let output = devsteps(&project, &["--bootstrap-policy", "guarded", "run", "bootstrap"]);
        assert_eq!(output.status.code(), Some(exit_codes::OK));
    }

    #[test]
    fn existing_bootstrap_runs_from_project_root() {
        let project = TempProject::new().expect("project");
        project
            .script("script/bootstrap", "pwd > bootstrapped.txt")
            .expect("script");

        let output = devsteps(&project, &["run", "bootstrap"]);

        assert_eq!(output.status.code(), Some(exit_codes::OK), "{}", stderr(&output));
        assert!(project.path().join("bootstrapped.txt").exists());
    }
}
