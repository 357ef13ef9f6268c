// ABOUTME: Integration tests for the rollout CLI commands.
// ABOUTME: Runs the binary against shell-backed service commands in a temp directory.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn rollout_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("rollout"))
}

/// A project whose "service" appends to a journal file instead of
/// talking to a real service manager.
struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("build")).unwrap();
        fs::create_dir_all(dir.path().join("deploy")).unwrap();
        fs::write(dir.path().join("build/app.jar"), "new build").unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn journal(&self) -> PathBuf {
        self.path().join("journal")
    }

    fn deploy(&self) -> PathBuf {
        self.path().join("deploy")
    }

    fn journal_lines(&self) -> Vec<String> {
        fs::read_to_string(self.journal())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn sh(script: &str) -> String {
        format!("[sh, -c, {:?}]", script)
    }

    /// Write rollout.yml with the given stop and start scripts.
    fn write_config(&self, target_dir: Option<&Path>, stop: &str, start: &str) {
        let mut yaml = format!(
            "service: forex\nartifact: build/app.jar\nprivilege: []\nlock:\n  dir: {:?}\n",
            self.path().join("lock").display().to_string()
        );
        if let Some(target) = target_dir {
            yaml.push_str(&format!("target_dir: {:?}\n", target.display().to_string()));
        }
        yaml.push_str(&format!(
            "commands:\n  stop: {}\n  start: {}\n",
            Self::sh(stop),
            Self::sh(start)
        ));
        fs::write(self.path().join("rollout.yml"), yaml).unwrap();
    }

    /// Stop and start that record themselves; start also records whether
    /// the artifact was already in place.
    fn write_recording_config(&self, target_dir: Option<&Path>) {
        let journal = self.journal().display().to_string();
        let installed = self.deploy().join("app.jar").display().to_string();
        self.write_config(
            target_dir,
            &format!("echo stop >> {journal}"),
            &format!("test -f {installed} && echo start >> {journal}"),
        );
    }

    fn cmd(&self) -> Command {
        let mut cmd = rollout_cmd();
        cmd.current_dir(self.path());
        cmd
    }
}

#[test]
fn help_shows_commands() {
    rollout_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("release"))
        .stdout(predicate::str::contains("stop"))
        .stdout(predicate::str::contains("copy"))
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn init_creates_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("rollout.yml");

    rollout_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--service", "forex"])
        .assert()
        .success();

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("service: forex"));
    assert!(content.contains("artifact:"));
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("rollout.yml");
    fs::write(&config_path, "existing content").unwrap();

    rollout_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(fs::read_to_string(&config_path).unwrap(), "existing content");
}

#[test]
fn missing_config_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    rollout_cmd()
        .current_dir(temp_dir.path())
        .arg("release")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn release_stops_copies_and_starts() {
    let project = Project::new();
    project.write_recording_config(Some(&project.deploy()));

    project
        .cmd()
        .arg("release")
        .assert()
        .success()
        .stdout(predicate::str::contains("release complete (stop → copy → start)"));

    assert_eq!(project.journal_lines(), ["stop", "start"]);
    assert_eq!(
        fs::read_to_string(project.deploy().join("app.jar")).unwrap(),
        "new build"
    );
    assert!(!project.path().join("lock/forex.lock").exists());
}

#[test]
fn release_twice_runs_every_step_twice() {
    let project = Project::new();
    project.write_recording_config(Some(&project.deploy()));

    project.cmd().arg("release").assert().success();
    project.cmd().arg("release").assert().success();

    assert_eq!(project.journal_lines(), ["stop", "start", "stop", "start"]);
}

#[test]
fn target_dir_flag_overrides_config() {
    let project = Project::new();
    project.write_recording_config(None);

    project
        .cmd()
        .args(["release", "--target-dir"])
        .arg(project.deploy())
        .assert()
        .success();

    assert_eq!(project.journal_lines(), ["stop", "start"]);
}

#[test]
fn release_without_target_dir_runs_nothing() {
    let project = Project::new();
    project.write_recording_config(None);

    project
        .cmd()
        .arg("release")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("target directory"));

    assert!(project.journal_lines().is_empty());
}

#[test]
fn stop_task_needs_no_target_dir() {
    let project = Project::new();
    project.write_recording_config(None);

    project
        .cmd()
        .arg("stop")
        .assert()
        .success()
        .stdout(predicate::str::contains("stop complete (stop)"));

    assert_eq!(project.journal_lines(), ["stop"]);
}

#[test]
fn copy_task_does_not_start() {
    let project = Project::new();
    project.write_recording_config(Some(&project.deploy()));

    project.cmd().arg("copy").assert().success();

    assert_eq!(project.journal_lines(), ["stop"]);
    assert!(project.deploy().join("app.jar").exists());
}

#[test]
fn missing_artifact_stops_nothing() {
    let project = Project::new();
    project.write_recording_config(Some(&project.deploy()));
    fs::remove_file(project.path().join("build/app.jar")).unwrap();

    project
        .cmd()
        .arg("release")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("artifact not found"));

    assert!(project.journal_lines().is_empty());
}

#[test]
fn failed_stop_exits_with_its_code() {
    let project = Project::new();
    let journal = project.journal().display().to_string();
    project.write_config(
        Some(&project.deploy()),
        "echo cannot stop >&2; exit 4",
        &format!("echo start >> {journal}"),
    );

    project
        .cmd()
        .arg("release")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("cannot stop"))
        .stderr(predicate::str::contains("failed to stop service forex"));

    assert!(project.journal_lines().is_empty());
    assert!(!project.deploy().join("app.jar").exists());
}

#[test]
fn failed_copy_leaves_service_stopped() {
    let project = Project::new();
    project.write_recording_config(Some(&project.path().join("missing/deeper")));

    project
        .cmd()
        .arg("release")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to copy"))
        .stderr(predicate::str::contains("has not been restarted"));

    assert_eq!(project.journal_lines(), ["stop"]);
}

#[test]
fn failed_start_exits_with_its_code() {
    let project = Project::new();
    let journal = project.journal().display().to_string();
    project.write_config(
        Some(&project.deploy()),
        &format!("echo stop >> {journal}"),
        "echo port in use >&2; exit 7",
    );

    project
        .cmd()
        .arg("release")
        .assert()
        .code(7)
        .stderr(predicate::str::contains("port in use"))
        .stderr(predicate::str::contains("failed to start service forex"));

    assert_eq!(project.journal_lines(), ["stop"]);
    assert!(project.deploy().join("app.jar").exists());
}

#[test]
fn held_lock_blocks_release_until_forced() {
    let project = Project::new();
    project.write_recording_config(Some(&project.deploy()));

    let lock_dir = project.path().join("lock");
    fs::create_dir_all(&lock_dir).unwrap();
    let info = serde_json::json!({
        "holder": "other-host",
        "pid": 1,
        "started_at": chrono::Utc::now(),
        "service": "forex",
    });
    fs::write(lock_dir.join("forex.lock"), info.to_string()).unwrap();

    project
        .cmd()
        .arg("release")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already in progress"));
    assert!(project.journal_lines().is_empty());

    project.cmd().args(["release", "--force"]).assert().success();
    assert_eq!(project.journal_lines(), ["stop", "start"]);
}

#[test]
fn dry_run_prints_commands_without_running_them() {
    let project = Project::new();
    project.write_recording_config(Some(&project.deploy()));

    project
        .cmd()
        .args(["release", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("would run: sh -c"))
        .stdout(predicate::str::contains("would run: cp"));

    assert!(project.journal_lines().is_empty());
    assert!(!project.deploy().join("app.jar").exists());
}

#[test]
fn quiet_dry_run_still_prints_commands() {
    let project = Project::new();
    project.write_recording_config(Some(&project.deploy()));

    project
        .cmd()
        .args(["--quiet", "release", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("would run: sh -c"))
        .stdout(predicate::str::contains("would run: cp"))
        .stdout(predicate::str::contains("Stopping").not());

    assert!(project.journal_lines().is_empty());
}

#[test]
fn json_dry_run_emits_command_events() {
    let project = Project::new();
    project.write_recording_config(Some(&project.deploy()));

    let output = project
        .cmd()
        .args(["--json", "release", "--dry-run"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let commands: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str::<serde_json::Value>(line).unwrap())
        .filter(|event| event["event"] == "command")
        .collect();
    assert_eq!(commands.len(), 3);
    assert!(commands[1]["message"].as_str().unwrap().starts_with("cp "));
}

#[test]
fn plan_lists_steps_in_order() {
    let project = Project::new();
    project.write_recording_config(Some(&project.deploy()));

    let output = project.cmd().arg("plan").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stop = stdout.find("1. stop").unwrap();
    let copy = stdout.find("2. copy  cp").unwrap();
    let start = stdout.find("3. start").unwrap();
    assert!(stop < copy && copy < start);
    assert!(project.journal_lines().is_empty());
}

#[test]
fn plan_for_stop_needs_no_target_dir() {
    let project = Project::new();
    project.write_recording_config(None);

    project
        .cmd()
        .args(["plan", "stopService"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. stop"))
        .stdout(predicate::str::contains("2.").not());
}

#[test]
fn json_output_is_one_event_per_line() {
    let project = Project::new();
    project.write_recording_config(Some(&project.deploy()));

    let output = project.cmd().args(["--json", "release"]).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let events: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(events.last().unwrap()["event"], "success");
    assert!(events.iter().any(|e| e["event"] == "progress"));
}

#[test]
fn quiet_prints_only_result() {
    let project = Project::new();
    project.write_recording_config(Some(&project.deploy()));

    project
        .cmd()
        .args(["--quiet", "release"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stopping").not())
        .stdout(predicate::str::contains("release complete"));
}

#[test]
fn status_reports_running_service() {
    let project = Project::new();
    project.write_recording_config(None);
    let mut yaml = fs::read_to_string(project.path().join("rollout.yml")).unwrap();
    yaml.push_str("  status: [\"true\"]\n");
    fs::write(project.path().join("rollout.yml"), yaml).unwrap();

    project
        .cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("forex: running"));
}
