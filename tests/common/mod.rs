#![allow(dead_code)]

use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::{Path, PathBuf};

/// A git repository with VI fixtures, a fake `g-cli` on the PATH that
/// records its arguments, and the directories a run needs.
pub struct ViRepository {
    pub repo_dir: TempDir,
    pub aux_dir: TempDir,
    pub base_sha: String,
}

#[fixture]
pub fn vi_repository() -> ViRepository {
    let repo_dir = TempDir::new().expect("Failed to create repo dir");
    let aux_dir = TempDir::new().expect("Failed to create aux dir");

    run_git_command(repo_dir.path(), &["init", "-q"])
        .assert()
        .success();
    run_git_command(repo_dir.path(), &["config", "user.name", "Diff Runner"])
        .assert()
        .success();
    run_git_command(
        repo_dir.path(),
        &["config", "user.email", "runner@example.com"],
    )
    .assert()
    .success();

    write_file(&repo_dir.path().join("placeholder.txt"), "base");
    let base_sha = commit_all(repo_dir.path(), "Base commit");

    install_gcli_shim(aux_dir.path());
    std::fs::create_dir_all(aux_dir.path().join("ops")).expect("Failed to create ops dir");

    ViRepository {
        repo_dir,
        aux_dir,
        base_sha,
    }
}

impl ViRepository {
    pub fn repo_path(&self) -> &Path {
        self.repo_dir.path()
    }

    /// The canonical repo path, as the tool reports file locations.
    pub fn canonical_repo_path(&self) -> PathBuf {
        self.repo_dir
            .path()
            .canonicalize()
            .expect("Failed to canonicalize repo path")
    }

    pub fn opdir(&self) -> PathBuf {
        self.aux_dir.path().join("ops")
    }

    pub fn diffdir(&self) -> PathBuf {
        self.aux_dir.path().join("diffs")
    }

    pub fn shim_bin_dir(&self) -> PathBuf {
        self.aux_dir.path().join("bin")
    }

    pub fn args_log(&self) -> PathBuf {
        self.aux_dir.path().join("gcli_args.log")
    }

    /// Lines recorded by the g-cli shim, one invocation per line.
    pub fn recorded_invocations(&self) -> Vec<String> {
        match std::fs::read_to_string(self.args_log()) {
            Ok(content) => content.lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn failure_log_content(&self) -> String {
        std::fs::read_to_string(self.diffdir().join("diff_failures.txt"))
            .expect("Failed to read diff_failures.txt")
    }

    pub fn write_file(&self, relative_path: &str, content: &str) {
        write_file(&self.repo_dir.path().join(relative_path), content);
    }

    pub fn commit_all(&self, message: &str) -> String {
        commit_all(self.repo_dir.path(), message)
    }

    /// The diffvi binary pointed at this repository and the fixture's base
    /// commit.
    pub fn run_diffvi_command(&self, extra_args: &[&str]) -> Command {
        let base_sha = self.base_sha.clone();
        self.run_diffvi_command_against(&base_sha, extra_args)
    }

    /// The diffvi binary pointed at this repository, with the shim first on
    /// the PATH and a LabVIEW 2020 install faked through the env override.
    pub fn run_diffvi_command_against(&self, target: &str, extra_args: &[&str]) -> Command {
        let path = format!(
            "{}:{}",
            self.shim_bin_dir().display(),
            std::env::var("PATH").unwrap_or_default()
        );

        let mut cmd = Command::cargo_bin("diffvi").expect("Failed to find diffvi binary");
        cmd.current_dir(self.repo_path())
            .env("PATH", path)
            .env("GCLI_ARGS_LOG", self.args_log())
            .env("labviewPath_2020", "/opt/labview/LabVIEW.exe")
            .arg("--labview-version")
            .arg("2020")
            .arg("--opdir")
            .arg(self.opdir())
            .arg("--diffdir")
            .arg(self.diffdir())
            .arg("--target")
            .arg(target);
        for arg in extra_args {
            cmd.arg(arg);
        }
        cmd
    }
}

pub fn run_git_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new("git");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn commit_all(dir: &Path, message: &str) -> String {
    run_git_command(dir, &["add", "-A"]).assert().success();
    run_git_command(dir, &["commit", "-q", "-m", message])
        .assert()
        .success();

    let output = run_git_command(dir, &["rev-parse", "HEAD"])
        .output()
        .expect("Failed to run git rev-parse");
    String::from_utf8(output.stdout)
        .expect("Non-UTF-8 commit sha")
        .trim()
        .to_string()
}

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| panic!("Failed to create directory {:?}: {}", parent, e));
    }

    std::fs::write(path, content)
        .unwrap_or_else(|e| panic!("Failed to write file {:?}: {}", path, e));
}

/// Installs a `g-cli` stand-in that appends its arguments to
/// `$GCLI_ARGS_LOG` and exits with `$GCLI_EXIT_CODE` (0 by default).
pub fn install_gcli_shim(aux_dir: &Path) {
    let bin_dir = aux_dir.join("bin");
    std::fs::create_dir_all(&bin_dir).expect("Failed to create shim bin dir");

    let shim = bin_dir.join("g-cli");
    std::fs::write(
        &shim,
        "#!/bin/sh\necho \"$@\" >> \"$GCLI_ARGS_LOG\"\nexit \"${GCLI_EXIT_CODE:-0}\"\n",
    )
    .expect("Failed to write g-cli shim");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&shim, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to mark g-cli shim executable");
    }
}
