use crate::common::COMMIT_DATE;
use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// An initialized store with `1.txt` and `a/2.txt` committed on master
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one\n".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two\n".to_string(),
    ));

    twig_add(repository_dir.path(), "1.txt").assert().success();
    twig_add(repository_dir.path(), "a/2.txt").assert().success();
    twig_commit(repository_dir.path(), "Initial files")
        .assert()
        .success();

    repository_dir
}

pub fn run_twig_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("twig").expect("Failed to find twig binary");
    cmd.envs(vec![("NO_COLOR", "1"), ("TWIG_COMMIT_DATE", COMMIT_DATE)]);
    cmd.env_remove("TWIG_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn twig_add(dir: &Path, file: &str) -> Command {
    run_twig_command(dir, &["add", file])
}

pub fn twig_commit(dir: &Path, message: &str) -> Command {
    run_twig_command(dir, &["commit", message])
}

pub fn twig_stdout(dir: &Path, args: &[&str]) -> String {
    let output = run_twig_command(dir, args)
        .output()
        .expect("Failed to run twig");
    String::from_utf8(output.stdout).expect("twig printed invalid UTF-8")
}
