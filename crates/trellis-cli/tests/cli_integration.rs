//! CLI subprocess integration tests.
//!
//! These tests invoke the `trellis` binary as a subprocess and verify exit
//! codes, the emitted manifest stream, and JSON output.

use std::path::Path;
use std::process::Command;

fn trellis_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_trellis"));
    cmd.env_remove("TRELLIS_CREDENTIALS_DIR");
    cmd.env_remove("TRELLIS_LOG");
    cmd
}

fn write_credentials(dir: &Path, user: &str) {
    std::fs::write(dir.join("token"), b"ghp_cli_token").unwrap();
    std::fs::write(
        dir.join(format!("{user}-auth.json")),
        br#"{"auths":{"quay.io":{"auth":"Ym9iOnB3"}}}"#,
    )
    .unwrap();
}

fn documents(stdout: &[u8]) -> Vec<serde_yaml::Value> {
    String::from_utf8_lossy(stdout)
        .split("---\n")
        .filter(|d| !d.trim().is_empty())
        .map(|d| serde_yaml::from_str(d).unwrap())
        .collect()
}

fn names(docs: &[serde_yaml::Value]) -> Vec<String> {
    docs.iter()
        .map(|d| d["metadata"]["name"].as_str().unwrap().to_owned())
        .collect()
}

#[test]
fn cli_version_exits_zero() {
    let output = trellis_bin().arg("--version").output().unwrap();
    assert!(output.status.success(), "trellis --version must exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("trellis"), "version output: {stdout}");
}

#[test]
fn cli_help_lists_commands() {
    let output = trellis_bin().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["bootstrap", "init", "bindings", "devfile"] {
        assert!(stdout.contains(command), "help must list '{command}'");
    }
}

#[test]
fn cli_bindings_prints_catalog_in_order() {
    let output = trellis_bin().arg("bindings").output().unwrap();
    assert!(output.status.success());
    let docs = documents(&output.stdout);
    assert_eq!(
        names(&docs),
        [
            "dev-cd-deploy-from-master-binding",
            "dev-ci-build-from-pr-binding",
            "stage-cd-deploy-from-push-binding",
            "stage-ci-dryrun-from-pr-binding"
        ]
    );
}

#[test]
fn cli_bindings_json_is_an_array() {
    let output = trellis_bin().args(["--json", "bindings"]).output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let bindings = value.as_array().unwrap();
    assert_eq!(bindings.len(), 4);
    assert_eq!(bindings[0]["kind"], "TriggerBinding");
}

#[test]
fn cli_bootstrap_emits_four_documents() {
    let creds = tempfile::tempdir().unwrap();
    write_credentials(creds.path(), "bob");

    let output = trellis_bin()
        .args(["bootstrap", "--registry-user", "bob", "--base-repo", "org/base"])
        .arg("--prefix")
        .arg("tst")
        .arg("--credentials-dir")
        .arg(creds.path())
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let docs = documents(&output.stdout);
    assert_eq!(
        names(&docs),
        [
            "github-auth",
            "regcred",
            "cicd-event-listener",
            "github-webhook-event-listener"
        ]
    );
    for doc in &docs {
        assert_eq!(doc["metadata"]["namespace"].as_str(), Some("tst-cicd-environment"));
    }
}

#[test]
fn cli_bootstrap_reads_credentials_dir_from_env() {
    let creds = tempfile::tempdir().unwrap();
    write_credentials(creds.path(), "bob");

    let output = trellis_bin()
        .env("TRELLIS_CREDENTIALS_DIR", creds.path())
        .args(["bootstrap", "--registry-user", "bob", "--base-repo", "org/base"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(documents(&output.stdout).len(), 4);
}

#[test]
fn cli_bootstrap_missing_token_exits_three() {
    let creds = tempfile::tempdir().unwrap();

    let output = trellis_bin()
        .args(["bootstrap", "--registry-user", "bob", "--base-repo", "org/base"])
        .arg("--credentials-dir")
        .arg(creds.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("credential file not found"), "stderr: {stderr}");
}

#[test]
fn cli_bootstrap_json_reports_digest() {
    let creds = tempfile::tempdir().unwrap();
    write_credentials(creds.path(), "bob");

    let run = || {
        trellis_bin()
            .args(["--json", "bootstrap", "--registry-user", "bob"])
            .args(["--base-repo", "org/base", "--credentials-dir"])
            .arg(creds.path())
            .output()
            .unwrap()
    };
    let first: serde_json::Value = serde_json::from_slice(&run().stdout).unwrap();
    let second: serde_json::Value = serde_json::from_slice(&run().stdout).unwrap();
    assert_eq!(first["manifests"], 4);
    assert_eq!(first["digest"].as_str().unwrap().len(), 64);
    assert_eq!(first["digest"], second["digest"]);
}

#[test]
fn cli_init_rejects_bad_gitops_repo() {
    let out = tempfile::tempdir().unwrap();
    let output = trellis_bin()
        .args(["init", "--gitops-repo", "org_repo", "--gitops-webhook-secret", "s"])
        .arg("--output")
        .arg(out.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("repo must be org/repo: org_repo"), "stderr: {stderr}");
    assert!(!out.path().join("pipelines.yaml").exists());
}

#[test]
fn cli_init_app_repo_requires_webhook_secret() {
    let output = trellis_bin()
        .args(["init", "--gitops-repo", "org/gitops", "--gitops-webhook-secret", "s"])
        .args(["--app-git-repo", "org/app", "--skip-checks"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("app-webhook-secret"), "stderr: {stderr}");
}

#[test]
fn cli_init_env_name_requires_app_repo() {
    let output = trellis_bin()
        .args(["init", "--gitops-repo", "org/gitops", "--gitops-webhook-secret", "s"])
        .args(["--env-name", "dev", "--skip-checks"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("app-git-repo"));
}

#[test]
fn cli_init_writes_pipelines_file() {
    let out = tempfile::tempdir().unwrap();
    let output = trellis_bin()
        .args(["init", "--gitops-repo", "org/gitops", "--gitops-webhook-secret", "s"])
        .args(["--app-git-repo", "org/app", "--app-webhook-secret", "a"])
        .args(["--app-image-repo", "quay.io/org/app", "--env-name", "dev"])
        .args(["--prefix", "tst"])
        .arg("--output")
        .arg(out.path())
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let written = std::fs::read(out.path().join("pipelines.yaml")).unwrap();
    let docs = documents(&written);
    assert_eq!(docs.len(), 9);
    let last = docs.last().unwrap();
    assert_eq!(last["metadata"]["name"].as_str(), Some("app-webhook-secret"));
    assert_eq!(last["metadata"]["namespace"].as_str(), Some("tst-dev"));
}

#[test]
fn cli_init_missing_output_dir_fails_preflight() {
    let out = tempfile::tempdir().unwrap();
    let output = trellis_bin()
        .args(["init", "--gitops-repo", "org/gitops", "--gitops-webhook-secret", "s"])
        .arg("--output")
        .arg(out.path().join("absent"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("pre-flight"));
}

#[test]
fn cli_init_flags_override_params_file() {
    let out = tempfile::tempdir().unwrap();
    let params = out.path().join("init.toml");
    std::fs::write(
        &params,
        "gitops-repo = \"org_bad\"\ngitops-webhook-secret = \"from-file\"\nprefix = \"file\"\n",
    )
    .unwrap();

    let output = trellis_bin()
        .args(["--json", "init", "--gitops-repo", "org/gitops"])
        .arg("--params")
        .arg(&params)
        .arg("--output")
        .arg(out.path())
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["manifests"], 8);

    let text = std::fs::read_to_string(out.path().join("pipelines.yaml")).unwrap();
    assert!(text.contains("namespace: file-cicd-environment"));
    assert!(text.contains("'org/gitops'"));
}

#[test]
fn cli_devfile_validate_and_convert() {
    let dir = tempfile::tempdir().unwrap();
    let devfile = dir.path().join("source.yaml");
    std::fs::write(
        &devfile,
        "apiVersion: 1.0.0\nmetadata:\n  name: nodejs\ncomponents:\n  - type: dockerimage\n    alias: runtime\n    image: node:12\n    memoryLimit: 512Mi\n",
    )
    .unwrap();

    let output = trellis_bin()
        .args(["devfile", "validate"])
        .arg(&devfile)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("1.0.0"));

    let target = dir.path().join("out");
    std::fs::create_dir(&target).unwrap();
    let output = trellis_bin()
        .args(["devfile", "convert"])
        .arg(&devfile)
        .arg("--dir")
        .arg(&target)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(target.join("devfile.json").exists());
    assert!(target.join("devfile.yaml").exists());
}

#[test]
fn cli_devfile_invalid_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let devfile = dir.path().join("bad.yaml");
    std::fs::write(&devfile, "apiVersion: 1.0.0\ncomponents: []\n").unwrap();

    let output = trellis_bin()
        .args(["devfile", "validate"])
        .arg(&devfile)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid devfile schema"), "stderr: {stderr}");
}

#[test]
fn cli_completions_bash() {
    let output = trellis_bin().args(["completions", "bash"]).output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("trellis"));
}

#[test]
fn cli_man_pages_written() {
    let dir = tempfile::tempdir().unwrap();
    let output = trellis_bin()
        .arg("man-pages")
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(dir.path().join("trellis.1").exists());
    assert!(dir.path().join("trellis-init.1").exists());
}
