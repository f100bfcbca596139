//! Binary-level behaviour of the `ct` command.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

fn ct(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ct").unwrap();
    cmd.env_remove("CT_DB")
        .env_remove("CT_TRANSFER_DIR")
        .env_remove("RUST_LOG")
        .arg("--db")
        .arg(root.join("contacts.db"))
        .arg("--dir")
        .arg(root.join("transfer"));
    cmd
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn import_list_export_cycle() {
    let temp_dir = TempDir::new().unwrap();
    let transfer = temp_dir.path().join("transfer");
    fs::create_dir_all(&transfer).unwrap();
    fs::write(
        transfer.join("in.contacts"),
        "{\"displayName\":\"Ann\",\"phones\":[\"555-1111\",\"555-1111\"],\"emails\":[]}\n\n",
    )
    .unwrap();

    let imported = stdout_json(ct(temp_dir.path()).args(["--json", "import"]));
    assert_eq!(imported["success"], true);
    assert_eq!(imported["count"], 1);

    let listed = stdout_json(ct(temp_dir.path()).args(["--json", "list"]));
    assert_eq!(
        listed,
        serde_json::json!([
            {"displayName": "Ann", "phones": ["555-1111", "555-1111"], "emails": []}
        ])
    );

    let exported = stdout_json(ct(temp_dir.path()).args(["--json", "export"]));
    assert_eq!(exported["count"], 1);
    let content = fs::read_to_string(transfer.join("out.contacts")).unwrap();
    assert_eq!(
        content,
        "{\"displayName\":\"Ann\",\"phones\":[\"555-1111\",\"555-1111\"],\"emails\":[]}\n"
    );
}

#[test]
fn import_missing_file_exits_not_found() {
    let temp_dir = TempDir::new().unwrap();

    ct(temp_dir.path())
        .args(["--json", "import"])
        .assert()
        .code(3);
}

#[test]
fn import_abort_policy_exits_with_transfer_code() {
    let temp_dir = TempDir::new().unwrap();
    let transfer = temp_dir.path().join("transfer");
    fs::create_dir_all(&transfer).unwrap();
    fs::write(
        transfer.join("in.contacts"),
        "{\"displayName\":\"A\"}\nnot json\n{\"displayName\":\"C\"}\n",
    )
    .unwrap();

    ct(temp_dir.path())
        .args(["--json", "import", "--on-error", "abort"])
        .assert()
        .code(6);

    let listed = stdout_json(ct(temp_dir.path()).args(["--json", "list"]));
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[test]
fn delete_all_requires_confirmation() {
    let temp_dir = TempDir::new().unwrap();
    let transfer = temp_dir.path().join("transfer");
    fs::create_dir_all(&transfer).unwrap();
    fs::write(
        transfer.join("in.contacts"),
        "{\"displayName\":\"A\"}\n{\"displayName\":\"B\"}\n",
    )
    .unwrap();
    stdout_json(ct(temp_dir.path()).args(["--json", "import"]));

    ct(temp_dir.path())
        .args(["--json", "delete-all"])
        .assert()
        .code(4);

    let deleted = stdout_json(ct(temp_dir.path()).args(["--json", "delete-all", "--yes"]));
    assert_eq!(deleted["count"], 2);

    let listed = stdout_json(ct(temp_dir.path()).args(["--json", "list"]));
    assert_eq!(listed, serde_json::json!([]));
}

#[test]
fn status_reports_transfer_files() {
    let temp_dir = TempDir::new().unwrap();
    stdout_json(ct(temp_dir.path()).args(["--json", "export"]));

    let status = stdout_json(ct(temp_dir.path()).args(["--json", "status"]));
    assert_eq!(status["contacts"], 0);
    assert_eq!(status["files"][0]["name"], "out.contacts");
    assert_eq!(status["files"][0]["exists"], true);
    assert_eq!(status["files"][1]["exists"], false);
}
