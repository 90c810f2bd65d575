use anyhow::{Context, Result};
use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A throwaway copy of the `orders_project` fixture.
struct PlaybookTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl PlaybookTestEnv {
    fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/orders_project");

        let dest = tmp.path().join("orders_project");
        Self::copy_dir(&fixture, &dest)?;

        Ok(Self {
            _tmp: tmp,
            root: dest,
        })
    }

    /// An empty project directory: no project file, no session.
    fn bare() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().to_path_buf();
        Ok(Self { _tmp: tmp, root })
    }

    fn copy_dir(src: &Path, dst: &Path) -> std::io::Result<()> {
        let mut options = fs_extra::dir::CopyOptions::new();
        options.skip_exist = true;
        options.content_only = true;

        fs::create_dir_all(dst)?;
        fs_extra::dir::copy(src, dst, &options)
            .map(|_| ())
            .map_err(|e| std::io::Error::other(e.to_string()))
    }

    fn playbook(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("playbook"));
        cmd.current_dir(&self.root);
        cmd.env_remove("PLAYBOOK_STATE_FILE");
        cmd
    }

    fn read_json(&self, name: &str) -> Result<Value> {
        let path = self.root.join(name);
        let content = fs::read_to_string(&path).with_context(|| format!("reading {:?}", path))?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[test]
fn test_analyze_uses_project_rules() -> Result<()> {
    let env = PlaybookTestEnv::new()?;

    env.playbook()
        .args(["analyze", "--data", "data/orders.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Using data quality rules from project 'orders_demo'",
        ))
        .stdout(predicate::str::contains(
            "1 duplicate values found in 'OrderID' (excluding nulls)",
        ))
        .stdout(predicate::str::contains("1 values in 'Amount' failed condition '>= 0'"))
        .stdout(predicate::str::contains("93.3%"))
        .stdout(predicate::str::contains("Data Trust Score"));

    // Sans --save-rules, rien n'est écrit
    assert!(!env.root.join("orders_state.json").exists());
    Ok(())
}

#[test]
fn test_analyze_requires_a_dataset() -> Result<()> {
    let env = PlaybookTestEnv::bare()?;

    env.playbook()
        .arg("analyze")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No dataset given"));
    Ok(())
}

#[test]
fn test_analyze_missing_file_fails() -> Result<()> {
    let env = PlaybookTestEnv::bare()?;

    env.playbook()
        .args(["analyze", "--data", "nope.csv"])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn test_save_rules_persists_overrides() -> Result<()> {
    let env = PlaybookTestEnv::bare()?;

    env.playbook()
        .args(["analyze", "--sample", "--uniqueness-col", "Region", "--save-rules"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Session saved"));

    let raw = fs::read_to_string(env.root.join("playbook_state.json"))?;
    assert!(raw.starts_with("{\n    \""));
    assert!(raw.ends_with("}\n"));

    let doc: Value = serde_json::from_str(&raw)?;
    assert_eq!(doc["dq_rules_config"]["uniqueness_col"], "Region");
    assert!(doc["raci_df_json"].is_string());
    assert!(doc.get("uploaded_logo_bytes").is_none());

    // The saved rules now win over the defaults on the next run
    env.playbook()
        .args(["analyze", "--sample"])
        .assert()
        .success()
        .stdout(predicate::str::contains("duplicate values found in 'Region'"));
    Ok(())
}

#[test]
fn test_record_maturity_and_show() -> Result<()> {
    let env = PlaybookTestEnv::new()?;

    env.playbook()
        .args(["state", "record-maturity"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 in history"));

    let doc = env.read_json("orders_state.json")?;
    let history = doc["maturity_assessments_history"]
        .as_object()
        .context("history should be an object")?;
    assert_eq!(history.len(), 1);
    let key = history.keys().next().context("one entry")?;
    assert!(key.ends_with('Z'));

    env.playbook()
        .args(["state", "record-maturity"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 in history"));

    env.playbook()
        .args(["state", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Session loaded"))
        .stdout(predicate::str::contains("Maturity assessments"))
        .stdout(predicate::str::contains("Enterprise Data Strategy Initiative"));
    Ok(())
}

#[test]
fn test_corrupt_state_falls_back_to_defaults() -> Result<()> {
    let env = PlaybookTestEnv::new()?;
    fs::write(env.root.join("orders_state.json"), "{ not json")?;

    env.playbook()
        .args(["state", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Starting from defaults"))
        .stdout(predicate::str::contains("Mobility"));
    Ok(())
}

#[test]
fn test_broken_raci_is_replaced_with_a_warning() -> Result<()> {
    let env = PlaybookTestEnv::bare()?;
    fs::write(
        env.root.join("playbook_state.json"),
        r#"{
    "selected_sector": "Retail",
    "raci_df_json": "{\"columns\": [\"Role\"], \"index\": [0], \"data\": [[\"x\"]]}",
    "custom_key": [1, 2, 3]
}
"#,
    )?;

    env.playbook()
        .args(["state", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("⚠️"))
        .stdout(predicate::str::contains("Retail"))
        .stdout(predicate::str::contains("custom_key"));
    Ok(())
}

#[test]
fn test_reset_writes_defaults() -> Result<()> {
    let env = PlaybookTestEnv::bare()?;
    fs::write(
        env.root.join("playbook_state.json"),
        "{\n    \"selected_sector\": \"Retail\"\n}\n",
    )?;

    env.playbook().args(["state", "reset"]).assert().success();

    let doc = env.read_json("playbook_state.json")?;
    assert_eq!(doc["selected_sector"], "Mobility");
    Ok(())
}

#[test]
fn test_state_file_from_environment() -> Result<()> {
    let env = PlaybookTestEnv::new()?;

    env.playbook()
        .env("PLAYBOOK_STATE_FILE", "elsewhere.json")
        .args(["state", "reset"])
        .assert()
        .success();

    assert!(env.root.join("elsewhere.json").exists());
    assert!(!env.root.join("orders_state.json").exists());
    Ok(())
}

#[test]
fn test_export_roadmap() -> Result<()> {
    let env = PlaybookTestEnv::new()?;

    env.playbook()
        .args(["export", "--artifact", "roadmap", "--out", "plan.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("text/csv"));

    let csv = fs::read_to_string(env.root.join("plan.csv"))?;
    assert!(csv.starts_with("Category,ID,Task,Owner,Effort,Cost,Status,Progress (%),Dependencies (IDs)\n"));
    assert_eq!(csv.lines().count(), 10);
    Ok(())
}

#[test]
fn test_export_quality_report_needs_data() -> Result<()> {
    let env = PlaybookTestEnv::new()?;

    env.playbook()
        .args(["export", "--artifact", "quality-report"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("quality-report"));

    env.playbook()
        .args(["export", "--artifact", "quality-report", "--data", "data/orders.csv"])
        .assert()
        .success();

    let report = env.read_json("quality_report.json")?;
    assert_eq!(report["dataset"], "orders.csv");
    assert_eq!(
        report["dimensions"]["Uniqueness"],
        serde_json::json!({"status": "score", "detail": 80.0})
    );
    assert!(report["trust_score"].is_number());
    Ok(())
}

#[test]
fn test_profile_dataset() -> Result<()> {
    let env = PlaybookTestEnv::new()?;

    env.playbook()
        .args(["profile", "--data", "data/orders.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5 rows x 4 columns"))
        .stdout(predicate::str::contains("Rating"));
    Ok(())
}

#[test]
fn test_sample_writes_csv() -> Result<()> {
    let env = PlaybookTestEnv::bare()?;

    env.playbook()
        .args(["sample", "--out", "sales.csv", "--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("100 rows"));

    let csv = fs::read_to_string(env.root.join("sales.csv"))?;
    assert!(csv.starts_with(
        "CustomerID,PurchaseDate,ProductCategory,TransactionAmount,Region,SatisfactionScore\n"
    ));
    assert_eq!(csv.lines().count(), 101);

    // The generated file loads back through the file adapter
    env.playbook()
        .args(["profile", "--data", "sales.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("100 rows x 6 columns"));
    Ok(())
}
