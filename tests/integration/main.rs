//! Integration tests for Syncache

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn syncache() -> Command {
        let mut cmd = cargo_bin_cmd!("syncache");
        cmd.env_remove("SYNCACHE_CONFIG");
        cmd
    }

    /// Config with an instant, reliable remote
    fn instant_config(temp: &TempDir) -> PathBuf {
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "[remote]\nmin_latency_ms = 0\nmax_latency_ms = 0\nfailure_rate = 0.0\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn help_displays() {
        syncache()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("optimistic data-sync cache"));
    }

    #[test]
    fn version_displays() {
        syncache()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("syncache"));
    }

    #[test]
    fn config_path() {
        syncache()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        let path = instant_config(&temp);
        syncache()
            .arg("--config")
            .arg(&path)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[remote]"))
            .stdout(predicate::str::contains("temp_id_prefix"));
    }

    #[test]
    fn config_init_then_set() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fresh").join("config.toml");

        syncache()
            .arg("--config")
            .arg(&path)
            .args(["config", "init"])
            .assert()
            .success();
        assert!(path.exists());

        syncache()
            .arg("--config")
            .arg(&path)
            .args(["config", "set", "remote.failure_rate", "0.5"])
            .assert()
            .success();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("failure_rate = 0.5"));
    }

    #[test]
    fn invalid_config_reports_hint() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[remote]\nfailure_rate = 3.0\n").unwrap();

        syncache()
            .arg("--config")
            .arg(&path)
            .args(["fetch", "countries"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("failure_rate"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn fetch_countries_table() {
        let temp = TempDir::new().unwrap();
        let path = instant_config(&temp);
        syncache()
            .arg("--config")
            .arg(&path)
            .args(["fetch", "countries"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Germany"))
            .stdout(predicate::str::contains("REGION"));
    }

    #[test]
    fn fetch_companies_json() {
        let temp = TempDir::new().unwrap();
        let path = instant_config(&temp);
        let output = syncache()
            .arg("--config")
            .arg(&path)
            .args(["fetch", "companies", "--format", "json"])
            .output()
            .unwrap();

        assert!(output.status.success());
        let companies: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(companies.as_array().unwrap().len(), 3);
        assert_eq!(companies[0]["name"], "Acme Corp");
    }

    #[test]
    fn fetch_posts_plain() {
        let temp = TempDir::new().unwrap();
        let path = instant_config(&temp);
        syncache()
            .arg("--config")
            .arg(&path)
            .args(["fetch", "posts", "--format", "plain"])
            .assert()
            .success()
            .stdout("p1\np2\n");
    }

    #[test]
    fn fetch_fails_when_remote_always_fails() {
        let temp = TempDir::new().unwrap();
        let path = instant_config(&temp);
        syncache()
            .arg("--config")
            .arg(&path)
            .args(["fetch", "posts", "--failure-rate", "1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Network request failed"));
    }

    #[test]
    fn failure_rate_out_of_range_rejected() {
        syncache()
            .args(["fetch", "posts", "--failure-rate", "1.5"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("between 0 and 1"));
    }

    #[test]
    fn posts_upsert_creates() {
        let temp = TempDir::new().unwrap();
        let path = instant_config(&temp);
        syncache()
            .arg("--config")
            .arg(&path)
            .args([
                "posts", "upsert", "--title", "Heat pumps", "--company", "c2", "--month",
                "2024-03",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Saved post p-"))
            .stdout(predicate::str::contains("3 post(s) cached"));
    }

    #[test]
    fn posts_upsert_rejects_bad_month() {
        syncache()
            .args([
                "posts", "upsert", "--title", "Heat pumps", "--company", "c2", "--month",
                "March",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("YYYY-MM"));
    }

    #[test]
    fn posts_delete_unknown() {
        let temp = TempDir::new().unwrap();
        let path = instant_config(&temp);
        syncache()
            .arg("--config")
            .arg(&path)
            .args(["posts", "delete", "p404", "--yes"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Record not found: p404"));
    }

    #[test]
    fn posts_delete_with_yes() {
        let temp = TempDir::new().unwrap();
        let path = instant_config(&temp);
        syncache()
            .arg("--config")
            .arg(&path)
            .args(["posts", "delete", "p1", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Deleted post p1"))
            .stdout(predicate::str::contains("1 post(s) cached"));
    }
}
