use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn marginalia() -> Result<Command, Box<dyn std::error::Error>> {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("marginalia")?;
    cmd.env_remove("MARGINALIA_ENV").env_remove("RUST_LOG");
    Ok(cmd)
}

#[test]
fn render_markdown_from_stdin_without_config() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    marginalia()?
        .current_dir(dir.path())
        .arg("render")
        .write_stdin("\"Hello\" -- *world*")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "<p>\u{201c}Hello\u{201d} \u{2013} <em>world</em></p>",
        ));

    Ok(())
}

#[test]
fn render_comment_chain_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("comment.txt");
    fs::write(&input, "I'd say <b>no</b> <script>alert(1)</script>")?;

    marginalia()?
        .current_dir(dir.path())
        .args(["render", "--filter", "sanitize, smartify"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("I\u{2019}d say <b>no</b>"))
        .stdout(predicate::str::contains("script").not());

    Ok(())
}

#[test]
fn render_rejects_unknown_transform() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    marginalia()?
        .current_dir(dir.path())
        .args(["render", "--filter", "markdown,textile", "-"])
        .write_stdin("hello")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown transform `textile`"));

    Ok(())
}

#[test]
fn filters_lists_builtins() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    let assert = marginalia()?
        .current_dir(dir.path())
        .args(["filters", "--json"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    let names: Vec<String> = serde_json::from_str(&stdout)?;
    for expected in ["markdown", "sanitize", "smartify", "html", "text", "autolink"] {
        assert!(names.iter().any(|n| n == expected), "missing {expected}");
    }

    Ok(())
}

#[test]
fn check_config_reports_chains() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("marginalia.yml"),
        r#"
site:
  title: "Test"
  author: "Tester"
  url: "https://example.com"
filters:
  comment: [sanitize, smartify]
  summary: [markdown]
"#,
    )?;

    marginalia()?
        .current_dir(dir.path())
        .arg("check-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration OK: marginalia.yml"))
        .stdout(predicate::str::contains("sanitize -> smartify"))
        .stdout(predicate::str::contains("environment: development"));

    Ok(())
}

#[test]
fn check_config_fails_on_bad_chain() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("marginalia.yml"),
        r#"
site:
  title: "Test"
  author: "Tester"
  url: "https://example.com"
filters:
  comment: [sanitize, bbcode]
"#,
    )?;

    marginalia()?
        .current_dir(dir.path())
        .arg("check-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("bbcode"));

    Ok(())
}

#[test]
fn check_config_requires_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    marginalia()?
        .current_dir(dir.path())
        .arg("check-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));

    Ok(())
}
