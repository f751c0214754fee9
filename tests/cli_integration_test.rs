use assert_cmd::Command;
use mockito::Server;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use tempfile::tempdir;

fn tex2bib(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("tex2bib").unwrap();
    cmd.env_remove("ADS_API_TOKEN")
        .env_remove("ADS_DEV_KEY")
        .env_remove("ADS_BASE_URL")
        .env_remove("RUST_LOG")
        .env("HOME", home);
    cmd
}

#[test]
fn test_cli_no_arguments_prints_hint() {
    let home = tempdir().unwrap();
    tex2bib(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("--help"));
}

#[test]
fn test_cli_missing_token_is_config_error() {
    let home = tempdir().unwrap();
    let tex = home.path().join("paper.tex");
    fs::write(&tex, r"\cite{2019ApJ...875L...1E}").unwrap();

    tex2bib(home.path())
        .arg(&tex)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("no ADS token found"));
}

#[test]
fn test_cli_writes_bib_file() {
    let home = tempdir().unwrap();
    let tex = home.path().join("paper.tex");
    let bib = home.path().join("out.bib");
    fs::write(&tex, "\\citep{2016AA...594A..13P}\n").unwrap();
    fs::write(&bib, "old content").unwrap();

    let mut server = Server::new();
    let ads_mock = server
        .mock("POST", "/v1/export/bibtex")
        .match_header("authorization", "Bearer cli-token")
        .with_status(200)
        .with_body(
            json!({
                "msg": "Retrieved 1 abstracts, starting with number 1.",
                "export": "@ARTICLE{2016A&A...594A..13P,\n  journal = {A&A},\n}\n\n",
            })
            .to_string(),
        )
        .create();

    tex2bib(home.path())
        .env("ADS_BASE_URL", server.url())
        .args(["--token", "cli-token", "--force", "--no-amp", "-b"])
        .arg(&bib)
        .arg(&tex)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 references extracted."))
        .stdout(predicate::str::contains("1 references written to"));

    ads_mock.assert();
    let written = fs::read_to_string(&bib).unwrap();
    assert!(written.starts_with("@ARTICLE{2016AA...594A..13P,"));
    assert!(!written.contains('&'));
}

#[test]
fn test_cli_service_error_exit_code() {
    let home = tempdir().unwrap();
    let tex = home.path().join("paper.tex");
    let bib = home.path().join("out.bib");
    fs::write(&tex, r"\cite{2019ApJ...875L...1E}").unwrap();
    fs::create_dir(home.path().join(".ads")).unwrap();
    fs::write(home.path().join(".ads").join("dev_key"), "file-token\n").unwrap();

    let mut server = Server::new();
    let ads_mock = server
        .mock("POST", "/v1/export/bibtex")
        .match_header("authorization", "Bearer file-token")
        .with_status(503)
        .create();

    tex2bib(home.path())
        .env("ADS_BASE_URL", server.url())
        .arg("--bibfile")
        .arg(&bib)
        .arg(&tex)
        .assert()
        .code(3);

    ads_mock.assert();
    assert!(!bib.exists());
}

#[test]
fn test_cli_missing_references_exit_code() {
    let home = tempdir().unwrap();
    let tex = home.path().join("paper.tex");
    let bib = home.path().join("out.bib");
    fs::write(&tex, r"\citep{2019ApJ...875L...1E, 2099Nope..1....1X}").unwrap();

    let mut server = Server::new();
    let _ads_mock = server
        .mock("POST", "/v1/export/bibtex")
        .with_status(200)
        .with_body(
            json!({
                "msg": "Retrieved 1 abstracts, starting with number 1.",
                "export": "@ARTICLE{2019ApJ...875L...1E,\n}\n\n",
            })
            .to_string(),
        )
        .create();

    tex2bib(home.path())
        .env("ADS_BASE_URL", server.url())
        .env("ADS_API_TOKEN", "env-token")
        .arg("-b")
        .arg(&bib)
        .arg(&tex)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Bibcodes that could not be found on ADS:"))
        .stdout(predicate::str::contains("2099Nope..1....1X"));
}

#[test]
fn test_cli_verbose_prints_query_payload() {
    let home = tempdir().unwrap();
    let tex = home.path().join("paper.tex");
    let bib = home.path().join("out.bib");
    fs::write(&tex, r"\citet{2019ApJ...875L...1E} and \citep{2016AA...594A..13P}").unwrap();

    let mut server = Server::new();
    let _ads_mock = server
        .mock("POST", "/v1/export/bibtex")
        .with_status(200)
        .with_body(
            json!({
                "msg": "Retrieved 2 abstracts, starting with number 1.",
                "export": "@ARTICLE{2019ApJ...875L...1E,\n}\n\n@ARTICLE{2016A&A...594A..13P,\n}\n\n",
            })
            .to_string(),
        )
        .create();

    tex2bib(home.path())
        .env("ADS_BASE_URL", server.url())
        .args(["-v", "-t", "tok", "-b"])
        .arg(&bib)
        .arg(&tex)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"Query: {"bibcode":["2016A&A...594A..13P","2019ApJ...875L...1E"],"sort":"year desc"}"#,
        ));
}

#[test]
fn test_cli_extra_entries_without_missing_bibcodes() {
    let home = tempdir().unwrap();
    let tex = home.path().join("paper.tex");
    let bib = home.path().join("out.bib");
    fs::write(&tex, r"\cite{2019ApJ...875L...1E}").unwrap();

    let mut server = Server::new();
    let _ads_mock = server
        .mock("POST", "/v1/export/bibtex")
        .with_status(200)
        .with_body(
            json!({
                "msg": "Retrieved 2 abstracts, starting with number 1.",
                "export": "@ARTICLE{2019ApJ...875L...1E,\n}\n\n@ARTICLE{2019ApJ...875L...1Z,\n}\n\n",
            })
            .to_string(),
        )
        .create();

    tex2bib(home.path())
        .env("ADS_BASE_URL", server.url())
        .args(["-t", "tok", "-b"])
        .arg(&bib)
        .arg(&tex)
        .assert()
        .success()
        .stdout(predicate::str::contains("2019ApJ...875L...1Z"))
        .stdout(predicate::str::contains("could not be found on ADS:").not());
}
