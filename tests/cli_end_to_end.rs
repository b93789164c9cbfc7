#![deny(clippy::all, clippy::pedantic)]

use assert_cmd::Command;
use httpmock::MockServer;
use predicates::str::contains;
use std::io::Write;
use tempfile::NamedTempFile;

const ENV_VARS: [&str; 5] = [
    "DASHBOARDS_CONFIG_FILE",
    "DASHBOARDS_AUTH_TOKEN",
    "DASHBOARDS_IP",
    "DASHBOARDS_PORT",
    "DASHBOARDS_PUBLIC_LINK_PATTERN",
];

fn temp_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("tmp file");
    file.write_all(contents.as_bytes()).expect("write tmp");
    file
}

fn cli() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dashboards-cli"));
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn clear_cache_works_end_to_end() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("DELETE")
            .path("/_api/cache")
            .header("authorization", "token cli-token");
        then.status(200);
    });

    cli()
        .arg("--host")
        .arg(server.base_url())
        .arg("--auth-token")
        .arg("cli-token")
        .arg("clear-cache")
        .assert()
        .success()
        .stdout(contains("Cache cleared."));
    mock.assert();
}

#[test]
fn config_file_supplies_address_and_token() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("DELETE")
            .path("/_api/notebooks/reports/q1")
            .header("authorization", "token from-config");
        then.status(204);
    });

    let config = temp_file(
        ".json",
        &format!(
            "{{\n  // local server\n  IP: \"127.0.0.1\",\n  PORT: {},\n  \
             AUTH_TOKEN: \"from-config\",\n}}\n",
            server.port()
        ),
    );

    cli()
        .arg("--config-file")
        .arg(config.path())
        .arg("delete")
        .arg("reports/q1")
        .assert()
        .success()
        .stdout(contains("Deleted dashboard `reports/q1`."));
    mock.assert();
}

#[test]
fn environment_overrides_config_file() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("DELETE")
            .path("/_api/cache")
            .header("authorization", "token from-env");
        then.status(200);
    });

    let config = temp_file(
        ".json",
        "{ IP: \"127.0.0.1\", PORT: 1, AUTH_TOKEN: \"from-config\" }",
    );

    cli()
        .env("DASHBOARDS_PORT", server.port().to_string())
        .env("DASHBOARDS_AUTH_TOKEN", "from-env")
        .arg("--config-file")
        .arg(config.path())
        .arg("clear-cache")
        .assert()
        .success()
        .stdout(contains("Cache cleared."));
    mock.assert();
}

#[test]
fn bare_host_gets_http_scheme() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("DELETE").path("/_api/cache");
        then.status(200);
    });

    cli()
        .arg("--host")
        .arg(format!("127.0.0.1:{}", server.port()))
        .arg("clear-cache")
        .assert()
        .success();
    mock.assert();
}

#[test]
fn delete_with_wrong_status_exits_1() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("DELETE").path("/_api/notebooks/reports/q1");
        then.status(403)
            .header("content-type", "application/json")
            .body(r#"{"message":"Invalid token"}"#);
    });

    cli()
        .arg("--host")
        .arg(server.base_url())
        .arg("delete")
        .arg("reports/q1")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Invalid token"));
}

#[test]
fn upload_rejects_notebook_pathname() {
    let server = MockServer::start();
    let any_get = server.mock(|when, then| {
        when.method("GET");
        then.status(404);
    });
    let any_post = server.mock(|when, then| {
        when.method("POST");
        then.status(201);
    });

    let notebook = temp_file(".ipynb", "{}");
    cli()
        .arg("--host")
        .arg(server.base_url())
        .arg("upload")
        .arg(notebook.path())
        .arg("reports/q1.ipynb")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Usage: dashboards-cli upload"));
    any_get.assert_calls(0);
    any_post.assert_calls(0);
}

#[test]
fn upload_with_overwrite_publishes() {
    let server = MockServer::start();
    let existence = server.mock(|when, then| {
        when.method("GET");
        then.status(200);
    });
    let transfer = server.mock(|when, then| {
        when.method("POST").path("/_api/notebooks/reports/q1");
        then.status(201);
    });

    let notebook = temp_file(".ipynb", "{}");
    cli()
        .arg("--host")
        .arg(server.base_url())
        .arg("upload")
        .arg("--overwrite")
        .arg(notebook.path())
        .arg("reports/q1")
        .assert()
        .success()
        .stdout(contains("/dashboards/reports/q1"));
    existence.assert_calls(0);
    transfer.assert_calls(1);
}

#[test]
fn declined_overwrite_exits_0_without_transfer() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/dashboards/reports/q1");
        then.status(200);
    });
    let transfer = server.mock(|when, then| {
        when.method("POST");
        then.status(201);
    });

    let notebook = temp_file(".ipynb", "{}");
    cli()
        .arg("--host")
        .arg(server.base_url())
        .arg("upload")
        .arg(notebook.path())
        .arg("reports/q1")
        .write_stdin("no\n")
        .assert()
        .success()
        .stdout(contains("Upload cancelled."));
    transfer.assert_calls(0);
}

#[test]
fn malformed_config_fails_fast() {
    let config = temp_file(".json", "{ IP: ");
    cli()
        .arg("--config-file")
        .arg(config.path())
        .arg("clear-cache")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("failed to load configuration"));
}
