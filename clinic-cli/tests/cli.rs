use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn clinic_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("clinic-admin"));
    cmd.env("HOME", home)
        .env("USERPROFILE", home)
        .env_remove("CLINIC_ADMIN_BASE_URL")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// Serve `bodies` as JSON 200 responses, one connection each, and record the
/// request line of every request received.
fn serve(bodies: Vec<&'static str>) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let base_url = format!("http://{}/api", listener.local_addr().expect("addr"));
    let seen = Arc::new(Mutex::new(Vec::new()));

    let log = seen.clone();
    thread::spawn(move || {
        for body in bodies {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(stream);
            let mut request_line = String::new();
            reader.read_line(&mut request_line).expect("request line");

            let mut content_length = 0usize;
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).expect("header");
                if header.trim().is_empty() {
                    break;
                }
                if let Some((name, value)) = header.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap_or(0);
                    }
                }
            }
            let mut payload = vec![0; content_length];
            reader.read_exact(&mut payload).expect("body");
            log.lock().unwrap().push(request_line.trim().to_string());

            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let mut stream = reader.into_inner();
            stream.write_all(response.as_bytes()).expect("write");
        }
    });

    (base_url, seen)
}

const TEAM: &str = r#"[
    {"_id": "A", "fullName": "Amal Ben Salah", "phone": "22333444", "email": "amal@clinic.tn", "address": null, "accessLevel": "admin"},
    {"_id": "B", "prenom": "Bilel", "nom": "Haddad", "phoneNumber": "98765432", "email": "bilel@clinic.tn", "address": "Sfax", "accessLevel": "manager"}
]"#;

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn config_init_then_show_reports_file_source() {
    let home = TempDir::new().expect("home");

    clinic_cmd(home.path())
        .args(["config", "init", "--base-url", "http://clinic.test/api", "--timeout-secs", "5"])
        .assert()
        .success()
        .stdout(contains("Saved"));
    assert!(home.path().join(".clinic-admin/config.yaml").exists());

    clinic_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("http://clinic.test/api (config file)"))
        .stdout(contains("timeout_secs: 5"));
}

#[test]
fn environment_beats_file_and_flag_beats_environment() {
    let home = TempDir::new().expect("home");
    clinic_cmd(home.path())
        .args(["config", "init", "--base-url", "http://file.test/api"])
        .assert()
        .success();

    clinic_cmd(home.path())
        .env("CLINIC_ADMIN_BASE_URL", "http://env.test/api")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("http://env.test/api (CLINIC_ADMIN_BASE_URL)"));

    clinic_cmd(home.path())
        .env("CLINIC_ADMIN_BASE_URL", "http://env.test/api")
        .args(["config", "show", "--base-url", "http://flag.test/api"])
        .assert()
        .success()
        .stdout(contains("http://flag.test/api (--base-url)"));
}

#[test]
fn config_show_without_file_uses_default() {
    let home = TempDir::new().expect("home");
    clinic_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("http://127.0.0.1:1129/api (default)"));
}

#[test]
fn config_init_refuses_invalid_url() {
    let home = TempDir::new().expect("home");
    clinic_cmd(home.path())
        .args(["config", "init", "--base-url", "not a url"])
        .assert()
        .failure()
        .stderr(contains("refusing to save"));
    assert!(!home.path().join(".clinic-admin/config.yaml").exists());
}

// ---------------------------------------------------------------------------
// team
// ---------------------------------------------------------------------------

#[test]
fn team_list_json_normalizes_entries() {
    let home = TempDir::new().expect("home");
    let (base_url, seen) = serve(vec![TEAM]);

    clinic_cmd(home.path())
        .args(["team", "list", "--json", "--base-url", &base_url])
        .assert()
        .success()
        .stdout(contains(r#""scope": "active""#))
        .stdout(contains(r#""address": """#))
        .stdout(contains(r#""fullName": "Bilel Haddad""#))
        .stdout(contains(r#""accessLevel": "manager""#));

    assert_eq!(*seen.lock().unwrap(), ["GET /api/patient/getall HTTP/1.1"]);
}

#[test]
fn team_list_archived_uses_archived_listing() {
    let home = TempDir::new().expect("home");
    let (base_url, seen) = serve(vec!["[]"]);

    clinic_cmd(home.path())
        .env("CLINIC_ADMIN_BASE_URL", &base_url)
        .args(["team", "list", "--archived"])
        .assert()
        .success()
        .stdout(contains("No entries."));

    assert_eq!(*seen.lock().unwrap(), ["GET /api/patient/archived HTTP/1.1"]);
}

#[test]
fn unreachable_server_fails_with_context() {
    let home = TempDir::new().expect("home");
    let unused = TcpListener::bind("127.0.0.1:0").expect("bind");
    let base_url = format!("http://{}/api", unused.local_addr().expect("addr"));
    drop(unused);

    clinic_cmd(home.path())
        .args(["team", "list", "--base-url", &base_url])
        .assert()
        .failure()
        .stderr(contains("failed to load the active list"));
}

#[test]
fn archive_declined_sends_nothing() {
    let home = TempDir::new().expect("home");
    let (base_url, seen) = serve(vec![TEAM, "[]"]);

    clinic_cmd(home.path())
        .args(["team", "archive", "B", "--base-url", &base_url])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Archive Bilel Haddad? [y/N]"))
        .stdout(contains("Cancelled"));

    assert_eq!(seen.lock().unwrap().len(), 1, "only the list was fetched");
}

#[test]
fn archive_confirmed_posts_and_reports_remaining() {
    let home = TempDir::new().expect("home");
    let remaining = r#"[{"_id": "A", "fullName": "Amal Ben Salah", "accessLevel": "admin"}]"#;
    let (base_url, seen) = serve(vec![TEAM, remaining]);

    clinic_cmd(home.path())
        .args(["team", "archive", "B", "--yes", "--base-url", &base_url])
        .assert()
        .success()
        .stdout(contains("Archived 'Bilel Haddad' (1 entries remain)"))
        .stdout(contains("[y/N]").not());

    let seen = seen.lock().unwrap();
    assert_eq!(seen[1], "POST /api/patient/archiver HTTP/1.1");
}

#[test]
fn cycle_role_reports_old_and_new_level() {
    let home = TempDir::new().expect("home");
    let cycled = r#"{"_id": "B", "prenom": "Bilel", "nom": "Haddad", "accessLevel": "user"}"#;
    let (base_url, seen) = serve(vec![TEAM, cycled]);

    clinic_cmd(home.path())
        .args(["team", "cycle-role", "B", "--base-url", &base_url])
        .assert()
        .success()
        .stdout(contains("B: ● manager → ● user"));

    let seen = seen.lock().unwrap();
    assert_eq!(seen[1], "POST /api/patient/switch-role-cyclic HTTP/1.1");
}
