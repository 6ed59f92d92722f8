use assert_cmd::Command;
use mockito::Matcher;
use predicates::prelude::*;
use std::path::Path;

fn shelfctl(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("shelfctl").unwrap();
    cmd.env("HOME", config_home)
        .env("XDG_CONFIG_HOME", config_home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn backend_args(url: &str) -> [String; 4] {
    [
        "--catalog-url".to_string(),
        url.to_string(),
        "--library-url".to_string(),
        url.to_string(),
    ]
}

fn mock_dune_search(server: &mut mockito::ServerGuard) -> mockito::Mock {
    server
        .mock("GET", "/volumes")
        .match_query(Matcher::UrlEncoded("q".into(), "Dune".into()))
        .with_status(200)
        .with_body(
            r#"{"items": [
                {"id": "v1", "volumeInfo": {"title": "Dune", "authors": ["Frank Herbert"]}},
                {"id": "v2", "volumeInfo": {"title": "Dune Messiah", "authors": ["Frank Herbert"]}},
                {"id": "v3", "volumeInfo": {"title": "Children of Dune", "authors": ["Frank Herbert"]}}
            ]}"#,
        )
        .create()
}

const SAVED_MESSIAH: &str = r#"{
    "id": 42,
    "googleBooksId": null,
    "title": "Dune Messiah",
    "authors": "Frank Herbert",
    "date_added": "2024-03-09T18:22:05",
    "date_updated": "2024-03-09T18:22:05"
}"#;

#[test]
fn test_help() {
    let temp = tempfile::tempdir().unwrap();
    shelfctl(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("personal library"))
        .stdout(predicate::str::contains("save"))
        .stdout(predicate::str::contains("health"));
}

#[test]
fn test_version() {
    let temp = tempfile::tempdir().unwrap();
    shelfctl(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("shelfctl"));
}

#[test]
fn test_search_lists_results() {
    let temp = tempfile::tempdir().unwrap();
    let mut server = mockito::Server::new();
    let _search = mock_dune_search(&mut server);

    shelfctl(temp.path())
        .args(backend_args(&server.url()))
        .args(["search", "Dune"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 result(s)"))
        .stdout(predicate::str::contains("Children of Dune"));
}

#[test]
fn test_search_no_results() {
    let temp = tempfile::tempdir().unwrap();
    let mut server = mockito::Server::new();
    let _search = server
        .mock("GET", "/volumes")
        .match_query(Matcher::UrlEncoded("q".into(), "isbn:0000000000".into()))
        .with_status(200)
        .with_body(r#"{"kind": "books#volumes", "totalItems": 0}"#)
        .create();

    shelfctl(temp.path())
        .args(backend_args(&server.url()))
        .args(["search", "--isbn", "0000000000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No results found."));
}

#[test]
fn test_save_picked_result() {
    let temp = tempfile::tempdir().unwrap();
    let mut server = mockito::Server::new();
    let _search = mock_dune_search(&mut server);
    let create = server
        .mock("POST", "/api/books")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "title": "Dune Messiah",
            "authors": "Frank Herbert"
        })))
        .with_status(201)
        .with_body(SAVED_MESSIAH)
        .create();

    shelfctl(temp.path())
        .args(backend_args(&server.url()))
        .args(["save", "Dune", "--pick", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Saved \"Dune Messiah\" to your library (id 42)",
        ));

    create.assert();
}

#[test]
fn test_save_conflict_is_not_a_failure() {
    let temp = tempfile::tempdir().unwrap();
    let mut server = mockito::Server::new();
    let _search = mock_dune_search(&mut server);
    let _create = server
        .mock("POST", "/api/books")
        .with_status(409)
        .with_body(r#"{"detail": "already exists"}"#)
        .create();

    shelfctl(temp.path())
        .args(backend_args(&server.url()))
        .args(["save", "Dune", "--pick", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Dune\" is already in your library"));
}

#[test]
fn test_save_server_error_fails() {
    let temp = tempfile::tempdir().unwrap();
    let mut server = mockito::Server::new();
    let _search = mock_dune_search(&mut server);
    let _create = server.mock("POST", "/api/books").with_status(500).create();

    shelfctl(temp.path())
        .args(backend_args(&server.url()))
        .args(["save", "Dune", "--pick", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Save failed (internal_server_error)",
        ));
}

#[test]
fn test_save_pick_out_of_range() {
    let temp = tempfile::tempdir().unwrap();
    let mut server = mockito::Server::new();
    let _search = mock_dune_search(&mut server);

    shelfctl(temp.path())
        .args(backend_args(&server.url()))
        .args(["save", "Dune", "--pick", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_list_json() {
    let temp = tempfile::tempdir().unwrap();
    let mut server = mockito::Server::new();
    let _list = server
        .mock("GET", "/api/books")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("search".into(), "Herbert".into()),
            Matcher::UrlEncoded("limit".into(), "5".into()),
            Matcher::UrlEncoded("offset".into(), "0".into()),
        ]))
        .with_status(200)
        .with_body(format!("[{}]", SAVED_MESSIAH))
        .create();

    shelfctl(temp.path())
        .args(backend_args(&server.url()))
        .args(["list", "--search", "Herbert", "--limit", "5", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": 42"))
        .stdout(predicate::str::contains("\"title\": \"Dune Messiah\""));
}

#[test]
fn test_show_missing_book() {
    let temp = tempfile::tempdir().unwrap();
    let mut server = mockito::Server::new();
    let _get = server
        .mock("GET", "/api/books/99")
        .with_status(404)
        .with_body(r#"{"detail": "not found"}"#)
        .create();

    shelfctl(temp.path())
        .args(backend_args(&server.url()))
        .args(["show", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to fetch book 99"))
        .stderr(predicate::str::contains("book not found"));
}

#[test]
fn test_stats() {
    let temp = tempfile::tempdir().unwrap();
    let mut server = mockito::Server::new();
    let _stats = server
        .mock("GET", "/api/stats")
        .with_status(200)
        .with_body(r#"{"total_books": 15, "recent_books": ["Dune", "Emma"]}"#)
        .create();

    shelfctl(temp.path())
        .args(backend_args(&server.url()))
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("15"))
        .stdout(predicate::str::contains("Dune, Emma"));
}

#[test]
fn test_health_unreachable() {
    let temp = tempfile::tempdir().unwrap();
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    shelfctl(temp.path())
        .args(["--library-url", &url, "health"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Library unreachable (connection_refused)"));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let temp = tempfile::tempdir().unwrap();
    let config_dir = temp.path().join("shelfctl");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "[library]\n").unwrap();

    shelfctl(temp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file already exists"));
}

#[test]
fn test_config_file_is_used() {
    let temp = tempfile::tempdir().unwrap();
    let mut server = mockito::Server::new();
    let _authors = server
        .mock("GET", "/api/authors")
        .with_status(200)
        .with_body(r#"["Frank Herbert", "Jane Austen"]"#)
        .create();

    let config_dir = temp.path().join("shelfctl");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        format!("[library]\nbase_url = \"{}\"\n", server.url()),
    )
    .unwrap();

    shelfctl(temp.path())
        .arg("authors")
        .assert()
        .success()
        .stdout(predicate::str::contains("Jane Austen"));
}
