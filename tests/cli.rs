use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const STORE: &str = r#"{
  "store": {
    "book": [
      {"author": "Nigel Rees", "title": "Sayings of the Century", "price": 8.95},
      {"author": "Evelyn Waugh", "title": "Sword of Honour", "price": 12.99},
      {"author": "Herman Melville", "title": "Moby Dick", "isbn": "0-553-21311-3", "price": 8.99}
    ],
    "bicycle": {"color": "red", "price": 19.95}
  }
}"#;

fn jsonlib() -> Command {
    Command::cargo_bin("jsonlib").unwrap()
}

fn fixture(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn get_from_file() {
    let dir = TempDir::new().unwrap();
    let file = fixture(&dir, "store.json", STORE);
    jsonlib()
        .args(["get", "$.store.book[?(@.price < 10)].title"])
        .arg(&file)
        .assert()
        .success()
        .stdout("\"Sayings of the Century\"\n\"Moby Dick\"\n");
}

#[test]
fn get_from_stdin_raw() {
    jsonlib()
        .args(["get", "-r", "$.store.bicycle.color"])
        .write_stdin(STORE)
        .assert()
        .success()
        .stdout("red\n");
}

#[test]
fn get_with_locations() {
    jsonlib()
        .args(["get", "-l", "$..isbn"])
        .write_stdin(STORE)
        .assert()
        .success()
        .stdout("$['store']['book'][2]['isbn']\t\"0-553-21311-3\"\n");
}

#[test]
fn get_missing_prints_nothing() {
    jsonlib()
        .args(["get", "$.store.car"])
        .write_stdin(STORE)
        .assert()
        .success()
        .stdout("");
}

#[test]
fn get_missing_fails_when_asked() {
    jsonlib()
        .args(["get", "--fail-on-empty", "$.store.car"])
        .write_stdin(STORE)
        .assert()
        .failure()
        .stderr(predicate::str::contains("path not found"));
}

#[test]
fn get_yaml_output() {
    jsonlib()
        .args(["get", "-o", "yaml", "$.store.bicycle"])
        .write_stdin(STORE)
        .assert()
        .success()
        .stdout(predicate::str::contains("color: red"));
}

#[test]
fn bad_path_fails() {
    jsonlib()
        .args(["get", "$.store[?("])
        .write_stdin(STORE)
        .assert()
        .failure()
        .stderr(predicate::str::contains("syntax error"));
}

#[test]
fn invalid_json_fails() {
    jsonlib()
        .args(["get", "$"])
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("parsing stdin"));
}

#[test]
fn set_prints_updated_document() {
    jsonlib()
        .args(["set", "-c", "$.a.b", "5"])
        .write_stdin(r#"{"a": {"b": 1}, "z": 0}"#)
        .assert()
        .success()
        .stdout("{\"a\":{\"b\":5},\"z\":0}\n");
}

#[test]
fn set_plain_text_becomes_string() {
    jsonlib()
        .args(["set", "-c", "$.name", "Osaka"])
        .write_stdin(r#"{"name": "Nara"}"#)
        .assert()
        .success()
        .stdout("{\"name\":\"Osaka\"}\n");
}

#[test]
fn set_negative_number() {
    jsonlib()
        .args(["set", "-c", "$.n", "-1"])
        .write_stdin(r#"{"n": 0}"#)
        .assert()
        .success()
        .stdout("{\"n\":-1}\n");
}

#[test]
fn add_negative_number() {
    jsonlib()
        .args(["add", "-c", "$.list", "-2.5"])
        .write_stdin(r#"{"list": []}"#)
        .assert()
        .success()
        .stdout("{\"list\":[-2.5]}\n");
}

#[test]
fn set_creates_missing_unless_disabled() {
    jsonlib()
        .args(["set", "-c", "$.new", "true"])
        .write_stdin("{}")
        .assert()
        .success()
        .stdout("{\"new\":true}\n");
    jsonlib()
        .args(["set", "-c", "--no-create", "$.new", "true"])
        .write_stdin("{}")
        .assert()
        .success()
        .stdout("{}\n");
}

#[test]
fn set_in_place() {
    let dir = TempDir::new().unwrap();
    let file = fixture(&dir, "doc.json", r#"{"version": 1}"#);
    jsonlib()
        .args(["set", "-i", "$.version", "2"])
        .arg(&file)
        .assert()
        .success()
        .stdout("");
    let contents = std::fs::read_to_string(&file).unwrap();
    assert_eq!(contents, "{\n  \"version\": 2\n}\n");
}

#[test]
fn in_place_requires_file() {
    jsonlib()
        .args(["set", "-i", "$.version", "2"])
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--in-place requires a file argument"));
}

#[test]
fn add_appends_to_array() {
    jsonlib()
        .args(["add", "-c", "$.list", r#"{"id": 3}"#])
        .write_stdin(r#"{"list": [{"id": 1}]}"#)
        .assert()
        .success()
        .stdout("{\"list\":[{\"id\":1},{\"id\":3}]}\n");
}

#[test]
fn add_to_scalar_fails() {
    jsonlib()
        .args(["add", "$.n", "1"])
        .write_stdin(r#"{"n": 1}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("type error"));
}

#[test]
fn delete_filtered() {
    jsonlib()
        .args(["delete", "-c", "$.list[?(@.id > 1)]"])
        .write_stdin(r#"{"list": [{"id": 1}, {"id": 2}, {"id": 3}]}"#)
        .assert()
        .success()
        .stdout("{\"list\":[{\"id\":1}]}\n");
}

#[test]
fn delete_root_fails() {
    jsonlib()
        .args(["delete", "$"])
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot delete the document root"));
}

#[test]
fn check_presence_and_absence() {
    jsonlib()
        .args(["check", "$.store.bicycle"])
        .write_stdin(STORE)
        .assert()
        .success();
    jsonlib()
        .args(["check", "$.store.car"])
        .write_stdin(STORE)
        .assert()
        .failure();
    jsonlib()
        .args(["check", "--absent", "$.store.car"])
        .write_stdin(STORE)
        .assert()
        .success();
    jsonlib()
        .args(["check", "--absent", "$.store.bicycle.color"])
        .write_stdin(STORE)
        .assert()
        .failure()
        .stderr(predicate::str::contains("$['store']['bicycle']['color']"));
}

#[test]
fn validate_against_schema() {
    let dir = TempDir::new().unwrap();
    let schema = fixture(
        &dir,
        "schema.json",
        r#"{"type": "object", "required": ["store"]}"#,
    );
    jsonlib()
        .arg("validate")
        .arg(&schema)
        .write_stdin(STORE)
        .assert()
        .success();
    jsonlib()
        .arg("validate")
        .arg(&schema)
        .write_stdin(r#"{"shop": {}}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not match schema"));
}

#[test]
fn unsupported_output_format_fails() {
    jsonlib()
        .args(["get", "-o", "xml", "$"])
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported format"));
}
