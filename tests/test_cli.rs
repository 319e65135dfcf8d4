use mockito::Matcher;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

/// Run the binary in `dir` with no API key coming from the outer environment
fn run_in(dir: &Path, args: &[&str], envs: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_recipe-extractor"));
    command
        .args(args)
        .current_dir(dir)
        .env_remove("GEMINI_API_KEY")
        .env_remove("RUST_LOG");
    for (key, _) in std::env::vars().filter(|(k, _)| k.starts_with("RECIPE_EXTRACTOR")) {
        command.env_remove(key);
    }
    command.envs(envs.iter().copied());
    command.output().expect("Failed to execute binary")
}

/// Work directory nested one level down so `../.env.local` stays inside the temp dir
fn workdir(root: &tempfile::TempDir) -> std::path::PathBuf {
    let dir = root.path().join("work");
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn stdout_json(output: &Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1, "stdout should hold one JSON line: {stdout}");
    serde_json::from_str(lines[0]).expect("stdout should be JSON")
}

#[test]
fn test_missing_url_prints_usage_and_exits_1() {
    let root = tempfile::tempdir().unwrap();
    let output = run_in(&workdir(&root), &[], &[]);

    assert_eq!(output.status.code(), Some(1));
    let result = stdout_json(&output);
    assert_eq!(result["success"], false);
    assert!(result["error"].as_str().unwrap().starts_with("Usage:"));
}

#[test]
fn test_unknown_flag_still_prints_one_json_line() {
    let root = tempfile::tempdir().unwrap();
    let output = run_in(
        &workdir(&root),
        &["https://youtu.be/abc123", "--verbose"],
        &[],
    );

    assert_eq!(output.status.code(), Some(1));
    let result = stdout_json(&output);
    assert_eq!(result["success"], false);
    assert!(result["error"].as_str().unwrap().starts_with("Usage:"));
}

#[test]
fn test_help_is_still_available() {
    let root = tempfile::tempdir().unwrap();
    let output = run_in(&workdir(&root), &["--help"], &[]);

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("--quiet"));
}

#[test]
fn test_missing_api_key() {
    let root = tempfile::tempdir().unwrap();
    let output = run_in(
        &workdir(&root),
        &["https://youtube.com/watch?v=abc123", "--quiet"],
        &[],
    );

    assert_eq!(output.status.code(), Some(0));
    let result = stdout_json(&output);
    assert_eq!(result["success"], false);
    assert!(result["error"].as_str().unwrap().contains("GEMINI_API_KEY"));
    assert!(output.stderr.is_empty());
}

#[test]
fn test_invalid_url_in_json_mode() {
    let root = tempfile::tempdir().unwrap();
    let dir = workdir(&root);
    // Key is found in the second candidate env file
    fs::write(dir.join(".env"), "# local secrets\nGEMINI_API_KEY=file-key\n").unwrap();

    let output = run_in(&dir, &["--json", "https://vimeo.com/1234"], &[]);

    assert_eq!(
        stdout_json(&output),
        json!({"success": false, "error": "Invalid YouTube URL"})
    );
    assert!(output.stderr.is_empty());
}

#[test]
fn test_non_quiet_mode_logs_to_stderr_only() {
    let root = tempfile::tempdir().unwrap();
    let output = run_in(
        &workdir(&root),
        &["https://vimeo.com/1234"],
        &[("RECIPE_EXTRACTOR__GEMINI__API_KEY", "env-key")],
    );

    assert_eq!(
        stdout_json(&output),
        json!({"success": false, "error": "Invalid YouTube URL"})
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("AI RECIPE EXTRACTOR"));
}

#[tokio::test]
async fn test_success_writes_recipe_file() {
    let mut server = mockito::Server::new_async().await;
    let tracks = format!(
        r#"[{{"baseUrl":"{}/api/timedtext?v=abc123&lang=en","languageCode":"en"}}]"#,
        server.url()
    );
    let _watch = server
        .mock("GET", "/watch")
        .match_query(Matcher::UrlEncoded("v".into(), "abc123".into()))
        .with_status(200)
        .with_body(format!(
            r#"<script>var ytInitialPlayerResponse = {{"captions":{{"playerCaptionsTracklistRenderer":{{"captionTracks":{tracks}}}}}}};</script>"#
        ))
        .create_async()
        .await;
    let _captions = server
        .mock("GET", "/api/timedtext")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"events":[{"segs":[{"utf8":"pancit with calamansi"}]}]}"#)
        .create_async()
        .await;
    let _gemini = server
        .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({"candidates": [{"content": {"parts": [{"text": "{\"title\":\"Pancit\",\"servings\":4}"}]}}]})
                .to_string(),
        )
        .create_async()
        .await;

    let root = tempfile::tempdir().unwrap();
    let dir = workdir(&root);
    fs::write(
        dir.join("recipe-extractor.toml"),
        format!(
            r#"
[gemini]
api_key = "test-key"
base_url = "{url}"

[transcripts]
base_url = "{url}"

[metadata]
enabled = false
"#,
            url = server.url()
        ),
    )
    .unwrap();

    let output = run_in(&dir, &["https://youtu.be/abc123"], &[]);

    let result = stdout_json(&output);
    assert_eq!(result["success"], true);
    assert_eq!(result["recipe"]["title"], "Pancit");
    assert_eq!(result["recipe"]["servings"], 4);
    assert_eq!(result["recipe"]["transcript_length"], 21);

    let saved: Value =
        serde_json::from_str(&fs::read_to_string(dir.join("recipe_abc123.json")).unwrap())
            .unwrap();
    assert_eq!(saved, result["recipe"]);
}

#[tokio::test]
async fn test_quiet_mode_skips_recipe_file() {
    let mut server = mockito::Server::new_async().await;
    let tracks = format!(
        r#"[{{"baseUrl":"{}/api/timedtext?lang=en","languageCode":"en"}}]"#,
        server.url()
    );
    let _watch = server
        .mock("GET", "/watch")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(format!(r#""captionTracks":{tracks}"#))
        .create_async()
        .await;
    let _captions = server
        .mock("GET", "/api/timedtext")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"events":[{"segs":[{"utf8":"tinola"}]}]}"#)
        .create_async()
        .await;
    let _gemini = server
        .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({"candidates": [{"content": {"parts": [{"text": "{\"title\":\"Tinola\"}"}]}}]})
                .to_string(),
        )
        .create_async()
        .await;

    let root = tempfile::tempdir().unwrap();
    let dir = workdir(&root);
    let url = server.url();

    let output = run_in(
        &dir,
        &["https://www.youtube.com/embed/tin0la", "--quiet"],
        &[
            ("RECIPE_EXTRACTOR__GEMINI__API_KEY", "test-key"),
            ("RECIPE_EXTRACTOR__GEMINI__BASE_URL", &url),
            ("RECIPE_EXTRACTOR__TRANSCRIPTS__BASE_URL", &url),
            ("RECIPE_EXTRACTOR__METADATA__ENABLED", "false"),
        ],
    );

    let result = stdout_json(&output);
    assert_eq!(result["success"], true);
    assert_eq!(result["recipe"]["video_id"], "tin0la");
    assert!(output.stderr.is_empty());
    assert!(!dir.join("recipe_tin0la.json").exists());
}
