use assert_cmd::Command;
use predicates::prelude::*;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("transcript-assistant").unwrap();
    cmd.env("GEMINI_API_KEY", "test-key").env("RUST_LOG", "off");
    cmd
}

#[test]
fn test_help_lists_commands() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("summarize"))
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("translate"));
}

#[test]
fn test_ask_requires_question() {
    cli()
        .args(["ask", "https://www.youtube.com/watch?v=dQw4w9WgXcQ"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("QUESTION"));
}

#[test]
fn test_summarize_malformed_reference_fails_without_network() {
    cli()
        .args(["--quiet", "summarize", "https://example.com/videos/123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error fetching transcript"));
}
