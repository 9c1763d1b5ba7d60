//! CLI contract tests
//!
//! These run the compiled binary and check exit codes and usage output. No
//! network activity: every invocation here fails argument handling or
//! validation before a crawl can start.

use assert_cmd::Command;

fn sitescan() -> Command {
    Command::cargo_bin("sitescan").expect("binary should build")
}

#[test]
fn test_missing_seed_url_prints_usage_and_exits_1() {
    let output = sitescan().output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"));
    assert!(stderr.contains("SEED_URL"));
}

#[test]
fn test_help_exits_0() {
    let output = sitescan().arg("--help").output().unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"));
}

#[test]
fn test_short_version_flag_exits_0() {
    let output = sitescan().arg("-v").output().unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_non_integer_concurrency_exits_1() {
    let output = sitescan()
        .args(["https://example.com", "abc"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid value"));
}

#[test]
fn test_zero_max_pages_rejected_before_crawling() {
    let output = sitescan()
        .args(["https://example.invalid", "1", "0"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("max_pages"));
}
