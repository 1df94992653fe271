//! Integration tests for the repository query pipeline.
//!
//! These build a checkout directory by hand (no network, no git) and drive
//! the real ripgrep engine against it. Tests that need the engine are skipped
//! when `rg` is not on PATH.

use std::path::Path;

use pretty_assertions::assert_eq;

use github_code_search::repo::{RepoHandle, RepoKey};
use github_code_search::search::{self, filters::FilterSet};

fn rg_available() -> bool {
    std::process::Command::new("rg")
        .arg("--version")
        .output()
        .is_ok()
}

fn handle_for(dir: &Path) -> RepoHandle {
    RepoHandle::new(
        RepoKey::new("strawgate", "e2e-test"),
        "main".to_string(),
        dir,
        "https://github.com".to_string(),
    )
    .unwrap()
}

/// A small project with known line numbers for window assertions.
fn sample_project(dir: &Path) {
    std::fs::create_dir_all(dir.join("src")).unwrap();
    std::fs::write(
        dir.join("README.md"),
        "\
# Sample

## Usage

```python
coder = ExistentialCoder()
coder.analyze()
```

Done.
",
    )
    .unwrap();
    std::fs::write(
        dir.join("src/coder.py"),
        "\
class ExistentialCoder:
    def analyze(self):
        return 42
",
    )
    .unwrap();
}

#[tokio::test]
async fn test_search_builds_windows_without_blank_lines() {
    if !rg_available() {
        eprintln!("skipping: rg not on PATH");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    sample_project(dir.path());
    let handle = handle_for(dir.path());

    let mut results = search::search_code(
        &handle,
        &["ExistentialCoder".to_string()],
        &FilterSet::default(),
        30,
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 2);
    results.sort_by(|a, b| a.url.cmp(&b.url));

    let readme = results
        .iter()
        .find(|r| r.url.ends_with("/README.md"))
        .unwrap();
    assert_eq!(
        readme.url,
        "https://github.com/strawgate/e2e-test/blob/main/README.md"
    );
    assert_eq!(readme.matches.len(), 1);

    let window = &readme.matches[0];
    let match_line = window.matched.line_numbers().next().unwrap();
    assert_eq!(match_line, 6);
    assert!(window.before.line_numbers().all(|n| n < match_line));
    assert!(window.after.line_numbers().all(|n| n > match_line));

    // Lines 2 and 4 in the README are blank and must not appear as context.
    for w in &readme.matches {
        assert!(w.before.0.values().all(|l| !l.trim_end().is_empty()));
        assert!(w.after.0.values().all(|l| !l.trim_end().is_empty()));
        assert!(!w.before.0.contains_key(&2));
        assert!(!w.before.0.contains_key(&4));
    }
}

#[tokio::test]
async fn test_search_result_cap_stops_at_max() {
    if !rg_available() {
        eprintln!("skipping: rg not on PATH");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    for i in 0..10 {
        std::fs::write(
            dir.path().join(format!("file-{i}.txt")),
            "needle in this file\n",
        )
        .unwrap();
    }
    let handle = handle_for(dir.path());

    let results = search::search_code(&handle, &["needle".to_string()], &FilterSet::default(), 3)
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
}

#[tokio::test]
async fn test_search_per_file_match_cap() {
    if !rg_available() {
        eprintln!("skipping: rg not on PATH");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let body: String = (0..8).map(|i| format!("needle number {i}\n")).collect();
    std::fs::write(dir.path().join("many.txt"), body).unwrap();
    let handle = handle_for(dir.path());

    let results = search::search_code(&handle, &["needle".to_string()], &FilterSet::default(), 30)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].matches.len(), 3);
}

#[tokio::test]
async fn test_search_is_case_insensitive_and_respects_exclude_globs() {
    if !rg_available() {
        eprintln!("skipping: rg not on PATH");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    sample_project(dir.path());
    let handle = handle_for(dir.path());

    let filters = FilterSet::build(vec![], vec!["*.py".to_string()], vec![], vec![]);
    let results = search::search_code(&handle, &["existentialcoder".to_string()], &filters, 30)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert!(results[0].url.ends_with("/README.md"));
}

#[tokio::test]
async fn test_search_unknown_type_token_is_tolerated() {
    if !rg_available() {
        eprintln!("skipping: rg not on PATH");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    sample_project(dir.path());
    let handle = handle_for(dir.path());

    // The bogus token is dropped from the filter set, not an error.
    let filters = FilterSet::build(vec![], vec![], vec!["not-a-real-type".to_string()], vec![]);
    let results = search::search_code(&handle, &["ExistentialCoder".to_string()], &filters, 30)
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn test_search_bad_pattern_is_an_error_not_empty() {
    if !rg_available() {
        eprintln!("skipping: rg not on PATH");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    sample_project(dir.path());
    let handle = handle_for(dir.path());

    let err = search::search_code(
        &handle,
        &["(unclosed".to_string()],
        &FilterSet::default(),
        30,
    )
    .await
    .unwrap_err();

    assert!(err.to_string().to_lowercase().contains("engine"));
}

#[tokio::test]
async fn test_find_files_lists_paths_with_cap() {
    if !rg_available() {
        eprintln!("skipping: rg not on PATH");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    sample_project(dir.path());
    let handle = handle_for(dir.path());

    let all = search::find_files(&handle, &FilterSet::default(), 100)
        .await
        .unwrap();
    let mut paths: Vec<&str> = all.iter().map(|p| p.path.as_str()).collect();
    paths.sort_unstable();
    assert_eq!(paths, vec!["README.md", "src/coder.py"]);

    let capped = search::find_files(&handle, &FilterSet::default(), 1)
        .await
        .unwrap();
    assert_eq!(capped.len(), 1);
}

#[tokio::test]
async fn test_find_files_with_include_glob() {
    if !rg_available() {
        eprintln!("skipping: rg not on PATH");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    sample_project(dir.path());
    let handle = handle_for(dir.path());

    let filters = FilterSet::build(vec!["*.py".to_string()], vec![], vec![], vec![]);
    let results = search::find_files(&handle, &filters, 100).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].path, "src/coder.py");
}

#[tokio::test]
async fn test_get_file_roundtrip_with_url() {
    let dir = tempfile::tempdir().unwrap();
    sample_project(dir.path());
    let handle = handle_for(dir.path());

    let file = handle.get_file("src/coder.py", 100).await.unwrap();
    assert_eq!(
        file.url,
        "https://github.com/strawgate/e2e-test/blob/main/src/coder.py"
    );
    assert_eq!(file.total_lines, 3);
    assert!(!file.truncated);
    assert_eq!(
        file.lines.0.get(&0).map(String::as_str),
        Some("class ExistentialCoder:")
    );
}
