//! Authorship and history extraction from git.
//!
//! Runs `git log --follow` on the document and maps the commit list to
//! schema.org fields:
//!
//! | Field          | Source                                  |
//! |----------------|-----------------------------------------|
//! | `author`       | author of the oldest commit             |
//! | `dateCreated`  | author date of the oldest commit        |
//! | `dateModified` | author date of the newest commit        |
//! | `contributor`  | every other distinct author, oldest first |
//!
//! A document outside any work tree, or one that was never committed, simply
//! gets none of these fields. A `git` binary that cannot be started, or any
//! other git failure, is an error.

use crate::error::ExtractionError;
use crate::extract::Extractor;
use crate::pipeline::paths::DocumentPath;
use crate::record::DocumentRecord;
use serde_json::{json, Value};
use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Field separator in the `--format` string (ASCII unit separator).
const SEP: char = '\u{1f}';

const LOG_FORMAT: &str = "--format=%an%x1f%ae%x1f%aI";

/// Extracts `author`, `contributor`, `dateCreated` and `dateModified`.
#[derive(Debug, Clone)]
pub struct GitExtractor {
    program: String,
}

impl GitExtractor {
    pub fn new() -> Self {
        Self {
            program: "git".to_string(),
        }
    }

    /// Use a specific git executable instead of the one on `PATH`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `git -C <dir> log --follow ... -- <file>`, with messages forced to
    /// the C locale so stderr can be matched.
    fn history_command(&self, dir: &Path, file: &OsStr) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.env("LC_ALL", "C")
            .env("LANGUAGE", "C")
            .arg("-C")
            .arg(dir)
            .args(["log", "--follow", LOG_FORMAT, "--"])
            .arg(file);
        cmd
    }

    fn command_line(&self, file: &str) -> String {
        format!("{} log --follow {} -- {}", self.program, LOG_FORMAT, file)
    }
}

impl Default for GitExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for GitExtractor {
    fn name(&self) -> &str {
        "git"
    }

    fn extract(
        &self,
        record: &mut DocumentRecord,
        document: &DocumentPath,
    ) -> Result<(), ExtractionError> {
        let path = document.absolute();
        let (Some(dir), Some(file)) = (path.parent(), path.file_name()) else {
            return Err(ExtractionError::Malformed {
                path: path.to_path_buf(),
                detail: "document path has no parent directory".into(),
            });
        };
        let file_str = file.to_string_lossy();

        let output = self
            .history_command(dir, file)
            .output()
            .map_err(|e| ExtractionError::Command {
                command: self.command_line(&file_str),
                detail: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_missing_history(&stderr) {
                debug!("{}: no git history ({})", document, stderr.trim());
                return Ok(());
            }
            return Err(ExtractionError::Command {
                command: self.command_line(&file_str),
                detail: format!("{}: {}", output.status, stderr.trim()),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let commits = parse_log(&stdout);
        debug!("{}: {} commits", document, commits.len());
        apply_history(record, &commits);
        Ok(())
    }
}

/// One line of `git log` output.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Commit {
    name: String,
    email: String,
    date: String,
}

impl Commit {
    fn person(&self) -> Value {
        json!({
            "@type": "Person",
            "name": self.name,
            "email": self.email,
        })
    }
}

fn is_missing_history(stderr: &str) -> bool {
    stderr.contains("not a git repository") || stderr.contains("does not have any commits yet")
}

/// Parse `git log` lines, newest first. Malformed lines are dropped.
fn parse_log(stdout: &str) -> Vec<Commit> {
    stdout
        .lines()
        .filter_map(|line| {
            let mut parts = line.splitn(3, SEP);
            let name = parts.next()?.trim();
            let email = parts.next()?.trim();
            let date = parts.next()?.trim();
            if date.is_empty() {
                return None;
            }
            Some(Commit {
                name: name.to_string(),
                email: email.to_string(),
                date: date.to_string(),
            })
        })
        .collect()
}

/// Merge history fields for commits given newest first.
fn apply_history(record: &mut DocumentRecord, commits: &[Commit]) {
    let (Some(newest), Some(oldest)) = (commits.first(), commits.last()) else {
        return;
    };

    record.insert("author", oldest.person());
    record.insert("dateCreated", oldest.date.clone());
    record.insert("dateModified", newest.date.clone());

    let mut seen = vec![identity(oldest)];
    let mut contributors = Vec::new();
    for commit in commits.iter().rev() {
        let id = identity(commit);
        if !seen.contains(&id) {
            seen.push(id);
            contributors.push(commit.person());
        }
    }
    if !contributors.is_empty() {
        record.insert("contributor", Value::Array(contributors));
    }
}

fn identity(commit: &Commit) -> String {
    if commit.email.is_empty() {
        commit.name.to_lowercase()
    } else {
        commit.email.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn line(name: &str, email: &str, date: &str) -> String {
        format!("{name}{SEP}{email}{SEP}{date}\n")
    }

    #[test]
    fn parses_log_lines() {
        let out = line("Ada", "ada@example.com", "2024-03-01T10:00:00+00:00")
            + "garbage line\n"
            + &line("Bob", "bob@example.com", "2024-01-01T09:00:00+00:00");
        let commits = parse_log(&out);
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].name, "Ada");
        assert_eq!(commits[1].date, "2024-01-01T09:00:00+00:00");
    }

    #[test]
    fn history_maps_to_schema_fields() {
        let out = line("Cy", "cy@example.com", "2024-05-01T00:00:00Z")
            + &line("Ada", "ADA@example.com", "2024-04-01T00:00:00Z")
            + &line("Bob", "bob@example.com", "2024-03-01T00:00:00Z")
            + &line("Ada", "ada@example.com", "2024-02-01T00:00:00Z");
        let mut record = DocumentRecord::new();
        apply_history(&mut record, &parse_log(&out));

        assert_eq!(record.get("dateCreated"), Some(&json!("2024-02-01T00:00:00Z")));
        assert_eq!(record.get("dateModified"), Some(&json!("2024-05-01T00:00:00Z")));
        assert_eq!(
            record.get("author"),
            Some(&json!({"@type": "Person", "name": "Ada", "email": "ada@example.com"}))
        );
        let names: Vec<&str> = record
            .get("contributor")
            .and_then(Value::as_array)
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Bob", "Cy"]);
    }

    #[test]
    fn single_author_has_no_contributors() {
        let out = line("Ada", "ada@example.com", "2024-02-01T00:00:00Z");
        let mut record = DocumentRecord::new();
        apply_history(&mut record, &parse_log(&out));
        assert!(record.contains_key("author"));
        assert!(!record.contains_key("contributor"));
    }

    #[test]
    fn no_commits_adds_nothing() {
        let mut record = DocumentRecord::new();
        apply_history(&mut record, &[]);
        assert!(record.is_empty());
    }

    #[test]
    fn recognises_missing_history() {
        assert!(is_missing_history(
            "fatal: not a git repository (or any of the parent directories): .git"
        ));
        assert!(is_missing_history(
            "fatal: your current branch 'main' does not have any commits yet"
        ));
        assert!(!is_missing_history("fatal: bad revision"));
    }

    #[test]
    fn history_command_runs_in_c_locale() {
        let cmd =
            GitExtractor::new().history_command(Path::new("/repo/docs"), OsStr::new("a.md"));
        let envs: Vec<_> = cmd.get_envs().collect();
        assert!(envs.contains(&(OsStr::new("LC_ALL"), Some(OsStr::new("C")))));
        assert!(envs.contains(&(OsStr::new("LANGUAGE"), Some(OsStr::new("C")))));
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args[..2], [OsStr::new("-C"), OsStr::new("/repo/docs")]);
        assert_eq!(args.last(), Some(&OsStr::new("a.md")));
    }

    #[test]
    fn missing_binary_is_a_command_error() {
        let doc = DocumentPath::new(Path::new("/tmp"), &PathBuf::from("doc.md"));
        let err = GitExtractor::with_program("md2jsonld-no-such-git-binary")
            .extract(&mut DocumentRecord::new(), &doc)
            .unwrap_err();
        match err {
            ExtractionError::Command { command, .. } => {
                assert!(command.contains("log --follow"), "got: {command}")
            }
            other => panic!("expected Command error, got {other:?}"),
        }
    }

    #[test]
    fn document_outside_repository_gets_no_history() {
        if Command::new("git").arg("--version").output().is_err() {
            println!("SKIP: git is not installed");
            return;
        }
        // Untracked files inside an enclosing repository also have no history,
        // so this holds wherever the temp dir lives.
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("doc.md"), "# Doc\n").unwrap();
        let doc = DocumentPath::new(temp.path(), &PathBuf::from("doc.md"));

        let mut record = DocumentRecord::new();
        GitExtractor::new().extract(&mut record, &doc).unwrap();
        assert!(record.is_empty());
    }

    fn git(dir: &Path, args: &[&str], author: Option<(&str, &str, &str)>) {
        let mut cmd = Command::new("git");
        cmd.arg("-C")
            .arg(dir)
            .args(["-c", "commit.gpgsign=false", "-c", "init.defaultBranch=main"])
            .args(args)
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env("GIT_COMMITTER_NAME", "Committer")
            .env("GIT_COMMITTER_EMAIL", "committer@example.com");
        if let Some((name, email, date)) = author {
            cmd.env("GIT_AUTHOR_NAME", name)
                .env("GIT_AUTHOR_EMAIL", email)
                .env("GIT_AUTHOR_DATE", date)
                .env("GIT_COMMITTER_DATE", date);
        }
        let status = cmd.status().unwrap();
        assert!(status.success(), "git {args:?} failed");
    }

    #[test]
    fn committed_document_gets_history_fields() {
        if Command::new("git").arg("--version").output().is_err() {
            println!("SKIP: git is not installed");
            return;
        }
        let temp = tempfile::tempdir().unwrap();
        let repo = temp.path();
        let docs = repo.join("docs");
        std::fs::create_dir_all(&docs).unwrap();
        git(repo, &["init", "-q"], None);

        std::fs::write(docs.join("guide.md"), "# Guide\n").unwrap();
        git(repo, &["add", "docs/guide.md"], None);
        git(
            repo,
            &["commit", "-q", "-m", "first"],
            Some(("Ada", "ada@example.com", "2024-01-01T09:00:00+00:00")),
        );
        std::fs::write(docs.join("guide.md"), "# Guide\n\nMore.\n").unwrap();
        git(repo, &["add", "docs/guide.md"], None);
        git(
            repo,
            &["commit", "-q", "-m", "second"],
            Some(("Bob", "bob@example.com", "2024-03-01T10:00:00+00:00")),
        );

        let doc = DocumentPath::new(repo, &PathBuf::from("docs/guide.md"));
        let mut record = DocumentRecord::new();
        GitExtractor::new().extract(&mut record, &doc).unwrap();

        assert_eq!(
            record.get("author"),
            Some(&json!({"@type": "Person", "name": "Ada", "email": "ada@example.com"}))
        );
        assert_eq!(
            record.get("contributor"),
            Some(&json!([{"@type": "Person", "name": "Bob", "email": "bob@example.com"}]))
        );
        assert_eq!(record.get("dateCreated"), Some(&json!("2024-01-01T09:00:00+00:00")));
        assert_eq!(record.get("dateModified"), Some(&json!("2024-03-01T10:00:00+00:00")));
    }
}
