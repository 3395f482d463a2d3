//! Collecting the submissions to check from a glob pattern.

use crate::cli_err;
use glob::Paths;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A list of ignored-by-default directory/file names
const IGNORED: [&str; 1] = ["node_modules"];
/// A list of the extension of files checked
const CHECKED_FILES: [&str; 2] = ["js", "mjs"];

/// A submission loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub path: PathBuf,
    pub source: String,
}

impl Submission {
    pub fn name(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}

fn is_ignored(path: &Path) -> bool {
    path.file_name()
        .map_or(false, |name| IGNORED.contains(&&*name.to_string_lossy()))
}

fn is_checked(path: &Path) -> bool {
    path.extension()
        .map_or(false, |ext| CHECKED_FILES.contains(&&*ext.to_string_lossy()))
}

/// Load every js and mjs file matched by a glob, descending into matched directories.
/// Unreadable files are reported and skipped, as is the template file itself.
/// Submissions are sorted by path.
pub fn collect_submissions(paths: Paths, template: Option<&Path>) -> Vec<Submission> {
    let template = template.and_then(|path| path.canonicalize().ok());
    let mut submissions = Vec::new();

    for entry in paths.filter_map(Result::ok) {
        if is_ignored(&entry) {
            continue;
        }

        let walkdir = WalkDir::new(entry)
            .into_iter()
            .filter_entry(|entry| !is_ignored(entry.path()));

        for file in walkdir.filter_map(Result::ok) {
            let path = file.path();
            if !file.file_type().is_file() || !is_checked(path) {
                continue;
            }
            if template.is_some() && path.canonicalize().ok() == template {
                continue;
            }

            match read_to_string(path) {
                Ok(source) => submissions.push(Submission {
                    path: path.to_path_buf(),
                    source,
                }),
                Err(err) => cli_err!("failed to read file {}: {}", path.display(), err),
            }
        }
    }

    submissions.sort_by(|a, b| a.path.cmp(&b.path));
    submissions.dedup_by(|a, b| a.path == b.path);
    submissions
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn walks_directories_and_skips_the_template() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("node_modules")).unwrap();
        fs::create_dir_all(root.join("alice")).unwrap();
        fs::write(root.join("node_modules").join("dep.js"), "").unwrap();
        fs::write(root.join("alice").join("loop.js"), "for (;;) {}").unwrap();
        fs::write(root.join("bob.mjs"), "export default 1;").unwrap();
        fs::write(root.join("notes.txt"), "").unwrap();
        fs::write(root.join("solution.js"), "for (;;) {}").unwrap();

        let pattern = root.to_string_lossy().to_string();
        let submissions = collect_submissions(
            glob::glob(&pattern).unwrap(),
            Some(&root.join("solution.js")),
        );
        let names = submissions
            .iter()
            .map(|s| s.path.strip_prefix(root).unwrap().to_path_buf())
            .collect::<Vec<_>>();

        assert_eq!(
            names,
            vec![PathBuf::from("alice").join("loop.js"), PathBuf::from("bob.mjs")]
        );
        assert_eq!(submissions[0].source, "for (;;) {}");
    }
}
