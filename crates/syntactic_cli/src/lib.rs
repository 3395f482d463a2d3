mod files;
mod macros;

pub use self::files::*;

use anyhow::{bail, Context, Result};
use colored::*;
use log::debug;
use rayon::prelude::*;
use serde_json::json;
use std::fmt::Write;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use syntactic_config::Config;
use syntactic_core::{
    template, EcmaScript, Error, FeedbackKind, Language, Report, TokenIndex,
};

/// Options of the `check` command.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub files: String,
    pub config: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub json: bool,
    pub global_config: bool,
}

/// How a single submission fared.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
    Error,
}

/// Check every submission matched by the options, returns whether all of them passed.
pub fn check(opts: CheckOptions) -> Result<bool> {
    let mut config = match &opts.config {
        Some(path) => Config::from_path(path)?,
        None => Config::discover(opts.global_config)?,
    };
    if let Some(path) = opts.template.clone() {
        config.set_template_path(path);
    }
    if let Some(path) = config.path() {
        debug!("using config `{}`", path.display());
    }

    let assessment = config
        .assessment()
        .context("failed to load the assessment")?;
    if assessment.get_template().is_none() && assessment.get_policy().is_none() {
        cli_warn!("no template or policy is configured, every submission will pass");
    }

    let paths = glob::glob(&opts.files)
        .with_context(|| format!("invalid glob pattern `{}`", opts.files))?;
    let submissions = collect_submissions(paths, config.template_path().as_deref());
    if submissions.is_empty() {
        bail!("no matching files found");
    }

    let results = submissions
        .par_iter()
        .map(|submission| assessment.assess(&submission.source))
        .collect::<Vec<_>>();

    let mut outcomes = Vec::with_capacity(results.len());
    let mut reports = Vec::new();
    for (submission, result) in submissions.iter().zip(results) {
        let outcome = match result {
            Ok(report) => {
                let outcome = if report.passing {
                    Outcome::Pass
                } else {
                    Outcome::Fail
                };
                if opts.json {
                    reports.push(json!({ "file": submission.name(), "report": report }));
                } else {
                    print!("{}", render_report(&submission.name(), &report));
                }
                outcome
            }
            Err(err) => {
                if opts.json {
                    reports.push(json!({ "file": submission.name(), "error": err.to_string() }));
                } else {
                    print!("{}", render_error(&submission.name(), &err));
                }
                Outcome::Error
            }
        };
        outcomes.push(outcome);
    }

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!("{}", render_outcome(&outcomes));
        if outcomes.contains(&Outcome::Fail) && assessment.get_template().is_some() {
            cli_note!("to see which paths the template requires try: `syntactic outline <template>`");
        }
    }
    Ok(outcomes.iter().all(|outcome| *outcome == Outcome::Pass))
}

fn feedback_label(kind: FeedbackKind) -> ColoredString {
    match kind {
        FeedbackKind::Hint => "hint".cyan(),
        FeedbackKind::Forbidden => "forbidden".red(),
        FeedbackKind::Required => "required".yellow(),
    }
}

/// Render a submission's report as a status line followed by one line per feedback item.
pub fn render_report(name: &str, report: &Report) -> String {
    let mut out = String::new();
    if report.passing {
        let _ = writeln!(out, "{} {}", "PASS".green().bold(), name);
        return out;
    }

    let _ = writeln!(out, "{} {}", "FAIL".red().bold(), name);
    let feedback = report.feedback();
    if feedback.is_empty() {
        // missing structure without any hint
        let _ = writeln!(out, "  {}: the structure does not match the template", "hint".cyan());
    }
    for item in feedback {
        let _ = writeln!(out, "  {}: {}", feedback_label(item.kind), item);
    }
    out
}

pub fn render_error(name: &str, err: &Error) -> String {
    format!("{} {}\n  {}\n", "ERROR".red().bold(), name, err)
}

pub fn render_outcome(outcomes: &[Outcome]) -> String {
    let count = |kind| outcomes.iter().filter(|o| **o == kind).count();
    format!(
        "\n{}: {} fail, {} error, {} pass",
        "Outcome".white(),
        count(Outcome::Fail).to_string().red(),
        count(Outcome::Error).to_string().red(),
        count(Outcome::Pass).to_string().green(),
    )
}

fn load(path: &Path, module: bool) -> Result<(EcmaScript, String)> {
    let source =
        read_to_string(path).with_context(|| format!("failed to read `{}`", path.display()))?;
    let language = if module {
        EcmaScript::module()
    } else {
        EcmaScript::script()
    };
    Ok((language, source))
}

/// Print the outline of a file using the language's default elided kinds.
pub fn outline(path: &Path, module: bool) -> Result<()> {
    let (language, source) = load(path, module)?;
    let outline = template::outline(&language, &source, &language.default_elided())?;
    print!("{}", render_outline(&outline));
    Ok(())
}

pub fn render_outline(outline: &template::Outline) -> String {
    let mut out = String::new();
    for (path, lines) in outline {
        for (line, hint) in lines {
            let path = if path.is_empty() { "<root>" } else { path };
            match hint {
                Some(hint) => {
                    let _ = writeln!(out, "{:>4}  {}  // {}", line, path, hint);
                }
                None => {
                    let _ = writeln!(out, "{:>4}  {}", line, path);
                }
            }
        }
    }
    out
}

/// Print the token index of a file.
pub fn tokens(path: &Path, module: bool) -> Result<()> {
    let (language, source) = load(path, module)?;
    let index = TokenIndex::tokenize(&language, &source)?;
    print!("{}", render_tokens(&index));
    Ok(())
}

pub fn render_tokens(index: &TokenIndex) -> String {
    let mut out = String::new();
    for (class, values) in index.classes() {
        let _ = writeln!(out, "{}", class.to_string().bold());
        for (value, ranges) in values {
            let lines = ranges
                .iter()
                .map(|range| range.start.line.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(out, "  {}  [line: {}]", value, lines);
        }
    }
    out
}
