//! Configuration file support.
//!
//! An assessment is described by a `syntactic.toml` file:
//!
//! ```toml
//! [language]
//! goal = "script"
//!
//! [template]
//! path = "solution.js"
//! elide = ["BLOCK_STMT", "EXPR_STMT"]
//!
//! [policy.whitelist]
//! Keyword = ["for", "var"]
//!
//! [policy.blacklist]
//! Keyword = ["while"]
//! ```
//!
//! Every section is optional. A template `path` is relative to the directory of the config file,
//! the template text may also be given inline with `source`.

use dirs_next::config_dir;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::read_to_string;
use std::io;
use std::path::{Path, PathBuf};
use syntactic_core::{
    Assessment, ConfigError, EcmaScript, ElideSet, Goal, Language, ParseError, Policy, PolicySpec,
    Template,
};
use thiserror::Error;

/// The name of the config file to search for.
pub const CONFIG_NAME: &str = "syntactic.toml";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct ConfigRepr {
    #[serde(default)]
    language: LanguageRepr,
    template: Option<TemplateRepr>,
    policy: Option<PolicySpec>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct LanguageRepr {
    #[serde(default)]
    goal: Goal,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct TemplateRepr {
    path: Option<PathBuf>,
    source: Option<String>,
    elide: Option<Vec<String>>,
}

/// Errors raised while loading a config or turning it into an assessment.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to read `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {message}")]
    Syntax {
        message: String,
        /// The 0-based line and column of the problem, when known.
        line_col: Option<(usize, usize)>,
    },
    #[error("the template sets both `path` and `source`, only one may be used")]
    AmbiguousTemplate,
    #[error("the template sets neither `path` nor `source`")]
    EmptyTemplate,
    #[error("invalid policy: {0}")]
    Policy(#[from] ConfigError),
    #[error("invalid template: {0}")]
    Template(#[from] ParseError),
}

/// A loaded assessment configuration.
#[derive(Debug, Default)]
pub struct Config {
    repr: ConfigRepr,
    /// Where the config was loaded from, `None` for configs which are not on disk.
    path: Option<PathBuf>,
    template_override: Option<PathBuf>,
}

impl Config {
    /// Parse a config from toml text. `path` is used to resolve relative template paths.
    pub fn from_toml(source: &str, path: Option<PathBuf>) -> Result<Self, ConfigFileError> {
        let repr = toml::from_str::<ConfigRepr>(source).map_err(|err| ConfigFileError::Syntax {
            message: err.to_string(),
            line_col: err.line_col(),
        })?;
        Ok(Self {
            repr,
            path,
            template_override: None,
        })
    }

    /// Read and parse a config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigFileError> {
        let path = path.as_ref();
        let source = read_to_string(path).map_err(|source| ConfigFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loading config from `{}`", path.display());
        Self::from_toml(&source, Some(path.to_path_buf()))
    }

    /// Search for a config file in `start` and all of its ancestors, and if `global_config`
    /// is `true`, in the system's config directory.
    pub fn find(start: &Path, global_config: bool) -> Option<PathBuf> {
        for dir in start.ancestors() {
            let path = dir.join(CONFIG_NAME);
            if path.exists() {
                return Some(path);
            }
        }

        let path = config_dir()?.join("syntactic").join(CONFIG_NAME);
        if global_config && path.exists() {
            return Some(path);
        }
        None
    }

    /// Load the config found from the current directory, or an empty config if there is none.
    pub fn discover(global_config: bool) -> Result<Self, ConfigFileError> {
        let cwd = env::current_dir().map_err(|source| ConfigFileError::Io {
            path: PathBuf::from("."),
            source,
        })?;

        match Self::find(&cwd, global_config) {
            Some(path) => Self::from_path(path),
            None => {
                warn!("no `{}` found, using an empty config", CONFIG_NAME);
                Ok(Self::default())
            }
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Use a template file instead of the configured template, relative to the current directory.
    pub fn set_template_path(&mut self, path: PathBuf) {
        self.template_override = Some(path);
    }

    pub fn language(&self) -> EcmaScript {
        EcmaScript {
            goal: self.repr.language.goal,
        }
    }

    /// The configured elided kinds, or the language's defaults.
    pub fn elided(&self) -> ElideSet {
        match self.repr.template.as_ref().and_then(|t| t.elide.as_ref()) {
            Some(kinds) => kinds.iter().cloned().collect(),
            None => self.language().default_elided(),
        }
    }

    fn base_dir(&self) -> PathBuf {
        self.path
            .as_ref()
            .and_then(|path| path.parent())
            .map_or_else(PathBuf::new, Path::to_path_buf)
    }

    /// The resolved location of the template file, if the template is read from disk.
    pub fn template_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.template_override {
            return Some(path.clone());
        }
        let path = self.repr.template.as_ref()?.path.as_ref()?;
        Some(self.base_dir().join(path))
    }

    /// The template text, `None` if no template is configured.
    pub fn template_source(&self) -> Result<Option<String>, ConfigFileError> {
        if let Some(path) = &self.template_override {
            return read_file(path).map(Some);
        }

        let template = match &self.repr.template {
            Some(template) => template,
            None => return Ok(None),
        };
        match (&template.path, &template.source) {
            (Some(_), Some(_)) => Err(ConfigFileError::AmbiguousTemplate),
            (None, None) => Err(ConfigFileError::EmptyTemplate),
            (None, Some(source)) => Ok(Some(source.clone())),
            (Some(path), None) => read_file(&self.base_dir().join(path)).map(Some),
        }
    }

    pub fn template(&self) -> Result<Option<Template>, ConfigFileError> {
        match self.template_source()? {
            Some(text) => Ok(Some(Template::compile(
                Box::new(self.language()),
                &text,
                self.elided(),
            )?)),
            None => Ok(None),
        }
    }

    pub fn policy(&self) -> Result<Option<Policy>, ConfigFileError> {
        match &self.repr.policy {
            Some(spec) => Ok(Some(Policy::compile(spec.clone())?)),
            None => Ok(None),
        }
    }

    /// Compile everything this config describes.
    pub fn assessment(&self) -> Result<Assessment, ConfigFileError> {
        let mut assessment = Assessment::new(Box::new(self.language()));
        if let Some(template) = self.template()? {
            assessment = assessment.template(template);
        }
        if let Some(policy) = self.policy()? {
            assessment = assessment.policy(policy);
        }
        Ok(assessment)
    }
}

fn read_file(path: &Path) -> Result<String, ConfigFileError> {
    read_to_string(path).map_err(|source| ConfigFileError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::fs;
    use syntactic_core::ListKind;
    use tempfile::tempdir;

    const CONFIG: &str = indoc! {r#"
        [template]
        path = "solution.js"

        [policy.whitelist]
        Keyword = ["for", "var"]

        [policy.blacklist]
        Keyword = ["while"]
    "#};

    #[test]
    fn empty_config_has_defaults() {
        let config = Config::from_toml("", None).unwrap();
        assert_eq!(config.language(), EcmaScript::script());
        assert_eq!(config.elided(), EcmaScript::script().default_elided());
        assert!(config.template_source().unwrap().is_none());
        assert!(config.policy().unwrap().is_none());
    }

    #[test]
    fn module_goal_and_custom_elision() {
        let config = Config::from_toml(
            indoc! {r#"
                [language]
                goal = "module"

                [template]
                source = "for (;;) {}"
                elide = ["BLOCK_STMT"]
            "#},
            None,
        )
        .unwrap();
        assert_eq!(config.language(), EcmaScript::module());
        assert_eq!(config.elided(), vec!["BLOCK_STMT"].into_iter().collect());
        assert_eq!(config.template_source().unwrap().as_deref(), Some("for (;;) {}"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = Config::from_toml("[template]\npaht = \"a.js\"\n", None).unwrap_err();
        match err {
            ConfigFileError::Syntax { line_col, .. } => assert!(line_col.is_some()),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn template_needs_exactly_one_source() {
        let both = Config::from_toml("[template]\npath = \"a.js\"\nsource = \"a\"\n", None).unwrap();
        assert!(matches!(
            both.template_source(),
            Err(ConfigFileError::AmbiguousTemplate)
        ));

        let neither = Config::from_toml("[template]\nelide = []\n", None).unwrap();
        assert!(matches!(
            neither.template_source(),
            Err(ConfigFileError::EmptyTemplate)
        ));
    }

    #[test]
    fn invalid_policy_is_reported_when_compiled() {
        let config =
            Config::from_toml("[policy.blacklist]\nKeywords = [\"while\"]\n", None).unwrap();
        match config.policy() {
            Err(ConfigFileError::Policy(ConfigError::UnknownKind {
                list, suggestion, ..
            })) => {
                assert_eq!(list, ListKind::Blacklist);
                assert_eq!(suggestion.as_deref(), Some("Keyword"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn template_path_is_relative_to_the_config() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("week1").join("loops");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(CONFIG_NAME), CONFIG).unwrap();
        fs::write(
            dir.path().join("solution.js"),
            "for (var i = 0; i < 3; i++) {\n  // add an if\n  if (i) { f(i); }\n}\n",
        )
        .unwrap();

        let found = Config::find(&nested, false).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_NAME));

        let config = Config::from_path(&found).unwrap();
        assert_eq!(config.template_path(), Some(dir.path().join("solution.js")));
        let assessment = config.assessment().unwrap();
        let report = assessment
            .assess("for (var i = 0; i < 3; i++) { f(i); }")
            .unwrap();
        assert!(!report.passing);
        assert_eq!(
            report.template.unwrap().hints.get(&3).map(String::as_str),
            Some("add an if")
        );
        assert!(report.policy.unwrap().status);
    }

    #[test]
    fn template_override_replaces_the_configured_template() {
        let dir = tempdir().unwrap();
        let template = dir.path().join("other.js");
        fs::write(&template, "while (x) {}").unwrap();

        let mut config = Config::from_toml("[template]\nsource = \"for (;;) {}\"\n", None).unwrap();
        config.set_template_path(template);
        assert_eq!(config.template_source().unwrap().as_deref(), Some("while (x) {}"));
    }

    #[test]
    fn missing_template_file_is_an_io_error() {
        let config = Config::from_toml("[template]\npath = \"nope.js\"\n", None).unwrap();
        assert!(matches!(config.template(), Err(ConfigFileError::Io { .. })));
    }
}
