//! The engine behind syntactic, which checks a learner's submission without running it.
//!
//! Two independent checks are offered:
//!
//! - A structural [`Template`]: an example solution whose nesting of node kinds
//! (a loop containing a conditional containing a call) the submission must reproduce.
//! Comments in the template become hints for the structure that follows them.
//! - A token [`Policy`]: token values which must appear (whitelist) and token values which
//! must not appear (blacklist), reported with the location of every offending occurrence.
//!
//! Both checks consume the views of a [`Language`], which parses and tokenizes source text.
//! [`EcmaScript`](lang::EcmaScript) is backed by [`rslint_parser`].
//!
//! ## Checking a submission
//!
//! Compile a template and a policy once, then verify as many submissions as needed. Compiled
//! templates and policies are immutable, verification takes `&self` and they can be shared
//! between threads. [`Assessment`] runs both checks and merges them into a [`Report`].
//!
//! Only malformed source text ([`ParseError`], [`TokenizeError`]) and malformed policies
//! ([`ConfigError`]) are errors. Missing structure and policy violations are reported through
//! `status` flags and itemized result fields.

mod assessment;
mod error;
mod source;
mod testing;

pub mod lang;
pub mod policy;
pub mod report;
pub mod simplify;
pub mod template;
pub mod util;

pub use self::{
    assessment::Assessment,
    error::{ConfigError, Error, ListKind, ParseError, TokenizeError},
    lang::{EcmaScript, Goal, Language, LexToken, RawNode, TokenClass},
    policy::{Policy, PolicySpec, TokenIndex},
    report::{Feedback, FeedbackKind, Flags, PolicyResult, Position, Range, Report, TemplateResult},
    simplify::{simplify, simplify_tree, CommentMap, SimplifiedTree, TreeNode},
    source::SourceMap,
    template::{ElideSet, Outline, Template},
};
