//! Running every configured check on a submission.

use crate::lang::Language;
use crate::policy::Policy;
use crate::report::Report;
use crate::template::Template;
use crate::Error;

/// A template and a token policy which every submission is checked against.
///
/// Either part may be absent. The two checks never share state, the template check is run
/// first and the policy check second on the same text.
#[derive(Debug, Clone)]
pub struct Assessment {
    language: Box<dyn Language>,
    template: Option<Template>,
    policy: Option<Policy>,
}

impl Assessment {
    pub fn new(language: Box<dyn Language>) -> Self {
        Self {
            language,
            template: None,
            policy: None,
        }
    }

    /// Compile `text` as the template of this assessment using `language`'s default elided kinds.
    pub fn template_text(mut self, text: &str) -> Result<Self, Error> {
        self.template = Some(Template::new(self.language.clone(), text)?);
        Ok(self)
    }

    pub fn template(mut self, template: Template) -> Self {
        self.template = Some(template);
        self
    }

    pub fn policy(mut self, policy: Policy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn get_template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    pub fn get_policy(&self) -> Option<&Policy> {
        self.policy.as_ref()
    }

    pub fn language(&self) -> &dyn Language {
        &*self.language
    }

    /// Check a submission and merge the results.
    pub fn assess(&self, submission: &str) -> Result<Report, Error> {
        let template = self
            .template
            .as_ref()
            .map(|template| template.verify(submission))
            .transpose()?;
        let policy = self
            .policy
            .as_ref()
            .map(|policy| policy.verify(&*self.language, submission))
            .transpose()?;
        Ok(Report::merge(template, policy))
    }
}
