//! Template-driven code generation.
//!
//! Renders the resolved stack through one Handlebars template per resource
//! category and produces the matching import-command list. Artifact
//! production is all-or-nothing: any template failure aborts the run before
//! anything is written.

pub mod helpers;
pub mod import_script;
pub mod naming;
pub mod policy;
mod views;

use std::collections::BTreeMap;

use anyhow::{Context as _, Result};
use handlebars::{Handlebars, no_escape};

use crate::stack::Stack;
use helpers::HelperRegistry;
use views::StackView;

/// Templates compiled into the binary, one per resource category.
const TEMPLATES: &[(&str, &str)] = &[
    ("dynamodb.hbs", include_str!("templates/dynamodb.hbs")),
    ("firehose.hbs", include_str!("templates/firehose.hbs")),
    ("iam.hbs", include_str!("templates/iam.hbs")),
    ("lambda.hbs", include_str!("templates/lambda.hbs")),
    ("sns.hbs", include_str!("templates/sns.hbs")),
    ("sqs.hbs", include_str!("templates/sqs.hbs")),
];

/// Renders the full template set against a [`Stack`].
pub struct Generator {
    handlebars: Handlebars<'static>,
}

impl Generator {
    /// Build a generator with the given helper set. Template parse errors are
    /// programming errors in the embedded templates and surface here.
    pub fn new(helpers: HelperRegistry) -> Result<Self> {
        let mut handlebars = Handlebars::new();

        // Output is HCL, not HTML.
        handlebars.register_escape_fn(no_escape);
        helpers.install(&mut handlebars);

        for (name, source) in TEMPLATES {
            handlebars
                .register_template_string(name, source)
                .with_context(|| format!("unable to parse template '{}'", name))?;
        }

        Ok(Self { handlebars })
    }

    /// Execute every template against the stack, returning artifact name to
    /// rendered text. Categories with no resources render to whitespace and
    /// are omitted. Any render failure fails the whole pass.
    pub fn render(&self, stack: &Stack) -> Result<BTreeMap<String, String>> {
        let view = StackView::from_stack(stack);
        let mut artifacts = BTreeMap::new();

        for (name, _) in TEMPLATES {
            let rendered = self
                .handlebars
                .render(name, &view)
                .with_context(|| format!("unable to render template '{}'", name))?;

            if rendered.trim().is_empty() {
                continue;
            }
            artifacts.insert(artifact_name(name), rendered);
        }

        Ok(artifacts)
    }
}

/// `dynamodb.hbs` renders to `dynamodb.tf`.
fn artifact_name(template_name: &str) -> String {
    format!("{}.tf", template_name.trim_end_matches(".hbs"))
}
