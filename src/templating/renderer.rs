//! Tera-backed rendering of top-level templates with a partial set.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use tera::{Context as TeraContext, Tera};
use tracing::debug;

use crate::core::PipelineError;
use crate::partials::PartialSet;

static PARTIAL_TAG: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\{\{>\s*([^\s}]+)\s*\}\}").ok());

/// Rewrites mustache partial tags (`{{> name }}`) into Tera includes.
///
/// Text without partial tags is returned unchanged and unallocated.
///
/// # Examples
///
/// ```rust,no_run
/// use assetpipe::templating::rewrite_partial_tags;
///
/// assert_eq!(rewrite_partial_tags("<body>{{> header }}</body>"), r#"<body>{% include "header" %}</body>"#);
/// ```
pub fn rewrite_partial_tags(source: &str) -> Cow<'_, str> {
    match PARTIAL_TAG.as_ref() {
        Some(tag) => tag.replace_all(source, r#"{% include "$1" %}"#),
        None => Cow::Borrowed(source),
    }
}

/// Renders pages against one fixed set of partials and one context.
///
/// Partials are registered as named templates so pages (and other partials)
/// pull them in with `{% include "name" %}` or `{{> name }}`. Each page is
/// rendered on a copy of the engine, leaving the partial registry untouched.
///
/// # Examples
///
/// ```rust,no_run
/// use assetpipe::partials::{PartialSet, ResolvedPartial};
/// use assetpipe::templating::TemplateRenderer;
///
/// # fn example() -> Result<(), assetpipe::core::PipelineError> {
/// let partials: PartialSet = [ResolvedPartial {
///     identifier: "header".to_string(),
///     content: "<h1>{{ title }}</h1>".to_string(),
/// }]
/// .into_iter()
/// .collect();
///
/// let mut data = toml::Table::new();
/// data.insert("title".into(), "Home".into());
///
/// let renderer = TemplateRenderer::new(&partials, &data)?;
/// let html = renderer.render("index", "{{> header }}<p>body</p>")?;
/// assert_eq!(html, "<h1>Home</h1><p>body</p>");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    tera: Tera,
    context: TeraContext,
}

impl TemplateRenderer {
    /// Registers every partial and converts `data` into the render context.
    ///
    /// # Errors
    ///
    /// [`PipelineError::RenderFailed`] if a partial does not parse or `data`
    /// cannot be turned into a context.
    pub fn new(partials: &PartialSet, data: &toml::Table) -> Result<Self, PipelineError> {
        let mut tera = Tera::default();
        tera.autoescape_on(Vec::new());

        let sources: Vec<(&str, Cow<'_, str>)> =
            partials.iter().map(|(name, content)| (name, rewrite_partial_tags(content))).collect();
        tera.add_raw_templates(sources).map_err(|e| PipelineError::RenderFailed {
            template: "partials".to_string(),
            reason: format_tera_error(&e),
        })?;

        let context = TeraContext::from_serialize(data).map_err(|e| PipelineError::RenderFailed {
            template: "templates.data".to_string(),
            reason: format_tera_error(&e),
        })?;

        debug!("Template renderer ready with {} partials", partials.len());
        Ok(Self {
            tera,
            context,
        })
    }

    /// Renders one page. `name` identifies the page in error messages and
    /// must not collide with a partial identifier.
    ///
    /// # Errors
    ///
    /// [`PipelineError::RenderFailed`] for syntax errors, unknown partials
    /// and undefined variables.
    pub fn render(&self, name: &str, source: &str) -> Result<String, PipelineError> {
        let failed = |e: tera::Error| PipelineError::RenderFailed {
            template: name.to_string(),
            reason: format_tera_error(&e),
        };

        let mut tera = self.tera.clone();
        tera.add_raw_template(name, &rewrite_partial_tags(source)).map_err(failed)?;
        tera.render(name, &self.context).map_err(failed)
    }
}

/// Flattens a Tera error and its source chain into one message.
pub fn format_tera_error(error: &tera::Error) -> String {
    use std::error::Error;

    let mut messages = vec![error.to_string()];
    let mut current: Option<&dyn Error> = error.source();
    while let Some(err) = current {
        let message = err.to_string();
        if !message.trim().is_empty() && !messages.contains(&message) {
            messages.push(message);
        }
        current = err.source();
    }

    messages.join("\n  → ")
}
