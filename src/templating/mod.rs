//! Page rendering for the `templates` task.
//!
//! Top-level templates are rendered with [Tera](https://keats.github.io/tera/)
//! against the [`PartialSet`](crate::partials::PartialSet) collected from the
//! partial globs and the `[templates.data]` table of the configuration.
//!
//! # Syntax
//!
//! - Variables: `{{ title }}`
//! - Partials: `{{> header }}` (rewritten to a Tera include) or
//!   `{% include "header" %}`
//! - Everything else Tera offers: conditionals, loops, filters
//!
//! Output is not HTML-escaped; templates are trusted project sources.
//!
//! # Differences from Mustache
//!
//! Pages keep their `.mustache` extension but are parsed as Tera templates.
//! Only the partial tag is translated, so mustache sections
//! (`{{#items}}...{{/items}}`), triple braces (`{{{raw}}}`) and comments
//! (`{{! note }}`) fail to parse. Use `{% for %}`/`{% if %}`, plain
//! `{{ raw }}` and `{# note #}` instead. Referencing a variable that is not
//! in `[templates.data]` is a render error rather than empty output.

mod renderer;

pub use renderer::{TemplateRenderer, format_tera_error, rewrite_partial_tags};
