//! Partial template loading.
//!
//! Partials are reusable template fragments that every top-level template can
//! include by name. They are discovered through the `src.partials` glob list
//! and named after their path:
//!
//! ```text
//! pattern: src/templates/partials/**/*.mustache   (prefix "src/templates/partials/")
//!
//! src/templates/partials/header.mustache        -> header
//! src/templates/partials/_footer.mustache       -> footer
//! src/templates/partials/nav/item.mustache      -> nav_item
//! ```
//!
//! The two halves:
//!
//! - [`PartialResolver`] turns one path into a [`ResolvedPartial`]
//! - [`GlobAggregator`] expands patterns and merges every resolution into a
//!   [`PartialSet`]
//!
//! A build that hits a non-template match or an unreadable file fails as a
//! whole with [`PartialError`]; no partially filled set is ever returned.

mod aggregator;
mod error;
mod resolver;

pub use aggregator::{GlobAggregator, PartialSet};
pub use error::PartialError;
pub use resolver::{PartialResolver, ResolvedPartial, flatten_identifier, strip_leading_underscore};
