//! Declarative schema validation for JSON-shaped values.
//!
//! A [`Schema`] is compiled from a JSON, YAML or TOML document and checked
//! against a [`serde_json::Value`] by a [`Validator`]. Filters, casts and
//! defaults may rewrite the value in place; the outcome is a [`Verdict`]
//! listing every [`Violation`].

pub mod cmd;
pub mod domain;
pub mod engine;
pub mod io;
pub mod util;

pub use domain::catalog::SchemaCatalog;
pub use domain::error::{SchemaError, ValidateError};
pub use domain::options::ValidationOptions;
pub use domain::report::{Verdict, Violation};
pub use domain::schema::{Schema, SchemaDocument};
pub use domain::types::TypeTag;
pub use engine::filter::{Filter, FilterError};
pub use engine::rules::{Failure, Rule, RuleContext};
pub use engine::{Validator, ValidatorBuilder, validate};
