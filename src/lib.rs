//! Query representation and dialect-aware SQL generation for a federated
//! query engine. A planner builds a [`ast::Command`] tree, the
//! [`rewrite`] pass restructures it for a target dialect's capabilities,
//! and [`generator::render`] turns it into SQL text.

pub mod ast;
pub mod dialect;
pub mod error;
pub mod generator;
pub mod metadata;
pub mod rewrite;
pub mod types;
pub mod walk;

pub use generator::render;
pub use rewrite::rewrite_for_dialect;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::dialect::{Dialect, DialectConfig, LimitSyntax};
    pub use crate::error::{LanguageError, LanguageResult};
    pub use crate::generator::render;
    pub use crate::metadata::{Catalog, CatalogError};
    pub use crate::rewrite::rewrite_for_dialect;
    pub use crate::types::{DataType, TypeClass};
    pub use crate::walk::{collect_elements, collect_groups_used_by_elements, Visitor};
}
