//! Markup layer for fixture tables: a forgiving tokenizer, a tree builder, a mutable node
//! tree with per-node ids, and serialization back to HTML.
pub mod debug;
pub mod dom_utils;
pub mod serialize;

mod dom_builder;
mod entities;
mod tokenizer;
mod types;

pub use crate::dom_builder::{build_dom, parse_document, parse_fragment};
pub use crate::entities::{escape_attr, escape_text};
pub use crate::serialize::{inner_html, outer_html};
pub use crate::tokenizer::tokenize;
pub use crate::types::{Id, Node, NodeId, Token};
