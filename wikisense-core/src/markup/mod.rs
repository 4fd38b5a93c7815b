pub mod dom;
pub mod html_parser;

pub use dom::{Document, NodeId};
pub use html_parser::{clean_document, parse_html};
