//! HTML print renderer
//!
//! This module takes a resolved template and a render context and produces
//! a standalone HTML document, one page box per printed page.

pub mod config;
pub mod html;

pub use config::PrintConfig;
pub use html::{escape_xml, logo_source, render_html, HtmlBuilder, PLACEHOLDER_LOGO};
