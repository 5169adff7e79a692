//! Document model types.
//!
//! This module defines the renderer-agnostic representation that bridges
//! markup parsing and output rendering. Every renderer consumes the same
//! `DocumentBlock` values, so adding an output target never touches parsing.

mod block;
mod document;
mod style;

pub use block::{BlockType, DocumentBlock};
pub use document::Document;
pub use style::{Rgb, TextRun, TextStyle};
