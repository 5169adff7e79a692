//! Markup parsing module.
//!
//! Tokenizing, style resolution and block assembly. The entry point is
//! [`parse_to_blocks`] or a configured [`BlockAssembler`].

mod assembler;
mod options;
pub mod style;
pub mod tokenizer;

pub use assembler::{parse_to_blocks, BlockAssembler};
pub use options::{ParseOptions, DEFAULT_CELL_SEPARATOR};
pub use style::{extract_style_frame, merge_frames, parse_color, StyleFrame};
pub use tokenizer::{decode_entities, tokenize, Token, Tokenizer};
