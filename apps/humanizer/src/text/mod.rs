// Tokenizer/Segmenter
// Implements: newline protection, sentence segmentation, word/symbol tokenization.
// Everything downstream works on these units and must be able to rebuild the input from them.

pub mod segment;
pub mod tokenize;

pub use segment::{
    protect_newlines, restore_newlines, segment, split_leading, Sentence, NEWLINE_PLACEHOLDER,
};
pub use tokenize::{tokenize, Token, TokenKind};
