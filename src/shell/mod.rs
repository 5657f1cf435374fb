//! Shell line tokenization.

mod assignments;
mod tokenizer;
mod word;

pub use assignments::{assignment_parts, is_env_assignment, split_env_assignments};
pub use tokenizer::{TokenizeOptions, Tokenized, remainder_at, tokenize};
