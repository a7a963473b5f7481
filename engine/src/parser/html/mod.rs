pub mod scanner;
pub mod tokenizer;
pub mod tree_builder;

pub use scanner::Scanner;
pub use tokenizer::{TagToken, Token, Tokenizer};
pub use tree_builder::HtmlParser;
