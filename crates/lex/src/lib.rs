mod scanner;
pub mod token;

pub use scanner::tokenize;
pub use token::{keyword_label, Token, TokenLabel};
