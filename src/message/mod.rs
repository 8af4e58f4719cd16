mod nom_parser;
mod parse;
mod serialize;
mod types;

pub use self::nom_parser::ParsedMessage;
pub use self::types::{Command, Message};
