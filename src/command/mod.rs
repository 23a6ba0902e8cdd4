mod executor;
mod parser;

pub use executor::{execute, Outcome};
pub use parser::{parse, Command, CommandError};
