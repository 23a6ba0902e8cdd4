use thiserror::Error;

use crate::record::NamedValues;

/// A structured command as typed at the prompt. The grammar is
/// whitespace-split words; no quoting, no escaping.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Create {
        table: String,
        attrs: Vec<(String, String)>,
    },
    Insert {
        table: String,
        values: NamedValues,
    },
    Select {
        table: String,
    },
    Describe {
        table: String,
    },
    Show,
    Exit,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unrecognized command: {0}")]
    Unrecognized(String),

    #[error("{0}")]
    Usage(&'static str),
}

const CREATE_USAGE: &str = "usage: create <tablename> <attribute> <attributeType> ...";
const INSERT_USAGE: &str = "usage: insert <tablename> <attributeName> <attributeValue> ...";
const SELECT_USAGE: &str = "usage: select <tablename>";
const DESCRIBE_USAGE: &str = "usage: describe <tablename>";

/// Parse one input line into a command.
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&keyword, args)) = words.split_first() else {
        return Err(CommandError::Unrecognized(String::new()));
    };

    match keyword {
        "create" => {
            // table name plus at least one name/type pair, pairs complete
            if args.len() < 3 || args.len() % 2 == 0 {
                return Err(CommandError::Usage(CREATE_USAGE));
            }
            let attrs = args[1..]
                .chunks(2)
                .map(|pair| (pair[0].to_string(), pair[1].to_string()))
                .collect();
            Ok(Command::Create {
                table: args[0].to_string(),
                attrs,
            })
        }
        "insert" => {
            if args.len() < 3 || args.len() % 2 == 0 {
                return Err(CommandError::Usage(INSERT_USAGE));
            }
            let values = args[1..]
                .chunks(2)
                .map(|pair| (pair[0].to_string(), pair[1].to_string()))
                .collect();
            Ok(Command::Insert {
                table: args[0].to_string(),
                values,
            })
        }
        "select" => match args {
            [table] => Ok(Command::Select {
                table: table.to_string(),
            }),
            _ => Err(CommandError::Usage(SELECT_USAGE)),
        },
        "describe" => match args {
            [table] => Ok(Command::Describe {
                table: table.to_string(),
            }),
            _ => Err(CommandError::Usage(DESCRIBE_USAGE)),
        },
        "show" => Ok(Command::Show),
        "exit" => Ok(Command::Exit),
        other => Err(CommandError::Unrecognized(other.to_string())),
    }
}
