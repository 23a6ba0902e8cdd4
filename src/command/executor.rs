use prettytable::{Cell, Row, Table};

use crate::database::{DatabaseResult, SharedDatabase};

use super::parser::Command;

/// What the REPL should do after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit,
}

/// Run one command against the shared engine, printing results to stdout.
pub fn execute(db: &SharedDatabase, command: Command) -> DatabaseResult<Outcome> {
    match command {
        Command::Create { table, attrs } => {
            db.create_table(&table, &attrs)?;
        }
        Command::Insert { table, values } => {
            db.insert_row(&table, &values)?;
        }
        Command::Select { table } => {
            // Column order comes from the schema, not from row maps.
            let attrs = db.describe_table(&table)?;
            let rows = db.select_all(&table)?;

            let mut out = Table::new();
            out.add_row(Row::new(
                attrs.iter().map(|(name, _)| Cell::new(name)).collect(),
            ));
            for row in &rows {
                out.add_row(Row::new(
                    attrs
                        .iter()
                        .map(|(name, _)| Cell::new(row.get(name).map_or("", String::as_str)))
                        .collect(),
                ));
            }
            out.printstd();
            println!("{} row(s)", rows.len());
        }
        Command::Describe { table } => {
            let attrs = db.describe_table(&table)?;
            let mut out = Table::new();
            out.add_row(Row::new(vec![Cell::new("attribute"), Cell::new("type")]));
            for (name, attr_type) in &attrs {
                out.add_row(Row::new(vec![Cell::new(name), Cell::new(attr_type)]));
            }
            out.printstd();
        }
        Command::Show => {
            for name in db.list_tables() {
                println!("{name}");
            }
        }
        Command::Exit => {
            db.shutdown()?;
            return Ok(Outcome::Exit);
        }
    }
    Ok(Outcome::Continue)
}
