use std::process;
use std::thread;

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

use ggdb::command::{self, Outcome};
use ggdb::network::Server;
use ggdb::{Config, Database, SharedDatabase, DEFAULT_PAGE_SIZE};

/// GG DB: a minimal page-organized record store
#[derive(Parser, Debug)]
#[command(name = "ggdb")]
#[command(about = "A minimal single-file, page-organized record store")]
#[command(version)]
struct Args {
    /// Directory for the metadata file and per-table files
    #[arg(short, long, default_value = "./ggdb_data")]
    data_dir: String,

    /// Listen address of the read-only responder (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: String,

    /// Disable the read-only responder
    #[arg(long)]
    no_listen: bool,

    /// Page size for newly created databases (existing databases keep
    /// the page size recorded in their metadata header)
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,
}

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,ggdb=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .page_size(args.page_size)
        .listen_addr(&args.listen)
        .build();

    let db = match Database::open(&config) {
        Ok(db) => SharedDatabase::new(db),
        Err(err) => {
            error!("failed to open database: {err}");
            process::exit(1);
        }
    };

    if !args.no_listen {
        match Server::bind(&config.listen_addr, db.clone()) {
            Ok(server) => {
                tracing::info!("read-only responder listening on {}", config.listen_addr);
                thread::spawn(move || {
                    if let Err(err) = server.run() {
                        error!("responder stopped: {err}");
                    }
                });
            }
            Err(err) => {
                error!("failed to bind {}: {err}", config.listen_addr);
                process::exit(1);
            }
        }
    }

    println!("Logged in to GG DB!");
    repl(&db);
}

fn repl(db: &SharedDatabase) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(err) => {
            error!("failed to start line editor: {err}");
            process::exit(1);
        }
    };

    loop {
        match editor.readline("ggdb> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(&line);
                match command::parse(&line) {
                    Ok(cmd) => match command::execute(db, cmd) {
                        Ok(Outcome::Exit) => {
                            println!("Exiting GG DB!");
                            break;
                        }
                        Ok(Outcome::Continue) => {}
                        Err(err) => println!("{err}"),
                    },
                    Err(err) => println!("{err}"),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                if let Err(err) = db.shutdown() {
                    error!("flush on exit failed: {err}");
                }
                break;
            }
            Err(err) => {
                error!("readline failed: {err}");
                break;
            }
        }
    }
}
