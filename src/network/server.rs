use std::io::{self, BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::database::SharedDatabase;

/// Read-only network responder: line-oriented commands in, one JSON
/// document per line out. Exposes catalog views only; every write path
/// stays behind the interactive front-end.
pub struct Server {
    listener: TcpListener,
    db: SharedDatabase,
}

impl Server {
    pub fn bind(addr: &str, db: SharedDatabase) -> io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        Ok(Self { listener, db })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until the listener fails, one thread per
    /// connection. All engine access goes through the shared facade, so
    /// responders never race the interactive front-end.
    pub fn run(self) -> io::Result<()> {
        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    let db = self.db.clone();
                    thread::spawn(move || {
                        if let Err(err) = handle_connection(stream, db) {
                            debug!("connection ended: {err}");
                        }
                    });
                }
                Err(err) => warn!("accept failed: {err}"),
            }
        }
        Ok(())
    }
}

fn handle_connection(stream: TcpStream, db: SharedDatabase) -> io::Result<()> {
    let peer = stream.peer_addr()?;
    debug!(%peer, "client connected");

    let reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;
    for line in reader.lines() {
        let line = line?;
        let response = respond(&db, &line);
        serde_json::to_writer(&mut writer, &response)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    Ok(())
}

fn respond(db: &SharedDatabase, line: &str) -> Value {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["show"] => json!(db.list_tables()),
        ["describe", table] => match db.describe_table(table) {
            Ok(attrs) => {
                let map: Map<String, Value> = attrs
                    .into_iter()
                    .map(|(name, attr_type)| (name, Value::String(attr_type)))
                    .collect();
                Value::Object(map)
            }
            Err(err) => json!({ "error": err.to_string() }),
        },
        ["select", table] => match db.select_all(table) {
            Ok(rows) => json!(rows),
            Err(err) => json!({ "error": err.to_string() }),
        },
        _ => json!({
            "error": "unrecognized command; expected: show | describe <table> | select <table>"
        }),
    }
}
