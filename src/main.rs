//! This is a collaborative code editing application based on
//! <https://hal.inria.fr/inria-00336191v3/document>.
//!
//! The real transport, UI, and storage layers live outside this crate; this
//! binary is a small REPL that drives a single local `Document` so the
//! engine can be exercised without a network collaborator.

use docengine::document::Document;
use docengine::id::SiteId;
use docengine::patch::Patch;
use docengine::Config;
use std::io::{self, BufRead, Write};
use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = Config::parse()?;
    let mut doc = Document::with_base_bits(SiteId::new(config.site), config.base_bits);

    info!(site = config.site, "started document engine REPL");
    println!("commands: i <index> <char> | d <index> | apply <json> | text | authors | quit");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let mut parts = line.trim().splitn(3, ' ');
        match parts.next() {
            Some("i") => {
                let index: usize = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
                let ch = parts.next().and_then(|s| s.chars().next());
                match ch {
                    Some(ch) => match doc.insert(index, ch) {
                        Ok(patch) => println!("{}", patch.encode()),
                        Err(e) => error!("insert failed: {}", e),
                    },
                    None => println!("usage: i <index> <char>"),
                }
            }
            Some("d") => {
                let index: usize = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
                match doc.delete(index) {
                    Ok(patch) => println!("{}", patch.encode()),
                    Err(e) => error!("delete failed: {}", e),
                }
            }
            Some("apply") => {
                let raw = parts.collect::<Vec<_>>().join(" ");
                match Patch::decode(&raw) {
                    Ok(patch) => {
                        if let Err(e) = doc.apply(&patch) {
                            error!("apply failed: {}", e);
                        }
                    }
                    Err(e) => error!("malformed patch: {}", e),
                }
            }
            Some("text") => println!("{}", doc.text()),
            Some("authors") => println!("{:?}", doc.authors()),
            Some("quit") => break,
            _ => println!("unrecognised command"),
        }
        io::stdout().flush()?;
    }

    Ok(())
}
