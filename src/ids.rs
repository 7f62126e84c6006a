//! Lookup of callsigns by radio ID in a flat `<id> <callsign>` file.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

/// Parse one table line into its ID and callsign. Any fields after the callsign are
/// ignored.
fn parse_line(line: &str) -> Option<(u32, &str)> {
    let mut fields = line.split_whitespace();

    let id = fields.next()?.parse().ok()?;
    let call = fields.next()?;

    Some((id, call))
}

/// Find the callsign of the given radio ID in the given lines. The first match wins.
pub fn find<R: BufRead>(lines: R, id: u32) -> Option<String> {
    lines.lines()
        .map_while(|line| line.ok())
        .find_map(|line| match parse_line(&line) {
            Some((n, call)) if n == id => Some(call.to_string()),
            _ => None,
        })
}

/// Look up the callsign of the given radio ID in the table at the given path. A missing
/// file or record gives `None`.
pub fn lookup<P: AsRef<Path>>(path: P, id: u32) -> Option<String> {
    let path = path.as_ref();

    match File::open(path) {
        Ok(f) => find(BufReader::new(f), id),
        Err(e) => {
            debug!("no ID table at {}: {}", path.display(), e);
            None
        },
    }
}
