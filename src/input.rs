use std::io::{self, BufRead};

use itertools::Itertools;
use log::warn;

/// Reads `x y` (or `x,y`) pairs, one per line, until EOF or `done`.
///
/// Lines that don't parse are skipped with a warning. Range checks happen
/// when the coordinates seed the grid.
pub fn read_coords(reader: impl BufRead) -> io::Result<Vec<(i64, i64)>> {
    let mut coords = vec![];
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("done") {
            break;
        }
        match parse_coord(line) {
            Some(p) => coords.push(p),
            None => warn!("ignoring {line:?}: expected two integers `x y`"),
        }
    }
    Ok(coords)
}

pub fn parse_coord(line: &str) -> Option<(i64, i64)> {
    let (x, y) = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect_tuple()?;
    Some((x.parse().ok()?, y.parse().ok()?))
}
