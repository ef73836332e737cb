//! Loading the initial world from a configuration file.
//!
//! The format is whitespace separated integers: rows, columns and the number
//! of coordinate pairs, followed by that many `column row` pairs of live
//! cells.

use std::{fs, path::Path, str::FromStr};

use tracing::{debug, info, warn};

use crate::{
    error::{Error, Result},
    proc::World,
    torus,
};

/// Reads and parses the configuration at `path`.
pub fn initialize(path: impl AsRef<Path>) -> Result<World> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| Error::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    let world = parse(&text)?;
    info!(
        path = %path.display(),
        rows = world.rows(),
        cols = world.cols(),
        population = world.population(),
        "world loaded"
    );
    Ok(world)
}

/// Builds a world from configuration text.
///
/// Coordinates outside the grid are wrapped onto the torus however far out
/// they lie. Tokens after the last declared pair are ignored.
pub fn parse(text: &str) -> Result<World> {
    let mut tokens = text.split_whitespace();

    let rows = header(tokens.next(), "row count")?;
    let cols = header(tokens.next(), "column count")?;
    let declared = header(tokens.next(), "coordinate count")?;

    let mut world = World::dead(rows, cols)?;

    for pair in 0..declared {
        let (Some(col), Some(row)) = (tokens.next(), tokens.next()) else {
            return Err(Error::TruncatedBody {
                declared,
                found: pair,
            });
        };
        let col = coordinate(col, pair)?;
        let row = coordinate(row, pair)?;

        let (r, c) = (torus::wrap(row, rows), torus::wrap(col, cols));
        if (r, c) != (row, col) {
            debug!(row, col, wrapped_row = r, wrapped_col = c, "coordinate wrapped");
        }
        world.set(r, c, true);
    }

    let trailing = tokens.count();
    if trailing > 0 {
        warn!(trailing, "ignoring tokens after the last coordinate pair");
    }

    Ok(world)
}

fn header(token: Option<&str>, field: &'static str) -> Result<usize> {
    token
        .and_then(|t| t.parse().ok())
        .ok_or(Error::MalformedHeader { field })
}

fn coordinate(token: &str, pair: usize) -> Result<i64> {
    token.parse().map_err(|_| Error::MalformedBody { pair })
}

impl FromStr for World {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}
