//! The table format is a semicolon separated text format, where every column except
//! the first one describes a state:
//!
//! ```text
//! ;;;F
//! ;q0;q1;q2
//! a;q1;;
//! ε;;q2;
//! ```
//!
//! The first row marks final states with `F`, the second row names the states and the
//! first named state is the start state. Every following row starts with a symbol
//! and lists, for each state, the comma separated targets on that symbol. An empty
//! cell means that there is no transition.

use std::path::{Path, PathBuf};

use itertools::Itertools;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::{math::OrderedSet, prelude::*};

/// Rendering of automata as boxed tables for humans.
pub mod render;

/// The marker for final states in the first row.
pub const FINAL_MARKER: &str = "F";
/// Separates the cells of a row.
pub const CELL_SEPARATOR: char = ';';
/// Separates the targets within a cell.
pub const TARGET_SEPARATOR: char = ',';

/// Abstracts the errors that can occur when reading or writing a table.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum TableError {
    #[error("file {} not found", .0.display())]
    NotFound(PathBuf),
    #[error("could not access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("table is empty, expected a row of final state markers")]
    MissingFinalRow,
    #[error("no state is marked as final with `F` in the first row")]
    MissingFinalMarker,
    #[error("missing the row of state names")]
    MissingStateRow,
    #[error("the row of state names has no state column, there is no start state")]
    MissingStartColumn,
    #[error("line {line} has {found} columns, expected {expected}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("the state in column {column} has no name")]
    EmptyStateName { column: usize },
    #[error("state `{0}` appears more than once")]
    DuplicateState(StateId),
    #[error("line {line} does not start with a symbol")]
    EmptySymbol { line: usize },
    #[error("symbol `{0}` has more than one row")]
    DuplicateSymbol(Symbol),
}

fn cells(line: &str) -> Vec<&str> {
    line.split(CELL_SEPARATOR).map(str::trim).collect()
}

fn check_columns(line: usize, expected: usize, found: usize) -> Result<(), TableError> {
    if expected == found {
        Ok(())
    } else {
        Err(TableError::ColumnCount {
            line,
            expected,
            found,
        })
    }
}

impl Nfa {
    /// Parses an NFA from its table representation and returns it together with the
    /// designated final state, which is the first state marked with `F`. Further `F`
    /// markers are ignored.
    ///
    /// Every state receives an entry for every symbol row, which is empty if the cell
    /// is empty.
    pub fn try_from_table(input: &str) -> Result<(Self, StateId), TableError> {
        let mut lines = input.lines().enumerate().map(|(i, line)| (i + 1, line));

        let (_, marker_row) = lines.next().ok_or(TableError::MissingFinalRow)?;
        let markers = cells(marker_row);
        let (_, state_row) = lines.next().ok_or(TableError::MissingStateRow)?;
        let ids = cells(state_row);
        if ids.len() < 2 {
            return Err(TableError::MissingStartColumn);
        }
        check_columns(1, ids.len(), markers.len())?;

        let mut finals = markers
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, marker)| **marker == FINAL_MARKER)
            .map(|(column, _)| column);
        let final_column = finals.next().ok_or(TableError::MissingFinalMarker)?;
        for column in finals {
            warn!(
                "ignoring additional final marker on state {}, {} is the final state",
                ids[column], ids[final_column]
            );
        }

        let mut nfa = Nfa::new(ids[1]);
        for (column, id) in ids.iter().enumerate().skip(1) {
            if id.is_empty() {
                return Err(TableError::EmptyStateName { column });
            }
            if column > 1 && nfa.state(id).is_some() {
                return Err(TableError::DuplicateState(id.to_string()));
            }
            nfa.add_state(*id, column == final_column);
        }

        let mut seen = OrderedSet::new();
        for (number, line) in lines {
            if line.trim().is_empty() {
                continue;
            }
            let row = cells(line);
            check_columns(number, ids.len(), row.len())?;
            let symbol = row[0];
            if symbol.is_empty() {
                return Err(TableError::EmptySymbol { line: number });
            }
            if !seen.insert(symbol) {
                return Err(TableError::DuplicateSymbol(symbol.to_string()));
            }

            for (id, cell) in ids.iter().zip(row.iter()).skip(1) {
                let targets = cell
                    .split(TARGET_SEPARATOR)
                    .map(str::trim)
                    .filter(|target| !target.is_empty())
                    .unique()
                    .map(String::from)
                    .collect_vec();
                trace!("{id} --{symbol}--> [{}]", targets.iter().join(", "));
                nfa.state_mut(*id).set_entry(symbol, targets);
            }
        }

        debug!(
            "parsed NFA with {} states and {} symbols, final state {}",
            nfa.size(),
            seen.len(),
            ids[final_column]
        );
        Ok((nfa, ids[final_column].to_string()))
    }

    /// Reads the file at `path` and parses it with [`Self::try_from_table`].
    pub fn try_from_path<P: AsRef<Path>>(path: P) -> Result<(Self, StateId), TableError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                TableError::NotFound(path.to_path_buf())
            } else {
                TableError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::try_from_table(&input)
    }
}

impl<T: Targets> Automaton<T> {
    /// Produces the table representation of `self`. The start state is written into
    /// the first column, the remaining states follow in insertion order. Symbols as
    /// well as the targets within a cell are sorted.
    pub fn to_table(&self) -> String {
        let ids = self.state_ids_start_first();
        let symbols: OrderedSet<&Symbol> =
            self.states().flat_map(|(_, state)| state.symbols()).collect();

        let markers = ids
            .iter()
            .map(|q| if self.is_final(q) { FINAL_MARKER } else { "" });
        let mut rows = vec![
            std::iter::once("").chain(markers).join(";"),
            std::iter::once("").chain(ids.iter().map(|q| q.as_str())).join(";"),
        ];
        for symbol in symbols {
            let targets = ids.iter().map(|q| {
                self.targets(q, symbol)
                    .iter()
                    .sorted()
                    .join(&TARGET_SEPARATOR.to_string())
            });
            rows.push(std::iter::once(symbol.clone()).chain(targets).join(";"));
        }

        rows.into_iter().map(|row| row + "\n").collect()
    }

    /// Writes the table representation of `self` to the file at `path`.
    pub fn write_table<P: AsRef<Path>>(&self, path: P) -> Result<(), TableError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_table()).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
