//! Library for turning nondeterministic finite automata with epsilon transitions into
//! minimal deterministic finite automata.
//!
//! An automaton consists of a collection of states, identified by their label, each of
//! which may be final and has a map from symbols to targets. The type of the targets
//! decides whether we deal with an [`Nfa`](automaton::Nfa), where a symbol may lead to
//! any number of states and the special symbol [`EPSILON`](automaton::EPSILON) marks
//! transitions that do not consume input, or with a [`Dfa`](automaton::Dfa), where
//! every symbol leads to at most one state.
//!
//! The conversion happens in three stages, each of which produces a fresh automaton:
//! - [`closure::EpsilonClosure`] computes for every state the states reachable through
//!   epsilon transitions,
//! - [`determinization::SubsetConstruction`] builds a DFA whose states stand for sets
//!   of NFA states,
//! - [`minimization::minimize`] merges equivalent DFA states using Moore's partition
//!   refinement.
//!
//! Automata are read from and written to a simple semicolon separated table format,
//! see the [`table`] module.
//!
//! ```
//! use detmin::prelude::*;
//!
//! let table = ";;;F\n;q0;q1;q2\na;q1;;\nε;;q2;\n";
//! let (nfa, final_state) = Nfa::try_from_table(table).unwrap();
//! let minimal = nfa.determinize(&final_state).minimize();
//! assert_eq!(minimal.to_table(), ";;F\n;S0;S1\na;S1;\n");
//! ```
#![deny(missing_docs)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use detmin::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        automaton::{Automaton, Dfa, Nfa, State, StateId, Symbol, Targets, EPSILON},
        closure::EpsilonClosure,
        determinization::{determinize, AlphabetScope, SubsetConstruction},
        minimization::{minimize, minimize_with, RefinementRule},
        minimal_dfa,
        table::TableError,
    };
}

/// This module contains type aliases for the collections used throughout the crate
/// and the [`math::Partition`] type.
pub mod math;

/// Defines the automaton model shared by all stages.
pub mod automaton;

/// Computation of epsilon closures.
pub mod closure;

/// Subset construction, turning an NFA into a DFA.
pub mod determinization;

/// Contains the minimization of DFAs through partition refinement.
pub mod minimization;

/// Reading, writing and rendering of automata in table form.
pub mod table;

use prelude::*;

/// Runs the whole conversion: determinizes `nfa` over the given [`AlphabetScope`] with
/// `final_state` as its final state and minimizes the result under `rule`.
pub fn minimal_dfa(
    nfa: &Nfa,
    final_state: &str,
    scope: AlphabetScope,
    rule: RefinementRule,
) -> Dfa {
    minimize_with(&determinize(nfa, final_state, scope), rule)
}
