use std::collections::VecDeque;

use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    closure::EpsilonClosure,
    math::{Map, OrderedSet, Set},
    prelude::*,
};

/// Prefix of the identifiers that are given to the states of a constructed DFA.
pub const STATE_PREFIX: &str = "S";

/// Determines which symbols the subset construction iterates over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AlphabetScope {
    /// Only the symbols on which the start state of the NFA has an entry. Symbols
    /// that only occur on other states are ignored, so the constructed DFA is
    /// equivalent to the NFA only on words over the symbols of the start state.
    #[default]
    StartState,
    /// Every symbol that occurs anywhere in the NFA.
    Full,
}

impl AlphabetScope {
    fn symbols(&self, nfa: &Nfa) -> Vec<Symbol> {
        let symbols = match self {
            AlphabetScope::StartState => nfa
                .state(nfa.start())
                .map(|q| q.symbols().cloned().collect_vec())
                .unwrap_or_default(),
            AlphabetScope::Full => nfa.alphabet().into_iter().collect_vec(),
        };
        symbols.into_iter().filter(|s| s != EPSILON).collect()
    }
}

/// Converts an [`Nfa`] into a [`Dfa`] whose states stand for sets of NFA states.
///
/// Every DFA state `Sn` is associated with the set of NFA states it was created
/// from, and only when the state is expanded is this set closed under epsilon
/// transitions. Two targets are identified if their associated sets contain the same
/// states, no matter in which order. States are named `S0`, `S1`, ... in the order
/// in which they are created and `S0` is the start state.
#[derive(Debug, Clone)]
pub struct SubsetConstruction<'a> {
    nfa: &'a Nfa,
    closure: EpsilonClosure,
    scope: AlphabetScope,
}

impl<'a> SubsetConstruction<'a> {
    /// Prepares the construction by computing the epsilon closures of `nfa`.
    pub fn new(nfa: &'a Nfa) -> Self {
        Self {
            nfa,
            closure: EpsilonClosure::compute(nfa),
            scope: AlphabetScope::default(),
        }
    }

    /// Sets the [`AlphabetScope`] that is used.
    pub fn with_scope(mut self, scope: AlphabetScope) -> Self {
        self.scope = scope;
        self
    }

    /// Gives access to the epsilon closures of the underlying NFA.
    pub fn closure(&self) -> &EpsilonClosure {
        &self.closure
    }

    /// Runs the construction. A DFA state is final if and only if `final_state` is
    /// contained in the closure of its associated set.
    pub fn run(&self, final_state: &str) -> Dfa {
        let symbols = self.scope.symbols(self.nfa);
        trace!("determinizing over symbols [{}]", symbols.iter().join(", "));

        let initial = state_name(0);
        let mut dfa = Dfa::new(initial.clone());
        let mut subsets = SubsetTable::default();
        subsets.insert(initial.clone(), vec![self.nfa.start().clone()]);

        let mut worklist = VecDeque::from([initial]);
        while let Some(id) = worklist.pop_front() {
            let current = self.closure.closure_of(subsets.associated(&id));
            let is_final = current.contains(final_state);
            trace!(
                "expanding {id} with closure {{{}}}, final: {is_final}",
                current.iter().join(", ")
            );
            dfa.add_state(id.clone(), is_final);

            for symbol in &symbols {
                let reached: Set<&StateId> = current
                    .iter()
                    .flat_map(|q| self.nfa.targets(q, symbol))
                    .collect();

                let target = if reached.is_empty() {
                    None
                } else {
                    let reached = reached.into_iter().cloned().collect_vec();
                    Some(match subsets.find(&reached) {
                        Some(existing) => existing.clone(),
                        None => {
                            let fresh = state_name(subsets.len());
                            trace!("{fresh} stands for {{{}}}", reached.iter().join(", "));
                            subsets.insert(fresh.clone(), reached);
                            worklist.push_back(fresh.clone());
                            fresh
                        }
                    })
                };
                dfa.set_transition(id.clone(), symbol.clone(), target);
            }
        }

        debug!(
            "subset construction turned {} NFA states into {} DFA states",
            self.nfa.size(),
            dfa.size()
        );
        dfa
    }
}

/// Associates every DFA state with the (not epsilon closed) NFA states it was
/// created from. Lookups compare sets by content.
#[derive(Debug, Clone, Default)]
struct SubsetTable {
    associated: Map<StateId, Vec<StateId>>,
    by_content: Map<OrderedSet<StateId>, StateId>,
}

impl SubsetTable {
    fn insert(&mut self, id: StateId, states: Vec<StateId>) {
        self.by_content
            .insert(states.iter().cloned().collect(), id.clone());
        self.associated.insert(id, states);
    }

    fn find(&self, states: &[StateId]) -> Option<&StateId> {
        self.by_content
            .get(&states.iter().cloned().collect::<OrderedSet<_>>())
    }

    fn associated(&self, id: &str) -> &[StateId] {
        self.associated
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn len(&self) -> usize {
        self.associated.len()
    }
}

fn state_name(index: usize) -> StateId {
    format!("{STATE_PREFIX}{index}")
}

/// Determinizes `nfa` starting from its start state, see [`SubsetConstruction`].
pub fn determinize(nfa: &Nfa, final_state: &str, scope: AlphabetScope) -> Dfa {
    SubsetConstruction::new(nfa).with_scope(scope).run(final_state)
}

impl Nfa {
    /// Shorthand for [`determinize`] with the default [`AlphabetScope`].
    pub fn determinize(&self, final_state: &str) -> Dfa {
        determinize(self, final_state, AlphabetScope::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{determinize, AlphabetScope, SubsetConstruction};
    use crate::prelude::*;

    fn scenario() -> Nfa {
        Nfa::new("q0")
            .with_transitions([("q0", "a", "q1"), ("q1", EPSILON, "q2")])
            .with_state("q2", true)
    }

    #[test_log::test]
    fn determinize_small_scenario() {
        let dfa = scenario().determinize("q2");

        assert_eq!(dfa.start(), "S0");
        assert_eq!(dfa.size(), 2);
        assert!(!dfa.is_final("S0"));
        assert!(dfa.is_final("S1"));
        assert_eq!(dfa.successor("S0", "a").map(String::as_str), Some("S1"));
        assert_eq!(dfa.state("S1").and_then(|q| q.entry("a")), Some(&None));
        assert!(dfa.alphabet().iter().all(|s| s != EPSILON));
    }

    #[test_log::test]
    fn subsets_are_identified_by_content() {
        // from q0 the symbol a leads to {q1, q2} while from q3 it leads to {q2, q1}
        let nfa = Nfa::new("q0")
            .with_transitions([
                ("q0", "a", "q1"),
                ("q0", "a", "q2"),
                ("q0", "b", "q3"),
                ("q3", "a", "q2"),
                ("q3", "a", "q1"),
                ("q3", "b", "q3"),
            ])
            .with_state("q2", true);
        let dfa = nfa.determinize("q2");

        assert_eq!(dfa.size(), 3);
        assert_eq!(dfa.successor("S0", "a"), dfa.successor("S2", "a"));
        assert_eq!(dfa.successor("S0", "b").map(String::as_str), Some("S2"));
        assert_eq!(dfa.successor("S2", "b").map(String::as_str), Some("S2"));
        assert!(dfa.is_final("S1"));
    }

    #[test_log::test]
    fn every_state_is_deterministic() {
        let nfa = Nfa::new("0")
            .with_transitions([
                ("0", "a", "0"),
                ("0", "a", "1"),
                ("0", "b", "0"),
                ("1", "b", "2"),
                ("2", EPSILON, "3"),
                ("3", "a", "3"),
                ("3", "b", "3"),
                ("3", "a", "0"),
            ])
            .with_state("3", true);
        let construction = SubsetConstruction::new(&nfa);
        let dfa = construction.run("3");

        for (id, state) in dfa.states() {
            for (symbol, entry) in state.transitions() {
                assert!(symbol != EPSILON, "{id} has an epsilon entry");
                assert!(entry.targets().len() <= 1);
            }
        }
        assert!(dfa.accepts(["a", "b"]));
        assert!(!dfa.accepts(["b", "a"]));
    }

    #[test_log::test]
    fn start_state_scope_ignores_foreign_symbols() {
        let nfa = Nfa::new("q0")
            .with_transitions([("q0", "a", "q1"), ("q1", "b", "q2")])
            .with_state("q2", true);

        let restricted = determinize(&nfa, "q2", AlphabetScope::StartState);
        assert_eq!(restricted.size(), 2);
        assert!(restricted.state("S1").is_some_and(|q| q.entry("b").is_none()));
        assert!(!restricted.accepts(["a", "b"]));

        let full = determinize(&nfa, "q2", AlphabetScope::Full);
        assert_eq!(full.size(), 3);
        assert!(full.accepts(["a", "b"]));
        assert!(!full.accepts(["a"]));
    }

    #[test]
    fn final_start_state_is_kept() {
        let nfa = Nfa::new("q0")
            .with_transitions([("q0", EPSILON, "q1"), ("q1", "a", "q0")])
            .with_state("q1", true);
        let dfa = determinize(&nfa, "q1", AlphabetScope::Full);

        assert!(dfa.is_final("S0"));
        assert_eq!(dfa.size(), 1);
        assert_eq!(dfa.successor("S0", "a").map(String::as_str), Some("S0"));
    }
}
