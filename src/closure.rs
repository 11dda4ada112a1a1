use itertools::Itertools;
use tracing::trace;

use crate::{
    automaton::{Automaton, StateId, Targets, EPSILON},
    math::{Map, Set},
};

/// The epsilon closures of all states of an automaton. The closure of a state `q`
/// contains every state that can be reached from `q` by taking zero or more
/// transitions on [`EPSILON`], so in particular `q` itself.
///
/// Each closure is stored in the order in which the states were discovered, but
/// it should only ever be treated as a set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpsilonClosure {
    closures: Map<StateId, Set<StateId>>,
}

impl EpsilonClosure {
    /// Computes the closure of every state of `automaton`.
    pub fn compute<T: Targets>(automaton: &Automaton<T>) -> Self {
        let closures = automaton
            .state_ids()
            .map(|q| (q.clone(), Self::traverse(automaton, q)))
            .collect();
        Self { closures }
    }

    // explicit stack instead of recursion, every state is expanded at most once
    fn traverse<T: Targets>(automaton: &Automaton<T>, origin: &StateId) -> Set<StateId> {
        let mut visited: Set<StateId> = Set::default();
        let mut stack = vec![origin];

        while let Some(q) = stack.pop() {
            if visited.insert(q.clone()) {
                stack.extend(
                    automaton
                        .targets(q, EPSILON)
                        .iter()
                        .filter(|p| !visited.contains(*p)),
                );
            }
        }

        trace!("closure of {origin} is {{{}}}", visited.iter().join(", "));
        visited
    }

    /// Returns the closure of `state`, or `None` if the state was not part of the
    /// automaton the closures were computed for.
    pub fn of(&self, state: &str) -> Option<&Set<StateId>> {
        self.closures.get(state)
    }

    /// Computes the closure of a set of states. The result is the union of the
    /// closures of the given states, duplicates removed and otherwise in order. A
    /// state that is unknown contributes only itself.
    pub fn closure_of<I, Q>(&self, states: I) -> Set<StateId>
    where
        I: IntoIterator<Item = Q>,
        Q: AsRef<str>,
    {
        let mut out = Set::default();
        for q in states {
            let q = q.as_ref();
            out.insert(q.to_string());
            if let Some(closure) = self.of(q) {
                out.extend(closure.iter().cloned());
            }
        }
        out
    }

    /// Iterates over all states together with their closure.
    pub fn iter(&self) -> impl Iterator<Item = (&StateId, &Set<StateId>)> + '_ {
        self.closures.iter()
    }
}
