use std::fmt::Debug;

use itertools::Itertools;

use crate::math::{Map, Set};

/// Word simulation for nondeterministic and deterministic automata.
pub mod run;

/// States are identified by their label.
pub type StateId = String;
/// Symbols of the alphabet are plain labels as well.
pub type Symbol = String;

/// The pseudo-symbol that marks transitions which do not consume any input.
pub const EPSILON: &str = "ε";

/// Read-only view on the targets stored for one symbol in a state. This is what
/// distinguishes nondeterministic automata (any number of targets) from
/// deterministic ones (at most one target).
pub trait Targets: Clone + Debug + Default + Eq {
    /// Returns the targets as a slice, which is empty if there are none.
    fn targets(&self) -> &[StateId];

    /// Returns true if there is no target.
    fn is_absent(&self) -> bool {
        self.targets().is_empty()
    }
}

impl Targets for Vec<StateId> {
    fn targets(&self) -> &[StateId] {
        self.as_slice()
    }
}

impl Targets for Option<StateId> {
    fn targets(&self) -> &[StateId] {
        self.as_slice()
    }
}

/// A single state, consisting of a flag that marks it as final and the outgoing
/// transitions, which are kept in the order in which the symbols were added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State<T> {
    is_final: bool,
    transitions: Map<Symbol, T>,
}

impl<T: Targets> Default for State<T> {
    fn default() -> Self {
        Self::new(false)
    }
}

impl<T: Targets> State<T> {
    /// Creates a state without transitions.
    pub fn new(is_final: bool) -> Self {
        Self {
            is_final,
            transitions: Map::default(),
        }
    }

    /// Returns true if the state is final.
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Marks the state as final or non-final.
    pub fn set_final(&mut self, is_final: bool) {
        self.is_final = is_final;
    }

    /// Gives the entry stored for `symbol`, if any.
    pub fn entry(&self, symbol: &str) -> Option<&T> {
        self.transitions.get(symbol)
    }

    /// Returns the targets that are reached on `symbol`, which may be empty.
    pub fn targets(&self, symbol: &str) -> &[StateId] {
        self.transitions
            .get(symbol)
            .map(Targets::targets)
            .unwrap_or_default()
    }

    /// Iterates over all symbol entries of the state, in insertion order.
    pub fn transitions(&self) -> impl Iterator<Item = (&Symbol, &T)> + '_ {
        self.transitions.iter()
    }

    /// Returns the symbols that have an entry in this state.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.transitions.keys()
    }

    /// Replaces the entry for `symbol` and returns the previous one.
    pub fn set_entry<S: Into<Symbol>>(&mut self, symbol: S, entry: T) -> Option<T> {
        self.transitions.insert(symbol.into(), entry)
    }
}

impl State<Vec<StateId>> {
    /// Adds `target` to the targets on `symbol`, unless it is already present.
    pub fn add_target<S: Into<Symbol>, Q: Into<StateId>>(&mut self, symbol: S, target: Q) {
        let target = target.into();
        let targets = self.transitions.entry(symbol.into()).or_default();
        if !targets.contains(&target) {
            targets.push(target);
        }
    }
}

/// A finite automaton with a designated start state. The type parameter decides how
/// many targets a transition may have, see [`Nfa`] and [`Dfa`].
///
/// The automaton is a plain container, no validation takes place. In particular,
/// transitions may point to states that do not exist; all algorithms in this crate
/// treat such targets as non-final states without outgoing transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton<T> {
    start: StateId,
    states: Map<StateId, State<T>>,
}

/// Nondeterministic automaton, possibly with transitions on [`EPSILON`].
pub type Nfa = Automaton<Vec<StateId>>;
/// Deterministic automaton. A symbol entry holding `None` records that there is no
/// transition on that symbol.
pub type Dfa = Automaton<Option<StateId>>;

impl<T: Targets> Automaton<T> {
    /// Creates an automaton that only consists of a non-final start state.
    pub fn new<S: Into<StateId>>(start: S) -> Self {
        let start = start.into();
        let mut states = Map::default();
        states.insert(start.clone(), State::new(false));
        Self { start, states }
    }

    /// Returns the identifier of the start state.
    pub fn start(&self) -> &StateId {
        &self.start
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Adds a state, or updates the final flag if the state exists already.
    pub fn add_state<S: Into<StateId>>(&mut self, id: S, is_final: bool) -> &mut State<T> {
        let state = self.states.entry(id.into()).or_default();
        state.set_final(is_final);
        state
    }

    /// Builder variant of [`Self::add_state`].
    pub fn with_state<S: Into<StateId>>(mut self, id: S, is_final: bool) -> Self {
        self.add_state(id, is_final);
        self
    }

    /// Looks up a state.
    pub fn state(&self, id: &str) -> Option<&State<T>> {
        self.states.get(id)
    }

    /// Mutable access to a state, which is created if it does not exist yet.
    pub fn state_mut<S: Into<StateId>>(&mut self, id: S) -> &mut State<T> {
        self.states.entry(id.into()).or_default()
    }

    /// Iterates over all states in insertion order.
    pub fn states(&self) -> impl Iterator<Item = (&StateId, &State<T>)> + '_ {
        self.states.iter()
    }

    /// Iterates over all state identifiers in insertion order.
    pub fn state_ids(&self) -> impl Iterator<Item = &StateId> + '_ {
        self.states.keys()
    }

    /// Returns true if `id` is a final state. Unknown states are not final.
    pub fn is_final(&self, id: &str) -> bool {
        self.state(id).is_some_and(State::is_final)
    }

    /// Iterates over the identifiers of all final states.
    pub fn final_states(&self) -> impl Iterator<Item = &StateId> + '_ {
        self.states()
            .filter(|(_, state)| state.is_final())
            .map(|(id, _)| id)
    }

    /// Returns the targets of `id` on `symbol`, which is empty if there are none or
    /// the state is unknown.
    pub fn targets(&self, id: &str, symbol: &str) -> &[StateId] {
        self.state(id)
            .map(|state| state.targets(symbol))
            .unwrap_or_default()
    }

    /// Returns all symbols occurring in any state, in the order they are first seen.
    /// For nondeterministic automata this includes [`EPSILON`] if it is used.
    pub fn alphabet(&self) -> Set<Symbol> {
        self.states
            .values()
            .flat_map(|state| state.symbols().cloned())
            .collect()
    }

    /// Returns the state identifiers with the start state first, followed by the
    /// remaining states in insertion order.
    pub fn state_ids_start_first(&self) -> Vec<&StateId> {
        std::iter::once(&self.start)
            .chain(self.state_ids().filter(|id| **id != self.start))
            .collect_vec()
    }
}

impl Nfa {
    /// Adds a transition from `source` to `target` on `symbol`. The source state is
    /// created if necessary, the target is not.
    pub fn add_transition<P, S, Q>(&mut self, source: P, symbol: S, target: Q)
    where
        P: Into<StateId>,
        S: Into<Symbol>,
        Q: Into<StateId>,
    {
        self.state_mut(source).add_target(symbol, target);
    }

    /// Adds every given transition, creating the source and target states on the way.
    ///
    /// ```
    /// use detmin::prelude::*;
    /// let nfa = Nfa::new("q0")
    ///     .with_transitions([("q0", "a", "q1"), ("q1", EPSILON, "q2")])
    ///     .with_state("q2", true);
    /// assert_eq!(nfa.size(), 3);
    /// assert_eq!(nfa.targets("q1", EPSILON), &["q2".to_string()]);
    /// ```
    pub fn with_transitions<I, P, S, Q>(mut self, transitions: I) -> Self
    where
        I: IntoIterator<Item = (P, S, Q)>,
        P: Into<StateId>,
        S: Into<Symbol>,
        Q: Into<StateId>,
    {
        for (source, symbol, target) in transitions {
            let target = target.into();
            self.state_mut(target.clone());
            self.add_transition(source, symbol, target);
        }
        self
    }
}

impl Dfa {
    /// Sets the transition of `source` on `symbol`, a `None` target records that
    /// there is no transition.
    pub fn set_transition<P, S>(&mut self, source: P, symbol: S, target: Option<StateId>)
    where
        P: Into<StateId>,
        S: Into<Symbol>,
    {
        self.state_mut(source).set_entry(symbol, target);
    }

    /// Returns the single successor of `id` on `symbol`, if there is one.
    pub fn successor(&self, id: &str, symbol: &str) -> Option<&StateId> {
        self.state(id)?.entry(symbol)?.as_ref()
    }

    /// Sets every given transition, creating the source and target states on the way.
    pub fn with_transitions<I, P, S, Q>(mut self, transitions: I) -> Self
    where
        I: IntoIterator<Item = (P, S, Q)>,
        P: Into<StateId>,
        S: Into<Symbol>,
        Q: Into<StateId>,
    {
        for (source, symbol, target) in transitions {
            let target = target.into();
            self.state_mut(target.clone());
            self.set_transition(source, symbol, Some(target));
        }
        self
    }
}
