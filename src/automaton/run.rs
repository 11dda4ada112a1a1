use crate::{
    closure::EpsilonClosure,
    math::Set,
    prelude::*,
};

impl Nfa {
    /// Decides whether the word is accepted. Before the first and after every symbol
    /// the current set of states is closed under epsilon transitions, the word is
    /// accepted if a final state is reached.
    pub fn accepts<W, S>(&self, word: W) -> bool
    where
        W: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let closure = EpsilonClosure::compute(self);
        self.accepts_with(&closure, word)
    }

    /// Variant of [`Self::accepts`] that reuses an already computed closure.
    pub fn accepts_with<W, S>(&self, closure: &EpsilonClosure, word: W) -> bool
    where
        W: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut current = closure.closure_of([self.start()]);
        for symbol in word {
            let symbol = symbol.as_ref();
            let next: Set<&StateId> = current
                .iter()
                .flat_map(|q| self.targets(q, symbol))
                .collect();
            if next.is_empty() {
                return false;
            }
            current = closure.closure_of(next);
        }
        current.iter().any(|q| self.is_final(q))
    }
}

impl Dfa {
    /// Follows the unique transitions for the symbols of `word` and returns the
    /// reached state, or `None` if the run gets stuck.
    pub fn run<W, S>(&self, word: W) -> Option<&StateId>
    where
        W: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        word.into_iter()
            .try_fold(self.start(), |q, symbol| self.successor(q, symbol.as_ref()))
    }

    /// Decides whether the word is accepted, i.e. the run does not get stuck and ends
    /// in a final state.
    pub fn accepts<W, S>(&self, word: W) -> bool
    where
        W: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.run(word).is_some_and(|q| self.is_final(q))
    }
}
