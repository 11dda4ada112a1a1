use itertools::Itertools;
use tracing::trace;

use crate::{
    math::{Map, Partition},
    prelude::*,
};

/// Selects how [`moore_partition_refinement`] compares states and when it stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RefinementRule {
    /// The initial partition always counts as two classes, even if all states are
    /// final or all are non-final. A state's signature is the sequence of target
    /// classes in the order of its own symbols. When a round does not increase the
    /// number of classes, the partition from before that round is the result.
    ///
    /// On automata with only final or only non-final states the first split does
    /// not raise the count above two, so such automata can be merged into fewer
    /// states than their language needs. The same happens for states that only
    /// differ in the symbols they have transitions on.
    #[default]
    Reference,
    /// Empty initial classes are left out of the count and signatures pair every
    /// target class with its symbol. As every round refines the previous partition,
    /// equal counts mean the partition is stable, so the result is the coarsest
    /// partition into equivalent states.
    Strict,
}

impl RefinementRule {
    fn initial_count(&self, partition: &Partition<StateId>) -> usize {
        match self {
            RefinementRule::Reference => 2,
            RefinementRule::Strict => partition.size(),
        }
    }
}

/// The outcome of [`moore_partition_refinement`].
#[derive(Debug, Clone)]
pub struct RefinedPartition {
    /// The final partition of the states into classes of equivalent states.
    pub partition: Partition<StateId>,
    /// The number of classes at the start and after every refinement round.
    pub history: Vec<usize>,
}

/// What a state sees through the current partition, one entry per symbol of the
/// state. The symbol is only part of the entry under [`RefinementRule::Strict`].
/// `None` as class marks that there is no target, or that the target is not covered
/// by the partition.
type Signature<'a> = Vec<(Option<&'a Symbol>, Option<usize>)>;

fn signature<'a>(
    state: &'a State<Option<StateId>>,
    partition: &Partition<StateId>,
    rule: RefinementRule,
) -> Signature<'a> {
    let entries = state.transitions().map(|(symbol, target)| {
        let class = target.as_deref().and_then(|q| partition.class_of(q));
        (symbol, class)
    });
    match rule {
        RefinementRule::Reference => entries.map(|(_, class)| (None, class)).collect(),
        RefinementRule::Strict => entries
            .sorted()
            .map(|(symbol, class)| (Some(symbol), class))
            .collect(),
    }
}

fn refine(dfa: &Dfa, partition: &Partition<StateId>, rule: RefinementRule) -> Partition<StateId> {
    let mut classes = Vec::with_capacity(partition.size());
    for class in partition {
        let mut subclasses: Map<Signature<'_>, Vec<StateId>> = Map::default();
        for q in class {
            let Some(state) = dfa.state(q) else {
                continue;
            };
            subclasses
                .entry(signature(state, partition, rule))
                .or_default()
                .push(q.clone());
        }
        classes.extend(subclasses.into_values());
    }
    Partition::new(classes)
}

/// Computes the partition of the states of `dfa` into classes of states that cannot be
/// told apart, using Moore's partition refinement.
///
/// The refinement starts with the final states and the non-final states as the two
/// classes. In each round, every class is split according to the signatures of its
/// states, and the rounds stop as soon as a round does not increase the number of
/// classes. The partition reached before that last round is returned. How the
/// initial classes are counted and what a signature contains is decided by `rule`,
/// see [`RefinementRule`].
pub fn moore_partition_refinement(dfa: &Dfa, rule: RefinementRule) -> RefinedPartition {
    let (finals, non_finals): (Vec<_>, Vec<_>) = dfa
        .states()
        .partition(|(_, state)| state.is_final());
    let mut partition = Partition::new([
        finals.into_iter().map(|(q, _)| q.clone()).collect_vec(),
        non_finals.into_iter().map(|(q, _)| q.clone()).collect_vec(),
    ]);
    let mut count = rule.initial_count(&partition);
    let mut history = vec![count];

    loop {
        let refined = refine(dfa, &partition, rule);
        trace!(
            "refinement round {} yields {} classes: {}",
            history.len(),
            refined.size(),
            refined
                .iter()
                .map(|class| format!("{{{}}}", class.iter().join(", ")))
                .join(" ")
        );
        history.push(refined.size());
        if refined.size() == count {
            break;
        }
        count = refined.size();
        partition = refined;
    }

    RefinedPartition { partition, history }
}
