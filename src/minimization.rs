pub(crate) mod partition_refinement;

pub use partition_refinement::{moore_partition_refinement, RefinedPartition, RefinementRule};

use itertools::Itertools;
use tracing::debug;

use crate::{
    determinization::STATE_PREFIX,
    math::{LookupMap, Partition},
    prelude::*,
};

/// Minimizes `dfa` with the default [`RefinementRule`], see [`minimize_with`].
pub fn minimize(dfa: &Dfa) -> Dfa {
    minimize_with(dfa, RefinementRule::default())
}

/// Minimizes `dfa` by merging the states that end up in the same class of
/// [`moore_partition_refinement`] under the given `rule`.
///
/// The classes become the states `S0`, `S1`, ... of the returned automaton, numbered
/// in the order of their earliest member in `dfa`. Each class copies the final flag
/// and the transitions of its first member, with every target replaced by the class
/// containing it. Absent transitions, as well as transitions into states that are
/// not part of `dfa`, are dropped.
pub fn minimize_with(dfa: &Dfa, rule: RefinementRule) -> Dfa {
    let refined = moore_partition_refinement(dfa, rule);
    let quotient = quotient(dfa, refined.partition);
    debug!(
        "minimization ({rule:?}) merged {} states into {} after {} rounds",
        dfa.size(),
        quotient.size(),
        refined.history.len() - 1
    );
    quotient
}

fn quotient(dfa: &Dfa, partition: Partition<StateId>) -> Dfa {
    let position: LookupMap<&StateId, usize> = dfa
        .state_ids()
        .enumerate()
        .map(|(i, q)| (q, i))
        .collect();
    let classes = partition
        .into_classes()
        .into_iter()
        .sorted_by_key(|class| class.iter().filter_map(|q| position.get(q)).min().copied())
        .collect_vec();
    let renamed = Partition::new(classes);
    let name = |class: usize| format!("{STATE_PREFIX}{class}");

    let start = renamed
        .class_of(dfa.start().as_str())
        .map(name)
        .unwrap_or_else(|| dfa.start().clone());
    let mut minimized = Dfa::new(start);

    for (i, class) in renamed.iter().enumerate() {
        let Some(representative) = class.first().and_then(|q| dfa.state(q)) else {
            continue;
        };
        let state = minimized.add_state(name(i), representative.is_final());
        for (symbol, target) in representative.transitions() {
            if let Some(target) = target.as_deref().and_then(|p| renamed.class_of(p)) {
                state.set_entry(symbol.clone(), Some(name(target)));
            }
        }
    }
    minimized
}

impl Dfa {
    /// Shorthand for [`minimize`].
    pub fn minimize(&self) -> Dfa {
        minimize(self)
    }

    /// Shorthand for [`minimize_with`].
    pub fn minimize_with(&self, rule: RefinementRule) -> Dfa {
        minimize_with(self, rule)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn two_state_scenario_is_already_minimal() {
        let mut dfa = Dfa::new("S0")
            .with_transitions([("S0", "a", "S1")])
            .with_state("S1", true);
        dfa.set_transition("S1", "a", None);

        let minimized = dfa.minimize();
        assert_eq!(minimized.size(), 2);
        assert_eq!(minimized.start(), "S0");
        assert!(!minimized.is_final("S0"));
        assert!(minimized.is_final("S1"));
        assert_eq!(minimized.successor("S0", "a").map(String::as_str), Some("S1"));
        assert_eq!(minimized.state("S1").and_then(|q| q.entry("a")), None);
    }

    #[test_log::test]
    fn equivalent_final_states_are_merged() {
        let dfa = Dfa::new("p0")
            .with_transitions([
                ("p0", "a", "p1"),
                ("p1", "a", "p2"),
                ("p2", "a", "p3"),
                ("p3", "a", "p3"),
            ])
            .with_state("p2", true)
            .with_state("p3", true);

        let minimized = dfa.minimize();
        assert_eq!(minimized.size(), 3);
        assert_eq!(minimized.start(), "S0");
        assert_eq!(minimized.successor("S0", "a").map(String::as_str), Some("S1"));
        assert_eq!(minimized.successor("S1", "a").map(String::as_str), Some("S2"));
        assert_eq!(minimized.successor("S2", "a").map(String::as_str), Some("S2"));
        assert!(minimized.is_final("S2"));
        assert!(!minimized.is_final("S1"));
    }

    #[test_log::test]
    fn textbook_automaton() {
        // accepts the words over {0, 1} whose value read as binary number is divisible by 3,
        // with two redundant copies of the remainder states
        let dfa = Dfa::new("r0")
            .with_transitions([
                ("r0", "0", "r0"),
                ("r0", "1", "r1"),
                ("r1", "0", "r2"),
                ("r1", "1", "r0'"),
                ("r2", "0", "r1'"),
                ("r2", "1", "r2"),
                ("r0'", "0", "r0"),
                ("r0'", "1", "r1'"),
                ("r1'", "0", "r2"),
                ("r1'", "1", "r0"),
            ])
            .with_state("r0", true)
            .with_state("r0'", true);

        let minimized = dfa.minimize();
        assert_eq!(minimized.size(), 3);
        for n in 0u32..64 {
            let word = format!("{n:b}").chars().map(String::from).collect::<Vec<_>>();
            assert_eq!(minimized.accepts(&word), n % 3 == 0, "{n}");
            assert_eq!(dfa.accepts(&word), n % 3 == 0, "{n}");
        }
    }

    #[test_log::test]
    fn minimizing_twice_changes_nothing() {
        let nfa = Nfa::new("0")
            .with_transitions([
                ("0", "a", "1"),
                ("0", "b", "2"),
                ("1", "a", "3"),
                ("1", "b", "3"),
                ("2", "a", "3"),
                ("2", "b", "3"),
                ("3", EPSILON, "0"),
            ])
            .with_state("3", true);

        let once = nfa.determinize("3").minimize();
        let twice = once.minimize();
        assert_eq!(once.size(), 3);
        assert_eq!(twice.size(), once.size());
        assert_eq!(twice, once);
    }

    fn all_final_chain() -> Dfa {
        let mut dfa = Dfa::new("S0")
            .with_transitions([("S0", "a", "S1"), ("S1", "a", "S2")])
            .with_state("S0", true)
            .with_state("S1", true)
            .with_state("S2", true);
        dfa.set_transition("S2", "a", None);
        dfa
    }

    #[test_log::test]
    fn reference_rule_collapses_all_final_chain() {
        // the empty non-final class is counted, so the first split of the chain does
        // not raise the count and the refinement stops before it
        let minimized = all_final_chain().minimize();

        assert_eq!(minimized.size(), 1);
        assert!(minimized.is_final("S0"));
        assert!(minimized.accepts(["a", "a", "a"]));
    }

    #[test_log::test]
    fn strict_rule_keeps_all_final_chain() {
        let dfa = all_final_chain();
        let minimized = dfa.minimize_with(RefinementRule::Strict);

        assert_eq!(minimized.size(), 3);
        for word in [vec![], vec!["a"], vec!["a", "a"], vec!["a", "a", "a"]] {
            assert_eq!(minimized.accepts(&word), dfa.accepts(&word), "{word:?}");
        }
    }

    #[test]
    fn rules_agree_on_non_degenerate_automata() {
        let dfa = Dfa::new("p0")
            .with_transitions([
                ("p0", "a", "p1"),
                ("p0", "b", "p2"),
                ("p1", "a", "p3"),
                ("p1", "b", "p3"),
                ("p2", "a", "p3"),
                ("p2", "b", "p3"),
                ("p3", "a", "p3"),
                ("p3", "b", "p3"),
            ])
            .with_state("p3", true);

        let reference = dfa.minimize();
        assert_eq!(reference.size(), 3);
        assert_eq!(reference, dfa.minimize_with(RefinementRule::Strict));
    }

    #[test]
    fn transitions_into_unknown_states_are_dropped() {
        let mut dfa = Dfa::new("S0").with_state("S0", true);
        dfa.set_transition("S0", "a", Some("nowhere".to_string()));
        dfa.set_transition("S0", "b", Some("S0".to_string()));

        let minimized = dfa.minimize();
        assert_eq!(minimized.size(), 1);
        assert_eq!(minimized.state("S0").and_then(|q| q.entry("a")), None);
        assert_eq!(minimized.successor("S0", "b").map(String::as_str), Some("S0"));
    }
}
