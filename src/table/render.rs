use itertools::Itertools;
use owo_colors::OwoColorize;
use tabled::{builder::Builder, settings::Style};

use crate::{math::OrderedSet, prelude::*};

impl<T: Targets> Automaton<T> {
    /// Returns a boxed table with one row per state and one column per symbol, meant for
    /// logs and debugging. The start state is prefixed with `→`, final states are
    /// suffixed with `*` and printed in bold. Missing transitions are shown as `-`.
    pub fn render(&self) -> String {
        let symbols: OrderedSet<&Symbol> =
            self.states().flat_map(|(_, state)| state.symbols()).collect();

        let mut builder = Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(symbols.iter().map(|s| s.to_string())),
        );
        for id in self.state_ids_start_first() {
            let mut label = if id == self.start() {
                format!("→ {id}")
            } else {
                id.to_string()
            };
            if self.is_final(id) {
                label = format!("{}", format!("{label} *").bold());
            }

            let mut row = vec![label];
            for symbol in &symbols {
                let targets = self.targets(id, symbol);
                if targets.is_empty() {
                    row.push("-".to_string());
                } else {
                    row.push(targets.iter().join(","));
                }
            }
            builder.push_record(row);
        }

        builder.build().with(Style::rounded()).to_string()
    }
}
