//! Generation-by-generation expansion of a symbol sequence.
//!
//! Each generation maps every symbol of the current sequence through the
//! [`RuleSet`] independently and concatenates the replacements in order.
//! There is no cycle detection and no size cap: sequence length can grow
//! exponentially in the number of generations, so callers bound it themselves.

use crate::rule::RuleSet;
use crate::{Sequence, Symbol};
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seed used by [`Expander::new`].
pub const DEFAULT_SEED: u64 = 0x5EED_1D;

/// Expands `seed` by `generations` rewrite passes.
///
/// `rng` is consulted once per occurrence of a symbol with a stochastic rule,
/// in sequence order, generation after generation. `generations == 0`
/// returns the seed unchanged.
pub fn expand<R: Rng + ?Sized>(
    seed: &[Symbol],
    rules: &RuleSet,
    generations: usize,
    rng: &mut R,
) -> Sequence {
    let mut current = seed.to_vec();
    for generation in 1..=generations {
        current = step(&current, rules, rng);
        debug!("generation {generation}: {} symbols", current.len());
    }
    current
}

/// Applies a single synchronous rewrite pass.
pub fn step<R: Rng + ?Sized>(current: &[Symbol], rules: &RuleSet, rng: &mut R) -> Sequence {
    let mut next = Vec::with_capacity(current.len());
    for &symbol in current {
        rules.rewrite_into(symbol, rng, &mut next);
    }
    next
}

/// A [`RuleSet`] bound to its own random source.
///
/// Repeated calls share one random stream; build a fresh expander with the
/// same seed to reproduce a run.
pub struct Expander<'r, R = ChaCha8Rng> {
    rules: &'r RuleSet,
    rng: R,
}

impl<'r> Expander<'r, ChaCha8Rng> {
    /// An expander seeded with [`DEFAULT_SEED`].
    pub fn new(rules: &'r RuleSet) -> Self {
        Self::seeded(rules, DEFAULT_SEED)
    }

    pub fn seeded(rules: &'r RuleSet, seed: u64) -> Self {
        Self::with_rng(rules, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<'r, R: Rng> Expander<'r, R> {
    pub fn with_rng(rules: &'r RuleSet, rng: R) -> Self {
        Self { rules, rng }
    }

    pub fn rules(&self) -> &'r RuleSet {
        self.rules
    }

    pub fn step(&mut self, current: &[Symbol]) -> Sequence {
        step(current, self.rules, &mut self.rng)
    }

    pub fn expand(&mut self, seed: &[Symbol], generations: usize) -> Sequence {
        expand(seed, self.rules, generations, &mut self.rng)
    }

    /// Iterates over generation 0 (the seed), 1, 2, …
    ///
    /// The iterator never ends; combine with `take` or `nth`.
    pub fn generations(self, seed: &[Symbol]) -> Generations<'r, R> {
        Generations {
            expander: self,
            current: seed.to_vec(),
            started: false,
        }
    }
}

/// Iterator returned by [`Expander::generations`].
pub struct Generations<'r, R> {
    expander: Expander<'r, R>,
    current: Sequence,
    started: bool,
}

impl<R: Rng> Iterator for Generations<'_, R> {
    type Item = Sequence;

    fn next(&mut self) -> Option<Sequence> {
        if self.started {
            self.current = self.expander.step(&self.current);
        } else {
            self.started = true;
        }
        Some(self.current.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols;

    #[test]
    fn generation_zero_is_identity() {
        let rules = RuleSet::parse(["F 1 -> FF", "F 1 -> F"]).unwrap();
        let seed = symbols("F+F");
        assert_eq!(Expander::new(&rules).expand(&seed, 0), seed);
    }

    #[test]
    fn rewrites_all_symbols_simultaneously() {
        // Pythagoras tree, generation 2.
        let rules = RuleSet::parse(["1 -> 11", "0 -> 1[0]0"]).unwrap();
        let out = Expander::new(&rules).expand(&symbols("0"), 2);
        assert_eq!(out, symbols("11[1[0]0]1[0]0"));
    }

    #[test]
    fn generations_iterator_matches_expand() {
        let rules = RuleSet::parse(["A -> AB", "B -> A"]).unwrap();
        let seed = symbols("A");
        let all: Vec<_> = Expander::new(&rules).generations(&seed).take(5).collect();
        assert_eq!(all[0], seed);
        assert_eq!(all[4], Expander::new(&rules).expand(&seed, 4));
        let lengths: Vec<_> = all.iter().map(Vec::len).collect();
        assert_eq!(lengths, vec![1, 2, 3, 5, 8]);
    }
}
