//! Production rules and rule sets.

use crate::error::GrammarError;
use crate::grammar::{Production, parse_production, parse_productions};
use crate::{Sequence, Symbol};
use log::trace;
use rand::Rng;
use std::collections::HashMap;
use std::str::FromStr;

/// One weighted replacement of a [`Rule`].
#[derive(Clone, Debug, PartialEq)]
pub struct Alternative {
    pub weight: f64,
    pub replacement: Sequence,
}

/// A production for a single source symbol.
///
/// A rule with one alternative is deterministic and never consumes a random
/// draw. With several alternatives one is picked per application with
/// probability `weight / total_weight`; weights need not sum to 1.
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    source: Symbol,
    alternatives: Vec<Alternative>,
}

impl Rule {
    /// A rule that always rewrites `source` to `replacement`.
    pub fn deterministic(source: Symbol, replacement: impl IntoIterator<Item = Symbol>) -> Self {
        Self {
            source,
            alternatives: vec![Alternative {
                weight: 1.0,
                replacement: replacement.into_iter().collect(),
            }],
        }
    }

    /// A rule choosing among weighted alternatives.
    ///
    /// Fails if no alternative is given or any weight is not positive and finite.
    pub fn stochastic<I, R>(source: Symbol, alternatives: I) -> Result<Self, GrammarError>
    where
        I: IntoIterator<Item = (f64, R)>,
        R: IntoIterator<Item = Symbol>,
    {
        let mut alternatives = alternatives.into_iter();
        let (weight, replacement) = alternatives
            .next()
            .ok_or(GrammarError::NoAlternatives(source))?;

        check_weight(source, weight)?;
        let mut rule = Self::deterministic(source, replacement);
        rule.alternatives[0].weight = weight;
        for (weight, replacement) in alternatives {
            rule.push_alternative(weight, replacement)?;
        }
        Ok(rule)
    }

    /// Adds another weighted alternative, turning the rule stochastic.
    ///
    /// Fails if the weight is not positive and finite, or if it would push
    /// the rule's total weight past `f64::MAX`.
    pub fn push_alternative(
        &mut self,
        weight: f64,
        replacement: impl IntoIterator<Item = Symbol>,
    ) -> Result<(), GrammarError> {
        check_weight(self.source, weight)?;
        if !(self.total_weight() + weight).is_finite() {
            return Err(GrammarError::InvalidWeight {
                rule: format!("{} {weight} ->", self.source),
                token: weight.to_string(),
            });
        }
        self.alternatives.push(Alternative {
            weight,
            replacement: replacement.into_iter().collect(),
        });
        Ok(())
    }

    pub fn source(&self) -> Symbol {
        self.source
    }

    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    pub fn total_weight(&self) -> f64 {
        self.alternatives.iter().map(|a| a.weight).sum()
    }

    pub fn is_deterministic(&self) -> bool {
        self.alternatives.len() == 1
    }

    /// Picks the replacement for one occurrence of the source symbol.
    ///
    /// Draws a uniform value in `[0, total_weight)` and returns the
    /// alternative whose cumulative weight range contains it.
    pub fn select<R: Rng + ?Sized>(&self, rng: &mut R) -> &[Symbol] {
        if let [only] = self.alternatives.as_slice() {
            return &only.replacement;
        }

        let draw = rng.gen_range(0.0..self.total_weight());
        let mut cumulative = 0.0;
        for (i, alternative) in self.alternatives.iter().enumerate() {
            cumulative += alternative.weight;
            if draw < cumulative {
                trace!("rule `{}`: drew {draw:.4}, picked alternative {i}", self.source);
                return &alternative.replacement;
            }
        }

        // Rounding can leave `draw` just past the last cumulative bound.
        &self.alternatives[self.alternatives.len() - 1].replacement
    }
}

fn check_weight(source: Symbol, weight: f64) -> Result<(), GrammarError> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(GrammarError::InvalidWeight {
            rule: format!("{source} {weight} ->"),
            token: weight.to_string(),
        })
    }
}

/// Mapping from source symbol to its [`Rule`].
///
/// Symbols without a rule are terminal: they rewrite to themselves.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuleSet {
    rules: HashMap<Symbol, Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a rule set from rule strings such as `"F 0.5 -> F+F"`.
    ///
    /// Strings with the same source symbol accumulate into one stochastic rule.
    /// Any malformed string fails the whole construction.
    pub fn parse<'a, I>(rules: I) -> Result<Self, GrammarError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut set = Self::new();
        for rule in rules {
            set.add_production(parse_production(rule)?)?;
        }
        Ok(set)
    }

    /// Inserts `rule`, replacing any rule for the same source symbol.
    pub fn insert(&mut self, rule: Rule) -> Option<Rule> {
        self.rules.insert(rule.source, rule)
    }

    /// Adds one weighted alternative for `source`, merging with an existing rule.
    pub fn add(
        &mut self,
        source: Symbol,
        weight: f64,
        replacement: impl IntoIterator<Item = Symbol>,
    ) -> Result<(), GrammarError> {
        match self.rules.get_mut(&source) {
            Some(rule) => rule.push_alternative(weight, replacement),
            None => {
                let rule = Rule::stochastic(source, [(weight, replacement)])?;
                self.rules.insert(source, rule);
                Ok(())
            }
        }
    }

    pub fn add_production(&mut self, production: Production) -> Result<(), GrammarError> {
        let weight = production.effective_weight();
        self.add(production.source, weight, production.replacement)
    }

    /// The rule for `symbol`, or `None` if the symbol is terminal.
    pub fn lookup(&self, symbol: Symbol) -> Option<&Rule> {
        self.rules.get(&symbol)
    }

    /// Appends the replacement of `symbol` to `out`.
    pub fn rewrite_into<R: Rng + ?Sized>(&self, symbol: Symbol, rng: &mut R, out: &mut Sequence) {
        match self.rules.get(&symbol) {
            Some(rule) => out.extend_from_slice(rule.select(rng)),
            None => out.push(symbol),
        }
    }

    /// True when no rule has more than one alternative.
    pub fn is_deterministic(&self) -> bool {
        self.rules.values().all(Rule::is_deterministic)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }
}

impl FromStr for RuleSet {
    type Err = GrammarError;

    /// Parses a newline-separated rule text. See [`parse_productions`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = Self::new();
        for production in parse_productions(s)? {
            set.add_production(production)?;
        }
        Ok(set)
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<T: IntoIterator<Item = Rule>>(iter: T) -> Self {
        let mut set = Self::new();
        for rule in iter {
            set.insert(rule);
        }
        set
    }
}
