//! Parser for the rule mini-language.
//!
//! One production per rule string:
//!
//! ```text
//! SYMBOL [WEIGHT] -> REPLACEMENT
//! ```
//!
//! `SYMBOL` is a single character, `WEIGHT` an optional positive decimal
//! (defaults to `1.0`), and `REPLACEMENT` a bare run of symbol characters,
//! possibly empty. Productions sharing a source symbol are merged into one
//! stochastic [`Rule`](crate::Rule) by [`RuleSet`](crate::RuleSet).

use crate::error::GrammarError;
use crate::{Sequence, Symbol};
use std::str::FromStr;

const SEPARATOR: &str = "->";
const COMMENT: char = '#';

/// A single parsed rule string, before merging into a [`RuleSet`](crate::RuleSet).
#[derive(Clone, Debug, PartialEq)]
pub struct Production {
    pub source: Symbol,
    /// `None` when the rule string carried no weight.
    pub weight: Option<f64>,
    pub replacement: Sequence,
}

impl Production {
    /// The weight this production contributes to its rule.
    pub fn effective_weight(&self) -> f64 {
        self.weight.unwrap_or(1.0)
    }
}

impl FromStr for Production {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_production(s)
    }
}

/// Parses one `SYMBOL [WEIGHT] -> REPLACEMENT` string.
pub fn parse_production(rule: &str) -> Result<Production, GrammarError> {
    let text = rule.trim();
    if text.is_empty() {
        return Err(GrammarError::Empty);
    }

    let (head, tail) = text
        .split_once(SEPARATOR)
        .ok_or_else(|| GrammarError::MissingSeparator(text.to_string()))?;

    let mut tokens = head.split_whitespace();
    let symbol_token = tokens
        .next()
        .ok_or_else(|| GrammarError::MissingSymbol(text.to_string()))?;

    let mut chars = symbol_token.chars();
    let source = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => {
            return Err(GrammarError::InvalidSymbol {
                rule: text.to_string(),
                token: symbol_token.to_string(),
            });
        }
    };

    let weight = match tokens.next() {
        Some(token) => Some(parse_weight(text, token)?),
        None => None,
    };

    if let Some(extra) = tokens.next() {
        return Err(GrammarError::UnexpectedToken {
            rule: text.to_string(),
            token: extra.to_string(),
        });
    }

    let replacement = tail.trim();
    if replacement.chars().any(char::is_whitespace) {
        return Err(GrammarError::InvalidReplacement(text.to_string()));
    }

    Ok(Production {
        source,
        weight,
        replacement: replacement.chars().collect(),
    })
}

/// Parses a multi-line rule text, one production per line.
///
/// Blank lines and lines starting with `#` are skipped. Errors are wrapped in
/// [`GrammarError::AtLine`] with a 1-based line number.
pub fn parse_productions(text: &str) -> Result<Vec<Production>, GrammarError> {
    let mut productions = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT) {
            continue;
        }
        let production = parse_production(line).map_err(|e| GrammarError::AtLine {
            line: i + 1,
            source: Box::new(e),
        })?;
        productions.push(production);
    }
    Ok(productions)
}

fn parse_weight(rule: &str, token: &str) -> Result<f64, GrammarError> {
    let invalid = || GrammarError::InvalidWeight {
        rule: rule.to_string(),
        token: token.to_string(),
    };
    let weight: f64 = token.parse().map_err(|_| invalid())?;
    if weight.is_finite() && weight > 0.0 {
        Ok(weight)
    } else {
        Err(invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_deterministic_rule() {
        let p = parse_production("F -> F+F-F").unwrap();
        assert_eq!(p.source, 'F');
        assert_eq!(p.weight, None);
        assert_eq!(p.effective_weight(), 1.0);
        assert_eq!(p.replacement, vec!['F', '+', 'F', '-', 'F']);
    }

    #[test]
    fn parses_weighted_rule_without_spaces_around_arrow() {
        let p = parse_production("F 0.3->F++F").unwrap();
        assert_eq!(p.weight, Some(0.3));
        assert_eq!(p.replacement, vec!['F', '+', '+', 'F']);
    }

    #[test]
    fn operator_symbols_can_be_sources() {
        let p = parse_production("-->+").unwrap();
        assert_eq!(p.source, '-');
        assert_eq!(p.replacement, vec!['+']);
    }

    #[test]
    fn empty_replacement_is_a_deletion() {
        let p = parse_production("X ->").unwrap();
        assert!(p.replacement.is_empty());
    }

    #[test]
    fn rejects_malformed_rules() {
        assert_eq!(parse_production("   "), Err(GrammarError::Empty));
        assert!(matches!(
            parse_production("F = FF"),
            Err(GrammarError::MissingSeparator(_))
        ));
        assert!(matches!(
            parse_production("-> FF"),
            Err(GrammarError::MissingSymbol(_))
        ));
        assert!(matches!(
            parse_production("FG -> FF"),
            Err(GrammarError::InvalidSymbol { .. })
        ));
        assert!(matches!(
            parse_production("F abc -> FF"),
            Err(GrammarError::InvalidWeight { .. })
        ));
        assert!(matches!(
            parse_production("F 0 -> FF"),
            Err(GrammarError::InvalidWeight { .. })
        ));
        assert!(matches!(
            parse_production("F -2 -> FF"),
            Err(GrammarError::InvalidWeight { .. })
        ));
        assert!(matches!(
            parse_production("F 1 2 -> FF"),
            Err(GrammarError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            parse_production("F -> F F"),
            Err(GrammarError::InvalidReplacement(_))
        ));
    }

    #[test]
    fn multi_line_text_reports_line_numbers() {
        let text = "# koch\nF -> F-F++F-F\n\nX 2 -> ]\nbroken";
        let err = parse_productions(text).unwrap_err();
        match err {
            GrammarError::AtLine { line, source } => {
                assert_eq!(line, 5);
                assert!(matches!(*source, GrammarError::MissingSeparator(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let ok = parse_productions("# koch\nF -> F-F++F-F\n\nX 2 -> ]").unwrap();
        assert_eq!(ok.len(), 2);
        assert_eq!(ok[1].weight, Some(2.0));
    }
}
