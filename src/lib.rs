//! # symbios-turtle-2d
//!
//! A small Lindenmayer-system engine: a rewriting core that expands a seed
//! through generations of deterministic or weighted stochastic rules, and a
//! 2D turtle that turns the expanded symbols into line segments.
//!
//! The crate produces geometry only ([`Drawing`]); writing SVG, TikZ or
//! drawing to a canvas is left to the caller.
//!
//! ```
//! use symbios_turtle_2d::{ActionTable, Expander, RuleSet, TurtleConfig, TurtleInterpreter, symbols};
//!
//! let rules = RuleSet::parse(["F -> F-F++F-F"]).unwrap();
//! let sequence = Expander::new(&rules).expand(&symbols("F++F++F"), 2);
//!
//! let interpreter = TurtleInterpreter::new(TurtleConfig::default())
//!     .with_actions(ActionTable::standard(std::f32::consts::FRAC_PI_3));
//! let drawing = interpreter.interpret(&sequence).unwrap();
//! assert_eq!(drawing.segments.len(), 3 * 4 * 4);
//! ```

pub mod error;
pub mod expander;
pub mod geometry;
pub mod grammar;
pub mod interpreter;
pub mod rule;
pub mod turtle;

pub use error::*;
pub use expander::*;
pub use geometry::*;
pub use grammar::*;
pub use interpreter::*;
pub use rule::*;
pub use turtle::*;

/// An atomic token of the L-system alphabet.
///
/// Symbols are single characters, both in the rule grammar and in the
/// programmatic [`Rule`]/[`RuleSet`] API. Multi-character identifiers
/// (e.g. `Jf`) are not supported; map them onto spare characters instead.
pub type Symbol = char;

/// An ordered run of symbols. Each generation produces a new one.
pub type Sequence = Vec<Symbol>;

/// Converts a string into a sequence, one symbol per character.
pub fn symbols(text: &str) -> Sequence {
    text.chars().collect()
}
