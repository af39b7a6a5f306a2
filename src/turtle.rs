//! Turtle state and the actions symbols can be bound to.

use crate::Symbol;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;

/// The state of the drawing turtle.
///
/// `step_length` is shared across the whole interpretation; only
/// `(position, heading)` is saved by [`TurtleAction::Push`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtleState {
    /// Current position of the pen.
    pub position: Vec2,

    /// Heading in radians, counter-clockwise from +X.
    pub heading: f32,

    /// Distance covered by a forward step without an explicit distance.
    pub step_length: f32,
}

impl Default for TurtleState {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            heading: FRAC_PI_2, // Facing +Y
            step_length: 1.0,
        }
    }
}

impl TurtleState {
    /// Unit vector along the current heading.
    pub fn direction(&self) -> Vec2 {
        Vec2::from_angle(self.heading)
    }

    /// Turns by `angle` radians; positive is counter-clockwise.
    pub fn rotate(&mut self, angle: f32) {
        self.heading += angle;
    }

    /// Moves `distance` along the heading and returns the previous position.
    pub fn advance(&mut self, distance: f32) -> Vec2 {
        let start = self.position;
        self.position += self.direction() * distance;
        start
    }

    pub(crate) fn snapshot(&self) -> (Vec2, f32) {
        (self.position, self.heading)
    }

    pub(crate) fn restore(&mut self, (position, heading): (Vec2, f32)) {
        self.position = position;
        self.heading = heading;
    }
}

/// What a symbol does when the turtle reads it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TurtleAction {
    /// Draw a segment. Uses the step length unless a distance is given.
    Forward(Option<f32>),
    /// Move without drawing (`f`).
    Move(Option<f32>),
    /// Turn by a signed angle in radians.
    Rotate(f32),
    /// Turn 180 degrees (`|`).
    TurnAround,
    /// Save position and heading (`[`).
    Push,
    /// Restore the most recently saved position and heading (`]`).
    Pop,
    /// Invoke the custom handler registered under `name`.
    Custom { name: String, params: Vec<f32> },
    /// Run several actions in order, e.g. push then rotate.
    Combine(Vec<TurtleAction>),
}

impl TurtleAction {
    pub fn forward() -> Self {
        Self::Forward(None)
    }

    pub fn forward_by(distance: f32) -> Self {
        Self::Forward(Some(distance))
    }

    pub fn rotate(radians: f32) -> Self {
        Self::Rotate(radians)
    }

    pub fn push() -> Self {
        Self::Push
    }

    pub fn pop() -> Self {
        Self::Pop
    }

    pub fn custom(name: impl Into<String>, params: impl Into<Vec<f32>>) -> Self {
        Self::Custom {
            name: name.into(),
            params: params.into(),
        }
    }

    pub fn combine(actions: impl IntoIterator<Item = TurtleAction>) -> Self {
        Self::Combine(actions.into_iter().collect())
    }
}

/// Symbol-to-action bindings. Unbound symbols are no-ops.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionTable {
    actions: HashMap<Symbol, TurtleAction>,
}

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The conventional bindings, turning by `angle` radians:
    ///
    /// | Symbol | Action |
    /// |--------|--------|
    /// | `F`, `G` | forward |
    /// | `f` | move without drawing |
    /// | `+` / `-` | rotate by `+angle` / `-angle` |
    /// | `\|` | turn around |
    /// | `[` / `]` | push / pop |
    pub fn standard(angle: f32) -> Self {
        let mappings = [
            ('F', TurtleAction::forward()),
            ('G', TurtleAction::forward()),
            ('f', TurtleAction::Move(None)),
            ('+', TurtleAction::rotate(angle)),
            ('-', TurtleAction::rotate(-angle)),
            ('|', TurtleAction::TurnAround),
            ('[', TurtleAction::push()),
            (']', TurtleAction::pop()),
        ];
        mappings.into_iter().collect()
    }

    /// Binds `symbol` to `action` (builder pattern).
    pub fn with(mut self, symbol: Symbol, action: TurtleAction) -> Self {
        self.set(symbol, action);
        self
    }

    /// Binds `symbol`, returning the action it replaced.
    pub fn set(&mut self, symbol: Symbol, action: TurtleAction) -> Option<TurtleAction> {
        self.actions.insert(symbol, action)
    }

    pub fn remove(&mut self, symbol: Symbol) -> Option<TurtleAction> {
        self.actions.remove(&symbol)
    }

    pub fn get(&self, symbol: Symbol) -> Option<&TurtleAction> {
        self.actions.get(&symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &TurtleAction)> {
        self.actions.iter().map(|(symbol, action)| (*symbol, action))
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl IntoIterator for ActionTable {
    type Item = (Symbol, TurtleAction);
    type IntoIter = std::collections::hash_map::IntoIter<Symbol, TurtleAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.into_iter()
    }
}

impl Extend<(Symbol, TurtleAction)> for ActionTable {
    fn extend<T: IntoIterator<Item = (Symbol, TurtleAction)>>(&mut self, iter: T) {
        self.actions.extend(iter);
    }
}

impl FromIterator<(Symbol, TurtleAction)> for ActionTable {
    fn from_iter<T: IntoIterator<Item = (Symbol, TurtleAction)>>(iter: T) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_turtle_faces_up() {
        let mut t = TurtleState::default();
        let start = t.advance(2.0);
        assert_eq!(start, Vec2::ZERO);
        assert!((t.position - Vec2::new(0.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn positive_rotation_is_counter_clockwise() {
        let mut t = TurtleState {
            heading: 0.0,
            ..Default::default()
        };
        t.rotate(FRAC_PI_2);
        assert!((t.direction() - Vec2::Y).length() < 1e-6);
    }

    #[test]
    fn standard_table_binds_brackets() {
        let table = ActionTable::standard(0.5);
        assert_eq!(table.get('['), Some(&TurtleAction::Push));
        assert_eq!(table.get('-'), Some(&TurtleAction::Rotate(-0.5)));
        assert_eq!(table.get('X'), None);
    }
}
