//! Interpreter that walks a symbol sequence with a turtle and records a [`Drawing`].
//!
//! The entry point is [`TurtleInterpreter`]. Configure it with a [`TurtleConfig`],
//! bind symbols via [`TurtleInterpreter::set_action`] or
//! [`TurtleInterpreter::populate_standard_symbols`], register handlers for any
//! [`TurtleAction::Custom`] names, then call [`TurtleInterpreter::interpret`].

use crate::Symbol;
use crate::error::InterpretError;
use crate::geometry::{AuxGeometry, Drawing};
use crate::turtle::{ActionTable, TurtleAction, TurtleState};
use glam::Vec2;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f32::consts::{FRAC_PI_2, PI};

/// Configuration for turtle interpretation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtleConfig {
    /// Length of a forward step without an explicit distance.
    pub step_length: f32,
    /// Starting position.
    pub origin: Vec2,
    /// Starting heading in radians. Default: π/2 (facing +Y).
    pub heading: f32,
    /// Maximum stack depth for push/pop operations.
    pub max_stack_depth: usize,
}

impl Default for TurtleConfig {
    fn default() -> Self {
        Self {
            step_length: 1.0,
            origin: Vec2::ZERO,
            heading: FRAC_PI_2,
            max_stack_depth: 1024,
        }
    }
}

impl TurtleConfig {
    pub fn initial_state(&self) -> TurtleState {
        TurtleState {
            position: self.origin,
            heading: self.heading,
            step_length: self.step_length,
        }
    }
}

/// What a custom handler asks the interpreter to do.
///
/// Handlers only see a copy of the turtle; any movement they want is
/// expressed here and applied by the interpreter without drawing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CustomEffect {
    /// Geometry recorded under the action's name.
    pub geometry: Vec<AuxGeometry>,
    /// Offset added to the turtle position.
    pub translate: Vec2,
    /// Angle added to the turtle heading.
    pub rotate: f32,
}

impl CustomEffect {
    pub fn emit(geometry: impl IntoIterator<Item = AuxGeometry>) -> Self {
        Self {
            geometry: geometry.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn with_translation(mut self, offset: Vec2) -> Self {
        self.translate = offset;
        self
    }

    pub fn with_rotation(mut self, angle: f32) -> Self {
        self.rotate = angle;
        self
    }
}

/// Callback behind a [`TurtleAction::Custom`] name. Receives the current
/// turtle state and the action's parameters.
pub type CustomHandler = Box<dyn Fn(&TurtleState, &[f32]) -> CustomEffect>;

/// Marks a circle at the turtle position. Param 0 is the radius, defaulting
/// to half the step length.
pub fn circle_marker() -> impl Fn(&TurtleState, &[f32]) -> CustomEffect {
    |state: &TurtleState, params: &[f32]| {
        let radius = params.first().copied().unwrap_or(state.step_length * 0.5);
        CustomEffect::emit([AuxGeometry::Circle {
            center: state.position,
            radius,
        }])
    }
}

/// Marks a point at the turtle position.
pub fn dot_marker() -> impl Fn(&TurtleState, &[f32]) -> CustomEffect {
    |state: &TurtleState, _params: &[f32]| CustomEffect::emit([AuxGeometry::Point(state.position)])
}

/// Interprets symbol sequences to build a [`Drawing`].
pub struct TurtleInterpreter {
    actions: ActionTable,
    handlers: HashMap<String, CustomHandler>,
    config: TurtleConfig,
}

impl TurtleInterpreter {
    /// Creates a new interpreter with the given configuration and no bindings.
    pub fn new(config: TurtleConfig) -> Self {
        Self {
            actions: ActionTable::new(),
            handlers: HashMap::new(),
            config,
        }
    }

    /// Replaces the whole action table in one step (builder pattern).
    pub fn with_actions(mut self, actions: ActionTable) -> Self {
        self.actions = actions;
        self
    }

    /// Registers a custom handler (builder pattern).
    pub fn with_custom<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&TurtleState, &[f32]) -> CustomEffect + 'static,
    {
        self.register_custom(name, handler);
        self
    }

    pub fn set_action(&mut self, symbol: Symbol, action: TurtleAction) {
        self.actions.set(symbol, action);
    }

    /// Adds the bindings of [`ActionTable::standard`], keeping any existing
    /// binding for symbols it does not cover.
    pub fn populate_standard_symbols(&mut self, angle: f32) {
        self.actions.extend(ActionTable::standard(angle));
    }

    pub fn register_custom<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(&TurtleState, &[f32]) -> CustomEffect + 'static,
    {
        self.handlers.insert(name.into(), Box::new(handler));
    }

    pub fn actions(&self) -> &ActionTable {
        &self.actions
    }

    pub fn config(&self) -> &TurtleConfig {
        &self.config
    }

    /// Interprets `sequence` starting from the configured origin and heading.
    pub fn interpret(&self, sequence: &[Symbol]) -> Result<Drawing, InterpretError> {
        self.interpret_from(sequence, self.config.initial_state())
    }

    /// Interprets `sequence` starting from `initial`.
    ///
    /// Symbols are read left to right. Unbound symbols are skipped. A pop on
    /// an empty stack, a push past `max_stack_depth`, or a custom action with
    /// no registered handler stops interpretation with an error.
    pub fn interpret_from(
        &self,
        sequence: &[Symbol],
        initial: TurtleState,
    ) -> Result<Drawing, InterpretError> {
        let mut turtle = initial;
        let mut stack = Vec::new();
        let mut drawing = Drawing::new(initial);

        for (index, &symbol) in sequence.iter().enumerate() {
            let Some(action) = self.actions.get(symbol) else {
                continue;
            };
            self.apply(action, index, symbol, &mut turtle, &mut stack, &mut drawing)?;
        }

        drawing.final_state = turtle;
        drawing.open_branches = stack.len();
        debug!(
            "interpreted {} symbols: {} segments, {} open branches",
            sequence.len(),
            drawing.segments.len(),
            drawing.open_branches
        );
        Ok(drawing)
    }

    fn apply(
        &self,
        action: &TurtleAction,
        index: usize,
        symbol: Symbol,
        turtle: &mut TurtleState,
        stack: &mut Vec<(Vec2, f32)>,
        drawing: &mut Drawing,
    ) -> Result<(), InterpretError> {
        match action {
            TurtleAction::Forward(distance) => {
                let distance = distance.unwrap_or(turtle.step_length);
                let start = turtle.advance(distance);
                drawing.add_segment(start, turtle.position);
            }
            TurtleAction::Move(distance) => {
                let distance = distance.unwrap_or(turtle.step_length);
                turtle.advance(distance);
            }
            TurtleAction::Rotate(angle) => turtle.rotate(*angle),
            TurtleAction::TurnAround => turtle.rotate(PI),
            TurtleAction::Push => {
                if stack.len() >= self.config.max_stack_depth {
                    return Err(InterpretError::StackOverflow {
                        index,
                        symbol,
                        depth: self.config.max_stack_depth,
                    });
                }
                stack.push(turtle.snapshot());
            }
            TurtleAction::Pop => {
                let saved = stack
                    .pop()
                    .ok_or(InterpretError::StackUnderflow { index, symbol })?;
                turtle.restore(saved);
            }
            TurtleAction::Custom { name, params } => {
                let handler = self
                    .handlers
                    .get(name)
                    .ok_or_else(|| InterpretError::UnknownAction {
                        index,
                        name: name.clone(),
                    })?;
                let effect = handler(&*turtle, params.as_slice());
                turtle.position += effect.translate;
                turtle.rotate(effect.rotate);
                drawing.add_auxiliary(name, effect.geometry);
            }
            TurtleAction::Combine(actions) => {
                for action in actions {
                    self.apply(action, index, symbol, turtle, stack, drawing)?;
                }
            }
        }
        Ok(())
    }
}

/// Interprets `sequence` with `actions` from `initial`, without custom handlers.
///
/// The stack is unbounded here: any balanced bracket nesting is accepted, and
/// only an unmatched pop fails. Use [`TurtleInterpreter`] with a
/// [`TurtleConfig`] to cap the depth. Any [`TurtleAction::Custom`] binding
/// that is reached fails with [`InterpretError::UnknownAction`].
pub fn interpret(
    sequence: &[Symbol],
    actions: &ActionTable,
    initial: TurtleState,
) -> Result<Drawing, InterpretError> {
    let config = TurtleConfig {
        max_stack_depth: usize::MAX,
        ..Default::default()
    };
    TurtleInterpreter::new(config)
        .with_actions(actions.clone())
        .interpret_from(sequence, initial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols;

    #[test]
    fn pop_on_empty_stack_halts_at_offending_symbol() {
        let interpreter = TurtleInterpreter::new(TurtleConfig::default())
            .with_actions(ActionTable::standard(1.0));
        let err = interpreter.interpret(&symbols("F[F]]F")).unwrap_err();
        assert_eq!(
            err,
            InterpretError::StackUnderflow {
                index: 4,
                symbol: ']'
            }
        );
    }

    #[test]
    fn push_past_max_depth_is_an_error() {
        let config = TurtleConfig {
            max_stack_depth: 2,
            ..Default::default()
        };
        let interpreter = TurtleInterpreter::new(config).with_actions(ActionTable::standard(1.0));
        assert!(interpreter.interpret(&symbols("[[]]")).is_ok());
        assert!(matches!(
            interpreter.interpret(&symbols("[[[")),
            Err(InterpretError::StackOverflow { index: 2, depth: 2, .. })
        ));
    }

    #[test]
    fn custom_action_without_handler_is_an_error() {
        let actions = ActionTable::new().with('o', TurtleAction::custom("circle", [0.5]));
        let err = interpret(&symbols("Fo"), &actions, TurtleState::default()).unwrap_err();
        assert_eq!(
            err,
            InterpretError::UnknownAction {
                index: 1,
                name: "circle".to_string()
            }
        );
    }

    #[test]
    fn custom_effect_moves_turtle_without_drawing() {
        let interpreter = TurtleInterpreter::new(TurtleConfig::default())
            .with_actions(
                ActionTable::new().with('j', TurtleAction::custom("jump", Vec::new())),
            )
            .with_custom("jump", |_: &TurtleState, _: &[f32]| {
                CustomEffect::default()
                    .with_translation(Vec2::new(3.0, 0.0))
                    .with_rotation(1.0)
            });
        let drawing = interpreter.interpret(&symbols("jj")).unwrap();
        assert!(drawing.segments.is_empty());
        assert!(drawing.auxiliary.is_empty());
        assert_eq!(drawing.final_state.position, Vec2::new(6.0, 0.0));
        assert!((drawing.final_state.heading - (FRAC_PI_2 + 2.0)).abs() < 1e-6);
    }

    #[test]
    fn populate_keeps_unrelated_bindings() {
        let mut interpreter = TurtleInterpreter::new(TurtleConfig::default());
        interpreter.set_action('X', TurtleAction::forward_by(2.0));
        interpreter.set_action('+', TurtleAction::rotate(9.0));
        interpreter.populate_standard_symbols(0.25);
        assert_eq!(interpreter.actions().get('X'), Some(&TurtleAction::Forward(Some(2.0))));
        assert_eq!(interpreter.actions().get('+'), Some(&TurtleAction::Rotate(0.25)));
    }
}
