//! Core domain types: mesh positions, movement actions, and recommendations.
//!
//! A [`Position`] is both the spatial key into the sample store and the RL
//! state. An [`Action`] is a closed set of unit moves on the mesh grid; each
//! variant carries its coordinate delta as data, so the action set is a
//! single declarative list rather than scattered conditionals.

use ndarray::{array, Array1};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D integer coordinate on the signal mesh. Acts as both spatial key and
/// RL state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Return the position reached by applying `action`'s unit delta.
    /// `self` is unchanged.
    pub fn step(&self, action: Action) -> Position {
        let (dx, dy) = action.delta();
        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// State vector for the neural engine: `[x, y]` as f32.
    pub fn to_state(&self) -> Array1<f32> {
        array![self.x as f32, self.y as f32]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A unit move on the mesh grid. Positive y is north, positive x is east.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
}

impl Action {
    /// All actions in canonical order. Tie-breaking in greedy action
    /// selection follows this order.
    pub const ALL: [Action; 4] = [Action::Left, Action::Right, Action::Up, Action::Down];

    /// Coordinate delta `(dx, dy)` applied by this action.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
            Action::Up => (0, 1),
            Action::Down => (0, -1),
        }
    }

    /// Index of this action within [`Action::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Action::Left => 0,
            Action::Right => 1,
            Action::Up => 2,
            Action::Down => 3,
        }
    }

    /// Inverse of [`Action::index`]. Panics on an out-of-range index; the
    /// action set is closed, so a valid index always exists.
    pub fn from_index(index: usize) -> Action {
        Action::ALL[index]
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::Up => "up",
            Action::Down => "down",
        };
        write!(f, "{}", name)
    }
}

/// Movement recommendation returned by a policy engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommended_action: Action,
    pub next_position: Position,
    /// Human-readable movement hints, one per axis with a nonzero delta.
    pub directions: Vec<String>,
    pub predicted_upload_speed: f64,
    pub predicted_download_speed: f64,
}

/// Derive human-readable movement hints from a position change.
///
/// The y axis maps to north/south, the x axis to east/west; an axis with a
/// zero delta contributes no hint.
pub fn calculate_directions(current: Position, next: Position) -> Vec<String> {
    let delta_x = next.x - current.x;
    let delta_y = next.y - current.y;
    let mut directions = Vec::new();

    if delta_y > 0 {
        directions.push(format!("Move north by {} meter(s)", delta_y.abs()));
    } else if delta_y < 0 {
        directions.push(format!("Move south by {} meter(s)", delta_y.abs()));
    }

    if delta_x > 0 {
        directions.push(format!("Move east by {} meter(s)", delta_x.abs()));
    } else if delta_x < 0 {
        directions.push(format!("Move west by {} meter(s)", delta_x.abs()));
    }

    directions
}
