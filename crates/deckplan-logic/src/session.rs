//! Editing modes as one explicit state enum.
//!
//! ```text
//! Idle ──begin_placing──▶ Placing ──last unit / cancel──▶ Idle
//! Idle ──select──▶ Selected ──cancel / delete──▶ Idle
//! Selected ──begin_move──▶ Moving ──commit──▶ Idle
//!                                 └─reject──▶ Selected
//! Selected ──begin_resize──▶ Resizing ──commit / reject / cancel──▶ Selected
//! ```
//!
//! Each variant carries exactly the transient data its mode needs, so
//! "placing while resizing" cannot be represented.

use serde::{Deserialize, Serialize};

use crate::catalog::ComponentIndex;
use crate::floor::FloorIndex;
use crate::overlap::{Position, Rect};
use crate::resize::Edge;

/// Pointer location already converted to floor meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pointer {
    pub floor: FloorIndex,
    pub x: f64,
    pub y: f64,
}

impl Pointer {
    pub fn new(floor: FloorIndex, x: f64, y: f64) -> Self {
        Self { floor, x, y }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// Component being placed and the floors it may go on.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacingState {
    pub component: ComponentIndex,
    pub length: f64,
    pub width: f64,
    /// For multi-floor components every unit lands on all of these at once.
    /// Otherwise each click picks one of them.
    pub target_floors: Vec<FloorIndex>,
    pub is_multi_floor: bool,
}

/// Reference to one stored placement, by index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub component: ComponentIndex,
    pub floor: FloorIndex,
    pub placement_index: usize,
    pub length: f64,
    pub width: f64,
    pub original_x: f64,
    pub original_y: f64,
}

impl Selection {
    pub fn rect(&self) -> Rect {
        Rect::new(self.original_x, self.original_y, self.length, self.width)
    }
}

/// Selected placement being dragged to a new spot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveState {
    pub selection: Selection,
    /// Last previewed pointer, if the pointer has moved since the drag began.
    pub last_pointer: Option<Pointer>,
}

/// Edge drag in progress. Discarded on cancel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSession {
    pub edge: Edge,
    pub component: ComponentIndex,
    pub placement_index: usize,
    pub floor: FloorIndex,
    pub original_x: f64,
    pub original_y: f64,
    pub original_length: f64,
    pub original_width: f64,
    pub area: f64,
    pub start_pointer: Position,
    pub current_x: f64,
    pub current_y: f64,
    pub current_length: f64,
    pub current_width: f64,
}

impl ResizeSession {
    pub fn original_rect(&self) -> Rect {
        Rect::new(
            self.original_x,
            self.original_y,
            self.original_length,
            self.original_width,
        )
    }

    pub fn current_rect(&self) -> Rect {
        Rect::new(
            self.current_x,
            self.current_y,
            self.current_length,
            self.current_width,
        )
    }

    /// Drag distance along the axis the edge moves on.
    pub fn delta_for(&self, pointer: Position) -> f64 {
        if self.edge.is_horizontal_drag() {
            pointer.x - self.start_pointer.x
        } else {
            pointer.y - self.start_pointer.y
        }
    }
}

/// Exactly one editing mode at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Mode {
    #[default]
    Idle,
    Placing(PlacingState),
    Selected(Selection),
    Moving(MoveState),
    Resizing(ResizeSession),
}

/// Payload-free tag for [`Mode`], used in events and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeKind {
    Idle,
    Placing,
    Selected,
    Moving,
    Resizing,
}

impl Mode {
    pub fn kind(&self) -> ModeKind {
        match self {
            Mode::Idle => ModeKind::Idle,
            Mode::Placing(_) => ModeKind::Placing,
            Mode::Selected(_) => ModeKind::Selected,
            Mode::Moving(_) => ModeKind::Moving,
            Mode::Resizing(_) => ModeKind::Resizing,
        }
    }

    /// The selection this mode works on, if any.
    pub fn selection(&self) -> Option<&Selection> {
        match self {
            Mode::Selected(s) => Some(s),
            Mode::Moving(m) => Some(&m.selection),
            _ => None,
        }
    }
}

/// What the host should draw under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub floors: Vec<FloorIndex>,
    pub rect: Rect,
    /// Whether committing now would succeed.
    pub valid: bool,
}
