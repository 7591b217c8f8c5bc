//! Recoverable editing errors.
//!
//! Nothing in the layout core is fatal. Every failing operation returns one
//! of these and leaves the editor exactly as it was.

use thiserror::Error;

use crate::catalog::ComponentIndex;
use crate::floor::FloorIndex;
use crate::session::ModeKind;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    /// The resolver exhausted its candidates.
    #[error("no valid position near the requested point")]
    NoValidPosition,
    /// The move, rotation or resize would overlap another placement.
    #[error("operation rejected: footprint overlaps an existing placement")]
    OverlapRejected,
    /// The rectangle cannot be fitted into the floor without breaking its area.
    #[error("operation rejected: footprint does not fit within the floor")]
    OutOfBounds,
    /// The operation needs an active selection and there is none.
    #[error("no placement is selected")]
    InvalidSelection,
    /// Zero, negative or non-finite geometry was passed in.
    #[error("degenerate geometry: {0}")]
    DegenerateInput(&'static str),
    #[error("component #{0} is not in the catalog")]
    UnknownComponent(ComponentIndex),
    #[error("component #{0} has no units left to place")]
    NothingToPlace(ComponentIndex),
    #[error("no target floors given")]
    NoTargetFloors,
    #[error("floor {0} is not a target of the current placement")]
    FloorNotTargeted(FloorIndex),
    #[error("floor {0} does not exist")]
    UnknownFloor(FloorIndex),
    #[error("expected {expected:?} mode, editor is in {found:?}")]
    WrongMode { expected: ModeKind, found: ModeKind },
    /// Selecting needs Idle or Selected; a placement, move or resize is in progress.
    #[error("cannot select while the editor is in {0:?} mode")]
    Busy(ModeKind),
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
}

impl EditError {
    /// Whether the host should show rejection feedback for this error.
    ///
    /// Selection and mode mismatches are silent no-ops.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            EditError::NoValidPosition | EditError::OverlapRejected | EditError::OutOfBounds
        )
    }
}
