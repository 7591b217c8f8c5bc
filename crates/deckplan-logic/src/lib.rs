//! Pure layout logic for DeckPlan.
//!
//! This crate holds the placement engine of the deck layout editor: floor
//! sizing, component footprints, overlap resolution, area-preserving
//! resize and undo/redo. It has no rendering or I/O. The host converts
//! pointer input to floor meters, calls into [`editor::Editor`] and redraws
//! on the events it emits.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`advisor`] | Candidate `length × width` footprints for a given area |
//! | [`catalog`] | Component catalog (weight, cost, quantity, multi-floor flag) |
//! | [`constants`] | Minimum dimension, grid step, tolerances, floor defaults |
//! | [`editor`] | The editing session: modes, transitions, commits |
//! | [`error`] | Recoverable editing errors |
//! | [`events`] | Redraw, rejection and mode-change notifications |
//! | [`floor`] | Floor dimensions derived from ship parameters |
//! | [`history`] | Linear undo/redo of placement deltas |
//! | [`overlap`] | Rectangles and the overlap / validity predicates |
//! | [`resize`] | Edge-drag resize that keeps area constant |
//! | [`resolver`] | Nearest collision-free position search |
//! | [`session`] | Mode enum and per-mode transient state |
//! | [`store`] | Placements grouped by component, snapshots |
//! | [`validate`] | Whole-layout consistency checks |

pub mod advisor;
pub mod catalog;
pub mod constants;
pub mod editor;
pub mod error;
pub mod events;
pub mod floor;
pub mod history;
pub mod overlap;
pub mod resize;
pub mod resolver;
pub mod session;
pub mod store;
pub mod validate;
