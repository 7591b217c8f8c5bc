//! The layout editor: one owner for catalog, placements, history and mode.
//!
//! The host forwards pointer and keyboard intents to the transition
//! methods here and redraws when it hears [`EditorEvent::PlacementsChanged`].
//! Every method runs to completion; a failed operation returns an
//! [`EditError`] and leaves the editor as it was.
//!
//! ```
//! use deckplan_logic::catalog::{Catalog, ComponentRecord};
//! use deckplan_logic::editor::Editor;
//! use deckplan_logic::floor::ShipParameters;
//! use deckplan_logic::session::Pointer;
//!
//! let catalog = Catalog::from_records(vec![ComponentRecord {
//!     category: "Power".into(),
//!     name: "Reactor".into(),
//!     weight: 120.0,
//!     cost: 5_000.0,
//!     quantity: 1,
//!     spans_multiple_floors: false,
//! }]);
//! let mut editor = Editor::new(ShipParameters::default(), catalog);
//! editor.begin_placing(0, 6.0, 4.0, vec![1]).unwrap();
//! editor.place_at(Pointer::new(1, 10.0, 10.0)).unwrap();
//! assert_eq!(editor.store().count_of(0), 1);
//! ```

use crate::catalog::{Catalog, ComponentIndex};
use crate::constants::{snap_within, AREA_EPSILON};
use crate::error::EditError;
use crate::events::{EditorEvent, Listeners, Subscription};
use crate::floor::{FloorDimensions, FloorGeometry, FloorIndex};
use crate::history::{History, HistoryAction, HistoryEntry};
use crate::overlap::{colliding, is_valid, overlaps, Exclude, Position, Rect};
use crate::resize::{resize, Edge};
use crate::resolver::find_valid_position;
use crate::session::{
    Mode, ModeKind, MoveState, PlacingState, Pointer, Preview, ResizeSession, Selection,
};
use crate::store::{LayoutSnapshot, Placement, PlacementRecord, PlacementStore};
use crate::validate::{validate_layout, ValidationError};

/// Result of a successful placement click.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceOutcome {
    pub position: Position,
    pub floors: Vec<FloorIndex>,
    /// Units of the component still waiting to be placed.
    pub remaining: u32,
}

#[derive(Debug)]
pub struct Editor<G: FloorGeometry> {
    geometry: G,
    catalog: Catalog,
    store: PlacementStore,
    history: History,
    mode: Mode,
    listeners: Listeners,
}

impl<G: FloorGeometry> Editor<G> {
    pub fn new(geometry: G, catalog: Catalog) -> Self {
        Self {
            geometry,
            catalog,
            store: PlacementStore::new(),
            history: History::new(),
            mode: Mode::Idle,
            listeners: Listeners::new(),
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// Mutable access to the floor configuration.
    ///
    /// Changing floor count or ceiling height invalidates the layout; call
    /// [`Editor::reset_layout`] afterwards.
    pub fn geometry_mut(&mut self) -> &mut G {
        &mut self.geometry
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &PlacementStore {
        &self.store
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.mode.selection()
    }

    pub fn floor_dimensions(&self) -> FloorDimensions {
        self.geometry.floor_dimensions()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> Subscription
    where
        F: FnMut(&EditorEvent) + Send + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, handle: Subscription) -> bool {
        self.listeners.unsubscribe(handle)
    }

    /// Units of `component` currently on the floors.
    ///
    /// A multi-floor unit occupies one placement per floor, so its units are
    /// counted on the busiest floor.
    pub fn placed_units(&self, component: ComponentIndex) -> u32 {
        let spans = self
            .catalog
            .get(component)
            .is_some_and(|c| c.spans_multiple_floors);
        let placed = if spans {
            self.store.max_per_floor(component)
        } else {
            self.store.count_of(component)
        };
        placed as u32
    }

    pub fn remaining_units(&self, component: ComponentIndex) -> u32 {
        self.catalog
            .get(component)
            .map_or(0, |c| c.quantity.saturating_sub(self.placed_units(component)))
    }

    /// Check the whole layout against the current floor configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        validate_layout(
            &self.store,
            &self.catalog,
            &self.geometry.floor_dimensions(),
            self.geometry.floor_count(),
        )
    }

    // ── Whole-layout operations ─────────────────────────────────────────

    /// Drop every placement, the history and any transient mode.
    pub fn reset_layout(&mut self) {
        let floors = self.store.floors();
        self.store.clear();
        self.history.clear();
        self.set_mode(Mode::Idle);
        log::info!("layout reset ({} floors cleared)", floors.len());
        for floor in floors {
            self.changed(floor);
        }
    }

    /// Replace the catalog. Indices change meaning, so the layout goes too.
    pub fn load_catalog(&mut self, catalog: Catalog) {
        log::info!("catalog loaded: {} components", catalog.len());
        self.catalog = catalog;
        self.reset_layout();
    }

    pub fn snapshot(&self) -> LayoutSnapshot {
        self.store.snapshot()
    }

    /// Restore a host-held snapshot. History is cleared.
    pub fn restore(&mut self, snapshot: &LayoutSnapshot) {
        let mut floors = self.store.floors();
        self.store = PlacementStore::from_snapshot(snapshot);
        self.history.clear();
        self.set_mode(Mode::Idle);
        floors.extend(self.store.floors());
        floors.sort_unstable();
        floors.dedup();
        for floor in floors {
            self.changed(floor);
        }
    }

    // ── Placing ─────────────────────────────────────────────────────────

    /// Arm placement of `component` with a `length × width` footprint.
    pub fn begin_placing(
        &mut self,
        component: ComponentIndex,
        length: f64,
        width: f64,
        target_floors: Vec<FloorIndex>,
    ) -> Result<(), EditError> {
        let entry = self
            .catalog
            .get(component)
            .ok_or(EditError::UnknownComponent(component))?;
        let is_multi_floor = entry.spans_multiple_floors;
        if !(length > 0.0 && width > 0.0 && length.is_finite() && width.is_finite()) {
            return Err(EditError::DegenerateInput("footprint must be positive and finite"));
        }
        if self.remaining_units(component) == 0 {
            return Err(EditError::NothingToPlace(component));
        }
        let mut target_floors = target_floors;
        target_floors.sort_unstable();
        target_floors.dedup();
        if target_floors.is_empty() {
            return Err(EditError::NoTargetFloors);
        }
        if let Some(&bad) = target_floors.iter().find(|f| !self.geometry.has_floor(**f)) {
            return Err(EditError::UnknownFloor(bad));
        }

        log::debug!(
            "placing component #{} {}x{} on floors {:?}",
            component,
            length,
            width,
            target_floors
        );
        self.set_mode(Mode::Placing(PlacingState {
            component,
            length,
            width,
            target_floors,
            is_multi_floor,
        }));
        Ok(())
    }

    /// Try to place one unit at the pointer.
    ///
    /// The footprint is centered on the pointer, snapped flush to a floor
    /// edge when the pointer is that close to it, and then moved to the
    /// nearest free spot. Multi-floor units must fit at the same spot on
    /// every target floor or nothing is placed.
    pub fn place_at(&mut self, pointer: Pointer) -> Result<PlaceOutcome, EditError> {
        let state = match &self.mode {
            Mode::Placing(state) => state.clone(),
            other => {
                return Err(EditError::WrongMode {
                    expected: ModeKind::Placing,
                    found: other.kind(),
                })
            }
        };
        if !self.geometry.has_floor(pointer.floor) {
            return Err(EditError::UnknownFloor(pointer.floor));
        }
        if !state.target_floors.contains(&pointer.floor) {
            return Err(EditError::FloorNotTargeted(pointer.floor));
        }
        if self.remaining_units(state.component) == 0 {
            return Err(EditError::NothingToPlace(state.component));
        }

        let dims = self.geometry.floor_dimensions();
        let candidate = placement_candidate(pointer, state.length, state.width, &dims);
        let position = match find_valid_position(
            &self.store,
            pointer.floor,
            candidate,
            state.length,
            state.width,
            &dims,
            Exclude::Nothing,
        ) {
            Ok(position) => position,
            Err(err) => return Err(self.reject(pointer.floor, err)),
        };

        let floors = if state.is_multi_floor {
            state.target_floors.clone()
        } else {
            vec![pointer.floor]
        };
        let rect = Rect::at(position, state.length, state.width);

        // Validate everywhere before touching anything
        if let Some(&blocked) = floors
            .iter()
            .find(|f| !is_valid(&self.store, **f, &rect, &dims, Exclude::Nothing))
        {
            return Err(self.reject(blocked, EditError::OverlapRejected));
        }

        let mut entries = Vec::with_capacity(floors.len());
        for &floor in &floors {
            let placement = Placement::from_rect(floor, rect);
            self.store.push(state.component, placement);
            entries.push(PlacementRecord::new(state.component, &placement));
        }
        self.history.record(HistoryAction::Placed(entries));

        let remaining = self.remaining_units(state.component);
        log::info!(
            "placed component #{} at ({},{}) on floors {:?}, {} left",
            state.component,
            position.x,
            position.y,
            floors,
            remaining
        );
        for &floor in &floors {
            self.changed(floor);
        }
        if remaining == 0 {
            self.set_mode(Mode::Idle);
        }

        Ok(PlaceOutcome {
            position,
            floors,
            remaining,
        })
    }

    // ── Selection ───────────────────────────────────────────────────────

    /// Select whatever lies under the pointer. Empty space deselects.
    pub fn select_at(&mut self, pointer: Pointer) -> Result<Option<Selection>, EditError> {
        self.require_idle_or_selected()?;
        let hit = self
            .store
            .on_floor(pointer.floor)
            .find(|(_, _, p)| p.rect().contains_point(pointer.x, pointer.y))
            .map(|(component, i, _)| (component, i));
        match hit {
            Some((component, i)) => self.select(component, i).map(Some),
            None => {
                self.set_mode(Mode::Idle);
                Ok(None)
            }
        }
    }

    /// Select one placement directly.
    pub fn select(
        &mut self,
        component: ComponentIndex,
        placement_index: usize,
    ) -> Result<Selection, EditError> {
        self.require_idle_or_selected()?;
        let selection = self
            .selection_for(component, placement_index)
            .ok_or(EditError::InvalidSelection)?;
        self.set_mode(Mode::Selected(selection));
        Ok(selection)
    }

    pub fn deselect(&mut self) {
        if matches!(self.mode, Mode::Selected(_)) {
            self.set_mode(Mode::Idle);
        }
    }

    // ── Moving ──────────────────────────────────────────────────────────

    pub fn begin_move(&mut self) -> Result<(), EditError> {
        let selection = self.require_selected()?;
        self.set_mode(Mode::Moving(MoveState {
            selection,
            last_pointer: None,
        }));
        Ok(())
    }

    /// Track the pointer during a move and report whether dropping here works.
    pub fn move_preview(&mut self, pointer: Pointer) -> Result<Preview, EditError> {
        let state = match &mut self.mode {
            Mode::Moving(state) => state,
            other => {
                return Err(EditError::WrongMode {
                    expected: ModeKind::Moving,
                    found: other.kind(),
                })
            }
        };
        state.last_pointer = Some(pointer);
        let selection = state.selection;
        self.move_target(&selection, pointer).map(|(rect, valid)| Preview {
            floors: vec![pointer.floor],
            rect,
            valid,
        })
    }

    /// Drop the moved placement at the pointer.
    ///
    /// No search: an overlapping drop is rejected, not resolved. On success
    /// the placement goes to the end of its component's list and the
    /// selection clears.
    pub fn commit_move(&mut self, pointer: Pointer) -> Result<Placement, EditError> {
        let selection = match &self.mode {
            Mode::Moving(state) => state.selection,
            other => {
                return Err(EditError::WrongMode {
                    expected: ModeKind::Moving,
                    found: other.kind(),
                })
            }
        };
        let (rect, valid) = match self.move_target(&selection, pointer) {
            Ok(target) => target,
            Err(err) => {
                self.set_mode(Mode::Selected(selection));
                return Err(err);
            }
        };
        if !valid {
            log::debug!(
                "move of component #{} blocked by {:?}",
                selection.component,
                colliding(
                    &self.store,
                    pointer.floor,
                    &rect,
                    Exclude::Placement(selection.component, selection.placement_index),
                )
            );
            self.set_mode(Mode::Selected(selection));
            return Err(self.reject(pointer.floor, EditError::OverlapRejected));
        }

        let old = self
            .store
            .remove_at(selection.component, selection.placement_index)
            .ok_or(EditError::InvalidSelection)?;
        let moved = Placement::from_rect(pointer.floor, rect);
        self.store.push(selection.component, moved);
        self.history.record(HistoryAction::Replaced {
            before: PlacementRecord::new(selection.component, &old),
            after: PlacementRecord::new(selection.component, &moved),
        });

        log::info!(
            "moved component #{} from floor {} ({},{}) to floor {} ({},{})",
            selection.component,
            old.floor,
            old.x,
            old.y,
            moved.floor,
            moved.x,
            moved.y
        );
        self.set_mode(Mode::Idle);
        self.changed(old.floor);
        if moved.floor != old.floor {
            self.changed(moved.floor);
        }
        Ok(moved)
    }

    // ── Rotate & delete ─────────────────────────────────────────────────

    /// Swap length and width of the selected placement.
    ///
    /// The top-left corner is clamped so the rotated footprint stays on the
    /// floor; the resolver is not consulted.
    pub fn rotate(&mut self) -> Result<Rect, EditError> {
        let selection = self.require_selected()?;
        let current = self
            .store
            .get(selection.component, selection.placement_index)
            .copied()
            .ok_or(EditError::InvalidSelection)?;
        let dims = self.geometry.floor_dimensions();

        let mut rotated = current.rect().rotated();
        if rotated.length > dims.length + AREA_EPSILON || rotated.width > dims.width + AREA_EPSILON
        {
            return Err(self.reject(current.floor, EditError::OutOfBounds));
        }
        rotated.x = rotated.x.min(dims.length - rotated.length).max(0.0);
        rotated.y = rotated.y.min(dims.width - rotated.width).max(0.0);

        let exclude = Exclude::Placement(selection.component, selection.placement_index);
        if overlaps(&self.store, current.floor, &rotated, exclude) {
            return Err(self.reject(current.floor, EditError::OverlapRejected));
        }

        let after = Placement::from_rect(current.floor, rotated);
        self.commit_replacement(&selection, current, after);
        log::info!(
            "rotated component #{} to {}x{}",
            selection.component,
            rotated.length,
            rotated.width
        );
        Ok(rotated)
    }

    pub fn delete_selected(&mut self) -> Result<HistoryEntry, EditError> {
        let selection = self.require_selected()?;
        let removed = self
            .store
            .remove_at(selection.component, selection.placement_index)
            .ok_or(EditError::InvalidSelection)?;
        let entry = PlacementRecord::new(selection.component, &removed);
        self.history.record(HistoryAction::Removed(vec![entry]));
        log::info!(
            "deleted component #{} from floor {} ({},{})",
            selection.component,
            removed.floor,
            removed.x,
            removed.y
        );
        self.set_mode(Mode::Idle);
        self.changed(removed.floor);
        Ok(entry)
    }

    // ── Resizing ────────────────────────────────────────────────────────

    /// Start dragging `edge` of the selected placement.
    pub fn begin_resize(&mut self, edge: Edge, pointer: Pointer) -> Result<(), EditError> {
        let selection = self.require_selected()?;
        let current = self
            .store
            .get(selection.component, selection.placement_index)
            .copied()
            .ok_or(EditError::InvalidSelection)?;
        let session = ResizeSession {
            edge,
            component: selection.component,
            placement_index: selection.placement_index,
            floor: current.floor,
            original_x: current.x,
            original_y: current.y,
            original_length: current.length,
            original_width: current.width,
            area: current.length * current.width,
            start_pointer: pointer.position(),
            current_x: current.x,
            current_y: current.y,
            current_length: current.length,
            current_width: current.width,
        };
        log::debug!(
            "resize {:?} of component #{} (area {})",
            edge,
            selection.component,
            session.area
        );
        self.set_mode(Mode::Resizing(session));
        Ok(())
    }

    /// Update the live resize from the pointer.
    ///
    /// A drag that cannot be fitted keeps the last good rectangle and is
    /// reported as invalid.
    pub fn resize_preview(&mut self, pointer: Pointer) -> Result<Preview, EditError> {
        let session = match &self.mode {
            Mode::Resizing(session) => *session,
            other => {
                return Err(EditError::WrongMode {
                    expected: ModeKind::Resizing,
                    found: other.kind(),
                })
            }
        };
        let dims = self.geometry.floor_dimensions();
        let (rect, valid) = self.resize_target(&session, pointer.position(), &dims)?;
        if let Mode::Resizing(live) = &mut self.mode {
            live.current_x = rect.x;
            live.current_y = rect.y;
            live.current_length = rect.length;
            live.current_width = rect.width;
        }
        Ok(Preview {
            floors: vec![session.floor],
            rect,
            valid,
        })
    }

    /// Commit the live resize. Either way the placement stays selected.
    pub fn commit_resize(&mut self) -> Result<Rect, EditError> {
        let session = match &self.mode {
            Mode::Resizing(session) => *session,
            other => {
                return Err(EditError::WrongMode {
                    expected: ModeKind::Resizing,
                    found: other.kind(),
                })
            }
        };
        let original_selection = selection_from_session(&session);
        let current = session.current_rect();
        if current == session.original_rect() {
            self.set_mode(Mode::Selected(original_selection));
            return Ok(current);
        }

        let dims = self.geometry.floor_dimensions();
        let area_kept =
            (current.area() - session.area).abs() < AREA_EPSILON * session.area.max(1.0);
        if !current.fits_within(&dims) || !area_kept {
            self.set_mode(Mode::Selected(original_selection));
            return Err(self.reject(session.floor, EditError::OutOfBounds));
        }
        let exclude = Exclude::Placement(session.component, session.placement_index);
        if overlaps(&self.store, session.floor, &current, exclude) {
            self.set_mode(Mode::Selected(original_selection));
            return Err(self.reject(session.floor, EditError::OverlapRejected));
        }

        let before = Placement::from_rect(session.floor, session.original_rect());
        let after = Placement::from_rect(session.floor, current);
        self.commit_replacement(&original_selection, before, after);
        log::info!(
            "resized component #{} to {:.2}x{:.2}",
            session.component,
            current.length,
            current.width
        );
        Ok(current)
    }

    // ── Cancel ──────────────────────────────────────────────────────────

    /// Escape. Discards uncommitted state; committed units stay.
    pub fn cancel(&mut self) {
        let next = match &self.mode {
            Mode::Resizing(session) => Mode::Selected(selection_from_session(session)),
            _ => Mode::Idle,
        };
        self.set_mode(next);
    }

    // ── Undo / redo ─────────────────────────────────────────────────────

    /// Reverse the most recent action.
    ///
    /// Undoing a placement puts the editor straight back into placing that
    /// component so the user can site it again.
    pub fn undo(&mut self) -> Result<HistoryAction, EditError> {
        let action = self.history.pop_undo().ok_or(EditError::NothingToUndo)?;
        if !action.inverse().apply(&mut self.store) {
            log::warn!("undo target no longer matches the layout, dropping {:?}", action);
            return Err(EditError::NothingToUndo);
        }
        self.history.push_redo(action.clone());
        log::info!("undo {:?}", action);

        let next = match &action {
            HistoryAction::Placed(entries) => self.replacing_mode(entries),
            _ => Mode::Idle,
        };
        self.set_mode(next);
        for floor in action.floors() {
            self.changed(floor);
        }
        Ok(action)
    }

    /// Re-apply the most recently undone action.
    pub fn redo(&mut self) -> Result<HistoryAction, EditError> {
        let action = self.history.pop_redo().ok_or(EditError::NothingToRedo)?;
        if !action.apply(&mut self.store) {
            log::warn!("redo target no longer matches the layout, dropping {:?}", action);
            return Err(EditError::NothingToRedo);
        }
        self.history.push_undo(action.clone());
        log::info!("redo {:?}", action);
        self.set_mode(Mode::Idle);
        for floor in action.floors() {
            self.changed(floor);
        }
        Ok(action)
    }

    // ── Preview ─────────────────────────────────────────────────────────

    /// What committing at `pointer` would produce, without changing anything.
    pub fn preview(&self, pointer: Pointer) -> Option<Preview> {
        let dims = self.geometry.floor_dimensions();
        match &self.mode {
            Mode::Placing(state) => {
                if !state.target_floors.contains(&pointer.floor) {
                    return None;
                }
                let candidate = placement_candidate(pointer, state.length, state.width, &dims);
                let floors = if state.is_multi_floor {
                    state.target_floors.clone()
                } else {
                    vec![pointer.floor]
                };
                match find_valid_position(
                    &self.store,
                    pointer.floor,
                    candidate,
                    state.length,
                    state.width,
                    &dims,
                    Exclude::Nothing,
                ) {
                    Ok(position) => {
                        let rect = Rect::at(position, state.length, state.width);
                        let valid = floors
                            .iter()
                            .all(|f| is_valid(&self.store, *f, &rect, &dims, Exclude::Nothing));
                        Some(Preview {
                            floors,
                            rect,
                            valid,
                        })
                    }
                    Err(_) => Some(Preview {
                        floors,
                        rect: Rect::at(candidate, state.length, state.width),
                        valid: false,
                    }),
                }
            }
            Mode::Moving(state) => {
                self.move_target(&state.selection, pointer)
                    .ok()
                    .map(|(rect, valid)| Preview {
                        floors: vec![pointer.floor],
                        rect,
                        valid,
                    })
            }
            Mode::Resizing(session) => self
                .resize_target(session, pointer.position(), &dims)
                .ok()
                .map(|(rect, valid)| Preview {
                    floors: vec![session.floor],
                    rect,
                    valid,
                }),
            Mode::Idle | Mode::Selected(_) => None,
        }
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn set_mode(&mut self, mode: Mode) {
        let old = self.mode.kind();
        self.mode = mode;
        let new = self.mode.kind();
        if old != new {
            log::debug!("mode {:?} -> {:?}", old, new);
            self.listeners.emit(EditorEvent::ModeChanged { mode: new });
        }
    }

    fn changed(&mut self, floor: FloorIndex) {
        self.listeners.emit(EditorEvent::PlacementsChanged { floor });
    }

    /// Fire the rejection signal for `floor` and hand the error back.
    fn reject(&mut self, floor: FloorIndex, err: EditError) -> EditError {
        log::warn!("rejected on floor {}: {}", floor, err);
        self.listeners.emit(EditorEvent::InvalidOperation { floor });
        err
    }

    fn require_selected(&self) -> Result<Selection, EditError> {
        match &self.mode {
            Mode::Selected(selection) => Ok(*selection),
            Mode::Idle => Err(EditError::InvalidSelection),
            other => Err(EditError::WrongMode {
                expected: ModeKind::Selected,
                found: other.kind(),
            }),
        }
    }

    fn require_idle_or_selected(&self) -> Result<(), EditError> {
        match &self.mode {
            Mode::Idle | Mode::Selected(_) => Ok(()),
            other => Err(EditError::Busy(other.kind())),
        }
    }

    fn selection_for(
        &self,
        component: ComponentIndex,
        placement_index: usize,
    ) -> Option<Selection> {
        self.store
            .get(component, placement_index)
            .map(|p| Selection {
                component,
                floor: p.floor,
                placement_index,
                length: p.length,
                width: p.width,
                original_x: p.x,
                original_y: p.y,
            })
    }

    /// Overwrite a placement in place, record it and keep it selected.
    fn commit_replacement(&mut self, selection: &Selection, before: Placement, after: Placement) {
        self.store
            .replace(selection.component, selection.placement_index, after);
        self.history.record(HistoryAction::Replaced {
            before: PlacementRecord::new(selection.component, &before),
            after: PlacementRecord::new(selection.component, &after),
        });
        let updated = Selection {
            length: after.length,
            width: after.width,
            original_x: after.x,
            original_y: after.y,
            ..*selection
        };
        self.set_mode(Mode::Selected(updated));
        self.changed(after.floor);
    }

    /// Pointer-centered drop target for a move, plus whether it is legal.
    fn move_target(
        &self,
        selection: &Selection,
        pointer: Pointer,
    ) -> Result<(Rect, bool), EditError> {
        if !self.geometry.has_floor(pointer.floor) {
            return Err(EditError::UnknownFloor(pointer.floor));
        }
        let spans = self
            .catalog
            .get(selection.component)
            .is_some_and(|c| c.spans_multiple_floors);
        if spans && pointer.floor != selection.floor {
            return Err(EditError::FloorNotTargeted(pointer.floor));
        }
        let dims = self.geometry.floor_dimensions();
        let position = Position::new(
            snap_within(pointer.x - selection.length / 2.0, dims.length - selection.length),
            snap_within(pointer.y - selection.width / 2.0, dims.width - selection.width),
        );
        let rect = Rect::at(position, selection.length, selection.width);
        let exclude = Exclude::Placement(selection.component, selection.placement_index);
        let valid = is_valid(&self.store, pointer.floor, &rect, &dims, exclude);
        Ok((rect, valid))
    }

    /// Rectangle for a resize drag to `pointer`, plus whether committing it is legal.
    fn resize_target(
        &self,
        session: &ResizeSession,
        pointer: Position,
        dims: &FloorDimensions,
    ) -> Result<(Rect, bool), EditError> {
        let delta = session.delta_for(pointer);
        match resize(session.edge, delta, &session.original_rect(), session.area, dims) {
            Ok(rect) => {
                let exclude = Exclude::Placement(session.component, session.placement_index);
                let valid = !overlaps(&self.store, session.floor, &rect, exclude);
                Ok((rect, valid))
            }
            Err(EditError::OutOfBounds) => Ok((session.current_rect(), false)),
            Err(err) => Err(err),
        }
    }

    /// Placing mode for re-siting units just removed by undo.
    fn replacing_mode(&self, entries: &[HistoryEntry]) -> Mode {
        let Some(first) = entries.first() else {
            return Mode::Idle;
        };
        let Some(entry) = self.catalog.get(first.component) else {
            return Mode::Idle;
        };
        let target_floors = if entry.spans_multiple_floors {
            let mut floors: Vec<FloorIndex> = entries.iter().map(|e| e.floor).collect();
            floors.sort_unstable();
            floors.dedup();
            floors
        } else {
            (1..=self.geometry.floor_count()).collect()
        };
        Mode::Placing(PlacingState {
            component: first.component,
            length: first.length,
            width: first.width,
            target_floors,
            is_multi_floor: entry.spans_multiple_floors,
        })
    }
}

/// Top-left corner for a placement click.
///
/// Centered on the pointer, except within one footprint of an edge where
/// the footprint snaps flush to that edge. Grid-snapped and clamped.
fn placement_candidate(
    pointer: Pointer,
    length: f64,
    width: f64,
    dims: &FloorDimensions,
) -> Position {
    fn axis(pointer: f64, extent: f64, limit: f64) -> f64 {
        if pointer < extent {
            0.0
        } else if pointer > limit - extent {
            limit - extent
        } else {
            pointer - extent / 2.0
        }
    }
    Position::new(
        snap_within(axis(pointer.x, length, dims.length), dims.length - length),
        snap_within(axis(pointer.y, width, dims.width), dims.width - width),
    )
}

fn selection_from_session(session: &ResizeSession) -> Selection {
    Selection {
        component: session.component,
        floor: session.floor,
        placement_index: session.placement_index,
        length: session.original_length,
        width: session.original_width,
        original_x: session.original_x,
        original_y: session.original_y,
    }
}
