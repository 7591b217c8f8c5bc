//! Property-based tests for the layout invariants.
//!
//! 1. **Resolver soundness**: any position the resolver returns is inside
//!    the floor and collides with nothing.
//!
//! 2. **Resolver idempotence**: two calls with identical arguments on an
//!    unchanged store agree, and resolving a position the resolver already
//!    returned gives the same position back.
//!
//! 3. **Area preservation**: every successful resize keeps `length * width`
//!    equal to the captured area and stays inside the floor.
//!
//! 4. **Sessions never commit an illegal layout**: after any sequence of
//!    editor operations the layout validates cleanly.
//!
//! 5. **Undo drains to empty**: undoing every recorded action leaves no
//!    placements behind.

use deckplan_logic::catalog::{Catalog, ComponentRecord};
use deckplan_logic::editor::Editor;
use deckplan_logic::error::EditError;
use deckplan_logic::floor::{FloorDimensions, FloorGeometry};
use deckplan_logic::overlap::{is_valid, Exclude, Position, Rect};
use deckplan_logic::resize::{resize, Edge};
use deckplan_logic::resolver::find_valid_position;
use deckplan_logic::session::Pointer;
use deckplan_logic::store::{Placement, PlacementStore};
use proptest::prelude::*;

// ── Fixtures ────────────────────────────────────────────────────────────

const FLOOR: FloorDimensions = FloorDimensions {
    length: 30.0,
    width: 20.0,
    area: 600.0,
};

#[derive(Debug, Clone)]
struct Deck;

impl FloorGeometry for Deck {
    fn floor_dimensions(&self) -> FloorDimensions {
        FLOOR
    }

    fn floor_count(&self) -> u32 {
        2
    }
}

/// Footprints used when arming each catalog entry.
const FOOTPRINTS: [(f64, f64); 3] = [(3.0, 2.0), (2.0, 2.0), (5.0, 3.0)];

fn catalog() -> Catalog {
    let entry = |name: &str, quantity, spans_multiple_floors| ComponentRecord {
        category: "Test".to_string(),
        name: name.to_string(),
        weight: 5.0,
        cost: 10.0,
        quantity,
        spans_multiple_floors,
    };
    Catalog::from_records(vec![
        entry("Bunk", 6, false),
        entry("Lift", 2, true),
        entry("Tank", 3, false),
    ])
}

/// Obstacles laid down through the resolver itself, so they never overlap.
fn obstacle_store(seeds: &[(f64, f64, f64, f64)]) -> PlacementStore {
    let mut store = PlacementStore::new();
    for &(x, y, l, w) in seeds {
        if let Ok(p) = find_valid_position(
            &store,
            1,
            Position::new(x, y),
            l,
            w,
            &FLOOR,
            Exclude::Nothing,
        ) {
            store.push(0, Placement::new(1, p.x, p.y, l, w));
        }
    }
    store
}

fn obstacles() -> impl Strategy<Value = Vec<(f64, f64, f64, f64)>> {
    prop::collection::vec((0.0..30.0f64, 0.0..20.0f64, 1.0..8.0f64, 1.0..8.0f64), 0..12)
}

/// Resolve an `l × w` footprint at `(x, y)` on floor 1 with nothing excluded.
fn resolve_on_1(
    store: &PlacementStore,
    x: f64,
    y: f64,
    l: f64,
    w: f64,
) -> Result<Position, EditError> {
    find_valid_position(store, 1, Position::new(x, y), l, w, &FLOOR, Exclude::Nothing)
}

/// A rectangle that fits on [`FLOOR`].
fn fitted_rect() -> impl Strategy<Value = Rect> {
    (1.0..12.0f64, 1.0..12.0f64, 0.0..1.0f64, 0.0..1.0f64).prop_map(|(l, w, fx, fy)| {
        Rect::new(fx * (FLOOR.length - l), fy * (FLOOR.width - w), l, w)
    })
}

fn edge() -> impl Strategy<Value = Edge> {
    prop_oneof![
        Just(Edge::Top),
        Just(Edge::Bottom),
        Just(Edge::Left),
        Just(Edge::Right),
    ]
}

#[derive(Debug, Clone)]
enum Op {
    Arm(usize),
    Place(u32, f64, f64),
    SelectAt(u32, f64, f64),
    Move(u32, f64, f64),
    Rotate,
    Delete,
    Resize(Edge, f64),
    Cancel,
    Undo,
    Redo,
}

fn op() -> impl Strategy<Value = Op> {
    let floor = 1u32..=2;
    prop_oneof![
        (0usize..3).prop_map(Op::Arm),
        (floor.clone(), 0.0..30.0f64, 0.0..20.0f64).prop_map(|(f, x, y)| Op::Place(f, x, y)),
        (floor.clone(), 0.0..30.0f64, 0.0..20.0f64).prop_map(|(f, x, y)| Op::SelectAt(f, x, y)),
        (floor, 0.0..30.0f64, 0.0..20.0f64).prop_map(|(f, x, y)| Op::Move(f, x, y)),
        Just(Op::Rotate),
        Just(Op::Delete),
        (edge(), -15.0..15.0f64).prop_map(|(e, d)| Op::Resize(e, d)),
        Just(Op::Cancel),
        Just(Op::Undo),
        Just(Op::Redo),
    ]
}

fn run(editor: &mut Editor<Deck>, op: &Op) {
    // Failures are expected; only the resulting layout matters.
    match *op {
        Op::Arm(component) => {
            let (l, w) = FOOTPRINTS[component];
            let _ = editor.begin_placing(component, l, w, vec![1, 2]);
        }
        Op::Place(floor, x, y) => {
            let _ = editor.place_at(Pointer::new(floor, x, y));
        }
        Op::SelectAt(floor, x, y) => {
            let _ = editor.select_at(Pointer::new(floor, x, y));
        }
        Op::Move(floor, x, y) => {
            if editor.begin_move().is_ok() {
                let pointer = Pointer::new(floor, x, y);
                let _ = editor.move_preview(pointer);
                if editor.commit_move(pointer).is_err() {
                    editor.cancel();
                }
            }
        }
        Op::Rotate => {
            let _ = editor.rotate();
        }
        Op::Delete => {
            let _ = editor.delete_selected();
        }
        Op::Resize(edge, delta) => {
            let floor = editor.selection().map_or(1, |s| s.floor);
            if editor.begin_resize(edge, Pointer::new(floor, 0.0, 0.0)).is_ok() {
                let _ = editor.resize_preview(Pointer::new(floor, delta, delta));
                let _ = editor.commit_resize();
            }
        }
        Op::Cancel => editor.cancel(),
        Op::Undo => {
            let _ = editor.undo();
        }
        Op::Redo => {
            let _ = editor.redo();
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1-2. Resolver
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resolved_position_is_valid(
        seeds in obstacles(),
        x in -5.0..35.0f64,
        y in -5.0..25.0f64,
        l in 1.0..10.0f64,
        w in 1.0..10.0f64,
    ) {
        let store = obstacle_store(&seeds);
        if let Ok(p) = resolve_on_1(&store, x, y, l, w) {
            let rect = Rect::at(p, l, w);
            prop_assert!(
                is_valid(&store, 1, &rect, &FLOOR, Exclude::Nothing),
                "resolver returned invalid {:?} for desired ({}, {})", rect, x, y
            );
        }
    }

    #[test]
    fn same_request_gives_same_answer(
        seeds in obstacles(),
        x in -5.0..35.0f64,
        y in -5.0..25.0f64,
        l in 1.0..10.0f64,
        w in 1.0..10.0f64,
    ) {
        let store = obstacle_store(&seeds);
        let first = resolve_on_1(&store, x, y, l, w);
        let second = resolve_on_1(&store, x, y, l, w);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn resolved_position_is_a_fixpoint(
        seeds in obstacles(),
        x in 0.0..30.0f64,
        y in 0.0..20.0f64,
        l in 1.0..10.0f64,
        w in 1.0..10.0f64,
    ) {
        let store = obstacle_store(&seeds);
        if let Ok(first) = resolve_on_1(&store, x, y, l, w) {
            let second = resolve_on_1(&store, first.x, first.y, l, w);
            prop_assert_eq!(second, Ok(first));
        }
    }

    #[test]
    fn other_floors_do_not_block(
        seeds in obstacles(),
        x in 0.0..25.0f64,
        y in 0.0..15.0f64,
    ) {
        let store = obstacle_store(&seeds);
        let desired = Position::new(x, y);
        let found = find_valid_position(&store, 2, desired, 5.0, 5.0, &FLOOR, Exclude::Nothing);
        prop_assert_eq!(found, Ok(desired));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Area preservation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resize_keeps_area_and_bounds(
        original in fitted_rect(),
        edge in edge(),
        delta in -40.0..40.0f64,
    ) {
        let area = original.area();
        if let Ok(r) = resize(edge, delta, &original, area, &FLOOR) {
            prop_assert!(
                (r.area() - area).abs() < 1e-6 * area.max(1.0),
                "area drifted from {} to {} ({:?} by {})", area, r.area(), edge, delta
            );
            prop_assert!(r.fits_within(&FLOOR), "{:?} leaves the floor", r);
            prop_assert!(r.length >= 1.0 - 1e-9 && r.width >= 1.0 - 1e-9);
        }
    }

    #[test]
    fn zero_drag_is_identity(original in fitted_rect(), edge in edge()) {
        let r = resize(edge, 0.0, &original, original.area(), &FLOOR).unwrap();
        prop_assert!((r.length - original.length).abs() < 1e-9);
        prop_assert!((r.width - original.width).abs() < 1e-9);
        prop_assert!((r.x - original.x).abs() < 1e-9);
        prop_assert!((r.y - original.y).abs() < 1e-9);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4-5. Editing sessions
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn sessions_never_commit_illegal_layouts(ops in prop::collection::vec(op(), 1..60)) {
        let mut editor = Editor::new(Deck, catalog());
        for (step, op) in ops.iter().enumerate() {
            run(&mut editor, op);
            let errors = editor.validate();
            prop_assert!(
                errors.is_empty(),
                "step {} ({:?}) left an invalid layout: {:?}", step, op, errors
            );
        }
    }

    #[test]
    fn undo_drains_to_empty(ops in prop::collection::vec(op(), 1..60)) {
        let mut editor = Editor::new(Deck, catalog());
        for op in &ops {
            run(&mut editor, op);
        }
        while editor.history().can_undo() {
            prop_assert!(editor.undo().is_ok());
        }
        prop_assert!(editor.store().is_empty(), "left behind: {:?}", editor.store());
    }
}
