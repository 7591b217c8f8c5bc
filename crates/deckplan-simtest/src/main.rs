//! DeckPlan Headless Editing Harness
//!
//! Drives the layout editor through scripted and randomized sessions and
//! validates the layout after every step. Runs entirely in-process with
//! no rendering or input devices.
//!
//! Usage:
//!   cargo run -p deckplan-simtest
//!   cargo run -p deckplan-simtest -- --verbose
//!   cargo run -p deckplan-simtest -- --seed 7

use deckplan_logic::advisor::{DimensionAdvisor, FactorPairAdvisor};
use deckplan_logic::catalog::{Catalog, ComponentRecord};
use deckplan_logic::editor::Editor;
use deckplan_logic::floor::{validate_parameters, FloorGeometry, ShipParameters};
use deckplan_logic::resize::Edge;
use deckplan_logic::session::Pointer;
use deckplan_logic::store::LayoutSnapshot;
use log::{LevelFilter, Metadata, Record};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ── Sample catalog (same shape the host parser produces) ────────────────
const CATALOG_JSON: &str = include_str!("../../../data/sample_catalog.json");

const STORM_STEPS: usize = 2_000;

// ── Logging ─────────────────────────────────────────────────────────────

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("    [{:5}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    let seed = args
        .iter()
        .position(|a| a == "--seed")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(42);

    if verbose && log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }

    println!("=== DeckPlan Editing Harness ===\n");

    let mut results = Vec::new();

    // 1. Catalog parsing
    let catalog = match load_catalog(&mut results) {
        Some(c) => c,
        None => {
            report(&results, verbose);
            std::process::exit(1);
        }
    };

    // 2. Floor geometry
    results.extend(validate_floor_geometry(verbose));

    // 3. Dimension advisor
    results.extend(validate_advisor(&catalog, verbose));

    // 4. Scripted placement of the whole catalog
    results.extend(validate_scripted_session(&catalog, verbose));

    // 5. Select / rotate / move / resize / delete
    results.extend(validate_edit_operations(&catalog, verbose));

    // 6. Randomized click storm
    results.extend(validate_click_storm(&catalog, seed, verbose));

    report(&results, verbose);
}

fn report(results: &[TestResult], verbose: bool) {
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

/// Floor-area footprint for one unit, as the advisor's first suggestion.
fn footprint(params: &ShipParameters, catalog: &Catalog, index: usize) -> Option<(f64, f64)> {
    let component = catalog.get(index)?;
    let area = params.footprint_area(component.weight_per_unit);
    FactorPairAdvisor::default()
        .suggest(area, &params.floor_dimensions())
        .first()
        .map(|d| (d.length, d.width))
}

// ── 1. Catalog ──────────────────────────────────────────────────────────

fn load_catalog(results: &mut Vec<TestResult>) -> Option<Catalog> {
    println!("--- Catalog ---");
    let records: Vec<ComponentRecord> = match serde_json::from_str(CATALOG_JSON) {
        Ok(r) => r,
        Err(e) => {
            results.push(TestResult {
                name: "catalog_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return None;
        }
    };
    let catalog = Catalog::from_records(records);

    results.push(TestResult {
        name: "catalog_not_empty".into(),
        passed: catalog.len() >= 10,
        detail: format!(
            "{} components in {} categories",
            catalog.len(),
            catalog.categories().len()
        ),
    });

    let bad_weight: Vec<_> = catalog.iter().filter(|c| c.weight <= 0.0).collect();
    results.push(TestResult {
        name: "catalog_positive_weights".into(),
        passed: bad_weight.is_empty(),
        detail: if bad_weight.is_empty() {
            "all components have positive weight".into()
        } else {
            format!(
                "non-positive weight: {}",
                bad_weight
                    .iter()
                    .map(|c| c.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        },
    });

    let multi = catalog.iter().filter(|c| c.spans_multiple_floors).count();
    results.push(TestResult {
        name: "catalog_has_multi_floor".into(),
        passed: multi > 0,
        detail: format!("{} multi-floor components", multi),
    });

    results.push(TestResult {
        name: "catalog_totals".into(),
        passed: catalog.total_units() as usize > catalog.len(),
        detail: format!(
            "{} units, {:.0} t, {:.0} credits",
            catalog.total_units(),
            catalog.total_weight(),
            catalog.total_cost()
        ),
    });

    Some(catalog)
}

// ── 2. Floor Geometry ───────────────────────────────────────────────────

fn validate_floor_geometry(verbose: bool) -> Vec<TestResult> {
    println!("--- Floor Geometry ---");
    let mut results = Vec::new();

    let params = ShipParameters::default();
    let errors = validate_parameters(&params);
    results.push(TestResult {
        name: "floor_default_params_valid".into(),
        passed: errors.is_empty(),
        detail: format!("{:?}", errors),
    });

    let dims = params.floor_dimensions();
    results.push(TestResult {
        name: "floor_area_invariant".into(),
        passed: (dims.length * dims.width - dims.area).abs() < 1e-6,
        detail: format!(
            "{:.2} × {:.2} = {:.2} m² per floor, {} floors",
            dims.length,
            dims.width,
            dims.area,
            params.floor_count()
        ),
    });

    // Fixed length derives the width
    let fixed = ShipParameters {
        floor_length: Some(50.0),
        ..ShipParameters::default()
    };
    let fixed_dims = fixed.floor_dimensions();
    results.push(TestResult {
        name: "floor_fixed_length".into(),
        passed: fixed_dims.length == 50.0 && (fixed_dims.width - dims.area / 50.0).abs() < 1e-9,
        detail: format!("50 m length gives {:.2} m width", fixed_dims.width),
    });

    // Degenerate configurations are reported, not silently accepted
    let broken = [
        ShipParameters {
            total_weight: 0.0,
            ..ShipParameters::default()
        },
        ShipParameters {
            floor_count: 0,
            ..ShipParameters::default()
        },
        ShipParameters {
            floor_length: Some(5_000.0),
            ..ShipParameters::default()
        },
    ];
    let caught = broken
        .iter()
        .filter(|p| !validate_parameters(p).is_empty())
        .count();
    results.push(TestResult {
        name: "floor_bad_params_rejected".into(),
        passed: caught == broken.len(),
        detail: format!("{}/{} broken configurations rejected", caught, broken.len()),
    });

    if verbose {
        println!("  Floors by count (default weight):");
        for floors in 1..=4 {
            let p = ShipParameters {
                floor_count: floors,
                ..ShipParameters::default()
            };
            let d = p.floor_dimensions();
            println!("    {} floors: {:.1} × {:.1} m", floors, d.length, d.width);
        }
    }

    results
}

// ── 3. Dimension Advisor ────────────────────────────────────────────────

fn validate_advisor(catalog: &Catalog, _verbose: bool) -> Vec<TestResult> {
    println!("--- Dimension Advisor ---");
    let mut results = Vec::new();

    let params = ShipParameters::default();
    let dims = params.floor_dimensions();
    let advisor = FactorPairAdvisor::default();

    let mut unplaceable = Vec::new();
    let mut drift = 0usize;
    for component in catalog.iter() {
        let area = params.footprint_area(component.weight_per_unit);
        let options = advisor.suggest(area, &dims);
        if options.is_empty() {
            unplaceable.push(component.name.as_str());
        }
        drift += options
            .iter()
            .filter(|d| (d.area() - area).abs() > 1e-6)
            .count();
    }

    results.push(TestResult {
        name: "advisor_covers_catalog".into(),
        passed: unplaceable.is_empty(),
        detail: if unplaceable.is_empty() {
            "every component has at least one footprint".into()
        } else {
            format!("no footprint for: {}", unplaceable.join(", "))
        },
    });

    results.push(TestResult {
        name: "advisor_preserves_area".into(),
        passed: drift == 0,
        detail: format!("{} suggestions with area drift", drift),
    });

    results
}

// ── 4. Scripted Session ─────────────────────────────────────────────────

/// Place every unit of every component, sweeping the pointer across floors.
fn place_everything(editor: &mut Editor<ShipParameters>) -> (u32, u32) {
    let params = editor.geometry().clone();
    let dims = params.floor_dimensions();
    let floors: Vec<u32> = (1..=params.floor_count()).collect();
    let mut placed = 0;
    let mut refused = 0;

    for index in 0..editor.catalog().len() {
        let Some((length, width)) = footprint(&params, editor.catalog(), index) else {
            continue;
        };
        if editor
            .begin_placing(index, length, width, floors.clone())
            .is_err()
        {
            continue;
        }
        let mut attempt = 0u32;
        while editor.remaining_units(index) > 0 && attempt < 40 {
            let floor = floors[(attempt as usize + index) % floors.len()];
            let x = (attempt as f64 * 7.3 + index as f64 * 3.1) % dims.length;
            let y = (attempt as f64 * 4.7 + index as f64 * 1.9) % dims.width;
            match editor.place_at(Pointer::new(floor, x, y)) {
                Ok(_) => placed += 1,
                Err(_) => refused += 1,
            }
            attempt += 1;
        }
        editor.cancel();
    }
    (placed, refused)
}

fn validate_scripted_session(catalog: &Catalog, verbose: bool) -> Vec<TestResult> {
    println!("--- Scripted Session ---");
    let mut results = Vec::new();

    let mut editor = Editor::new(ShipParameters::default(), catalog.clone());
    let (placed, refused) = place_everything(&mut editor);

    let errors = editor.validate();
    results.push(TestResult {
        name: "scripted_layout_valid".into(),
        passed: errors.is_empty(),
        detail: if errors.is_empty() {
            format!("{} units placed, {} clicks refused", placed, refused)
        } else {
            format!("{} errors, first: {}", errors.len(), errors[0].message)
        },
    });

    let total = catalog.total_units();
    results.push(TestResult {
        name: "scripted_most_units_placed".into(),
        passed: placed * 10 >= total * 8,
        detail: format!("{}/{} units placed", placed, total),
    });

    // Multi-floor components sit on every floor at the same spot
    let mut misaligned = 0;
    for component in catalog.iter().filter(|c| c.spans_multiple_floors) {
        let list = editor.store().placements_of(component.index);
        let on_first: Vec<_> = list.iter().filter(|p| p.floor == 1).collect();
        for p in &on_first {
            let twins = list
                .iter()
                .filter(|q| q.floor != 1 && q.x == p.x && q.y == p.y)
                .count();
            if twins + 1 != editor.geometry().floor_count() as usize {
                misaligned += 1;
            }
        }
    }
    results.push(TestResult {
        name: "scripted_multi_floor_aligned".into(),
        passed: misaligned == 0,
        detail: format!("{} misaligned multi-floor units", misaligned),
    });

    // Undo everything, then redo everything
    let final_layout = editor.store().sorted_records();
    let depth = editor.history().undo_len();
    let mut undone = 0;
    while editor.undo().is_ok() {
        undone += 1;
    }
    let emptied = editor.store().is_empty();
    while editor.redo().is_ok() {}
    results.push(TestResult {
        name: "scripted_undo_redo_roundtrip".into(),
        passed: undone == depth && emptied && editor.store().sorted_records() == final_layout,
        detail: format!("{} actions undone and redone", undone),
    });

    // Snapshot survives a JSON round trip
    let snapshot = editor.snapshot();
    let roundtrip = serde_json::to_string(&snapshot)
        .ok()
        .and_then(|s| serde_json::from_str::<LayoutSnapshot>(&s).ok());
    let restored = match roundtrip {
        Some(s) => {
            let mut other = Editor::new(ShipParameters::default(), catalog.clone());
            other.restore(&s);
            other.store().sorted_records() == final_layout
        }
        None => false,
    };
    results.push(TestResult {
        name: "scripted_snapshot_roundtrip".into(),
        passed: restored,
        detail: format!("{} placements restored", snapshot.placements.len()),
    });

    if verbose {
        println!("  Placements per floor:");
        for floor in editor.store().floors() {
            let n = editor.store().on_floor(floor).count();
            let used: f64 = editor
                .store()
                .on_floor(floor)
                .map(|(_, _, p)| p.rect().area())
                .sum();
            println!(
                "    floor {}: {} placements, {:.0}/{:.0} m² used",
                floor,
                n,
                used,
                editor.floor_dimensions().area
            );
        }
    }

    results
}

// ── 5. Edit Operations ──────────────────────────────────────────────────

fn validate_edit_operations(catalog: &Catalog, _verbose: bool) -> Vec<TestResult> {
    println!("--- Edit Operations ---");
    let mut results = Vec::new();

    let mut editor = Editor::new(ShipParameters::default(), catalog.clone());
    place_everything(&mut editor);

    let Some((component, index)) = editor
        .store()
        .iter()
        .find(|(c, _, _)| !catalog.get(*c).is_some_and(|e| e.spans_multiple_floors))
        .map(|(c, i, _)| (c, i))
    else {
        results.push(TestResult {
            name: "edit_has_target".into(),
            passed: false,
            detail: "no single-floor placement to edit".into(),
        });
        return results;
    };

    // Rotating twice restores the footprint; a refusal must be a rejection
    let footprint_of = |editor: &Editor<ShipParameters>| {
        editor
            .store()
            .get(component, index)
            .map(|p| (p.length, p.width))
    };
    let rotate_ok = match editor.select(component, index) {
        Ok(_) => {
            let before = footprint_of(&editor);
            match editor.rotate().and_then(|_| editor.rotate()) {
                Ok(_) => footprint_of(&editor) == before,
                Err(e) => e.is_rejection(),
            }
        }
        Err(_) => false,
    };
    results.push(TestResult {
        name: "edit_rotate_symmetry".into(),
        passed: rotate_ok,
        detail: format!("component #{} unit {}", component, index),
    });

    // Resizing keeps area
    let area_ok = match editor.store().get(component, index).copied() {
        Some(p) => {
            let area = p.length * p.width;
            let floor = p.floor;
            let _ = editor.select(component, index);
            let began = editor
                .begin_resize(Edge::Right, Pointer::new(floor, p.x + p.length, p.y))
                .is_ok();
            let _ = editor.resize_preview(Pointer::new(floor, p.x + p.length - 1.0, p.y));
            let _ = editor.commit_resize();
            let after = editor.store().get(component, index).copied();
            began && after.is_some_and(|q| (q.length * q.width - area).abs() < 1e-6)
        }
        None => false,
    };
    results.push(TestResult {
        name: "edit_resize_keeps_area".into(),
        passed: area_ok,
        detail: "right edge dragged 1 m inward".into(),
    });

    // Delete then undo brings the same unit back
    let count_before = editor.store().len();
    editor.cancel();
    let delete_ok = editor.select(component, index).is_ok()
        && editor.delete_selected().is_ok()
        && editor.store().len() == count_before - 1
        && editor.undo().is_ok()
        && editor.store().len() == count_before;
    results.push(TestResult {
        name: "edit_delete_undo".into(),
        passed: delete_ok,
        detail: format!("{} placements before and after", count_before),
    });

    let errors = editor.validate();
    results.push(TestResult {
        name: "edit_layout_valid".into(),
        passed: errors.is_empty(),
        detail: format!("{} validation errors", errors.len()),
    });

    results
}

// ── 6. Click Storm ──────────────────────────────────────────────────────

fn validate_click_storm(catalog: &Catalog, seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Click Storm (seed {}) ---", seed);
    let mut results = Vec::new();

    let params = ShipParameters {
        floor_count: 3,
        ..ShipParameters::default()
    };
    let dims = params.floor_dimensions();
    let floor_count = params.floor_count();
    let mut editor = Editor::new(params.clone(), catalog.clone());
    let mut rng = StdRng::seed_from_u64(seed);

    let mut violations = 0usize;
    let mut first_violation = None;
    let mut ops = [0usize; 8];

    for step in 0..STORM_STEPS {
        let floor = rng.gen_range(1..=floor_count);
        let pointer = Pointer::new(
            floor,
            rng.gen_range(0.0..dims.length),
            rng.gen_range(0.0..dims.width),
        );
        let op = rng.gen_range(0..8);
        ops[op] += 1;
        match op {
            0 => {
                let index = rng.gen_range(0..catalog.len());
                if let Some((l, w)) = footprint(&params, catalog, index) {
                    let targets: Vec<u32> = if rng.gen_bool(0.5) {
                        (1..=floor_count).collect()
                    } else {
                        vec![floor]
                    };
                    let _ = editor.begin_placing(index, l, w, targets);
                }
            }
            1 => {
                let _ = editor.place_at(pointer);
            }
            2 => {
                let _ = editor.select_at(pointer);
            }
            3 => {
                if editor.begin_move().is_ok() && editor.commit_move(pointer).is_err() {
                    editor.cancel();
                }
            }
            4 => {
                let _ = editor.rotate();
            }
            5 => {
                let edge = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right][rng.gen_range(0..4)];
                let origin = editor
                    .selection()
                    .map(|s| Pointer::new(s.floor, s.original_x, s.original_y));
                if let Some(start) = origin {
                    if editor.begin_resize(edge, start).is_ok() {
                        let drag = Pointer::new(
                            start.floor,
                            start.x + rng.gen_range(-10.0..10.0),
                            start.y + rng.gen_range(-10.0..10.0),
                        );
                        let _ = editor.resize_preview(drag);
                        let _ = editor.commit_resize();
                    }
                }
            }
            6 => {
                if rng.gen_bool(0.5) {
                    let _ = editor.undo();
                } else {
                    let _ = editor.redo();
                }
            }
            _ => {
                if rng.gen_bool(0.2) {
                    let _ = editor.delete_selected();
                } else {
                    editor.cancel();
                }
            }
        }

        let errors = editor.validate();
        if !errors.is_empty() {
            violations += 1;
            if first_violation.is_none() {
                first_violation = Some(format!("step {}: {}", step, errors[0].message));
            }
        }
    }

    results.push(TestResult {
        name: "storm_layout_always_valid".into(),
        passed: violations == 0,
        detail: first_violation.unwrap_or_else(|| {
            format!(
                "{} steps, {} placements at end",
                STORM_STEPS,
                editor.store().len()
            )
        }),
    });

    let mut undone = 0;
    while editor.history().can_undo() && editor.undo().is_ok() {
        undone += 1;
    }
    results.push(TestResult {
        name: "storm_undo_drains".into(),
        passed: editor.store().is_empty(),
        detail: format!("{} actions undone, {} placements left", undone, editor.store().len()),
    });

    if verbose {
        let names = [
            "arm", "place", "select", "move", "rotate", "resize", "undo/redo", "delete/cancel",
        ];
        println!("  Operation mix:");
        for (name, count) in names.iter().zip(ops.iter()) {
            println!("    {:13}: {}", name, count);
        }
    }

    results
}
