//! Component catalog.
//!
//! Components come from an external tabular parser as plain records. The
//! catalog assigns each a stable index, which is the identity key used by
//! the placement store, the history and the editor.

use serde::{Deserialize, Serialize};

/// Position of a component in the catalog.
pub type ComponentIndex = usize;

/// One parsed input row, before it gets an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub category: String,
    pub name: String,
    /// Total weight in tons across all units.
    pub weight: f64,
    pub cost: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub spans_multiple_floors: bool,
}

fn default_quantity() -> u32 {
    1
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub index: ComponentIndex,
    pub category: String,
    pub name: String,
    pub weight: f64,
    pub weight_per_unit: f64,
    pub cost: f64,
    /// Number of physical units to place, always at least 1.
    pub quantity: u32,
    pub spans_multiple_floors: bool,
}

impl Component {
    fn from_record(index: ComponentIndex, record: ComponentRecord) -> Self {
        let quantity = record.quantity.max(1);
        Self {
            index,
            category: record.category,
            name: record.name,
            weight: record.weight,
            weight_per_unit: record.weight / quantity as f64,
            cost: record.cost,
            quantity,
            spans_multiple_floors: record.spans_multiple_floors,
        }
    }
}

/// Immutable list of components, replaced wholesale on reload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    components: Vec<Component>,
}

impl Catalog {
    /// Build a catalog, indexing records in input order.
    pub fn from_records(records: Vec<ComponentRecord>) -> Self {
        let components = records
            .into_iter()
            .enumerate()
            .map(|(i, r)| Component::from_record(i, r))
            .collect();
        Self { components }
    }

    pub fn get(&self, index: ComponentIndex) -> Option<&Component> {
        self.components.get(index)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    /// Aggregate weight of the whole catalog in tons.
    pub fn total_weight(&self) -> f64 {
        self.components.iter().map(|c| c.weight).sum()
    }

    /// Aggregate cost of the whole catalog.
    pub fn total_cost(&self) -> f64 {
        self.components.iter().map(|c| c.cost).sum()
    }

    /// Total number of physical units across all components.
    pub fn total_units(&self) -> u32 {
        self.components.iter().map(|c| c.quantity).sum()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for c in &self.components {
            if !seen.contains(&c.category.as_str()) {
                seen.push(&c.category);
            }
        }
        seen
    }
}
