//! The chart registry: one implementation per route, all behind a single
//! trait so new charts never touch the response pipeline.

pub mod boxes;
pub mod density;
pub mod lines;
pub mod scatter;
pub mod style;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::data::DatasetStore;
use crate::error::Result;
use crate::render::Figure;

/// A registered chart: produces a [`Figure`] from the dataset store.
pub trait Chart: Send + Sync {
    /// Route stem; `box` serves `GET /box.plot`.
    fn name(&self) -> &'static str;

    /// Human-readable title shown on the landing page.
    fn title(&self) -> &'static str;

    /// Build the figure from the read-only datasets. Must be a pure
    /// function of the store contents (plus the context RNG) and must
    /// not retain references beyond its own execution.
    fn figure(&self, ctx: &ChartContext<'_>) -> Result<Figure>;
}

/// Per-request environment handed to chart implementations.
pub struct ChartContext<'a> {
    data: &'a DatasetStore,
    seed: Option<u64>,
}

impl<'a> ChartContext<'a> {
    /// Create a context over the store, with an optional RNG seed.
    pub fn new(data: &'a DatasetStore, seed: Option<u64>) -> Self {
        Self { data, seed }
    }

    /// The dataset store.
    pub fn data(&self) -> &'a DatasetStore {
        self.data
    }

    /// A fresh RNG: seeded when a seed is configured, OS entropy
    /// otherwise.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Explicit mapping from route identifier to chart implementation.
pub struct ChartRegistry {
    charts: Vec<Box<dyn Chart>>,
}

impl ChartRegistry {
    /// The eleven built-in charts, in landing-page order.
    pub fn builtin() -> Self {
        Self {
            charts: vec![
                Box::new(lines::Simple),
                Box::new(lines::DateSeries),
                Box::new(scatter::MidwestScatter),
                Box::new(scatter::JitterStrip),
                Box::new(scatter::CountsStrip),
                Box::new(density::DensityCurve),
                Box::new(density::DistributionPanels),
                Box::new(density::KdeByCylinders),
                Box::new(boxes::ClassBox),
                Box::new(boxes::DotBox),
                Box::new(boxes::Violin),
            ],
        }
    }

    /// Look up a chart by route stem.
    pub fn get(&self, name: &str) -> Option<&dyn Chart> {
        self.charts
            .iter()
            .find(|c| c.name() == name)
            .map(Box::as_ref)
    }

    /// Iterate charts in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Chart> {
        self.charts.iter().map(Box::as_ref)
    }

    /// Number of registered charts.
    pub fn len(&self) -> usize {
        self.charts.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

impl Default for ChartRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn builtin_registry_has_all_eleven_routes() {
        let registry = ChartRegistry::builtin();
        assert_eq!(registry.len(), 11);

        for name in [
            "simple",
            "plotdate",
            "scatter",
            "jittering",
            "counts",
            "densitycurve",
            "distribution",
            "kde",
            "box",
            "dotbox",
            "violion",
        ] {
            assert!(registry.get(name).is_some(), "missing chart {name}");
        }
    }

    #[test]
    fn chart_names_are_unique() {
        let registry = ChartRegistry::builtin();
        let names: HashSet<&str> = registry.iter().map(|c| c.name()).collect();
        assert_eq!(names.len(), registry.len());
    }

    #[test]
    fn unknown_chart_is_absent() {
        assert!(ChartRegistry::builtin().get("heatmap").is_none());
    }

    #[test]
    fn seeded_context_yields_a_deterministic_rng() {
        use rand::Rng;

        let store = DatasetStore::new();
        let ctx = ChartContext::new(&store, Some(7));
        let a: u64 = ctx.rng().gen();
        let b: u64 = ctx.rng().gen();
        assert_eq!(a, b);
    }
}
