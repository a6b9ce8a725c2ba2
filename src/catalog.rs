//! The variable catalog: named labeled arrays that seed expressions.
//!
//! Entries are generated once, from a seeded RNG, and never change
//! afterwards. [`Catalog::get`] hands out a fresh [`Expression`] per call, so
//! independent derivations can share one catalog, including across threads.

use std::collections::BTreeMap;

use rand::distributions::Open01;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::array::{Axis, LabeledArray};
use crate::expression::Expression;
use crate::{Error, Result};

/// Axis lengths of the synthetic data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
  pub bins: usize,
  pub regions: usize,
  pub years: usize,
}

impl Dimensions {
  /// The full-size layout: 12 temperature bins, 24 999 regions, a century.
  pub const fn production() -> Self {
    Dimensions {
      bins: 12,
      regions: 24_999,
      years: 100,
    }
  }

  /// A handful of regions and years, for tests and quick experiments.
  pub const fn small() -> Self {
    Dimensions {
      bins: 12,
      regions: 4,
      years: 3,
    }
  }
}

impl Default for Dimensions {
  fn default() -> Self {
    Dimensions {
      bins: 12,
      regions: 1_000,
      years: 100,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogConfig {
  pub dimensions: Dimensions,
  pub seed: u64,
}

impl Default for CatalogConfig {
  fn default() -> Self {
    CatalogConfig {
      dimensions: Dimensions::default(),
      seed: 42,
    }
  }
}

#[derive(Debug, Clone, Copy)]
enum Layout {
  Bins,
  RegionTime,
  BinRegionTime,
}

struct EntryDefinition {
  name: &'static str,
  symbol: &'static str,
  layout: Layout,
  description: Option<&'static str>,
}

const ENTRIES: &[EntryDefinition] = &[
  EntryDefinition {
    name: "temperature",
    symbol: "T",
    layout: Layout::BinRegionTime,
    description: Some("NASA downscaled climate data"),
  },
  EntryDefinition {
    name: "alpha",
    symbol: r"\alpha",
    layout: Layout::Bins,
    description: None,
  },
  EntryDefinition {
    name: "gamma1",
    symbol: r"{\gamma_1}",
    layout: Layout::Bins,
    description: None,
  },
  EntryDefinition {
    name: "gamma2",
    symbol: r"{\gamma_2}",
    layout: Layout::Bins,
    description: None,
  },
  EntryDefinition {
    name: "gamma3",
    symbol: r"{\gamma_3}",
    layout: Layout::Bins,
    description: None,
  },
  EntryDefinition {
    name: "avgDaysPerBin",
    symbol: "AvgDaysPerBin",
    layout: Layout::BinRegionTime,
    description: None,
  },
  EntryDefinition {
    name: "gdpPerCapita",
    symbol: "GdpPC",
    layout: Layout::RegionTime,
    description: None,
  },
  EntryDefinition {
    name: "populationDensity",
    symbol: "PopDensity",
    layout: Layout::RegionTime,
    description: None,
  },
];

fn axes(layout: Layout, dimensions: &Dimensions) -> Vec<Axis> {
  let bins = Axis::new("bins", dimensions.bins);
  let region = Axis::new("region", dimensions.regions);
  let time = Axis::new("time", dimensions.years);
  match layout {
    Layout::Bins => vec![bins],
    Layout::RegionTime => vec![region, time],
    Layout::BinRegionTime => vec![bins, region, time],
  }
}

#[derive(Debug, Clone)]
pub struct Catalog {
  entries: BTreeMap<String, LabeledArray>,
  options: Map<String, Value>,
}

impl Catalog {
  /// Populate every entry using the default configuration.
  pub fn initialize() -> Result<Self> {
    Self::with_config(&CatalogConfig::default())
  }

  /// Populate every entry with values drawn uniformly from (0, 1).
  pub fn with_config(config: &CatalogConfig) -> Result<Self> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut entries = BTreeMap::new();
    for definition in ENTRIES {
      let mut array =
        LabeledArray::from_fn(axes(definition.layout, &config.dimensions), || {
          rng.sample::<f64, _>(Open01)
        })?
        .with_symbol(definition.symbol);
      if let Some(description) = definition.description {
        array = array.with_description(description);
      }
      debug!(
        name = definition.name,
        shape = ?array.shape(),
        "catalog entry generated"
      );
      entries.insert(definition.name.to_string(), array);
    }
    info!(
      entries = entries.len(),
      seed = config.seed,
      "catalog initialized"
    );
    Ok(Catalog {
      entries,
      options: Map::new(),
    })
  }

  /// A catalog over caller-supplied entries.
  pub fn from_entries(
    entries: impl IntoIterator<Item = (String, LabeledArray)>,
  ) -> Self {
    Catalog {
      entries: entries.into_iter().collect(),
      options: Map::new(),
    }
  }

  /// A fresh expression wrapping the named entry.
  pub fn get(&self, name: &str) -> Result<Expression> {
    let entry = self
      .entries
      .get(name)
      .ok_or_else(|| Error::UnknownVariable(name.to_string()))?;
    debug!(name, "catalog lookup");
    Ok(Expression::from(entry.clone()))
  }

  pub fn entry(&self, name: &str) -> Option<&LabeledArray> {
    self.entries.get(name)
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.entries.keys().map(String::as_str)
  }

  pub fn entries(&self) -> impl Iterator<Item = (&str, &LabeledArray)> {
    self.entries.iter().map(|(name, array)| (name.as_str(), array))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Record backend options. None are acted on yet; entries are unaffected.
  pub fn reconfigure(&mut self, options: Map<String, Value>) {
    let keys: Vec<&str> = options.keys().map(String::as_str).collect();
    info!(options = ?keys, "catalog configuration updated");
    self.options.extend(options);
  }

  /// Options received through [`Catalog::reconfigure`].
  pub fn options(&self) -> &Map<String, Value> {
    &self.options
  }
}
