use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Planned allocation: ticker -> monetary amount. Ordered so that derived
/// figures come out in a deterministic ticker order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Contribution(pub BTreeMap<String, f64>);

impl Contribution {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tickers(&self) -> BTreeSet<String> {
        self.0.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.0.iter()
    }
}

impl FromIterator<(String, f64)> for Contribution {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
