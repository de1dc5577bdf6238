//! Resource quantities: the value every cost walk produces.
//!
//! A [ResourceQuantity] maps resource name to a signed count. Counts coming out of the catalog are
//! never negative; only [subtract] can produce negative entries (an over-spent record).

use std::collections::BTreeMap;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

use super::CURRENCY;

/// Key-wise resource counts. Absent keys read as zero, and equality treats a zero entry the same
/// as an absent one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceQuantity {
    entries: BTreeMap<String, i64>,
}

impl ResourceQuantity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantity of `name`, 0 when absent.
    pub fn get(&self, name: &str) -> i64 {
        self.entries.get(name).copied().unwrap_or(0)
    }

    /// Add `quantity` of `name` to the running count.
    pub fn accumulate(&mut self, name: impl Into<String>, quantity: i64) {
        *self.entries.entry(name.into()).or_insert(0) += quantity;
    }

    /// Fold every entry of `other` into `self`.
    pub fn merge(&mut self, other: &ResourceQuantity) {
        for (name, quantity) in &other.entries {
            self.accumulate(name.as_str(), *quantity);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries.iter().map(|(name, quantity)| (name.as_str(), *quantity))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when every entry is zero (including the empty map).
    pub fn is_zero(&self) -> bool {
        self.entries.values().all(|quantity| *quantity == 0)
    }

    /// Sum of every entry except the currency resource.
    pub fn material_quantity(&self) -> i64 {
        self.entries
            .iter()
            .filter(|(name, _)| name.as_str() != CURRENCY)
            .map(|(_, quantity)| *quantity)
            .sum()
    }

    /// Quantity of the currency resource.
    pub fn currency(&self) -> i64 {
        self.get(CURRENCY)
    }

    /// Copy without zero entries, for display.
    pub fn pruned(&self) -> ResourceQuantity {
        self.entries
            .iter()
            .filter(|(_, quantity)| **quantity != 0)
            .map(|(name, quantity)| (name.clone(), *quantity))
            .collect()
    }

    /// Entries below zero. Non-empty only when spending exceeds the catalog total.
    pub fn negative_entries(&self) -> Vec<(&str, i64)> {
        self.iter().filter(|(_, quantity)| *quantity < 0).collect()
    }
}

impl PartialEq for ResourceQuantity {
    fn eq(&self, other: &Self) -> bool {
        self.entries
            .keys()
            .chain(other.entries.keys())
            .all(|name| self.get(name) == other.get(name))
    }
}

impl Eq for ResourceQuantity {}

impl FromIterator<(String, i64)> for ResourceQuantity {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        let mut quantity = ResourceQuantity::new();
        for (name, count) in iter {
            quantity.accumulate(name, count);
        }
        quantity
    }
}

impl<'a> FromIterator<(&'a str, i64)> for ResourceQuantity {
    fn from_iter<I: IntoIterator<Item = (&'a str, i64)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect()
    }
}

impl AddAssign<&ResourceQuantity> for ResourceQuantity {
    fn add_assign(&mut self, rhs: &ResourceQuantity) {
        self.merge(rhs);
    }
}

impl AddAssign for ResourceQuantity {
    fn add_assign(&mut self, rhs: ResourceQuantity) {
        self.merge(&rhs);
    }
}

impl Add for ResourceQuantity {
    type Output = ResourceQuantity;

    fn add(mut self, rhs: ResourceQuantity) -> ResourceQuantity {
        self.merge(&rhs);
        self
    }
}

impl Add<&ResourceQuantity> for &ResourceQuantity {
    type Output = ResourceQuantity;

    fn add(self, rhs: &ResourceQuantity) -> ResourceQuantity {
        let mut out = self.clone();
        out.merge(rhs);
        out
    }
}

impl Sub<&ResourceQuantity> for &ResourceQuantity {
    type Output = ResourceQuantity;

    fn sub(self, rhs: &ResourceQuantity) -> ResourceQuantity {
        subtract(self, rhs)
    }
}

impl Sum for ResourceQuantity {
    fn sum<I: Iterator<Item = ResourceQuantity>>(iter: I) -> Self {
        iter.fold(ResourceQuantity::new(), |acc, quantity| acc + quantity)
    }
}

impl<'a> Sum<&'a ResourceQuantity> for ResourceQuantity {
    fn sum<I: Iterator<Item = &'a ResourceQuantity>>(iter: I) -> Self {
        let mut total = ResourceQuantity::new();
        for quantity in iter {
            total.merge(quantity);
        }
        total
    }
}

/// Key-wise sum of any number of quantities.
pub fn combine<'a, I>(quantities: I) -> ResourceQuantity
where
    I: IntoIterator<Item = &'a ResourceQuantity>,
{
    quantities.into_iter().sum()
}

/// Key-wise `a - b`. Zero and negative entries are kept.
pub fn subtract(a: &ResourceQuantity, b: &ResourceQuantity) -> ResourceQuantity {
    let mut out = a.clone();
    for (name, quantity) in b.iter() {
        out.accumulate(name, -quantity);
    }
    out
}

/// Sum of every non-currency entry of `quantity`.
pub fn material_quantity(quantity: &ResourceQuantity) -> i64 {
    quantity.material_quantity()
}
