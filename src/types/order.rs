//! Order records as delivered by the order service, and their
//! normalisation into route stops.
//!
//! Upstream data has drifted over time: coordinates sometimes arrive as
//! strings, complexity and priority as either numbers or labels, and older
//! records keep complexity under `product`. Everything is converted here so
//! that the timing model only ever sees numeric tiers.

use serde::{Deserialize, Serialize};

use super::{Coordinates, Stop};
use crate::defaults::DEFAULT_COMPLEXITY;

/// A JSON scalar that may be a number or a numeric/label string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseValue {
    Number(f64),
    Text(String),
}

impl LooseValue {
    fn as_f64(&self) -> Option<f64> {
        let value = match self {
            LooseValue::Number(n) => Some(*n),
            LooseValue::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value.filter(|n| n.is_finite())
    }

    fn as_tier(&self) -> Option<u32> {
        self.as_f64()
            .filter(|n| *n >= 0.0 && *n <= u32::MAX as f64)
            .map(|n| n.round() as u32)
    }

    fn label(&self) -> Option<String> {
        match self {
            LooseValue::Text(s) => Some(s.trim().to_lowercase()),
            LooseValue::Number(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLocation {
    #[serde(default)]
    pub lat: Option<LooseValue>,
    #[serde(default)]
    pub lng: Option<LooseValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomerField {
    Name(String),
    Detail {
        name: String,
        #[serde(default)]
        info: Option<String>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductField {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub complexity: Option<LooseValue>,
}

/// Order as stored by the order service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<LooseValue>,
    #[serde(default)]
    pub customer: Option<CustomerField>,
    #[serde(default)]
    pub location: Option<RawLocation>,
    #[serde(default)]
    pub complexity: Option<LooseValue>,
    #[serde(default)]
    pub product: Option<ProductField>,
    /// Set when the order is assigned to a delivery route
    #[serde(default)]
    pub delivery_id: Option<String>,
}

impl OrderRecord {
    /// Canonical complexity tier. Labels map to 1/2/3; missing or
    /// unrecognised values fall back to the default tier.
    pub fn complexity(&self) -> u32 {
        self.complexity
            .as_ref()
            .or_else(|| self.product.as_ref().and_then(|p| p.complexity.as_ref()))
            .and_then(parse_complexity)
            .unwrap_or(DEFAULT_COMPLEXITY)
    }

    /// Canonical priority: numbers as-is, `low`/`medium`/`high` as 0/1/2
    pub fn priority(&self) -> u32 {
        self.priority.as_ref().and_then(parse_priority).unwrap_or(0)
    }

    /// Coordinates if both components parse as numbers
    pub fn coordinates(&self) -> Option<Coordinates> {
        let location = self.location.as_ref()?;
        let lat = location.lat.as_ref()?.as_f64()?;
        let lng = location.lng.as_ref()?.as_f64()?;
        Some(Coordinates::new(lat, lng))
    }

    pub fn customer_name(&self) -> Option<&str> {
        match self.customer.as_ref()? {
            CustomerField::Name(name) => Some(name),
            CustomerField::Detail { name, .. } => Some(name),
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.delivery_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    pub fn to_stop(&self) -> Stop {
        Stop {
            id: self.id.clone(),
            location: self.coordinates(),
            complexity: Some(self.complexity()),
        }
    }
}

fn parse_complexity(value: &LooseValue) -> Option<u32> {
    value.as_tier().or_else(|| match value.label()?.as_str() {
        "low" | "simple" => Some(1),
        "medium" | "moderate" => Some(2),
        "high" | "complex" => Some(3),
        _ => None,
    })
}

fn parse_priority(value: &LooseValue) -> Option<u32> {
    value.as_tier().or_else(|| match value.label()?.as_str() {
        "low" => Some(0),
        "medium" => Some(1),
        "high" => Some(2),
        _ => None,
    })
}

/// Split orders into the unassigned pool and assigned orders, keeping
/// the input order within each group
pub fn split_pool(orders: Vec<OrderRecord>) -> (Vec<OrderRecord>, Vec<OrderRecord>) {
    orders.into_iter().partition(|o| !o.is_assigned())
}
