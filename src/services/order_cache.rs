//! Load-once order cache with an explicit lifecycle.
//!
//! The cache is an ordinary value owned by the caller. Concurrent `get`
//! calls made while a load is running wait for that load instead of
//! starting their own. A failed load is not remembered, so the next
//! `get` tries again.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::types::{OrderRecord, RouteSequence};

/// Where orders come from
#[async_trait]
pub trait OrderSource: Send + Sync {
    async fn fetch_orders(&self) -> Result<Vec<OrderRecord>>;

    /// Get source name for logging
    fn name(&self) -> &str;
}

/// Orders stored as a JSON array on disk
pub struct JsonFileOrderSource {
    path: PathBuf,
}

impl JsonFileOrderSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl OrderSource for JsonFileOrderSource {
    async fn fetch_orders(&self) -> Result<Vec<OrderRecord>> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read orders from {}", self.path.display()))?;
        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse orders in {}", self.path.display()))
    }

    fn name(&self) -> &str {
        "JsonFile"
    }
}

type Slot = Arc<OnceCell<Arc<Vec<OrderRecord>>>>;

pub struct OrderCache<S> {
    source: S,
    slot: RwLock<Slot>,
}

impl<S: OrderSource> OrderCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            slot: RwLock::new(Arc::default()),
        }
    }

    /// Load eagerly
    pub async fn init(&self) -> Result<()> {
        self.get().await.map(|_| ())
    }

    /// Cached orders, loading them on first use
    pub async fn get(&self) -> Result<Arc<Vec<OrderRecord>>> {
        let slot = self.slot.read().clone();
        if let Some(orders) = slot.get() {
            debug!("Orders already cached, skipping fetch");
            return Ok(Arc::clone(orders));
        }

        let orders = slot
            .get_or_try_init(|| async {
                info!(source = self.source.name(), "Fetching orders");
                let orders = self.source.fetch_orders().await?;
                info!(count = orders.len(), "Orders loaded");
                Ok::<_, anyhow::Error>(Arc::new(orders))
            })
            .await?;
        Ok(Arc::clone(orders))
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.read().initialized()
    }

    /// Drop cached orders; the next `get` fetches again
    pub fn reset(&self) {
        *self.slot.write() = Arc::default();
    }
}

/// Route assembled from the orders of one delivery
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRoute {
    pub delivery_id: String,
    pub sequence: RouteSequence,
    /// Requested ids that are not orders of this delivery
    pub unresolved: Vec<String>,
}

/// Build the route of one delivery.
///
/// Only assigned orders take part; pool orders never end up on a route.
/// Without `delivery_id` the delivery is the one the first requested id
/// belongs to, or the only delivery in `orders`. With `ids` the stops
/// follow that order and ids outside the delivery are skipped with a
/// warning; otherwise record order is kept.
pub fn route_from_orders(
    orders: &[OrderRecord],
    delivery_id: Option<&str>,
    ids: Option<&[String]>,
) -> Result<OrderRoute> {
    let delivery_id = match delivery_id {
        Some(id) => id.to_string(),
        None => infer_delivery(orders, ids)?,
    };

    let members: Vec<&OrderRecord> = orders
        .iter()
        .filter(|o| o.is_assigned() && o.delivery_id.as_deref() == Some(delivery_id.as_str()))
        .collect();
    if members.is_empty() {
        bail!("Delivery {} has no orders", delivery_id);
    }

    let mut unresolved = Vec::new();
    let stops = match ids {
        Some(ids) => ids
            .iter()
            .filter_map(|id| match members.iter().find(|o| &o.id == id) {
                Some(order) => Some(order.to_stop()),
                None => {
                    warn!(
                        order_id = %id,
                        delivery_id = %delivery_id,
                        "Order is not part of the delivery, skipping"
                    );
                    unresolved.push(id.clone());
                    None
                }
            })
            .collect(),
        None => members.iter().map(|o| o.to_stop()).collect(),
    };

    Ok(OrderRoute {
        sequence: RouteSequence::new(stops)?,
        delivery_id,
        unresolved,
    })
}

fn infer_delivery(orders: &[OrderRecord], ids: Option<&[String]>) -> Result<String> {
    let assigned = || orders.iter().filter(|o| o.is_assigned());

    if let Some(ids) = ids {
        let first = ids
            .iter()
            .find_map(|id| assigned().find(|o| &o.id == id))
            .and_then(|o| o.delivery_id.clone());
        return first.context("None of the requested orders is assigned to a delivery");
    }

    let mut deliveries: Vec<&str> = Vec::new();
    for id in assigned().filter_map(|o| o.delivery_id.as_deref()) {
        if !deliveries.contains(&id) {
            deliveries.push(id);
        }
    }
    match deliveries.as_slice() {
        [] => bail!("No orders are assigned to a delivery"),
        [only] => Ok(only.to_string()),
        many => bail!(
            "Orders belong to {} deliveries ({}); choose one with --delivery",
            many.len(),
            many.join(", ")
        ),
    }
}
