//! Route planning command handlers

use std::fmt::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveTime;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::services::adjacency::{summarize, RoutePlan};
use crate::services::order_cache::{route_from_orders, JsonFileOrderSource, OrderCache};
use crate::services::routing::{create_routing_service, refine_segments};
use crate::services::schedule::{compute_schedule_with_segments, ScheduleResult};
use crate::services::timing::format_minutes;
use crate::types::{split_pool, Coordinates, RouteSummary, Segment, SkippedStop};

pub struct PlanOptions {
    pub file: Option<PathBuf>,
    pub delivery: Option<String>,
    pub ids: Option<Vec<String>>,
    pub start: Option<NaiveTime>,
    pub refine: bool,
    pub json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport {
    pub delivery_id: String,
    pub stop_ids: Vec<String>,
    /// Requested ids that are not orders of the delivery
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved_ids: Vec<String>,
    pub segments: Vec<Segment>,
    pub skipped: Vec<SkippedStop>,
    pub summary: RouteSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ScheduleResult>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolEntry {
    pub id: String,
    pub customer: Option<String>,
    pub complexity: u32,
    pub priority: u32,
    pub location: Option<Coordinates>,
}

fn orders_cache(config: &Config, file: Option<PathBuf>) -> Result<OrderCache<JsonFileOrderSource>> {
    let path = file
        .or_else(|| config.orders_file.clone())
        .context("No order file given and ORDERS_FILE is not set")?;
    debug!("Reading orders from {}", path.display());
    Ok(OrderCache::new(JsonFileOrderSource::new(path)))
}

/// Handle `plan`: segments, totals and optional schedule for a route
pub async fn handle_plan(config: &Config, options: PlanOptions) -> Result<String> {
    let cache = orders_cache(config, options.file)?;
    let orders = cache.get().await?;
    let route = route_from_orders(&orders, options.delivery.as_deref(), options.ids.as_deref())?;
    let plan = RoutePlan::new(route.sequence, config.estimator());

    info!(
        delivery_id = %route.delivery_id,
        stops = plan.sequence().len(),
        segments = plan.segments().len(),
        skipped = plan.skipped().len(),
        "Route plan computed"
    );

    let segments = if options.refine {
        refine(config, &plan).await?
    } else {
        plan.segments().to_vec()
    };

    let report = PlanReport {
        delivery_id: route.delivery_id,
        unresolved_ids: route.unresolved,
        stop_ids: plan.sequence().ids().into_iter().map(String::from).collect(),
        summary: summarize(&segments),
        schedule: options
            .start
            .map(|start| compute_schedule_with_segments(&plan, &segments, start)),
        skipped: plan.skipped().to_vec(),
        segments,
    };

    if options.json {
        Ok(serde_json::to_string_pretty(&report)?)
    } else {
        render_plan(&report)
    }
}

/// Refine with the configured provider; Ctrl-C cancels
async fn refine(config: &Config, plan: &RoutePlan) -> Result<Vec<Segment>> {
    let service = create_routing_service(config);
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling routing requests");
            trigger.cancel();
        }
    });

    let result = refine_segments(plan, service.as_ref(), &cancel, config.routing_max_retries).await;
    ctrl_c.abort();
    Ok(result?)
}

fn render_plan(report: &PlanReport) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "Delivery {}", report.delivery_id)?;

    for s in &report.segments {
        writeln!(
            out,
            "{} -> {}  {:.2} km  drive {} + handling {} = {}",
            s.from_id,
            s.to_id,
            s.distance_km,
            format_minutes(s.drive_minutes),
            format_minutes(s.handling_minutes),
            format_minutes(s.total_minutes()),
        )?;
    }

    let summary = &report.summary;
    writeln!(
        out,
        "Total: {} segments, {:.2} km, drive {}, handling {}, overall {}",
        summary.segment_count,
        summary.total_distance_km,
        format_minutes(summary.total_drive_minutes),
        format_minutes(summary.total_handling_minutes),
        format_minutes(summary.total_minutes),
    )?;

    for skipped in &report.skipped {
        writeln!(
            out,
            "Skipped {} at position {}: {}",
            skipped.id,
            skipped.index + 1,
            skipped.reason.as_str()
        )?;
    }

    for id in &report.unresolved_ids {
        writeln!(out, "Not in delivery: {}", id)?;
    }

    if let Some(schedule) = &report.schedule {
        for stop in &schedule.stops {
            writeln!(
                out,
                "{}  arrive {}  depart {}",
                stop.stop_id,
                stop.estimated_arrival.format("%H:%M"),
                stop.estimated_departure.format("%H:%M"),
            )?;
        }
        writeln!(out, "Finish: {}", schedule.finish.format("%H:%M"))?;
    }

    Ok(out)
}

/// Handle `pool`: orders without a delivery
pub async fn handle_pool(config: &Config, file: Option<PathBuf>, json: bool) -> Result<String> {
    let cache = orders_cache(config, file)?;
    let orders = cache.get().await?;
    let (pool, assigned) = split_pool(orders.as_ref().clone());
    info!(unassigned = pool.len(), assigned = assigned.len(), "Order pool loaded");

    let entries: Vec<PoolEntry> = pool
        .iter()
        .map(|o| PoolEntry {
            id: o.id.clone(),
            customer: o.customer_name().map(String::from),
            complexity: o.complexity(),
            priority: o.priority(),
            location: o.coordinates(),
        })
        .collect();

    if json {
        return Ok(serde_json::to_string_pretty(&entries)?);
    }

    let mut out = String::new();
    for e in &entries {
        writeln!(
            out,
            "{}  complexity {}  priority {}  {}",
            e.id,
            e.complexity,
            e.priority,
            e.customer.as_deref().unwrap_or("-"),
        )?;
    }
    writeln!(out, "{} unassigned, {} assigned", entries.len(), assigned.len())?;
    Ok(out)
}
