//! Detail view assembly
//!
//! Loads a controversy with its data points and turns the points into one
//! chart per category.

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use controversy_common::chart::{compute_wedges, partition_by_category, wedge_weight, Wedge};
use controversy_common::db::{get_controversy_by_slug, list_data_points_for};
use controversy_common::{Category, Controversy, DataPoint, Result};

use crate::render::chart::render_pie;

/// One category's chart: computed wedges plus ready-to-embed markup
#[derive(Debug, Clone, Serialize)]
pub struct ChartDescriptor {
    pub category: Category,
    pub label: &'static str,
    /// Per-wedge weight in percent
    pub weight: f64,
    pub wedges: Vec<Wedge>,
    pub markup: String,
}

/// Everything the detail page shows
#[derive(Debug, Clone)]
pub struct DetailContext {
    pub controversy: Controversy,
    pub points: Vec<DataPoint>,
    pub charts: Vec<ChartDescriptor>,
}

/// Build the data, opinion and advice charts, in that order
pub fn build_charts(points: &[DataPoint]) -> Vec<ChartDescriptor> {
    partition_by_category(points)
        .into_iter_ordered()
        .map(|(category, items)| {
            let weight = wedge_weight(items.len());
            let wedges = compute_wedges(items);
            let markup = render_pie(category, &wedges);
            ChartDescriptor {
                category,
                label: category.label(),
                weight,
                wedges,
                markup,
            }
        })
        .collect()
}

pub async fn load_detail(pool: &SqlitePool, slug: &str) -> Result<DetailContext> {
    let controversy = get_controversy_by_slug(pool, slug).await?;
    let points = list_data_points_for(pool, controversy.id).await?;
    let charts = build_charts(&points);

    debug!(
        "Assembled detail for '{}': {} point(s), wedges per chart {:?}",
        controversy.slug,
        points.len(),
        charts.iter().map(|c| c.wedges.len()).collect::<Vec<_>>()
    );

    Ok(DetailContext {
        controversy,
        points,
        charts,
    })
}
