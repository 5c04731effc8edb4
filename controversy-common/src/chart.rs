//! Pie-chart wedge computation
//!
//! Converts an ordered list of boolean-tagged items into equal-weighted
//! wedges. Each category (data / opinion / advice) is charted on its own,
//! so callers partition first with [`partition_by_category`] and then run
//! [`compute_wedges`] per bucket.
//!
//! # Angle convention
//!
//! Angles are radians, counter-clockwise from the positive x axis. Start
//! angles are the cumulative sum of the per-item widths beginning at 0; each
//! end angle is the next item's start angle, and the last end angle is
//! `0.0` rather than `2π`. Both values describe the same point on the circle,
//! but a consumer subtracting `end - start` on the last wedge will get a
//! negative number. Use [`Wedge::sweep`], which folds the wrap back in.

use serde::Serialize;
use std::f64::consts::TAU;

use crate::db::models::{Category, DataPoint};

/// Tolerance used when comparing accumulated angles
pub const ANGLE_EPSILON: f64 = 1e-9;

/// One chartable item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartItem {
    pub name: String,
    pub url: String,
    pub boolean: bool,
}

impl From<&DataPoint> for ChartItem {
    fn from(point: &DataPoint) -> Self {
        Self {
            name: point.name.clone(),
            url: point.url.clone(),
            boolean: point.boolean,
        }
    }
}

/// A chart item together with its computed slice of the pie
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wedge {
    #[serde(flatten)]
    pub item: ChartItem,
    /// Share of the pie in percent
    pub weight: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Wedge {
    /// Angular width of the wedge in radians, in `(0, 2π]`
    ///
    /// An end angle at or before the start angle is read as having wrapped
    /// past the positive x axis, which covers the final wedge (end forced
    /// to 0) and the single-item chart (start = end = 0, a full circle).
    pub fn sweep(&self) -> f64 {
        if self.end_angle <= self.start_angle + ANGLE_EPSILON {
            self.end_angle + TAU - self.start_angle
        } else {
            self.end_angle - self.start_angle
        }
    }

    /// True when the wedge covers the whole pie
    pub fn is_full_circle(&self) -> bool {
        (self.sweep() - TAU).abs() < ANGLE_EPSILON
    }
}

/// Per-item weight in percent for a chart of `count` equal items
///
/// An empty chart gets the whole 100% assigned to nothing, so no caller
/// ever divides by zero.
pub fn wedge_weight(count: usize) -> f64 {
    if count == 0 {
        100.0
    } else {
        100.0 / count as f64
    }
}

/// Compute equal-weighted wedges for `items`, in order
///
/// Returns an empty vector for an empty input.
pub fn compute_wedges(items: Vec<ChartItem>) -> Vec<Wedge> {
    let weight = wedge_weight(items.len());
    let width = (weight / 100.0) * TAU;
    let count = items.len();

    let mut wedges = Vec::with_capacity(count);
    let mut start = 0.0_f64;

    for (i, item) in items.into_iter().enumerate() {
        let next = start + width;
        // Last wedge closes on 0 instead of 2π
        let end = if i + 1 == count { 0.0 } else { next };

        wedges.push(Wedge {
            item,
            weight,
            start_angle: start,
            end_angle: end,
        });
        start = next;
    }

    wedges
}

/// Data points split by category, each bucket keeping input order
#[derive(Debug, Default, Clone)]
pub struct CategoryBuckets {
    pub data: Vec<ChartItem>,
    pub opinion: Vec<ChartItem>,
    pub advice: Vec<ChartItem>,
}

impl CategoryBuckets {
    /// Bucket for one category
    pub fn get(&self, category: Category) -> &[ChartItem] {
        match category {
            Category::Data => &self.data,
            Category::Opinion => &self.opinion,
            Category::Advice => &self.advice,
        }
    }

    /// Consume the buckets, yielding `(category, items)` in display order
    pub fn into_iter_ordered(self) -> impl Iterator<Item = (Category, Vec<ChartItem>)> {
        [
            (Category::Data, self.data),
            (Category::Opinion, self.opinion),
            (Category::Advice, self.advice),
        ]
        .into_iter()
    }
}

/// Partition data points into the three category buckets
pub fn partition_by_category<'a, I>(points: I) -> CategoryBuckets
where
    I: IntoIterator<Item = &'a DataPoint>,
{
    let mut buckets = CategoryBuckets::default();
    for point in points {
        let item = ChartItem::from(point);
        match point.category {
            Category::Data => buckets.data.push(item),
            Category::Opinion => buckets.opinion.push(item),
            Category::Advice => buckets.advice.push(item),
        }
    }
    buckets
}
