use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::filter::{filtered_indices, FilterState};
use super::model::{fields, Dataset, Row};

/// Label used when a row has no value for a grouped field.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// How many manufacturers the ranking keeps.
pub const TOP_MANUFACTURERS: usize = 10;

// ---------------------------------------------------------------------------
// Chart datasets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Share per category, in first-seen order.
    Distribution,
    /// Descending by count.
    Ranking,
    /// Ascending by label (a year).
    TimeSeries,
}

/// Ordered `label → count` pairs handed to a chart widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartDataset {
    pub kind: ChartKind,
    pub points: Vec<(String, usize)>,
}

impl ChartDataset {
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|(l, _)| l.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = usize> + '_ {
        self.points.iter().map(|(_, v)| *v)
    }

    pub fn total(&self) -> usize {
        self.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Count occurrences per label, keeping the order in which labels first appear.
fn count_in_first_seen_order<'r, I>(labels: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'r str>,
{
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for label in labels {
        match slots.get(label) {
            Some(&i) => counts[i].1 += 1,
            None => {
                slots.insert(label, counts.len());
                counts.push((label, 1));
            }
        }
    }
    counts
        .into_iter()
        .map(|(label, n)| (label.to_string(), n))
        .collect()
}

/// Vehicle count per type. Rows without a type are counted under
/// [`UNKNOWN_LABEL`]; the row itself is left alone.
pub fn distribution_by_type(rows: &[&Row]) -> ChartDataset {
    let points = count_in_first_seen_order(
        rows.iter()
            .map(|r| r.non_empty(fields::VEHICLE_TYPE).unwrap_or(UNKNOWN_LABEL)),
    );
    ChartDataset {
        kind: ChartKind::Distribution,
        points,
    }
}

/// The `limit` most common manufacturers, most common first. Equal counts keep
/// their first-seen order. Makes are grouped by their stored value, so a
/// blank make forms its own (empty-labelled) group.
pub fn top_manufacturers(rows: &[&Row], limit: usize) -> ChartDataset {
    let mut points =
        count_in_first_seen_order(rows.iter().map(|r| r.get(fields::MAKE).unwrap_or("")));
    // `sort_by` is stable, which is what breaks ties.
    points.sort_by(|a, b| b.1.cmp(&a.1));
    points.truncate(limit);
    ChartDataset {
        kind: ChartKind::Ranking,
        points,
    }
}

/// Vehicle count per model year, oldest first. Rows without a year are left
/// out. Labels that are not numbers sort after every numeric year.
pub fn yearly_trend(rows: &[&Row]) -> ChartDataset {
    let mut points =
        count_in_first_seen_order(rows.iter().filter_map(|r| r.non_empty(fields::MODEL_YEAR)));
    points.sort_by(|a, b| compare_years(&a.0, &b.0));
    ChartDataset {
        kind: ChartKind::TimeSeries,
        points,
    }
}

fn compare_years(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => Ordering::Equal,
    }
}

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

/// Headline numbers for the summary cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalyticsSummary {
    pub total_vehicles: usize,
    pub unique_makes: usize,
    pub unique_models: usize,
    pub unique_cities: usize,
    /// Rounded mean electric range; 0 when no row has a numeric range.
    pub average_range: i64,
    /// Electric range at index `n / 2` of the sorted values; 0 when no row has
    /// a numeric range.
    pub median_range: i64,
    /// Rows that contributed to the range statistics.
    pub ranged_vehicles: usize,
}

/// Parse a leading integer the way a lenient number field is usually read:
/// optional leading whitespace, an optional sign, then at least one digit.
/// Anything after the digits is ignored.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Mean rounded half toward positive infinity.
fn rounded_mean(values: &[i64]) -> i64 {
    if values.is_empty() {
        return 0;
    }
    // Widened so any number of i64 values sums without overflow.
    let sum: i128 = values.iter().map(|&v| i128::from(v)).sum();
    (sum as f64 / values.len() as f64 + 0.5).floor() as i64
}

/// The element at index `n / 2` of the sorted values, never an average of the
/// two middle values. `[10, 20, 30, 40]` gives 30.
fn index_median(sorted: &[i64]) -> i64 {
    sorted.get(sorted.len() / 2).copied().unwrap_or(0)
}

fn unique_count(rows: &[&Row], field: &str) -> usize {
    rows.iter()
        .filter_map(|r| r.non_empty(field))
        .collect::<HashSet<_>>()
        .len()
}

pub fn summarize(rows: &[&Row]) -> AnalyticsSummary {
    let mut ranges: Vec<i64> = rows
        .iter()
        .filter_map(|r| r.get(fields::ELECTRIC_RANGE).and_then(parse_leading_int))
        .collect();
    ranges.sort_unstable();

    AnalyticsSummary {
        total_vehicles: rows.len(),
        unique_makes: unique_count(rows, fields::MAKE),
        unique_models: unique_count(rows, fields::MODEL),
        unique_cities: unique_count(rows, fields::CITY),
        average_range: rounded_mean(&ranges),
        median_range: index_median(&ranges),
        ranged_vehicles: ranges.len(),
    }
}

// ---------------------------------------------------------------------------
// Snapshot – everything the presentation layer needs after a filter change
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Positions of the filtered rows within the dataset.
    #[serde(skip)]
    pub indices: Vec<usize>,
    pub vehicle_types: ChartDataset,
    pub top_manufacturers: ChartDataset,
    pub yearly_trend: ChartDataset,
    pub summary: AnalyticsSummary,
}

impl Default for Snapshot {
    fn default() -> Self {
        Snapshot::from_rows(Vec::new(), &[])
    }
}

impl Snapshot {
    /// Filter `dataset` and derive every chart and the summary from the result.
    pub fn compute(dataset: &Dataset, search: &str, filters: &FilterState) -> Self {
        let indices = filtered_indices(dataset, search, filters);
        let rows: Vec<&Row> = indices.iter().map(|&i| &dataset.rows[i]).collect();
        Snapshot::from_rows(indices, &rows)
    }

    fn from_rows(indices: Vec<usize>, rows: &[&Row]) -> Self {
        Snapshot {
            vehicle_types: distribution_by_type(rows),
            top_manufacturers: top_manufacturers(rows, TOP_MANUFACTURERS),
            yearly_trend: yearly_trend(rows),
            summary: summarize(rows),
            indices,
        }
    }

    /// Borrow the filtered rows from the dataset the snapshot was computed on.
    pub fn rows<'d>(&'d self, dataset: &'d Dataset) -> impl Iterator<Item = &'d Row> + 'd {
        self.indices.iter().filter_map(move |&i| dataset.rows.get(i))
    }
}
