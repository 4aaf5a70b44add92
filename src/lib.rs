use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

pub mod chart;
pub mod components;
pub mod config;
pub mod loader;
pub mod session;
pub mod utils;

use config::{
    DEFAULT_PHOTO_ID, MAX_METRICS, MAX_SUGGESTIONS, MIN_METRICS, NAME_FIELD, PHOTO_FIELD,
    PHOTO_URL_PREFIX, PHOTO_URL_SUFFIX, POSITION_FIELD, SCALE_MIN, TEAM_FIELD, TOTAL_POINTS_FIELD,
};
use utils::parse_float_prefix;

/// One row of the players payload: column name to raw JSON value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerRecord {
    fields: BTreeMap<String, Value>,
}

/// Number text as a browser prints it: whole floats lose their `.0`.
fn number_text(n: &serde_json::Number) -> String {
    if n.is_f64() {
        n.as_f64().map(|v| v.to_string()).unwrap_or_else(|| n.to_string())
    } else {
        n.to_string()
    }
}

impl PlayerRecord {
    pub fn from_fields<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Numeric value of a field, or `None` when it is missing or does not parse.
    pub fn numeric(&self, field: &str) -> Option<f64> {
        match self.fields.get(field)? {
            Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
            Value::String(s) => parse_float_prefix(s),
            _ => None,
        }
    }

    /// Display text of a field; missing and null fields render empty.
    pub fn text(&self, field: &str) -> String {
        match self.fields.get(field) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => number_text(n),
            Some(other) => other.to_string(),
        }
    }

    pub fn name(&self) -> String {
        self.text(NAME_FIELD)
    }

    pub fn total_points(&self) -> Option<f64> {
        self.numeric(TOTAL_POINTS_FIELD)
    }

    /// Photo id, falling back to the placeholder id for empty or zero values.
    pub fn photo_id(&self) -> String {
        match self.fields.get(PHOTO_FIELD) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) if n.as_f64() != Some(0.0) => number_text(n),
            _ => DEFAULT_PHOTO_ID.to_string(),
        }
    }
}

// Error raised when the checked metrics cannot form a readable polygon
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    TooFew { selected: usize },
    TooMany { selected: usize },
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::TooFew { .. } => {
                write!(f, "Choose at least {} metrics!", MIN_METRICS)
            }
            SelectionError::TooMany { .. } => {
                write!(f, "Choose at most {} metrics!", MAX_METRICS)
            }
        }
    }
}

impl std::error::Error for SelectionError {}

/// Ordered, duplicate-free list of the metrics forming the chart axes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSelection(Vec<String>);

impl MetricSelection {
    /// Build a selection from the checked metric names, in the order given.
    ///
    /// Fails when fewer than [`MIN_METRICS`] or more than [`MAX_METRICS`]
    /// distinct metrics are checked.
    pub fn from_checked<I, S>(checked: I) -> Result<Self, SelectionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut metrics: Vec<String> = Vec::new();
        for name in checked {
            let name = name.into();
            if !metrics.contains(&name) {
                metrics.push(name);
            }
        }

        let selected = metrics.len();
        if selected < MIN_METRICS {
            return Err(SelectionError::TooFew { selected });
        }
        if selected > MAX_METRICS {
            return Err(SelectionError::TooMany { selected });
        }
        Ok(Self(metrics))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Radial scale bounds shared by every axis of the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleRange {
    pub min: f64,
    pub max: f64,
}

impl ScaleRange {
    /// Scale starting at [`SCALE_MIN`] and reaching the largest value of any
    /// selected metric (and any seed threshold).
    pub fn covering(players: &[PlayerRecord], selection: &MetricSelection, seeds: &[f64]) -> Self {
        let mut data_max = seeds.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        for player in players {
            for metric in selection.iter() {
                if let Some(v) = player.numeric(metric) {
                    data_max = data_max.max(v);
                }
            }
        }

        let max = if data_max > SCALE_MIN {
            data_max
        } else {
            SCALE_MIN + 1.0
        };
        Self {
            min: SCALE_MIN,
            max,
        }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Mean of a metric over the players whose value parses, or 0 when none does.
pub fn metric_mean(players: &[PlayerRecord], metric: &str) -> f64 {
    let (sum, count) = players
        .iter()
        .filter_map(|p| p.numeric(metric))
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Per-metric means in selection order.
pub fn metric_means(players: &[PlayerRecord], selection: &MetricSelection) -> Vec<f64> {
    selection.iter().map(|m| metric_mean(players, m)).collect()
}

/// Whether a player meets every threshold. A metric that is missing or not
/// numeric fails the player.
pub fn passes_thresholds(player: &PlayerRecord, selection: &MetricSelection, thresholds: &[f64]) -> bool {
    selection
        .iter()
        .zip(thresholds)
        .all(|(metric, &threshold)| matches!(player.numeric(metric), Some(v) if v >= threshold))
}

pub fn filter_players<'a>(
    players: &'a [PlayerRecord],
    selection: &MetricSelection,
    thresholds: &[f64],
) -> Vec<&'a PlayerRecord> {
    players
        .iter()
        .filter(|p| passes_thresholds(p, selection, thresholds))
        .collect()
}

// Highest points first; unparseable points sink to the bottom.
fn compare_points(a: &PlayerRecord, b: &PlayerRecord) -> Ordering {
    match (a.total_points(), b.total_points()) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort by total points (descending), truncated to `limit`.
pub fn rank_by_points(mut players: Vec<&PlayerRecord>, limit: usize) -> Vec<&PlayerRecord> {
    players.sort_by(|a, b| compare_points(a, b));
    players.truncate(limit);
    players
}

/// A rendered player card.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub name: String,
    pub team: String,
    pub position: String,
    pub points: String,
    pub photo_url: String,
}

impl Suggestion {
    pub fn from_player(player: &PlayerRecord) -> Self {
        Self {
            name: player.name(),
            team: player.text(TEAM_FIELD),
            position: player.text(POSITION_FIELD),
            points: player.text(TOTAL_POINTS_FIELD),
            photo_url: format!("{}{}{}", PHOTO_URL_PREFIX, player.photo_id(), PHOTO_URL_SUFFIX),
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | Points: {}",
            self.name, self.team, self.position, self.points
        )
    }
}

/// Filter, rank and convert the top matches into cards.
pub fn top_suggestions(
    players: &[PlayerRecord],
    selection: &MetricSelection,
    thresholds: &[f64],
) -> Vec<Suggestion> {
    let matched = filter_players(players, selection, thresholds);
    let total = matched.len();
    let top = rank_by_points(matched, MAX_SUGGESTIONS);
    debug!("{} of {} players pass the polygon filter", total, players.len());
    top.into_iter().map(Suggestion::from_player).collect()
}
