//! Market breadth and top movers derived from the overview.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::rounding::{round_half_away, PRICE_DP};
use crate::{OverviewEntry, SessionDate};

/// Default number of gainers and losers reported.
pub const DEFAULT_TOP_MOVERS: usize = 5;

/// An instrument that moved during the latest session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mover {
    pub code: String,
    pub name: String,
    pub close: Option<f64>,
    pub change: f64,
    pub change_percent: f64,
}

impl From<&OverviewEntry> for Mover {
    fn from(entry: &OverviewEntry) -> Self {
        Self {
            code: entry.session.code.clone(),
            name: entry.session.name.clone(),
            close: entry.session.close,
            change: entry.change,
            change_percent: entry.change_percent,
        }
    }
}

/// Breadth, turnover and top movers for the latest session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSummary {
    pub session_date: Option<SessionDate>,
    pub instrument_count: usize,
    pub advancing: usize,
    pub declining: usize,
    pub unchanged: usize,
    pub total_volume: i64,
    pub total_capital: f64,
    pub top_gainers: Vec<Mover>,
    pub top_losers: Vec<Mover>,
}

/// Summarize overview entries, keeping up to `top` gainers and losers.
///
/// Each instrument counts once, through its first entry.
pub fn summarize(entries: &[OverviewEntry], top: usize) -> MarketSummary {
    let mut seen = HashSet::new();
    let entries: Vec<&OverviewEntry> = entries
        .iter()
        .filter(|entry| seen.insert(entry.session.code.as_str()))
        .collect();

    let mut summary = MarketSummary {
        session_date: entries.first().map(|entry| entry.session.session_date),
        instrument_count: entries.len(),
        ..MarketSummary::default()
    };

    let mut capital = 0.0;
    for entry in &entries {
        match entry.change_percent.partial_cmp(&0.0) {
            Some(Ordering::Greater) => summary.advancing += 1,
            Some(Ordering::Less) => summary.declining += 1,
            _ => summary.unchanged += 1,
        }
        summary.total_volume = summary
            .total_volume
            .saturating_add(entry.session.volume_traded.unwrap_or(0));
        capital += entry.session.capital_traded.unwrap_or(0.0);
    }
    summary.total_capital = round_half_away(capital, PRICE_DP);

    let mut gainers: Vec<&OverviewEntry> = entries
        .iter()
        .copied()
        .filter(|entry| entry.change_percent > 0.0)
        .collect();
    gainers.sort_by(|left, right| {
        right
            .change_percent
            .total_cmp(&left.change_percent)
            .then_with(|| left.session.code.cmp(&right.session.code))
    });
    summary.top_gainers = gainers.into_iter().take(top).map(Mover::from).collect();

    let mut losers: Vec<&OverviewEntry> = entries
        .iter()
        .copied()
        .filter(|entry| entry.change_percent < 0.0)
        .collect();
    losers.sort_by(|left, right| {
        left.change_percent
            .total_cmp(&right.change_percent)
            .then_with(|| left.session.code.cmp(&right.session.code))
    });
    summary.top_losers = losers.into_iter().take(top).map(Mover::from).collect();

    summary
}
