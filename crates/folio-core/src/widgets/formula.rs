//! Pure formulas behind the calculator widgets.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(\.\d+)?").expect("number pattern"));
static DAYS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*days?").expect("days pattern"));
static MULTIPLIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(\.\d+)?)").expect("multiplier pattern"));

pub const PUBLISHERS_SHARE: f64 = 0.60;
pub const VALIDATORS_SHARE: f64 = 0.25;
/// Burn and stakers split this pool evenly.
pub const POOL_SHARE: f64 = 0.15;

/// First numeric token after stripping thousands separators; `NaN` when there is none.
pub fn number_from_text(text: &str) -> f64 {
    let cleaned = text.replace(',', "");
    NUMBER_RE
        .find(cleaned.trim())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// `w = sqrt(max(stake, 0)) * reputation`.
pub fn feedback_weight(stake: f64, reputation: f64) -> f64 {
    stake.max(0.0).sqrt() * reputation
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SybilComparison {
    pub many: f64,
    pub one: f64,
    /// `None` when the single account has no weight.
    pub ratio: Option<f64>,
}

pub fn sybil_comparison(
    accounts: f64,
    stake_per_account: f64,
    rep_per_account: f64,
    single_stake: f64,
    single_rep: f64,
) -> SybilComparison {
    let many = accounts * feedback_weight(stake_per_account, rep_per_account);
    let one = feedback_weight(single_stake, single_rep);
    let ratio = (one > 0.0).then(|| many / one);
    SybilComparison { many, one, ratio }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RevenueSplit {
    pub publishers: f64,
    pub validators: f64,
    pub burn: f64,
    pub stakers: f64,
}

impl RevenueSplit {
    pub fn as_array(&self) -> [f64; 4] {
        [self.publishers, self.validators, self.burn, self.stakers]
    }
}

pub fn revenue_split(total: f64) -> RevenueSplit {
    let half_pool = POOL_SHARE / 2.0;
    RevenueSplit {
        publishers: total * PUBLISHERS_SHARE,
        validators: total * VALIDATORS_SHARE,
        burn: total * half_pool,
        stakers: total * half_pool,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LockPoint {
    pub days: u32,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScheduleSource {
    Table,
    Default,
}

/// Lock-duration multipliers, read from the document's table when it has usable rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LockSchedule {
    points: Vec<LockPoint>,
    source: ScheduleSource,
}

impl Default for LockSchedule {
    fn default() -> Self {
        Self {
            points: vec![
                LockPoint { days: 30, multiplier: 1.0 },
                LockPoint { days: 90, multiplier: 1.25 },
                LockPoint { days: 180, multiplier: 1.5 },
                LockPoint { days: 365, multiplier: 2.0 },
            ],
            source: ScheduleSource::Default,
        }
    }
}

impl LockSchedule {
    /// Parses body rows (`N day(s)` in the first cell, first decimal in the second). Rows that
    /// do not parse are skipped; if none parse the default schedule is used.
    pub fn from_rows(rows: &[Vec<String>]) -> Self {
        let points: Vec<LockPoint> = rows
            .iter()
            .filter_map(|row| {
                let days = DAYS_RE
                    .captures(row.first()?)?
                    .get(1)?
                    .as_str()
                    .parse::<u32>()
                    .ok()?;
                let multiplier = MULTIPLIER_RE
                    .captures(row.get(1)?)?
                    .get(1)?
                    .as_str()
                    .parse::<f64>()
                    .ok()?;
                Some(LockPoint { days, multiplier })
            })
            .collect();

        if points.is_empty() {
            tracing::warn!(
                rows = rows.len(),
                "lock multiplier table has no parseable rows; using default schedule"
            );
            return Self::default();
        }
        Self {
            points,
            source: ScheduleSource::Table,
        }
    }

    pub fn points(&self) -> &[LockPoint] {
        &self.points
    }

    pub fn source(&self) -> ScheduleSource {
        self.source
    }

    pub fn last(&self) -> Option<&LockPoint> {
        self.points.last()
    }

    /// Multiplier for an exact duration, else the first point's.
    pub fn multiplier_for(&self, days: u32) -> f64 {
        self.points
            .iter()
            .find(|p| p.days == days)
            .or_else(|| self.points.first())
            .map_or(1.0, |p| p.multiplier)
    }

    /// `stake * multiplier` per point.
    pub fn staking_power(&self, stake: f64) -> Vec<f64> {
        self.points.iter().map(|p| stake * p.multiplier).collect()
    }
}

/// `stake * lock multiplier * reputation`.
pub fn voting_power(stake: f64, multiplier: f64, reputation: f64) -> f64 {
    stake * multiplier * reputation
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricGrowth {
    pub earlier: f64,
    pub later: f64,
    pub percent: bool,
    /// `None` when the earlier value is not positive.
    pub growth: Option<f64>,
}

pub fn metric_growth(earlier: &str, later: &str) -> MetricGrowth {
    let a = number_from_text(earlier);
    let b = number_from_text(later);
    let growth = (a > 0.0).then(|| b / a).filter(|g| g.is_finite());
    MetricGrowth {
        earlier: a,
        later: b,
        percent: earlier.contains('%') || later.contains('%'),
        growth,
    }
}

pub const PLACEHOLDER: &str = "—";

/// Groups the integer part with commas and keeps at most `max_fraction_digits` decimals,
/// trimming trailing zeros. Non-finite input renders as an em dash placeholder.
pub fn format_number(value: f64, max_fraction_digits: usize) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    let fixed = format!("{:.*}", max_fraction_digits, value);
    let (int_part, frac) = match fixed.split_once('.') {
        Some((int_part, frac)) => (int_part, frac.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };
    let (negative, digits) = match int_part.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, int_part),
    };

    let mut out = String::with_capacity(fixed.len() + digits.len() / 3);
    if negative && !(digits.chars().all(|c| c == '0') && frac.is_empty()) {
        out.push('-');
    }
    let len = digits.len();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// `format_number` with an `x` suffix, or the placeholder alone.
pub fn format_multiplier(value: Option<f64>, max_fraction_digits: usize) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{}x", format_number(v, max_fraction_digits)),
        None => PLACEHOLDER.to_string(),
    }
}
