use std::fmt;

use crate::category::Category;
use crate::model::Activity;

const BASE_SCORE: u32 = 45;
const PER_ACTIVITY: u32 = 5;
const MAX_INCREMENT: u32 = 55;

/// Life balance score for a number of planned activities: 45 for an
/// empty plan, 5 more per activity, capped at 100.
pub fn balance_score(count: usize) -> u32 {
    let count = u32::try_from(count).unwrap_or(u32::MAX);
    let increment = count.saturating_mul(PER_ACTIVITY).min(MAX_INCREMENT);
    (BASE_SCORE + increment).min(100)
}

/// Coarse reading of a balance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceBand {
    Low,
    Medium,
    High,
}

impl BalanceBand {
    pub fn of(score: u32) -> Self {
        if score < 50 {
            BalanceBand::Low
        } else if score < 75 {
            BalanceBand::Medium
        } else {
            BalanceBand::High
        }
    }
}

impl fmt::Display for BalanceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceBand::Low => f.write_str("low"),
            BalanceBand::Medium => f.write_str("medium"),
            BalanceBand::High => f.write_str("high"),
        }
    }
}

/// Figures shown on the metrics panel.
#[derive(Debug, PartialEq, Eq)]
pub struct Summary {
    pub count: usize,
    pub total_minutes: i64,
    pub outdoor_minutes: i64,
    pub balance_score: u32,
    pub band: BalanceBand,
}

impl Summary {
    pub fn of(activities: &[Activity]) -> Self {
        let balance_score = balance_score(activities.len());
        Summary {
            count: activities.len(),
            total_minutes: minutes(activities.iter()),
            outdoor_minutes: minutes(
                activities
                    .iter()
                    .filter(|a| a.category == Category::Outdoor),
            ),
            balance_score,
            band: BalanceBand::of(balance_score),
        }
    }
}

fn minutes<'a>(activities: impl Iterator<Item = &'a Activity>) -> i64 {
    activities.fold(0i64, |total, a| total.saturating_add(a.duration))
}

/// Format minutes as "45m", "2h" or "1h 30m". Anything under an hour,
/// negative values included, stays in minutes.
pub fn fmt_minutes(minutes: i64) -> String {
    if minutes < 60 {
        return format!("{}m", minutes);
    }
    let (hours, mins) = (minutes / 60, minutes % 60);
    if mins > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}h", hours)
    }
}
