//! Aggregate playability metrics and report rendering.
use colored::Colorize;
use serde::Serialize;

use nightshift_game::{NightOutcome, NightSummary};

use crate::policy::DefensePolicy;

/// One finished run in a batch.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub night: u32,
    pub seed: u64,
    pub policy: &'static str,
    pub outcome: NightOutcome,
    pub hours: u8,
    pub power_remaining: f32,
}

impl RunRecord {
    pub fn new(seed: u64, policy: DefensePolicy, summary: &NightSummary) -> Self {
        Self {
            night: summary.night,
            seed,
            policy: policy.as_str(),
            outcome: summary.outcome,
            hours: summary.hour_reached,
            power_remaining: summary.power_remaining,
        }
    }
}

/// Aggregate over one (night, policy) cell.
#[derive(Debug, Clone, Serialize)]
pub struct CellAggregate {
    pub night: u32,
    pub policy: &'static str,
    pub runs: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub mean_hours: f64,
    pub mean_power_remaining: f64,
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn aggregate(night: u32, policy: DefensePolicy, records: &[RunRecord]) -> CellAggregate {
    let runs = records.len().max(1);
    let wins = records
        .iter()
        .filter(|r| r.outcome == NightOutcome::Survived)
        .count();
    CellAggregate {
        night,
        policy: policy.as_str(),
        runs: records.len(),
        wins,
        win_rate: wins as f64 / runs as f64,
        mean_hours: records.iter().map(|r| f64::from(r.hours)).sum::<f64>() / runs as f64,
        mean_power_remaining: records
            .iter()
            .map(|r| f64::from(r.power_remaining))
            .sum::<f64>()
            / runs as f64,
    }
}

pub fn print_console(cells: &[CellAggregate]) {
    println!("{}", "NIGHTSHIFT PLAYABILITY REPORT".bold());
    for cell in cells {
        let rate = format!("{:5.1}%", cell.win_rate * 100.0);
        let rate = if cell.win_rate >= 0.5 {
            rate.green()
        } else {
            rate.red()
        };
        println!(
            "  night {} | {:<8} | {} wins {rate} | avg {:.1}h | avg power {:.1}%",
            cell.night,
            cell.policy,
            format!("{}/{}", cell.wins, cell.runs),
            cell.mean_hours,
            cell.mean_power_remaining,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(outcome: NightOutcome, hours: u8, power: f32) -> RunRecord {
        RunRecord {
            night: 1,
            seed: 1,
            policy: "reactive",
            outcome,
            hours,
            power_remaining: power,
        }
    }

    #[test]
    fn aggregate_computes_rates_and_means() {
        let records = vec![
            record(NightOutcome::Survived, 6, 40.0),
            record(NightOutcome::Caught, 2, 0.0),
        ];
        let cell = aggregate(1, DefensePolicy::Reactive, &records);
        assert_eq!(cell.runs, 2);
        assert_eq!(cell.wins, 1);
        assert!((cell.win_rate - 0.5).abs() < f64::EPSILON);
        assert!((cell.mean_hours - 4.0).abs() < f64::EPSILON);
        assert!((cell.mean_power_remaining - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn aggregate_tolerates_an_empty_cell() {
        let cell = aggregate(2, DefensePolicy::Passive, &[]);
        assert_eq!(cell.runs, 0);
        assert!((cell.win_rate).abs() < f64::EPSILON);
    }
}
