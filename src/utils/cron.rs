use crate::config::JobSchedule;
use std::time::Duration;

/// How a job is triggered once resolved from config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    /// A 6-field cron expression, seconds first.
    Cron { desc: String, expr: String },
    /// A fixed interval between runs, counted from scheduler start.
    Every { desc: String, interval: Duration },
}

impl Schedule {
    pub fn desc(&self) -> &str {
        match self {
            Schedule::Cron { desc, .. } | Schedule::Every { desc, .. } => desc,
        }
    }
}

pub fn describe_interval(seconds: u64) -> String {
    if seconds < 60 {
        format!("every {} seconds", seconds)
    } else if seconds % 3600 == 0 {
        format!("every {} hours", seconds / 3600)
    } else if seconds % 60 == 0 {
        format!("every {} minutes", seconds / 60)
    } else {
        format!("every {} minutes {} seconds", seconds / 60, seconds % 60)
    }
}

/// Resolves a configured schedule. An explicit expression wins over an
/// interval; a zero interval does not resolve.
pub fn resolve_schedule(schedule: &JobSchedule) -> Option<Schedule> {
    match (&schedule.expr, schedule.seconds) {
        (Some(expr), _) if !expr.trim().is_empty() => Some(Schedule::Cron {
            desc: format!("cron '{}'", expr.trim()),
            expr: expr.trim().to_string(),
        }),
        (_, Some(seconds)) if seconds > 0 => Some(Schedule::Every {
            desc: describe_interval(seconds),
            interval: Duration::from_secs(seconds),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn every(seconds: u64) -> Schedule {
        resolve_schedule(&JobSchedule {
            expr: None,
            seconds: Some(seconds),
        })
        .unwrap()
    }

    #[test]
    fn intervals_keep_their_exact_period() {
        for seconds in [45, 90, 900, 5400, 7200, 259_200] {
            match every(seconds) {
                Schedule::Every { interval, .. } => {
                    assert_eq!(interval, Duration::from_secs(seconds))
                }
                other => panic!("{seconds}s resolved to {other:?}"),
            }
        }
    }

    #[test]
    fn interval_descriptions_match_the_period() {
        assert_eq!(every(45).desc(), "every 45 seconds");
        assert_eq!(every(90).desc(), "every 1 minutes 30 seconds");
        assert_eq!(every(900).desc(), "every 15 minutes");
        assert_eq!(every(5400).desc(), "every 90 minutes");
        assert_eq!(every(259_200).desc(), "every 72 hours");
    }

    #[test]
    fn expression_wins_over_interval() {
        let schedule = JobSchedule {
            expr: Some(" 0 0 0 * * * ".to_string()),
            seconds: Some(60),
        };
        assert_eq!(
            resolve_schedule(&schedule),
            Some(Schedule::Cron {
                desc: "cron '0 0 0 * * *'".to_string(),
                expr: "0 0 0 * * *".to_string(),
            })
        );
    }

    #[test]
    fn empty_schedule_does_not_resolve() {
        assert!(resolve_schedule(&JobSchedule::default()).is_none());
        let blank = JobSchedule {
            expr: Some("  ".to_string()),
            seconds: None,
        };
        assert!(resolve_schedule(&blank).is_none());
        let zero = JobSchedule {
            expr: None,
            seconds: Some(0),
        };
        assert!(resolve_schedule(&zero).is_none());
    }
}
