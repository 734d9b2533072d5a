//! Activity decision engine
//!
//! Decides how many papers to process on this invocation so the commit
//! history looks like a person's: rest days after working, lazy days,
//! ordinary single-commit days and the occasional burst.
//!
//! Skipped runs are never logged, so a string of lazy days stays visible as a
//! gap larger than one day on the next run and the forced-rest check only
//! fires right after a day with work.

use chrono::NaiveDate;
use rand::Rng;
use std::fmt;

/// Chance of resting the day after a logged run
pub const REST_CHANCE: f64 = 0.40;
/// Main roll below this: skip the day
pub const LAZY_BELOW: f64 = 0.50;
/// Main roll below this (and not lazy): one paper
pub const NORMAL_BELOW: f64 = 0.80;
/// Paper count range for a burst day
pub const BURST_RANGE: std::ops::RangeInclusive<u32> = 2..=5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// Worked yesterday and the rest roll came up
    Rest,
    Lazy { roll: f64 },
    Normal { roll: f64 },
    Burst { roll: f64, units: u32 },
}

impl Decision {
    pub fn work_units(&self) -> u32 {
        match self {
            Decision::Rest | Decision::Lazy { .. } => 0,
            Decision::Normal { .. } => 1,
            Decision::Burst { units, .. } => *units,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Rest => write!(f, "Taking a rest day after working yesterday."),
            Decision::Lazy { roll } => write!(f, "Dice Roll ({:.2}): Lazy Day. Skipping.", roll),
            Decision::Normal { roll } => write!(f, "Dice Roll ({:.2}): Normal Work Day.", roll),
            Decision::Burst { roll, units } => write!(
                f,
                "Dice Roll ({:.2}): CRUNCH MODE! Doing {} commits.",
                roll, units
            ),
        }
    }
}

/// Roll today's workload.
///
/// `last_run` is the date of the newest run-log entry. Only an exact
/// one-day gap triggers the rest check; the main roll happens otherwise or
/// when the rest roll misses.
pub fn decide<R: Rng + ?Sized>(last_run: Option<NaiveDate>, today: NaiveDate, rng: &mut R) -> Decision {
    if let Some(last) = last_run {
        if (today - last).num_days() == 1 && rng.gen::<f64>() < REST_CHANCE {
            return Decision::Rest;
        }
    }

    let roll: f64 = rng.gen();
    if roll < LAZY_BELOW {
        Decision::Lazy { roll }
    } else if roll < NORMAL_BELOW {
        Decision::Normal { roll }
    } else {
        Decision::Burst {
            roll,
            units: rng.gen_range(BURST_RANGE),
        }
    }
}
