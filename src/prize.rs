//! Prize draw configuration.
//!
//! A stored prize is turned into [`DrawRules`] before any eligibility work is
//! done. Contradictory configurations are rejected here and surfaced to the
//! caller as [`Error::Configuration`], never resolved silently.

use crate::{Error, Result};
use entity::{prize, speed_run};

/// Inclusive window of donation receive times, in unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawWindow {
    pub start: i64,
    pub end: i64,
}

impl DrawWindow {
    pub fn contains(&self, time: i64) -> bool {
        self.start <= time && time <= self.end
    }
}

/// Validated draw settings of a single prize.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRules {
    pub prize_id: i32,
    pub event_id: i32,
    pub category_id: Option<i32>,
    /// cents, always positive
    pub minimum_bid: i64,
    /// cents, unbounded if not set
    pub maximum_bid: Option<i64>,
    pub sum_donations: bool,
    pub random_draw: bool,
    pub ticket_draw: bool,
    pub max_winners: usize,
    pub window: Option<DrawWindow>,
}

fn invalid(msg: &str) -> Error {
    Error::Configuration(msg.to_owned())
}

impl DrawRules {
    /// Validate a prize together with its window runs.
    ///
    /// `start_run` and `end_run` must be the runs referenced by
    /// `start_run_id` and `end_run_id`, or `None` when the prize has none or
    /// the referenced run does not exist.
    pub fn new(
        prize: &prize::Model,
        start_run: Option<&speed_run::Model>,
        end_run: Option<&speed_run::Model>,
    ) -> Result<Self> {
        if prize.minimum_bid <= 0 {
            return Err(invalid("Minimum Bid must be positive"));
        }
        if matches!(prize.maximum_bid, Some(max) if max <= 0) {
            return Err(invalid("Maximum Bid must be positive"));
        }
        if prize.max_winners < 1 {
            return Err(invalid("Max Winners must be at least 1"));
        }
        if prize.start_run_id.is_some() != prize.end_run_id.is_some() {
            return Err(invalid("Must have both Start Run and End Run set, or neither"));
        }
        if prize.start_time.is_some() != prize.end_time.is_some() {
            return Err(invalid(
                "Must have both Start Time and End Time set, or neither",
            ));
        }
        if prize.start_run_id.is_some() && prize.start_time.is_some() {
            return Err(invalid(
                "Cannot have both Start/End Run and Start/End Time set",
            ));
        }
        if prize.random_draw && matches!(prize.maximum_bid, Some(max) if max < prize.minimum_bid)
        {
            return Err(invalid("Maximum Bid cannot be lower than Minimum Bid"));
        }

        let window = match (prize.start_run_id, prize.end_run_id) {
            (Some(start_id), Some(end_id)) => {
                let start = start_run
                    .filter(|r| r.id == start_id)
                    .ok_or_else(|| invalid("Start Run does not exist"))?;
                let end = end_run
                    .filter(|r| r.id == end_id)
                    .ok_or_else(|| invalid("End Run does not exist"))?;
                if start.event_id != prize.event_id || end.event_id != prize.event_id {
                    return Err(invalid("Prize Event must be the same as Start/End Run Event"));
                }
                if start.start_time > end.start_time {
                    return Err(invalid("Start Run must begin sooner than End Run"));
                }
                Some(DrawWindow {
                    start: start.start_time,
                    end: end.end_time,
                })
            }
            _ => match (prize.start_time, prize.end_time) {
                (Some(start), Some(end)) => {
                    if start > end {
                        return Err(invalid("Prize Start Time must be earlier than End Time"));
                    }
                    Some(DrawWindow { start, end })
                }
                _ => None,
            },
        };

        Ok(Self {
            prize_id: prize.id,
            event_id: prize.event_id,
            category_id: prize.category_id,
            minimum_bid: prize.minimum_bid,
            maximum_bid: prize.maximum_bid,
            sum_donations: prize.sum_donations,
            random_draw: prize.random_draw,
            ticket_draw: prize.ticket_draw,
            max_winners: prize.max_winners as usize,
            window,
        })
    }

    /// Donation receive times only restrict non-ticket draws.
    pub fn donation_window(&self) -> Option<DrawWindow> {
        if self.ticket_draw {
            None
        } else {
            self.window
        }
    }

    pub fn contains_draw_time(&self, time: i64) -> bool {
        self.window.map(|w| w.contains(time)).unwrap_or(true)
    }

    /// Draw weight of an aggregated amount, in multiples of the minimum bid.
    pub fn weight(&self, amount: i64) -> f64 {
        if amount < self.minimum_bid {
            return 0.0;
        }
        match self.maximum_bid {
            Some(max) if amount > max => max as f64 / self.minimum_bid as f64,
            _ => amount as f64 / self.minimum_bid as f64,
        }
    }
}
