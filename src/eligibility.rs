//! Eligible donor population of a prize draw.
//!
//! [`eligible_population`] is a pure function of the draw rules and the
//! records handed to it. The record sources may pre-filter, the engine applies
//! every candidacy rule again so its result never depends on how the records
//! were fetched.

use crate::prize::DrawRules;
use entity::donation::TransactionState;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// A donation as seen by the draw engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationRecord {
    pub id: i32,
    pub donor_id: i32,
    pub event_id: i32,
    /// cents
    pub amount: i64,
    pub state: TransactionState,
    /// unix seconds
    pub time_received: i64,
}

/// A ticket bought for the prize being drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRecord {
    pub donation_id: i32,
    pub donor_id: i32,
    /// cents
    pub amount: i64,
}

/// A manually granted entry for the prize being drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryRecord {
    pub donor_id: i32,
    /// multiple of the prize minimum bid
    pub weight: f64,
}

/// Everything the engine needs to know about one prize.
#[derive(Debug, Clone, Default)]
pub struct DrawRecords {
    pub donations: Vec<DonationRecord>,
    pub tickets: Vec<TicketRecord>,
    pub entries: Vec<EntryRecord>,
    /// donors holding any winner record of this prize
    pub prize_winners: HashSet<i32>,
    /// donors holding any winner record of a prize sharing this prize's
    /// category within the event
    pub category_winners: HashSet<i32>,
}

impl DrawRecords {
    fn excluded(&self, donor_id: i32) -> bool {
        self.prize_winners.contains(&donor_id) || self.category_winners.contains(&donor_id)
    }
}

/// One member of the eligible population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eligible {
    pub donor: i32,
    /// cents
    pub amount: i64,
    pub weight: f64,
}

/// Compute the ordered, weighted population of donors eligible for a draw.
///
/// Random draws return every donor with weight >= 1 ordered by donor id.
/// Highest bidder prizes return a single entry of weight 1, ties going to the
/// lowest donor id. An empty result means nobody can win.
pub fn eligible_population(rules: &DrawRules, records: &DrawRecords) -> Vec<Eligible> {
    let donations = records.donations.iter().filter(|d| {
        d.event_id == rules.event_id
            && d.state == TransactionState::Completed
            && !records.excluded(d.donor_id)
    });

    // contributing amount of each qualifying donation
    let contributions: Vec<(i32, i64)> = if rules.ticket_draw {
        let mut tickets: HashMap<i32, i64> = HashMap::new();
        for t in records.tickets.iter() {
            *tickets.entry(t.donation_id).or_default() += t.amount;
        }
        donations
            .filter_map(|d| tickets.get(&d.id).map(|amount| (d.donor_id, *amount)))
            .collect()
    } else {
        let window = rules.donation_window();
        donations
            .filter(|d| window.map(|w| w.contains(d.time_received)).unwrap_or(true))
            .map(|d| (d.donor_id, d.amount))
            .collect()
    };

    let mut donors: BTreeMap<i32, i64> = BTreeMap::new();
    for (donor, amount) in contributions {
        let best = donors.entry(donor).or_default();
        if rules.sum_donations {
            *best += amount;
        } else {
            *best = (*best).max(amount);
        }
    }

    for entry in records.entries.iter() {
        // non-positive and NaN weights never count
        if !(entry.weight > 0.0) || records.excluded(entry.donor_id) {
            continue;
        }
        let floor = (entry.weight * rules.minimum_bid as f64).round() as i64;
        let amount = donors.entry(entry.donor_id).or_default();
        *amount = (*amount).max(floor);
        if let Some(max) = rules.maximum_bid {
            *amount = (*amount).min(max);
        }
    }

    if donors.is_empty() {
        return vec![];
    }

    if rules.random_draw {
        // BTreeMap iterates in donor id order
        donors
            .into_iter()
            .map(|(donor, amount)| Eligible {
                donor,
                amount,
                weight: rules.weight(amount),
            })
            .filter(|e| e.weight >= 1.0)
            .collect()
    } else {
        let mut top: Option<(i32, i64)> = None;
        for (donor, amount) in donors {
            // ascending ids, strict comparison keeps the lowest id on ties
            if top.map(|(_, best)| amount > best).unwrap_or(true) {
                top = Some((donor, amount));
            }
        }
        top.map(|(donor, amount)| Eligible {
            donor,
            amount,
            weight: 1.0,
        })
        .into_iter()
        .collect()
    }
}
