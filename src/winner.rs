//! Prize winner lifecycle rules.
//!
//! Every write of a winner record, whether it comes from a draw commit or
//! from the fulfillment workflow, goes through [`validate`] against the
//! current records of the prize and of the prizes sharing its category.

use crate::{Error, Result};
use entity::{
    prize,
    prize_winner::{self, AcceptState, ShippingState},
};

/// A winner record about to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinnerRow {
    /// `None` for a record that doesn't exist yet
    pub id: Option<i32>,
    pub prize_id: i32,
    pub donor_id: i32,
    pub accept_state: AcceptState,
    pub shipping_state: ShippingState,
}

impl WinnerRow {
    /// The record created by a successful draw.
    pub fn drawn(prize_id: i32, donor_id: i32) -> Self {
        Self {
            id: None,
            prize_id,
            donor_id,
            accept_state: AcceptState::Pending,
            shipping_state: ShippingState::Pending,
        }
    }

    /// Apply a fulfillment update to an existing record.
    pub fn transition(
        current: &prize_winner::Model,
        accept_state: Option<AcceptState>,
        shipping_state: Option<ShippingState>,
    ) -> Result<Self> {
        let row = Self {
            id: Some(current.id),
            prize_id: current.prize_id,
            donor_id: current.donor_id,
            accept_state: accept_state.unwrap_or(current.accept_state),
            shipping_state: shipping_state.unwrap_or(current.shipping_state),
        };
        if row.accept_state == AcceptState::Declined && row.shipping_state == ShippingState::Shipped
        {
            return Err(Error::Validation(
                "A declined prize cannot be shipped".to_owned(),
            ));
        }
        Ok(row)
    }

    fn is_same(&self, other: &prize_winner::Model) -> bool {
        self.id == Some(other.id)
    }
}

/// Check a write against the winner cap, category exclusivity and
/// (prize, donor) uniqueness.
///
/// `prize_winners` are all records of the prize, `category_winners` all
/// records of prizes sharing its category within its event. Either may
/// contain the record being written.
pub fn validate(
    prize: &prize::Model,
    row: &WinnerRow,
    prize_winners: &[prize_winner::Model],
    category_winners: &[prize_winner::Model],
) -> Result<()> {
    if prize_winners
        .iter()
        .any(|w| w.donor_id == row.donor_id && w.prize_id == row.prize_id && !row.is_same(w))
    {
        return Err(Error::Conflict(
            "Donor is already recorded as a winner of this prize".to_owned(),
        ));
    }

    if !row.accept_state.is_active() {
        return Ok(());
    }

    let active = prize_winners
        .iter()
        .filter(|w| w.accept_state.is_active() && !row.is_same(w))
        .count()
        + 1;
    if active > prize.max_winners.max(0) as usize {
        return Err(Error::Conflict(
            "Number of prize winners is greater than the maximum for this prize".to_owned(),
        ));
    }

    if prize.category_id.is_some()
        && category_winners.iter().any(|w| {
            w.donor_id == row.donor_id
                && w.prize_id != row.prize_id
                && w.accept_state.is_active()
        })
    {
        return Err(Error::Conflict(
            "Donor already holds a prize in this category for this event".to_owned(),
        ));
    }
    Ok(())
}
