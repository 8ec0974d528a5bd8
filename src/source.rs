//! Record sources consumed by the draw engine.
//!
//! The traits keep the engine independent of the store. [`Records`]
//! implements all of them over any sea-orm connection, which lets the draw
//! commit run every read and the final write on one transaction.

use crate::{
    eligibility::{DonationRecord, EntryRecord, TicketRecord},
    now,
    prize::DrawWindow,
    winner::WinnerRow,
    Error, Result,
};
use async_trait::async_trait;
use entity::{
    donation::{self, TransactionState},
    donor_prize_entry, prize, prize_ticket, prize_winner,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr,
};
use std::collections::{HashMap, HashSet};

#[async_trait]
pub trait DonationSource {
    /// Completed donations of an event, skipping the excluded donors and,
    /// when given, donations received outside the window.
    async fn completed_donations(
        &self,
        event_id: i32,
        exclude: &HashSet<i32>,
        window: Option<DrawWindow>,
    ) -> Result<Vec<DonationRecord>>;
}

#[async_trait]
pub trait TicketSource {
    async fn tickets_for_prize(&self, prize_id: i32) -> Result<Vec<TicketRecord>>;
}

#[async_trait]
pub trait EntrySource {
    async fn entries_for_prize(&self, prize_id: i32) -> Result<Vec<EntryRecord>>;
}

#[async_trait]
pub trait PrizeWinnerStore {
    /// All winner records of a prize, in any state.
    async fn winners_for_prize(&self, prize_id: i32) -> Result<Vec<prize_winner::Model>>;

    /// All winner records of the prizes of a category within an event.
    async fn winners_for_category(
        &self,
        category_id: i32,
        event_id: i32,
    ) -> Result<Vec<prize_winner::Model>>;

    /// Insert a new record or update the states of an existing one.
    ///
    /// A duplicate (prize, donor) insert fails with [`Error::Conflict`].
    async fn upsert(&self, row: &WinnerRow) -> Result<prize_winner::Model>;
}

/// Record sources backed by a database connection or transaction.
pub struct Records<'c, C>(pub &'c C);

impl From<donation::Model> for DonationRecord {
    fn from(d: donation::Model) -> Self {
        Self {
            id: d.id,
            donor_id: d.donor_id,
            event_id: d.event_id,
            amount: d.amount,
            state: d.transaction_state,
            time_received: d.time_received,
        }
    }
}

#[async_trait]
impl<'c, C> DonationSource for Records<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn completed_donations(
        &self,
        event_id: i32,
        exclude: &HashSet<i32>,
        window: Option<DrawWindow>,
    ) -> Result<Vec<DonationRecord>> {
        let mut query = donation::Entity::find()
            .filter(donation::Column::EventId.eq(event_id))
            .filter(donation::Column::TransactionState.eq(TransactionState::Completed));
        if !exclude.is_empty() {
            query = query.filter(donation::Column::DonorId.is_not_in(exclude.iter().copied()));
        }
        if let Some(window) = window {
            query = query
                .filter(donation::Column::TimeReceived.gte(window.start))
                .filter(donation::Column::TimeReceived.lte(window.end));
        }
        Ok(query
            .order_by_asc(donation::Column::Id)
            .all(self.0)
            .await?
            .into_iter()
            .map(DonationRecord::from)
            .collect())
    }
}

#[async_trait]
impl<'c, C> TicketSource for Records<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn tickets_for_prize(&self, prize_id: i32) -> Result<Vec<TicketRecord>> {
        let tickets = prize_ticket::Entity::find()
            .filter(prize_ticket::Column::PrizeId.eq(prize_id))
            .order_by_asc(prize_ticket::Column::Id)
            .all(self.0)
            .await?;
        if tickets.is_empty() {
            return Ok(vec![]);
        }
        let donors = donation::Entity::find()
            .filter(donation::Column::Id.is_in(tickets.iter().map(|t| t.donation_id)))
            .all(self.0)
            .await?
            .into_iter()
            .map(|d| (d.id, d.donor_id))
            .collect::<HashMap<_, _>>();
        Ok(tickets
            .into_iter()
            .filter_map(|t| {
                donors.get(&t.donation_id).map(|donor_id| TicketRecord {
                    donation_id: t.donation_id,
                    donor_id: *donor_id,
                    amount: t.amount,
                })
            })
            .collect())
    }
}

#[async_trait]
impl<'c, C> EntrySource for Records<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn entries_for_prize(&self, prize_id: i32) -> Result<Vec<EntryRecord>> {
        Ok(donor_prize_entry::Entity::find()
            .filter(donor_prize_entry::Column::PrizeId.eq(prize_id))
            .order_by_asc(donor_prize_entry::Column::DonorId)
            .all(self.0)
            .await?
            .into_iter()
            .map(|e| EntryRecord {
                donor_id: e.donor_id,
                weight: e.weight,
            })
            .collect())
    }
}

fn unique_violation(err: DbErr) -> Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            Error::Conflict("Donor is already recorded as a winner of this prize".to_owned())
        }
        _ => err.into(),
    }
}

#[async_trait]
impl<'c, C> PrizeWinnerStore for Records<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn winners_for_prize(&self, prize_id: i32) -> Result<Vec<prize_winner::Model>> {
        Ok(prize_winner::Entity::find()
            .filter(prize_winner::Column::PrizeId.eq(prize_id))
            .order_by_asc(prize_winner::Column::Id)
            .all(self.0)
            .await?)
    }

    async fn winners_for_category(
        &self,
        category_id: i32,
        event_id: i32,
    ) -> Result<Vec<prize_winner::Model>> {
        let prizes = prize::Entity::find()
            .filter(prize::Column::CategoryId.eq(category_id))
            .filter(prize::Column::EventId.eq(event_id))
            .all(self.0)
            .await?;
        Ok(prize_winner::Entity::find()
            .filter(prize_winner::Column::PrizeId.is_in(prizes.iter().map(|p| p.id)))
            .order_by_asc(prize_winner::Column::Id)
            .all(self.0)
            .await?)
    }

    async fn upsert(&self, row: &WinnerRow) -> Result<prize_winner::Model> {
        let now = now();
        match row.id {
            Some(id) => Ok(prize_winner::ActiveModel {
                id: Set(id),
                accept_state: Set(row.accept_state),
                shipping_state: Set(row.shipping_state),
                updated_at: Set(now),
                ..Default::default()
            }
            .update(self.0)
            .await?),
            None => prize_winner::ActiveModel {
                prize_id: Set(row.prize_id),
                donor_id: Set(row.donor_id),
                accept_state: Set(row.accept_state),
                shipping_state: Set(row.shipping_state),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(self.0)
            .await
            .map_err(unique_violation),
        }
    }
}
