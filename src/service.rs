use crate::{
    draw_key::derive_key,
    eligibility::{eligible_population, DrawRecords, Eligible},
    prize::DrawRules,
    sampler::{draw_rng, sample_with},
    source::{DonationSource, EntrySource, PrizeWinnerStore, Records, TicketSource},
    winner::{self, WinnerRow},
    Error, Result,
};
use entity::{
    prize,
    prize_winner::{self, AcceptState, ShippingState},
    speed_run,
};
use rand::Rng;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbConn, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use std::collections::HashSet;
use tracing::{debug, info, warn};

pub const NO_WINNER_SLOT: &str = "no winner slot";
pub const NO_ELIGIBLE_DONORS: &str = "no eligible donors";

/// Outcome of a committed draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawResult {
    pub winner: i32,
    /// total weight of the population
    pub sum: f64,
    /// point drawn on the weight wheel
    pub result: f64,
    pub record: prize_winner::Model,
}

/// Everything known about a prize at one point in time.
struct Snapshot {
    rules: DrawRules,
    prize_winners: Vec<prize_winner::Model>,
    category_winners: Vec<prize_winner::Model>,
    population: Vec<Eligible>,
}

impl Snapshot {
    fn active_winners(&self) -> usize {
        self.prize_winners
            .iter()
            .filter(|w| w.accept_state.is_active())
            .count()
    }

    fn is_full(&self) -> bool {
        self.active_winners() >= self.rules.max_winners
    }
}

/// Prize draw service
pub struct Service {
    conn: DbConn,
}

impl Service {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }

    pub fn db(&self) -> &DbConn {
        &self.conn
    }

    pub async fn get_prize(&self, prize_id: i32) -> Result<prize::Model> {
        find_prize(self.db(), prize_id).await
    }

    /// Validated draw configuration of a prize.
    pub async fn draw_rules(&self, prize_id: i32) -> Result<DrawRules> {
        let prize = self.get_prize(prize_id).await?;
        load_rules(self.db(), &prize).await
    }

    /// Current eligible population of a prize with its draw key.
    pub async fn eligible_donors(&self, prize_id: i32) -> Result<(Vec<Eligible>, i64)> {
        let txn = self.conn.begin().await?;
        let prize = find_prize(&txn, prize_id).await?;
        let snapshot = snapshot(&txn, &prize).await?;
        txn.commit().await?;
        let key = derive_key(&snapshot.population);
        Ok((snapshot.population, key))
    }

    /// Pending and accepted winners of a prize.
    pub async fn winners(&self, prize_id: i32) -> Result<Vec<prize_winner::Model>> {
        self.get_prize(prize_id).await?;
        Ok(prize_winner::Entity::find()
            .filter(prize_winner::Column::PrizeId.eq(prize_id))
            .filter(
                prize_winner::Column::AcceptState
                    .is_in([AcceptState::Pending, AcceptState::Accepted]),
            )
            .order_by_asc(prize_winner::Column::Id)
            .all(self.db())
            .await?)
    }

    pub async fn maxed_winners(&self, prize_id: i32) -> Result<bool> {
        let prize = self.get_prize(prize_id).await?;
        let winners = self.winners(prize_id).await?;
        Ok(winners.len() >= prize.max_winners.max(0) as usize)
    }

    /// Issue the draw key of the prize's current eligible population.
    pub async fn request_draw_key(&self, prize_id: i32) -> Result<i64> {
        let txn = self.conn.begin().await?;
        let prize = find_prize(&txn, prize_id).await?;
        let snapshot = snapshot(&txn, &prize).await?;
        txn.commit().await?;

        if snapshot.is_full() {
            return Err(Error::Conflict(NO_WINNER_SLOT.to_owned()));
        }
        if snapshot.population.is_empty() {
            return Err(Error::Conflict(NO_ELIGIBLE_DONORS.to_owned()));
        }
        let key = derive_key(&snapshot.population);
        debug!(
            prize = prize_id,
            key,
            population = snapshot.population.len(),
            "issued draw key"
        );
        Ok(key)
    }

    /// Commit a draw, seeding the random source from `seed` when given.
    pub async fn commit_draw(
        &self,
        prize_id: i32,
        key: i64,
        seed: Option<&str>,
    ) -> Result<DrawResult> {
        let mut rng = draw_rng(seed);
        self.commit_draw_with(prize_id, key, &mut rng).await
    }

    /// Commit a draw with an explicit random source.
    ///
    /// The population is recomputed and its key compared with `key` inside
    /// the transaction that writes the winner, after the prize and every
    /// prize sharing its category are locked.
    pub async fn commit_draw_with<R: Rng>(
        &self,
        prize_id: i32,
        key: i64,
        rng: &mut R,
    ) -> Result<DrawResult> {
        let txn = self.conn.begin().await?;
        let prize = lock_prize(&txn, prize_id).await?;
        let snapshot = snapshot(&txn, &prize).await?;

        if snapshot.is_full() {
            return Err(Error::Conflict(NO_WINNER_SLOT.to_owned()));
        }
        if snapshot.population.is_empty() {
            return Err(Error::Conflict(NO_ELIGIBLE_DONORS.to_owned()));
        }
        let expected = derive_key(&snapshot.population);
        if expected != key {
            warn!(prize = prize_id, key, expected, "draw key mismatch");
            return Err(Error::Validation(
                "Key field did not match expected value".to_owned(),
            ));
        }

        let pick = sample_with(&snapshot.population, rng)
            .ok_or_else(|| Error::Conflict(NO_ELIGIBLE_DONORS.to_owned()))?;
        let row = WinnerRow::drawn(prize_id, pick.donor);
        winner::validate(
            &prize,
            &row,
            &snapshot.prize_winners,
            &snapshot.category_winners,
        )?;
        let record = Records(&txn).upsert(&row).await?;
        txn.commit().await?;

        info!(
            prize = prize_id,
            winner = pick.donor,
            sum = pick.total_weight,
            result = pick.drawn,
            "Picked winner"
        );
        Ok(DrawResult {
            winner: pick.donor,
            sum: pick.total_weight,
            result: pick.drawn,
            record,
        })
    }

    /// Change the acceptance or shipping state of a winner record.
    pub async fn update_winner(
        &self,
        winner_id: i32,
        accept_state: Option<AcceptState>,
        shipping_state: Option<ShippingState>,
    ) -> Result<prize_winner::Model> {
        let txn = self.conn.begin().await?;
        let current = find_winner(&txn, winner_id).await?;
        let prize = lock_prize(&txn, current.prize_id).await?;
        // may have changed while waiting for the lock
        let current = find_winner(&txn, winner_id).await?;

        let row = WinnerRow::transition(&current, accept_state, shipping_state)?;
        let records = Records(&txn);
        let prize_winners = records.winners_for_prize(prize.id).await?;
        let category_winners = match prize.category_id {
            Some(category_id) => {
                records
                    .winners_for_category(category_id, prize.event_id)
                    .await?
            }
            None => vec![],
        };
        winner::validate(&prize, &row, &prize_winners, &category_winners)?;
        let model = records.upsert(&row).await?;
        txn.commit().await?;

        info!(
            winner = winner_id,
            prize = prize.id,
            accept_state = ?model.accept_state,
            shipping_state = ?model.shipping_state,
            "Updated winner"
        );
        Ok(model)
    }
}

async fn find_prize<C: ConnectionTrait>(conn: &C, prize_id: i32) -> Result<prize::Model> {
    prize::Entity::find_by_id(prize_id)
        .one(conn)
        .await?
        .ok_or_else(|| Error::NotFound("Prize id does not exist".to_owned()))
}

async fn find_winner<C: ConnectionTrait>(conn: &C, winner_id: i32) -> Result<prize_winner::Model> {
    prize_winner::Entity::find_by_id(winner_id)
        .one(conn)
        .await?
        .ok_or_else(|| Error::NotFound("Prize winner id does not exist".to_owned()))
}

/// Lock the prize and every prize sharing its category within the event.
///
/// Rows are locked in id order so writers on overlapping categories can't
/// deadlock. SQLite ignores row locks, its write lock covers the database.
async fn lock_prize<C: ConnectionTrait>(conn: &C, prize_id: i32) -> Result<prize::Model> {
    let prize = find_prize(conn, prize_id).await?;
    let query = match prize.category_id {
        Some(category_id) => prize::Entity::find()
            .filter(prize::Column::CategoryId.eq(category_id))
            .filter(prize::Column::EventId.eq(prize.event_id)),
        None => prize::Entity::find().filter(prize::Column::Id.eq(prize_id)),
    };
    query
        .order_by_asc(prize::Column::Id)
        .lock_exclusive()
        .all(conn)
        .await?
        .into_iter()
        .find(|p| p.id == prize_id)
        .ok_or_else(|| Error::NotFound("Prize id does not exist".to_owned()))
}

async fn load_rules<C: ConnectionTrait>(conn: &C, prize: &prize::Model) -> Result<DrawRules> {
    let start_run = match prize.start_run_id {
        Some(id) => speed_run::Entity::find_by_id(id).one(conn).await?,
        None => None,
    };
    let end_run = match prize.end_run_id {
        Some(id) => speed_run::Entity::find_by_id(id).one(conn).await?,
        None => None,
    };
    DrawRules::new(prize, start_run.as_ref(), end_run.as_ref())
}

async fn snapshot<C>(conn: &C, prize: &prize::Model) -> Result<Snapshot>
where
    C: ConnectionTrait + Send + Sync,
{
    let rules = load_rules(conn, prize).await?;
    let records = Records(conn);
    let prize_winners = records.winners_for_prize(prize.id).await?;
    let category_winners = match rules.category_id {
        Some(category_id) => {
            records
                .winners_for_category(category_id, rules.event_id)
                .await?
        }
        None => vec![],
    };
    let draw_records = gather(&records, &rules, &prize_winners, &category_winners).await?;
    let population = eligible_population(&rules, &draw_records);
    Ok(Snapshot {
        rules,
        prize_winners,
        category_winners,
        population,
    })
}

/// Fetch the records a draw of `rules` depends on.
pub async fn gather<S>(
    source: &S,
    rules: &DrawRules,
    prize_winners: &[prize_winner::Model],
    category_winners: &[prize_winner::Model],
) -> Result<DrawRecords>
where
    S: DonationSource + TicketSource + EntrySource + Sync,
{
    let prize_winners: HashSet<i32> = prize_winners.iter().map(|w| w.donor_id).collect();
    let category_winners: HashSet<i32> = category_winners.iter().map(|w| w.donor_id).collect();
    let exclude: HashSet<i32> = prize_winners.union(&category_winners).copied().collect();

    let donations = source
        .completed_donations(rules.event_id, &exclude, rules.donation_window())
        .await?;
    let tickets = if rules.ticket_draw {
        source.tickets_for_prize(rules.prize_id).await?
    } else {
        vec![]
    };
    let entries = source.entries_for_prize(rules.prize_id).await?;

    Ok(DrawRecords {
        donations,
        tickets,
        entries,
        prize_winners,
        category_winners,
    })
}
