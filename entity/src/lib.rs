pub mod donation;
pub mod donor;
pub mod donor_prize_entry;
pub mod event;
pub mod prize;
pub mod prize_category;
pub mod prize_ticket;
pub mod prize_winner;
pub mod speed_run;
