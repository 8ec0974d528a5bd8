#![allow(unused)]

use actix_http::{body::MessageBody, header::AUTHORIZATION, Method, Request};
use actix_web::{
    dev::{Service, ServiceResponse},
    test::{call_service, read_body, TestRequest},
};
use anyhow::Result;
use entity::{
    donation::{self, TransactionState},
    donor, donor_prize_entry, event, prize, prize_category, prize_ticket,
    prize_winner::{self, AcceptState, ShippingState},
    speed_run,
};
use migration::{Migrator, MigratorTrait};
use prizedraw::{auth::AdminToken, setting::Setting, AppState};
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, DbConn, Set};
use serde_json::Value;
use tempfile::TempDir;

/// App state on a throwaway sqlite database, dropped with the returned dir.
pub async fn create_test_state() -> Result<(AppState, TempDir)> {
    let dir = tempfile::Builder::new().prefix("prizedraw-test").tempdir()?;
    let mut setting = Setting::default();
    setting.db_url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("draw.sqlite").display()
    );
    let state = AppState::from_setting(setting).await?;
    Migrator::up(state.service.db(), None).await?;
    Ok((state, dir))
}

pub fn token(state: &AppState, perms: &[&str]) -> Result<String> {
    Ok(AdminToken::generate(
        "staff",
        perms,
        3600,
        state.setting.auth.secret.as_bytes(),
    )?)
}

pub async fn create_event(db: &DbConn, short: &str) -> Result<event::Model> {
    Ok(event::ActiveModel {
        short: Set(short.to_owned()),
        name: Set(format!("{} marathon", short)),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

pub async fn create_donor(db: &DbConn, id: i32) -> Result<donor::Model> {
    Ok(donor::ActiveModel {
        id: Set(id),
        alias: Set(Some(format!("donor{}", id))),
    }
    .insert(db)
    .await?)
}

pub async fn create_run(
    db: &DbConn,
    event_id: i32,
    start_time: i64,
    end_time: i64,
) -> Result<speed_run::Model> {
    Ok(speed_run::ActiveModel {
        event_id: Set(event_id),
        name: Set(format!("run {}", start_time)),
        start_time: Set(start_time),
        end_time: Set(end_time),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

pub async fn create_category(db: &DbConn, name: &str) -> Result<prize_category::Model> {
    Ok(prize_category::ActiveModel {
        name: Set(name.to_owned()),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

/// Random draw prize of the event summing donations between 10.00 and 20.00.
pub fn prize_model(event_id: i32, name: &str) -> prize::Model {
    prize::Model {
        name: name.to_owned(),
        event_id,
        minimum_bid: 1000,
        maximum_bid: Some(2000),
        sum_donations: true,
        random_draw: true,
        max_winners: 1,
        ..Default::default()
    }
}

pub async fn create_prize(db: &DbConn, model: prize::Model) -> Result<prize::Model> {
    let mut active: prize::ActiveModel = model.into();
    active.id = NotSet;
    Ok(active.insert(db).await?)
}

pub async fn donate_with(
    db: &DbConn,
    donor_id: i32,
    event_id: i32,
    amount: i64,
    time_received: i64,
    transaction_state: TransactionState,
) -> Result<donation::Model> {
    Ok(donation::ActiveModel {
        donor_id: Set(donor_id),
        event_id: Set(event_id),
        amount: Set(amount),
        currency: Set("USD".to_owned()),
        transaction_state: Set(transaction_state),
        time_received: Set(time_received),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

/// Completed donation received at time 100.
pub async fn donate(
    db: &DbConn,
    donor_id: i32,
    event_id: i32,
    amount: i64,
) -> Result<donation::Model> {
    donate_with(db, donor_id, event_id, amount, 100, TransactionState::Completed).await
}

pub async fn create_ticket(
    db: &DbConn,
    prize_id: i32,
    donation_id: i32,
    amount: i64,
) -> Result<prize_ticket::Model> {
    Ok(prize_ticket::ActiveModel {
        prize_id: Set(prize_id),
        donation_id: Set(donation_id),
        amount: Set(amount),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

pub async fn create_entry(
    db: &DbConn,
    donor_id: i32,
    prize_id: i32,
    weight: f64,
) -> Result<donor_prize_entry::Model> {
    Ok(donor_prize_entry::ActiveModel {
        donor_id: Set(donor_id),
        prize_id: Set(prize_id),
        weight: Set(weight),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

pub async fn create_winner(
    db: &DbConn,
    prize_id: i32,
    donor_id: i32,
    accept_state: AcceptState,
) -> Result<prize_winner::Model> {
    Ok(prize_winner::ActiveModel {
        prize_id: Set(prize_id),
        donor_id: Set(donor_id),
        accept_state: Set(accept_state),
        shipping_state: Set(ShippingState::Pending),
        created_at: Set(0),
        updated_at: Set(0),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

pub fn auth_get(path: &str, token: &str) -> TestRequest {
    TestRequest::with_uri(path).insert_header((AUTHORIZATION, format!("Bearer {}", token)))
}

pub fn auth_post(path: &str, token: &str, data: Value) -> TestRequest {
    TestRequest::with_uri(path)
        .method(Method::POST)
        .set_json(data)
        .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
}

/// Send a request, returning the json body (null when empty) and the status.
pub async fn call<S, B>(req: TestRequest, app: &S) -> Result<(Value, u16)>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = call_service(app, req.to_request()).await;
    let status = res.status().as_u16();
    let body = read_body(res).await;
    let val = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)?
    };
    Ok((val, status))
}
