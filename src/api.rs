//! http api

use crate::{auth::DrawPermission, AppState, Error};
use actix_web::{get, post, web, Responder, Scope};
use serde::{Deserialize, Serialize};
use serde_aux::prelude::deserialize_number_from_string;
use serde_json::json;
use tracing::info;

pub fn scope() -> Scope {
    web::scope("/prizes")
        .service(draw_key)
        .service(draw)
        .service(eligible)
}

/// Seed of a reproducible draw. Clients send either a string or a number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Seed {
    Text(String),
    Number(serde_json::Number),
}

impl Seed {
    pub fn as_string(&self) -> String {
        match self {
            Seed::Text(s) => s.clone(),
            Seed::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawReq {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub key: i64,
    #[serde(default)]
    pub seed: Option<Seed>,
}

/// issue the key of the current eligible population
#[get("/{id}/draw")]
pub async fn draw_key(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    _perm: DrawPermission,
) -> Result<impl Responder, Error> {
    let key = state.service.request_draw_key(path.into_inner()).await?;
    Ok(web::Json(json!({ "key": key })))
}

/// commit a draw
#[post("/{id}/draw")]
pub async fn draw(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    perm: DrawPermission,
    data: web::Json<DrawReq>,
) -> Result<impl Responder, Error> {
    let prize_id = path.into_inner();
    let seed = data.seed.as_ref().map(Seed::as_string);
    let res = state
        .service
        .commit_draw(prize_id, data.key, seed.as_deref())
        .await?;
    info!(
        prize = prize_id,
        winner = res.winner,
        seeded = seed.is_some(),
        staff = %perm.token.sub,
        "Draw committed"
    );
    Ok(web::Json(json!({
        "sum": res.sum,
        "result": res.result,
        "winner": res.winner,
    })))
}

/// eligible population with its key
#[get("/{id}/eligible")]
pub async fn eligible(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    _perm: DrawPermission,
) -> Result<impl Responder, Error> {
    let (eligible, key) = state.service.eligible_donors(path.into_inner()).await?;
    Ok(web::Json(json!({
        "eligible": eligible,
        "key": key,
    })))
}
