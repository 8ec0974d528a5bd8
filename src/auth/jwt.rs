use crate::{auth::AuthError, now, AppState, Error, Result};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};

/// Permission needed to draw prizes.
pub const CHANGE_PRIZE: &str = "change_prize";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AdminToken {
    // issued at
    pub iat: i64,
    // expiration
    pub exp: i64,
    // staff user name
    pub sub: String,
    #[serde(default)]
    pub perms: Vec<String>,
}

impl AdminToken {
    pub fn from_str(token: &str, secret: &[u8]) -> Result<Self, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        Ok(
            jsonwebtoken::decode::<AdminToken>(
                token,
                &DecodingKey::from_secret(secret),
                &validation,
            )?
            .claims,
        )
    }

    pub fn generate(
        sub: &str,
        perms: &[&str],
        expiry: usize,
        secret: &[u8],
    ) -> Result<String, AuthError> {
        let now = now();
        let payload = AdminToken {
            iat: now,
            exp: now + expiry as i64,
            sub: sub.to_owned(),
            perms: perms.iter().map(|p| p.to_string()).collect(),
        };

        Ok(jsonwebtoken::encode(
            &Header::default(),
            &payload,
            &EncodingKey::from_secret(secret),
        )?)
    }

    pub fn has_perm(&self, perm: &str) -> bool {
        self.perms.iter().any(|p| p == perm)
    }
}

fn bearer(req: &HttpRequest) -> Option<&str> {
    let auth = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    if auth.starts_with("bearer") || auth.starts_with("Bearer") {
        Some(auth[6..].trim())
    } else {
        None
    }
}

/// Staff member allowed to run prize draws.
#[derive(Debug)]
pub struct DrawPermission {
    pub token: AdminToken,
}

impl DrawPermission {
    pub fn from_token(token: &str, secret: &[u8]) -> Result<Self, Error> {
        let token = AdminToken::from_str(token, secret)?;
        if !token.has_perm(CHANGE_PRIZE) {
            return Err(Error::Forbidden);
        }
        Ok(Self { token })
    }
}

impl FromRequest for DrawPermission {
    type Error = Error;
    type Future = Ready<Result<DrawPermission>>;

    fn from_request(req: &HttpRequest, _pl: &mut Payload) -> Self::Future {
        let res = match (req.app_data::<web::Data<AppState>>(), bearer(req)) {
            (Some(state), Some(token)) => {
                DrawPermission::from_token(token, state.setting.auth.secret.as_bytes())
            }
            _ => Err(AuthError::Invalid("missing auth token").into()),
        };
        ready(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn token() -> anyhow::Result<()> {
        let token = AdminToken::generate("staff", &[CHANGE_PRIZE], 3600, b"secret")?;
        let auth = AdminToken::from_str(&token, b"secret")?;
        assert_eq!(auth.sub, "staff");
        assert!(auth.has_perm(CHANGE_PRIZE));
        assert!(AdminToken::from_str(&token, b"other").is_err());
        // expired
        let token = AdminToken::generate("staff", &[CHANGE_PRIZE], 1, b"secret")?;
        tokio::time::sleep(Duration::from_secs(2)).await;
        let res = AdminToken::from_str(&token, b"secret");
        assert!(res.is_err());
        Ok(())
    }

    #[test]
    fn permission() -> anyhow::Result<()> {
        let token = AdminToken::generate("staff", &["view_prize"], 3600, b"secret")?;
        let res = DrawPermission::from_token(&token, b"secret");
        assert!(matches!(res, Err(Error::Forbidden)));

        let token = AdminToken::generate("staff", &["view_prize", CHANGE_PRIZE], 3600, b"secret")?;
        let perm = DrawPermission::from_token(&token, b"secret")?;
        assert_eq!(perm.token.perms.len(), 2);

        let res = DrawPermission::from_token("not a token", b"secret");
        assert!(matches!(res, Err(Error::Auth(_))));
        Ok(())
    }
}
