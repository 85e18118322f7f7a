// castcart/app/src/web/extractors.rs

//! Request metadata extractors. Identity is issued upstream and arrives as
//! headers; nothing here verifies it.

use actix_web::{dev::Payload, http::header, FromRequest, HttpRequest};
use castcart::{ActorId, RequestProvenance};
use futures_util::future::{ready, Ready};
use tracing::warn;

use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const USER_ROLE_HEADER: &str = "X-User-Role";
pub const OPERATOR_ROLE: &str = "admin";

fn header_value<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
  req
    .headers()
    .get(name)
    .and_then(|v| v.to_str().ok())
    .map(str::trim)
    .filter(|v| !v.is_empty())
}

fn actor_from(req: &HttpRequest) -> Option<ActorId> {
  header_value(req, USER_ID_HEADER).map(ActorId::from)
}

/// The caller's identity when one was supplied. Never rejects.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<ActorId>);

impl MaybeUser {
  pub fn actor(&self) -> Option<&ActorId> {
    self.0.as_ref()
  }
}

impl FromRequest for MaybeUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(Ok(MaybeUser(actor_from(req))))
  }
}

/// An identified caller; requests without `X-User-Id` are rejected with 401.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  pub user_id: ActorId,
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    match actor_from(req) {
      Some(user_id) => ready(Ok(AuthenticatedUser { user_id })),
      None => {
        warn!("AuthenticatedUser extractor: missing {} header.", USER_ID_HEADER);
        ready(Err(AppError::Unauthorized))
      }
    }
  }
}

/// A caller carrying the operator role; anyone else gets 403.
#[derive(Debug, Clone)]
pub struct OperatorUser {
  pub user_id: Option<ActorId>,
}

impl FromRequest for OperatorUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let is_operator = header_value(req, USER_ROLE_HEADER).map_or(false, |role| role.eq_ignore_ascii_case(OPERATOR_ROLE));
    if is_operator {
      ready(Ok(OperatorUser {
        user_id: actor_from(req),
      }))
    } else {
      warn!(path = req.path(), "Operator route called without the operator role.");
      ready(Err(AppError::Forbidden))
    }
  }
}

/// Transport metadata for click recording: client address (the first
/// `X-Forwarded-For`/`Forwarded` hop, else the peer), `User-Agent`, `Referer`.
#[derive(Debug, Clone)]
pub struct Provenance(pub RequestProvenance);

impl FromRequest for Provenance {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let ip_address = req.connection_info().realip_remote_addr().map(str::to_string);
    ready(Ok(Provenance(RequestProvenance {
      ip_address,
      user_agent: header_value(req, header::USER_AGENT.as_str()).map(str::to_string),
      referrer: header_value(req, header::REFERER.as_str()).map(str::to_string),
    })))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::test::TestRequest;

  #[actix_web::test]
  async fn blank_user_header_is_anonymous() {
    let req = TestRequest::default().insert_header((USER_ID_HEADER, "  ")).to_http_request();
    let user = MaybeUser::extract(&req).await.unwrap();
    assert!(user.0.is_none());
  }

  #[actix_web::test]
  async fn operator_role_is_case_insensitive() {
    let req = TestRequest::default()
      .insert_header((USER_ROLE_HEADER, "Admin"))
      .insert_header((USER_ID_HEADER, "ops-1"))
      .to_http_request();
    let operator = OperatorUser::extract(&req).await.unwrap();
    assert_eq!(operator.user_id, Some(ActorId::from("ops-1")));

    let req = TestRequest::default().insert_header((USER_ROLE_HEADER, "listener")).to_http_request();
    assert!(matches!(OperatorUser::extract(&req).await, Err(AppError::Forbidden)));
  }

  #[actix_web::test]
  async fn provenance_prefers_forwarded_for() {
    let req = TestRequest::default()
      .insert_header(("X-Forwarded-For", "203.0.113.9, 10.0.0.1"))
      .insert_header((header::USER_AGENT, "Podcatcher/2.1"))
      .peer_addr("10.0.0.1:4000".parse().unwrap())
      .to_http_request();
    let Provenance(p) = Provenance::extract(&req).await.unwrap();
    assert_eq!(p.ip_address.as_deref(), Some("203.0.113.9"));
    assert_eq!(p.user_agent.as_deref(), Some("Podcatcher/2.1"));
    assert_eq!(p.referrer, None);
  }
}
