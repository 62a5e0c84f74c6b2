use std::str::FromStr;

use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::constants::ROLE_HEADER;
use crate::entities::account::Role;
use crate::errors::AppError;

/// Extractor gating a handler to moderator callers. The fronting
/// authenticator injects the role header after validating the caller's
/// token; this service only parses and matches it.
/// Returns 403 when the header is missing, unparseable, or not MODERATOR.
/// Usage: add `_scope: ModeratorScope` as a handler parameter.
#[derive(Debug)]
pub struct ModeratorScope;

impl FromRequest for ModeratorScope {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let role = req
            .headers()
            .get(ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Role::from_str(value).ok());

        match role {
            Some(Role::Moderator) => ready(Ok(ModeratorScope)),
            _ => ready(Err(AppError::ForbiddenAccess.into())),
        }
    }
}
