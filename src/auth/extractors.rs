use actix_web::{error::ErrorUnauthorized, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

use crate::domain::user_role::UserRole;

use super::jwt::{Claims, Tokenizer};

// Extractor for admin-only endpoints
pub struct IsAdmin(pub Uuid);

// Extractor for staff-level endpoints; admins qualify as well
pub struct IsStaff(pub Uuid, pub UserRole);

fn claims_from_request(req: &HttpRequest) -> Result<Claims, actix_web::Error>{
    let tokenizer = req.app_data::<web::Data<Tokenizer>>()
        .ok_or_else(|| ErrorUnauthorized("Missing token configuration"))?;

    let header = req.headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ErrorUnauthorized("Missing bearer token"))?;

    let token = header.strip_prefix("Bearer")
        .map(str::trim)
        .ok_or_else(|| ErrorUnauthorized("Missing bearer token"))?;

    tokenizer.decode_key(token)
        .ok_or_else(|| ErrorUnauthorized("Invalid token"))
}

impl FromRequest for IsAdmin {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(claims_from_request(req).and_then(|claims| {
            match claims.role {
                UserRole::Admin => Ok(IsAdmin(claims.sub)),
                _ => Err(ErrorUnauthorized("Unauthorized role"))
            }
        }))
    }
}

impl FromRequest for IsStaff {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(claims_from_request(req).and_then(|claims| {
            if claims.role.is_staff_level() {
                Ok(IsStaff(claims.sub, claims.role))
            } else {
                Err(ErrorUnauthorized("Unauthorized role"))
            }
        }))
    }
}
