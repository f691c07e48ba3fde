use actix_web::HttpResponse;

use crate::envelope::Envelope;

#[tracing::instrument(
    "Checking if api is online"
)]
pub async fn health_check() -> HttpResponse{
    HttpResponse::Ok().json(Envelope::empty())
}
