use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{entities::account::RegisterAccountRequest, errors::AppError, AppState};

#[instrument(skip(state, data))]
pub async fn register_account(
    state: web::Data<AppState>,
    data: web::Json<RegisterAccountRequest>,
) -> Result<impl Responder, AppError> {
    let account_handler = &state.accounts;

    let response = account_handler.register(data.into_inner()).await?;

    Ok(HttpResponse::Created().json(response))
}
