use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    errors::AppError, query::ImageQuery, use_cases::extractors::ModeratorScope, AppState,
};

#[instrument(skip(_scope, state, query))]
pub async fn list_all_images(
    _scope: ModeratorScope,
    state: web::Data<AppState>,
    query: web::Query<ImageQuery>,
) -> Result<impl Responder, AppError> {
    let image_handler = &state.images;

    let images = image_handler.list_all(&query).await?;

    Ok(HttpResponse::Ok().json(images))
}

#[instrument(skip(_scope, state))]
pub async fn block_account(
    _scope: ModeratorScope,
    account_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let account_handler = &state.accounts;

    let account = account_handler.set_blocked(&account_id, true).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Account {} has been blocked", account.id)
    })))
}

#[instrument(skip(_scope, state))]
pub async fn unblock_account(
    _scope: ModeratorScope,
    account_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let account_handler = &state.accounts;

    let account = account_handler.set_blocked(&account_id, false).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Account {} has been unblocked", account.id)
    })))
}
