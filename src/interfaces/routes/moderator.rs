use actix_web::web;

use crate::handlers::moderator;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/moderator")
            .service(
                web::resource("/list")
                    .route(web::get().to(moderator::list_all_images))
            )
            .service(
                web::resource("/{account_id}/block")
                    .route(web::post().to(moderator::block_account))
            )
            .service(
                web::resource("/{account_id}/unblock")
                    .route(web::post().to(moderator::unblock_account))
            )
    );
}
