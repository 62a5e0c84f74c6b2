use actix_web::web;

use crate::handlers::images;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/image")
            .service(
                web::resource("/upload")
                    .route(web::post().to(images::upload_image))
            )
            .service(
                web::resource("/list")
                    .route(web::get().to(images::list_images))
            )
            .service(
                web::resource("/{image_id}/download")
                    .route(web::get().to(images::download_image))
            )
    );
}
