use actix_web::web;

use crate::handlers::home::home;
use crate::handlers::system::health_check;

mod images;
mod moderator;
mod users;
mod json_error;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);
    cfg.service(health_check);

    cfg.configure(images::config_routes);
    cfg.configure(users::config_routes);
    cfg.configure(moderator::config_routes);

    cfg.configure(json_error::config_routes);
}
