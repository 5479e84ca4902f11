use actix_web::web;

use crate::handlers::contact_me;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(contact_me::create_contact_me);
}
