mod get_dst_transitions;
mod validate_local_time;

use actix_web::web;
use get_dst_transitions::get_dst_transitions_controller;
use validate_local_time::validate_local_time_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/timezone/transitions",
        web::get().to(get_dst_transitions_controller),
    );
    cfg.route(
        "/timezone/validate",
        web::post().to(validate_local_time_controller),
    );
}
