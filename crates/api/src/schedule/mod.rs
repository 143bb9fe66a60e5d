mod preview_batch_schedules;

use actix_web::web;
use preview_batch_schedules::preview_batch_schedules_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/schedule/batch",
        web::post().to(preview_batch_schedules_controller),
    );
}
