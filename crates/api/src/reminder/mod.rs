pub mod cancel_reminder;
pub mod cancel_target_reminders;
pub mod create_reminder;
pub mod create_schedule_reminder;
pub mod get_reminder;
pub mod get_user_reminders;
pub mod process_due_reminders;
pub mod worker;

use actix_web::web;
use cancel_reminder::cancel_reminder_controller;
use cancel_target_reminders::cancel_target_reminders_controller;
use create_reminder::create_reminder_controller;
use create_schedule_reminder::create_schedule_reminder_controller;
use get_reminder::get_reminder_controller;
use get_user_reminders::get_user_reminders_controller;
use process_due_reminders::process_due_reminders_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/user/{user_id}/reminder",
        web::post().to(create_reminder_controller),
    );
    cfg.route(
        "/user/{user_id}/reminder/schedule",
        web::post().to(create_schedule_reminder_controller),
    );
    cfg.route(
        "/user/{user_id}/reminder",
        web::get().to(get_user_reminders_controller),
    );

    cfg.route(
        "/reminder/process",
        web::post().to(process_due_reminders_controller),
    );
    cfg.route(
        "/reminder/target/{target_id}",
        web::delete().to(cancel_target_reminders_controller),
    );
    cfg.route(
        "/reminder/{reminder_id}",
        web::get().to(get_reminder_controller),
    );
    cfg.route(
        "/reminder/{reminder_id}",
        web::delete().to(cancel_reminder_controller),
    );
}
