use crate::job_schedulers::ReminderScheduler;
use actix_web::{web, HttpResponse};
use chime_api_structs::{dtos::SchedulerStatusDTO, get_service_health::*};

async fn status(scheduler: web::Data<ReminderScheduler>) -> HttpResponse {
    let stats = scheduler.health_check();
    HttpResponse::Ok().json(APIResponse {
        message: "Chime is running".into(),
        scheduler: SchedulerStatusDTO {
            running: stats.running,
            healthy: stats.healthy,
            total_processed: stats.total_processed,
            total_failed: stats.total_failed,
            check_count: stats.check_count,
            last_run_at: stats.last_run_at,
        },
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/status", web::get().to(status));
}
