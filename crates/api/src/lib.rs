mod error;
mod integrator;
mod job_schedulers;
mod reminder;
mod schedule;
mod shared;
mod status;
mod timezone;

use actix_cors::Cors;
use actix_web::{dev::Server, middleware, web, App, HttpServer};
use chime_infra::ChimeContext;
use std::{net::TcpListener, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use error::ChimeError;
pub use integrator::Integrator;
pub use job_schedulers::{ReminderScheduler, SchedulerMetrics, SchedulerStats};
pub use reminder::worker::{Delivery, ReminderWorker, WorkerError};

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    reminder::configure_routes(cfg);
    schedule::configure_routes(cfg);
    status::configure_routes(cfg);
    timezone::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
    scheduler: Arc<ReminderScheduler>,
    shutdown: CancellationToken,
}

impl Application {
    pub async fn new(context: ChimeContext) -> Result<Self, std::io::Error> {
        let scheduler = Arc::new(ReminderScheduler::new(context.clone()));
        let (server, port) = Application::configure_server(context, scheduler.clone()).await?;

        Ok(Self {
            server,
            port,
            scheduler,
            shutdown: CancellationToken::new(),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn scheduler(&self) -> Arc<ReminderScheduler> {
        self.scheduler.clone()
    }

    /// Cancelling the token stops the reminder scheduler
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    async fn configure_server(
        context: ChimeContext,
        scheduler: Arc<ReminderScheduler>,
    ) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let ctx = web::Data::new(context);
        let scheduler = web::Data::from(scheduler);
        let server = HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(TracingLogger::default())
                .app_data(ctx.clone())
                .app_data(scheduler.clone())
                .service(web::scope("/api/v1").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    /// Runs the reminder scheduler next to the server until the server exits
    pub async fn start(self) -> Result<(), std::io::Error> {
        self.scheduler.start(&self.shutdown);
        info!("Listening on port {}", self.port);

        let res = self.server.await;

        self.shutdown.cancel();
        self.scheduler.stop().await;
        res
    }
}
