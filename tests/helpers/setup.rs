use chime_api::Application;
use chime_infra::{notifications::MockNotifier, setup_context, Config, StaticTimeSys};
use chime_sdk::ChimeSDK;
use chrono::{DateTime, Utc};
use std::{sync::Arc, time::Duration};

pub struct TestApp {
    pub config: Config,
    pub notifier: Arc<MockNotifier>,
    /// Clock shared with the server, move it to make reminders due
    pub sys: Arc<StaticTimeSys>,
    pub now: DateTime<Utc>,
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, ChimeSDK, String) {
    spawn_app_with_notifier(MockNotifier::new()).await
}

pub async fn spawn_app_with_notifier(notifier: MockNotifier) -> (TestApp, ChimeSDK, String) {
    let now = Utc::now();
    let sys = Arc::new(StaticTimeSys::new(now));
    let notifier = Arc::new(notifier);

    let mut ctx = setup_context();
    ctx.config.port = 0; // Random port
    // Only the immediate startup cycle runs during a test
    ctx.config.scheduler.interval = Duration::from_secs(60 * 60);
    ctx.config.scheduler.max_retries = 2;
    ctx.config.scheduler.retry_delay = Duration::from_millis(10);
    let ctx = ctx.with_sys(sys.clone()).with_notifier(Some(notifier.clone()));

    let config = ctx.config.clone();
    let application = Application::new(ctx)
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let app = TestApp {
        config,
        notifier,
        sys,
        now,
    };
    let sdk = ChimeSDK::new(address.clone());
    (app, sdk, address)
}
