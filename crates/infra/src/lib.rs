mod config;
mod delivery;
mod repos;
mod services;
mod system;

pub use config::{Config, SchedulerConfig};
pub use delivery::{InFlightClaim, InFlightReminders};
pub use repos::{
    IAppNotificationRepo, IReminderRepo, InMemoryAppNotificationRepo, InMemoryReminderRepo,
    RepoError, Repos,
};
pub use services::*;
use services::notifications::{
    AppNotificationSender, EmailSender, INotifier, LogMailer, NotificationDispatcher,
    StaticEmailResolver, WebhookSender,
};
use chime_domain::{Channel, TimezoneValidator};
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use tracing::warn;

#[derive(Clone)]
pub struct ChimeContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    /// `None` means reminders cannot be delivered at all
    pub notifier: Option<Arc<dyn INotifier>>,
    pub habits: Option<Arc<dyn IHabitAnalyzer>>,
    pub timezone_validator: TimezoneValidator,
    /// Reminders with a delivery in progress
    pub in_flight: Arc<InFlightReminders>,
}

impl ChimeContext {
    /// Context backed by in-memory repositories and a `NotificationDispatcher`
    /// with the channels enabled in `config`
    pub fn create_inmemory(config: Config) -> Self {
        let repos = Repos::create_inmemory();
        let sys: Arc<dyn ISys> = Arc::new(RealSys {});
        let dispatcher = build_dispatcher(&config, &repos, sys.clone());
        Self {
            timezone_validator: TimezoneValidator::with_tz(config.timezone),
            repos,
            config,
            sys,
            notifier: Some(Arc::new(dispatcher)),
            habits: None,
            in_flight: Arc::new(InFlightReminders::new()),
        }
    }

    pub fn with_notifier(mut self, notifier: Option<Arc<dyn INotifier>>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_sys(mut self, sys: Arc<dyn ISys>) -> Self {
        self.sys = sys;
        self
    }

    pub fn with_habits(mut self, habits: Arc<dyn IHabitAnalyzer>) -> Self {
        self.habits = Some(habits);
        self
    }
}

/// Registers the `app` channel and, when configured, `email` and `webhook`
pub fn build_dispatcher(config: &Config, repos: &Repos, sys: Arc<dyn ISys>) -> NotificationDispatcher {
    let dispatcher = NotificationDispatcher::new();
    dispatcher.register(
        Channel::app(),
        Arc::new(AppNotificationSender::new(repos.app_notifications.clone(), sys)),
    );

    if let Some(email) = &config.email {
        dispatcher.register(
            Channel::email(),
            Arc::new(EmailSender::new(
                email.clone(),
                Arc::new(StaticEmailResolver::default()),
                Arc::new(LogMailer::new(email.clone())),
            )),
        );
    }

    if let Some(webhook) = &config.webhook {
        match WebhookSender::new(webhook.clone()) {
            Ok(sender) => dispatcher.register(Channel::webhook(), Arc::new(sender)),
            Err(e) => warn!("Unable to create the webhook channel: {}", e),
        }
    }

    dispatcher
}

/// Will setup the infrastructure context given the environment
pub fn setup_context() -> ChimeContext {
    ChimeContext::create_inmemory(Config::new())
}
