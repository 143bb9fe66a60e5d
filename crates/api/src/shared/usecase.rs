use chime_infra::ChimeContext;
use std::fmt::Debug;
use tracing::error;

/// A single operation against the `ChimeContext`.
///
/// Controllers, the `ReminderScheduler` and the `Integrator` all go through
/// `execute` so that failures are logged the same way.
#[async_trait::async_trait]
pub trait UseCase: Debug + Send {
    type Response: Send;
    type Error: Debug + Send;

    const NAME: &'static str;

    async fn execute(&mut self, ctx: &ChimeContext) -> Result<Self::Response, Self::Error>;
}

#[tracing::instrument(name = "Executing usecase", skip(usecase, ctx), fields(usecase = U::NAME))]
pub async fn execute<U>(mut usecase: U, ctx: &ChimeContext) -> Result<U::Response, U::Error>
where
    U: UseCase,
{
    let res = usecase.execute(ctx).await;

    if let Err(e) = &res {
        error!("Use case {} failed: {:?}", U::NAME, e);
    }

    res
}
