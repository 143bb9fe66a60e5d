use crate::error::ChimeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chime_api_structs::preview_batch_schedules::*;
use chime_domain::{BatchCreateRequest, BatchError, ScheduleRequest, Tz};
use chime_infra::ChimeContext;

pub async fn preview_batch_schedules_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<ChimeContext>,
) -> Result<HttpResponse, ChimeError> {
    let body = body.0;
    let usecase = PreviewBatchSchedulesUseCase {
        request: BatchCreateRequest {
            title: body.title,
            start_time: body.start_time,
            duration: body.duration,
            location: body.location,
            recurrence: body.recurrence,
            end_date: body.end_date,
            count: body.count,
        },
        timezone: body.timezone,
    };

    execute(usecase, &ctx)
        .await
        .map(|schedules| HttpResponse::Ok().json(APIResponse::new(schedules)))
        .map_err(ChimeError::from)
}

/// Expands a recurring schedule into its concrete occurrences without storing anything
#[derive(Debug)]
pub struct PreviewBatchSchedulesUseCase {
    pub request: BatchCreateRequest,
    /// Falls back to the configured zone
    pub timezone: Option<String>,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidTimezone(String),
    InvalidRequest(BatchError),
}

impl From<UseCaseError> for ChimeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidTimezone(msg) => Self::BadClientData(format!(
                "Invalid timezone: {}. It should be a valid IANA TimeZone.",
                msg
            )),
            UseCaseError::InvalidRequest(e) => Self::BadClientData(e.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl UseCase for PreviewBatchSchedulesUseCase {
    type Response = Vec<ScheduleRequest>;

    type Error = UseCaseError;

    const NAME: &'static str = "PreviewBatchSchedules";

    async fn execute(&mut self, ctx: &ChimeContext) -> Result<Self::Response, Self::Error> {
        let tz: Tz = match &self.timezone {
            Some(tzid) => tzid
                .parse()
                .map_err(|_| UseCaseError::InvalidTimezone(tzid.clone()))?,
            None => ctx.config.timezone,
        };

        self.request
            .generate_schedules(&tz)
            .map_err(UseCaseError::InvalidRequest)
    }
}
