use crate::error::ChimeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chime_api_structs::validate_local_time::*;
use chime_domain::{TimezoneError, TimezoneValidator, Tz, ValidationResult};
use chime_infra::ChimeContext;

pub async fn validate_local_time_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<ChimeContext>,
) -> Result<HttpResponse, ChimeError> {
    let body = body.0;
    let usecase = ValidateLocalTimeUseCase {
        timezone: body.timezone,
        year: body.year,
        month: body.month,
        day: body.day,
        hour: body.hour,
        minute: body.minute,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res)))
        .map_err(ChimeError::from)
}

#[derive(Debug)]
pub struct ValidateLocalTimeUseCase {
    pub timezone: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidTimezone(String),
    InvalidDate(TimezoneError),
}

impl From<UseCaseError> for ChimeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidTimezone(msg) => Self::BadClientData(format!(
                "Invalid timezone: {}. It should be a valid IANA TimeZone.",
                msg
            )),
            UseCaseError::InvalidDate(e) => Self::BadClientData(e.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl UseCase for ValidateLocalTimeUseCase {
    type Response = ValidationResult;

    type Error = UseCaseError;

    const NAME: &'static str = "ValidateLocalTime";

    async fn execute(&mut self, _ctx: &ChimeContext) -> Result<Self::Response, Self::Error> {
        let tz: Tz = self
            .timezone
            .parse()
            .map_err(|_| UseCaseError::InvalidTimezone(self.timezone.clone()))?;

        TimezoneValidator::with_tz(tz)
            .validate_local_time(self.year, self.month, self.day, self.hour, self.minute)
            .map_err(UseCaseError::InvalidDate)
    }
}
