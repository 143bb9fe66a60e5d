use crate::error::ChimeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chime_api_structs::get_dst_transitions::*;
use chime_domain::{DSTTransition, TimezoneValidator, Tz};
use chime_infra::ChimeContext;

/// Longest window that may be scanned in one request
const MAX_WINDOW_SECS: i64 = 5 * 366 * 24 * 60 * 60;

pub async fn get_dst_transitions_controller(
    query_params: web::Query<QueryParams>,
    ctx: web::Data<ChimeContext>,
) -> Result<HttpResponse, ChimeError> {
    let query = query_params.0;
    let usecase = GetDSTTransitionsUseCase {
        timezone: query.timezone.clone(),
        start_ts: query.start_ts,
        end_ts: query.end_ts,
    };

    execute(usecase, &ctx)
        .await
        .map(|transitions| HttpResponse::Ok().json(APIResponse::new(query.timezone, transitions)))
        .map_err(ChimeError::from)
}

#[derive(Debug)]
pub struct GetDSTTransitionsUseCase {
    pub timezone: String,
    pub start_ts: i64,
    pub end_ts: i64,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidTimezone(String),
    InvalidWindow,
}

impl From<UseCaseError> for ChimeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidTimezone(msg) => Self::BadClientData(format!(
                "Invalid timezone: {}. It should be a valid IANA TimeZone.",
                msg
            )),
            UseCaseError::InvalidWindow => Self::BadClientData(
                "The end must be after the start and the window can be at most 5 years.".into(),
            ),
        }
    }
}

#[async_trait::async_trait]
impl UseCase for GetDSTTransitionsUseCase {
    type Response = Vec<DSTTransition>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetDSTTransitions";

    async fn execute(&mut self, _ctx: &ChimeContext) -> Result<Self::Response, Self::Error> {
        let tz: Tz = self
            .timezone
            .parse()
            .map_err(|_| UseCaseError::InvalidTimezone(self.timezone.clone()))?;

        if self.end_ts <= self.start_ts || self.end_ts - self.start_ts > MAX_WINDOW_SECS {
            return Err(UseCaseError::InvalidWindow);
        }

        Ok(TimezoneValidator::with_tz(tz).dst_transitions(self.start_ts, self.end_ts))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chime_domain::DSTTransitionType;
    use chime_infra::Config;
    use chrono::{TimeZone, Utc};

    #[actix_web::main]
    #[test]
    async fn reports_both_transitions_of_a_year() {
        let ctx = ChimeContext::create_inmemory(Config::default());
        let mut usecase = GetDSTTransitionsUseCase {
            timezone: "America/New_York".into(),
            start_ts: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap().timestamp(),
            end_ts: Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap().timestamp(),
        };
        let transitions = usecase.execute(&ctx).await.unwrap();
        assert_eq!(transitions.len(), 2);
        assert_eq!(transitions[0].kind, DSTTransitionType::SpringForward);
        assert_eq!(transitions[1].kind, DSTTransitionType::FallBack);
    }

    #[actix_web::main]
    #[test]
    async fn rejects_inverted_window() {
        let ctx = ChimeContext::create_inmemory(Config::default());
        let mut usecase = GetDSTTransitionsUseCase {
            timezone: "UTC".into(),
            start_ts: 100,
            end_ts: 10,
        };
        assert!(matches!(
            usecase.execute(&ctx).await,
            Err(UseCaseError::InvalidWindow)
        ));
    }
}
