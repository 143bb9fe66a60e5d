use actix_web::{http::StatusCode, HttpResponse};
use chime_api_structs::ErrorBody;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChimeError {
    #[error("Internal server error")]
    InternalError,
    #[error("Invalid data provided: {0}")]
    BadClientData(String),
    #[error("The reminder cannot be changed: {0}")]
    Conflict(String),
    #[error("Not found: {0}")]
    NotFound(String),
    /// No notifier is configured, so nothing can be delivered
    #[error("Reminder delivery is unavailable: {0}")]
    DeliveryUnavailable(String),
}

impl ChimeError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InternalError => "internal_error",
            Self::BadClientData(_) => "bad_client_data",
            Self::Conflict(_) => "conflict",
            Self::NotFound(_) => "not_found",
            Self::DeliveryUnavailable(_) => "delivery_unavailable",
        }
    }
}

impl actix_web::error::ResponseError for ChimeError {
    fn status_code(&self) -> StatusCode {
        match *self {
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadClientData(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::DeliveryUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            code: self.code().to_string(),
            message: self.to_string(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use actix_web::{body::to_bytes, ResponseError};

    #[actix_web::main]
    #[test]
    async fn errors_render_as_json_bodies() {
        let err = ChimeError::NotFound("The reminder with id: 42, was not found.".into());
        let res = err.error_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let bytes = to_bytes(res.into_body()).await.unwrap();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.code, "not_found");
        assert_eq!(body.message, "Not found: The reminder with id: 42, was not found.");
    }

    #[test]
    fn maps_every_variant_to_a_status() {
        let cases = [
            (ChimeError::InternalError, StatusCode::INTERNAL_SERVER_ERROR),
            (ChimeError::BadClientData("x".into()), StatusCode::BAD_REQUEST),
            (ChimeError::Conflict("x".into()), StatusCode::CONFLICT),
            (ChimeError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                ChimeError::DeliveryUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_code(), status, "{}", err.code());
        }
    }
}
