use chime_api_structs::ErrorBody;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum APIErrorVariant {
    Network,
    MalformedResponse,
    BadClientData,
    NotFound,
    Conflict,
    InternalError,
    DeliveryUnavailable,
    UnexpectedStatusCode,
}

#[derive(Debug, Clone)]
pub struct APIError {
    pub variant: APIErrorVariant,
    pub status: Option<StatusCode>,
    /// `code` of the server's error body when it sent one
    pub code: Option<String>,
    pub message: String,
}

pub type APIResponse<T> = Result<T, APIError>;

pub(crate) struct BaseClient {
    client: Client,
    address: String,
}

impl BaseClient {
    pub fn new(address: String) -> Self {
        let address = address.trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            address: format!("{}/api/v1", address),
        }
    }

    fn url(&self, path: &str) -> String {
        if path.is_empty() {
            self.address.clone()
        } else {
            format!("{}/{}", self.address, path)
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        expected_status: StatusCode,
    ) -> APIResponse<T> {
        let res = req.send().await.map_err(|e| APIError {
            variant: APIErrorVariant::Network,
            status: None,
            code: None,
            message: e.to_string(),
        })?;

        let status = res.status();
        if status != expected_status {
            let variant = match status {
                StatusCode::BAD_REQUEST => APIErrorVariant::BadClientData,
                StatusCode::NOT_FOUND => APIErrorVariant::NotFound,
                StatusCode::CONFLICT => APIErrorVariant::Conflict,
                StatusCode::INTERNAL_SERVER_ERROR => APIErrorVariant::InternalError,
                StatusCode::SERVICE_UNAVAILABLE => APIErrorVariant::DeliveryUnavailable,
                _ => APIErrorVariant::UnexpectedStatusCode,
            };
            let text = res.text().await.unwrap_or_default();
            let (code, message) = match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) => (Some(body.code), body.message),
                Err(_) => (None, text),
            };
            return Err(APIError {
                variant,
                status: Some(status),
                code,
                message,
            });
        }

        res.json::<T>().await.map_err(|e| APIError {
            variant: APIErrorVariant::MalformedResponse,
            status: Some(status),
            code: None,
            message: e.to_string(),
        })
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: String,
        expected_status: StatusCode,
    ) -> APIResponse<T> {
        let req = self.client.get(self.url(&path));
        self.handle_response(req, expected_status).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: String,
        expected_status: StatusCode,
    ) -> APIResponse<T> {
        let req = self.client.delete(self.url(&path));
        self.handle_response(req, expected_status).await
    }

    pub async fn post<T: DeserializeOwned, S: Serialize>(
        &self,
        body: S,
        path: String,
        expected_status: StatusCode,
    ) -> APIResponse<T> {
        let req = self.client.post(self.url(&path)).json(&body);
        self.handle_response(req, expected_status).await
    }
}
