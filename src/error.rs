use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Client-facing errors / 返回给客户端的错误
///
/// Store failures and unconfigured buckets are reported as `NotFound`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,
    #[error("Bucket/Object Not Found")]
    NotFound,
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = self.to_string();
        match self {
            GatewayError::MethodNotAllowed => {
                (status, [(header::ALLOW, "GET")], body).into_response()
            }
            GatewayError::NotFound => (status, body).into_response(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
