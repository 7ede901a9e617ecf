// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use validator::ValidationErrors;

use crate::domain::gateways::GatewayError;
use crate::utils::errors::{RepositoryError, ServiceError};

/// 应用错误类型
///
/// 封装所有可能的应用层错误，按具体错误类型决定状态码
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    /// 状态码与是否提示升级套餐
    fn classify(&self) -> (StatusCode, bool) {
        if let Some(err) = self.0.downcast_ref::<ServiceError>() {
            let status = match err {
                ServiceError::Validation(_) | ServiceError::AnalysisFailed(_) => {
                    StatusCode::BAD_REQUEST
                }
                ServiceError::LimitReached(_) => StatusCode::TOO_MANY_REQUESTS,
                ServiceError::PlanRestricted(_) => StatusCode::FORBIDDEN,
                ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::Conflict(_) => StatusCode::CONFLICT,
                ServiceError::Upstream(_) => StatusCode::BAD_GATEWAY,
                ServiceError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                ServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
                ServiceError::Repository(_) | ServiceError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            return (status, err.upgrade_required());
        }

        if self.0.downcast_ref::<ValidationErrors>().is_some() {
            return (StatusCode::BAD_REQUEST, false);
        }

        match self.0.downcast_ref::<RepositoryError>() {
            Some(RepositoryError::NotFound) => return (StatusCode::NOT_FOUND, false),
            Some(_) => return (StatusCode::INTERNAL_SERVER_ERROR, false),
            None => {}
        }

        match self.0.downcast_ref::<GatewayError>() {
            Some(GatewayError::NotConfigured(_)) => (StatusCode::SERVICE_UNAVAILABLE, false),
            Some(_) => (StatusCode::BAD_GATEWAY, false),
            None => (StatusCode::INTERNAL_SERVER_ERROR, false),
        }
    }

    fn message(&self) -> String {
        match self.0.downcast_ref::<ValidationErrors>() {
            Some(errors) => validation_message(errors),
            None => self.0.to_string(),
        }
    }
}

/// 取第一个字段错误作为提示
fn validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .into_iter()
        .find_map(|(field, errs)| {
            errs.first().map(|e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("Invalid {}", field),
            })
        })
        .unwrap_or_else(|| "Invalid request".to_string())
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, upgrade_required) = self.classify();

        let error_message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {:#}", self.0);
            "Internal server error".to_string()
        } else {
            tracing::debug!("Request rejected with {}: {}", status, self.0);
            self.message()
        };

        let body = if upgrade_required {
            Json(json!({ "error": error_message, "upgrade_required": true }))
        } else {
            Json(json!({ "error": error_message }))
        };
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
