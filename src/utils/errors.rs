// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 仓库层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Record not found")]
    NotFound,

    #[error("Record already exists")]
    AlreadyExists,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<sea_orm::DbErr> for RepositoryError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => RepositoryError::AlreadyExists,
            _ => RepositoryError::DatabaseError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::InternalError(format!("JSON column error: {}", err))
    }
}

/// 业务服务错误类型
///
/// 每个变体在表示层映射到固定的 HTTP 状态码
#[derive(Error, Debug)]
pub enum ServiceError {
    /// 输入校验失败 (400)
    #[error("{0}")]
    Validation(String),

    /// 套餐用量达到上限 (429)
    #[error("{0}")]
    LimitReached(String),

    /// 当前套餐不允许此操作 (403)
    #[error("{0}")]
    PlanRestricted(String),

    /// 认证失败 (401)
    #[error("{0}")]
    Unauthorized(String),

    /// 资源不存在 (404)
    #[error("{0}")]
    NotFound(String),

    /// 资源冲突 (409)
    #[error("{0}")]
    Conflict(String),

    /// 页面抓取或解析失败 (400)
    #[error("{0}")]
    AnalysisFailed(String),

    /// 第三方服务调用失败 (502)
    #[error("{0}")]
    Upstream(String),

    /// 功能未配置 (503)
    #[error("{0}")]
    Unavailable(String),

    /// 仓库错误 (500)
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// 内部错误 (500)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// 是否需要提示用户升级套餐
    pub fn upgrade_required(&self) -> bool {
        matches!(
            self,
            ServiceError::LimitReached(_) | ServiceError::PlanRestricted(_)
        )
    }
}

/// Worker错误类型
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Repository error: {0}")]
    RepositoryError(String),

    #[error("Service error: {0}")]
    ServiceError(String),
}

impl From<ServiceError> for WorkerError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Repository(e) => WorkerError::RepositoryError(e.to_string()),
            other => WorkerError::ServiceError(other.to_string()),
        }
    }
}
