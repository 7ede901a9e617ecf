// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::Extension, Json};
use std::sync::Arc;

use crate::application::AppContext;
use crate::domain::services::account_service::Dashboard;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::CurrentUser;

pub async fn dashboard(
    Extension(ctx): Extension<Arc<AppContext>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Dashboard>, AppError> {
    Ok(Json(ctx.accounts.dashboard(&user).await?))
}
