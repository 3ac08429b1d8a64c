use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::PublicUser;
use crate::routes::AppJson;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct RoleRequest {
    pub role: String,
}

pub async fn update_role(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<RoleRequest>,
) -> Result<Json<PublicUser>, AppError> {
    let user = state.auth.assign_role(&auth.user, id, &req.role).await?;
    Ok(Json(PublicUser::from(&user)))
}
