use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::dogs::store::{create_dog, delete_dog, get_dog, list_dogs, update_dog, DogUpdate, NewDog};
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::dog::DogRow;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CreateDogRequest {
    pub user_id: Uuid,
    pub name: String,
    pub breed: Option<String>,
    pub age: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDogRequest {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub breed: Option<String>,
    pub age: Option<String>,
    pub image_url: Option<String>,
}

/// GET /api/dogs
pub async fn handle_list_dogs(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<DogRow>>, AppError> {
    Ok(Json(list_dogs(&state.db, params.user_id).await?))
}

/// POST /api/dogs
pub async fn handle_create_dog(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateDogRequest>,
) -> Result<(StatusCode, Json<DogRow>), AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }

    let dog = create_dog(
        &state.db,
        NewDog {
            user_id: req.user_id,
            name,
            breed: req.breed.as_deref(),
            age: req.age.as_deref(),
            image_url: req.image_url.as_deref(),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(dog)))
}

/// GET /api/dogs/:id
pub async fn handle_get_dog(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<DogRow>, AppError> {
    get_dog(&state.db, params.user_id, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Dog {id} not found")))
}

/// PATCH /api/dogs/:id
pub async fn handle_update_dog(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<UpdateDogRequest>,
) -> Result<Json<DogRow>, AppError> {
    let name = req.name.as_deref().map(str::trim);
    if name == Some("") {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }

    let update = DogUpdate {
        name,
        breed: req.breed.as_deref(),
        age: req.age.as_deref(),
        image_url: req.image_url.as_deref(),
    };

    update_dog(&state.db, req.user_id, id, update)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Dog {id} not found")))
}

/// DELETE /api/dogs/:id
pub async fn handle_delete_dog(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    if delete_dog(&state.db, params.user_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Dog {id} not found")))
    }
}
