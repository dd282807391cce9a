use axum::{
    async_trait,
    extract::{FromRequest, Path, Query, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    Form, Json,
};
use log::{error, warn};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tutorial_core::{
    Tutorial, TutorialDraft, TutorialId, TutorialListQuery, TutorialPatch, TutorialServiceError,
};

use crate::{error::AppError, state::AppState};

/// `{"message": ...}` body used for acknowledgements and errors alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Request body accepted as JSON or as `application/x-www-form-urlencoded`.
#[derive(Debug)]
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| bad_body(rejection.status(), rejection.body_text()))?;
            return Ok(Self(value));
        }

        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| bad_body(rejection.status(), rejection.body_text()))?;
        Ok(Self(value))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub title: Option<String>,
}

pub async fn welcome_handler() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome to DD Task application."))
}

pub async fn list_tutorials_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Tutorial>>, AppError> {
    let query = TutorialListQuery {
        title: params.title,
        ..TutorialListQuery::default()
    };
    let result = state
        .with_service(move |service| service.list_tutorials(&query))
        .await?;

    result
        .map(Json)
        .map_err(|err| internal("retrieving tutorials", err))
}

pub async fn list_published_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Tutorial>>, AppError> {
    let result = state
        .with_service(|service| service.list_published())
        .await?;

    result
        .map(Json)
        .map_err(|err| internal("retrieving tutorials", err))
}

pub async fn get_tutorial_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Tutorial>, AppError> {
    let not_found = || AppError::NotFound(format!("Not found Tutorial with id {raw_id}"));
    let id = parse_id(&raw_id).ok_or_else(not_found)?;

    match state
        .with_service(move |service| service.get_tutorial(id))
        .await?
    {
        Ok(tutorial) => Ok(Json(tutorial)),
        Err(TutorialServiceError::NotFound(_)) => Err(not_found()),
        Err(err) => Err(internal(
            &format!("retrieving Tutorial with id={raw_id}"),
            err,
        )),
    }
}

pub async fn create_tutorial_handler(
    State(state): State<AppState>,
    Payload(draft): Payload<TutorialDraft>,
) -> Result<Json<Tutorial>, AppError> {

    match state
        .with_service(move |service| service.create_tutorial(draft))
        .await?
    {
        Ok(tutorial) => Ok(Json(tutorial)),
        Err(TutorialServiceError::Validation(err)) => Err(AppError::BadRequest(err.to_string())),
        Err(err) => Err(internal("creating the Tutorial", err)),
    }
}

pub async fn update_tutorial_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Payload(patch): Payload<TutorialPatch>,
) -> Result<Json<MessageResponse>, AppError> {
    let not_found = || update_not_found(&raw_id);
    if patch.is_empty() {
        return Err(AppError::BadRequest(
            TutorialServiceError::EmptyUpdate.to_string(),
        ));
    }
    let id = parse_id(&raw_id).ok_or_else(not_found)?;

    match state
        .with_service(move |service| service.update_tutorial(id, &patch))
        .await?
    {
        Ok(_) => Ok(Json(MessageResponse::new(
            "Tutorial was updated successfully.",
        ))),
        Err(TutorialServiceError::NotFound(_)) => Err(not_found()),
        Err(err @ (TutorialServiceError::Validation(_) | TutorialServiceError::EmptyUpdate)) => {
            Err(AppError::BadRequest(err.to_string()))
        }
        Err(err) => Err(internal(
            &format!("updating Tutorial with id={raw_id}"),
            err,
        )),
    }
}

pub async fn delete_tutorial_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let not_found = || delete_not_found(&raw_id);
    let id = parse_id(&raw_id).ok_or_else(not_found)?;

    match state
        .with_service(move |service| service.delete_tutorial(id))
        .await?
    {
        Ok(()) => Ok(Json(MessageResponse::new(
            "Tutorial was deleted successfully!",
        ))),
        Err(TutorialServiceError::NotFound(_)) => Err(not_found()),
        Err(err) => Err(internal(
            &format!("deleting Tutorial with id={raw_id}"),
            err,
        )),
    }
}

pub async fn delete_all_tutorials_handler(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, AppError> {
    let result = state
        .with_service(|service| service.delete_all_tutorials())
        .await?;

    result
        .map(|deleted| {
            Json(MessageResponse::new(format!(
                "{deleted} Tutorials were deleted successfully!"
            )))
        })
        .map_err(|err| internal("removing all tutorials", err))
}

/// `PUT /api/tutorials/published` shadows the `:id` route; no tutorial has that id.
pub async fn update_published_handler() -> AppError {
    update_not_found(PUBLISHED_SEGMENT)
}

/// `DELETE /api/tutorials/published`, see [`update_published_handler`].
pub async fn delete_published_handler() -> AppError {
    delete_not_found(PUBLISHED_SEGMENT)
}

const PUBLISHED_SEGMENT: &str = "published";

fn update_not_found(raw_id: &str) -> AppError {
    AppError::NotFound(format!(
        "Cannot update Tutorial with id={raw_id}. Maybe Tutorial was not found!"
    ))
}

fn delete_not_found(raw_id: &str) -> AppError {
    AppError::NotFound(format!(
        "Cannot delete Tutorial with id={raw_id}. Maybe Tutorial was not found!"
    ))
}

/// Ids that are not UUIDs cannot name a stored tutorial.
fn parse_id(raw: &str) -> Option<TutorialId> {
    TutorialId::parse_str(raw).ok()
}

fn bad_body(status: StatusCode, message: String) -> AppError {
    warn!(
        "event=http_body module=server status=rejected http_status={} error={}",
        status.as_u16(),
        message
    );
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(message);
    }
    AppError::BadRequest(message)
}

/// Logs the storage failure and hides its details from the client.
fn internal(action: &str, err: TutorialServiceError) -> AppError {
    error!("event=tutorial_op module=server status=error action=\"{action}\" error={err}");
    AppError::Internal(format!("Some error occurred while {action}."))
}
