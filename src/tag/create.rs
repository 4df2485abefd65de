//! The endpoint for adding a tag from the tag manager.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    tag::{TagName, TagRequest, TagResponse, create_tag, get_tag_names},
    user::UserID,
};

/// The state needed for creating or deleting a tag.
#[derive(Debug, Clone)]
pub struct TagEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TagEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Convert the outcome of a tag operation into the JSON the tag manager expects.
pub(crate) fn tag_response(result: Result<TagResponse, Error>) -> Response {
    match result {
        Ok(response) => Json(response).into_response(),
        Err(error) => {
            let status_code = if error.is_internal() {
                StatusCode::INTERNAL_SERVER_ERROR
            } else {
                StatusCode::OK
            };

            (status_code, Json(TagResponse::failure(&error))).into_response()
        }
    }
}

/// Add a tag for the user, returning all of their tags on success.
pub fn add_tag(user_id: UserID, raw_name: &str, connection: &Connection) -> Result<TagResponse, Error> {
    let name = TagName::new(raw_name)?;

    create_tag(user_id, &name, connection)?;
    let tags = get_tag_names(user_id, connection)?;

    Ok(TagResponse::success(format!("Tag '{name}' added."), tags))
}

/// Handle a JSON request to add a tag.
pub async fn add_tag_endpoint(
    State(state): State<TagEndpointState>,
    Extension(user_id): Extension<UserID>,
    Json(request): Json<TagRequest>,
) -> Response {
    let result = match state.db_connection.lock() {
        Ok(connection) => add_tag(user_id, &request.tag_name, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    tag_response(result)
}

#[cfg(test)]
mod add_tag_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, Json, extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        tag::{TagRequest, TagResponse},
        test_utils::{create_test_user, parse_json},
        user::UserID,
    };

    use super::{TagEndpointState, add_tag_endpoint};

    fn get_state() -> (TagEndpointState, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let user = create_test_user(&connection);

        (
            TagEndpointState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            user.id,
        )
    }

    async fn add(state: &TagEndpointState, user_id: UserID, tag_name: &str) -> (StatusCode, TagResponse) {
        let response = add_tag_endpoint(
            State(state.clone()),
            Extension(user_id),
            Json(TagRequest {
                tag_name: tag_name.to_owned(),
            }),
        )
        .await;
        let status = response.status();
        let body = parse_json(response).await;

        (status, serde_json::from_value(body).unwrap())
    }

    #[tokio::test]
    async fn adds_normalised_tag() {
        let (state, user_id) = get_state();

        let (status, body) = add(&state, user_id, "  Gym ").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            TagResponse {
                success: true,
                message: "Tag 'gym' added.".to_owned(),
                tags: Some(vec!["gym".to_owned()]),
            }
        );
    }

    #[tokio::test]
    async fn rejects_empty_name() {
        let (state, user_id) = get_state();

        let (_, body) = add(&state, user_id, "   ").await;

        assert!(!body.success);
        assert_eq!(body.message, "Tag name cannot be empty.");
        assert_eq!(body.tags, None);
    }

    #[tokio::test]
    async fn rejects_duplicate_name() {
        let (state, user_id) = get_state();
        add(&state, user_id, "gym").await;

        let (_, body) = add(&state, user_id, "GYM").await;

        assert!(!body.success);
        assert_eq!(body.message, "Tag 'gym' already exists.");
    }
}
