//! The endpoint for deleting a tag from the tag manager.

use axum::{
    Extension, Json,
    extract::State,
    response::Response,
};
use rusqlite::Connection;

use crate::{
    Error,
    tag::{
        TagName, TagRequest, TagResponse,
        create::{TagEndpointState, tag_response},
        delete_tag, get_tag_names, is_tag_in_use,
    },
    user::UserID,
};

/// Delete one of the user's tags, returning their remaining tags on success.
///
/// # Errors
///
/// Returns an [Error::TagInUse] if one of the user's expenses has the tag, and an
/// [Error::TagNotFound] if the user has no such tag.
pub fn remove_tag(user_id: UserID, raw_name: &str, connection: &Connection) -> Result<TagResponse, Error> {
    let name = TagName::new(raw_name).map_err(|_| Error::TagNotFound)?;

    if is_tag_in_use(user_id, &name, connection)? {
        return Err(Error::TagInUse(name.to_string()));
    }

    delete_tag(user_id, &name, connection)?;
    let tags = get_tag_names(user_id, connection)?;

    Ok(TagResponse::success(format!("Tag '{name}' deleted."), tags))
}

/// Handle a JSON request to delete a tag.
pub async fn delete_tag_endpoint(
    State(state): State<TagEndpointState>,
    Extension(user_id): Extension<UserID>,
    Json(request): Json<TagRequest>,
) -> Response {
    let result = match state.db_connection.lock() {
        Ok(connection) => remove_tag(user_id, &request.tag_name, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    tag_response(result)
}

#[cfg(test)]
mod delete_tag_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        expense::{NewExpense, create_expense},
        tag::{TagName, create_default_tags},
        test_utils::create_test_user,
        user::create_user,
    };

    use super::remove_tag;

    #[test]
    fn deletes_unused_tag() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let user = create_test_user(&connection);
        create_default_tags(user.id, &connection).unwrap();

        let response = remove_tag(user.id, "College", &connection).unwrap();

        assert!(response.success);
        assert_eq!(response.message, "Tag 'college' deleted.");
        assert_eq!(
            response.tags,
            Some(vec![
                "food".to_owned(),
                "other".to_owned(),
                "transport".to_owned(),
                "utilities".to_owned()
            ])
        );
    }

    #[test]
    fn tag_in_use_is_kept() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let user = create_test_user(&connection);
        create_default_tags(user.id, &connection).unwrap();
        create_expense(
            user.id,
            &NewExpense {
                date: date!(2024 - 01 - 01),
                description: "Lunch".to_owned(),
                total_amount: 12.5,
                tag: TagName::new_unchecked("food"),
                splits: vec![],
            },
            &connection,
        )
        .unwrap();

        assert_eq!(
            remove_tag(user.id, "food", &connection),
            Err(Error::TagInUse("food".to_owned()))
        );
    }

    #[test]
    fn another_users_expense_does_not_block_delete() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let alice = create_test_user(&connection);
        let bob = create_user("bob", "password", &connection).unwrap();
        create_default_tags(alice.id, &connection).unwrap();
        create_expense(
            bob.id,
            &NewExpense {
                date: date!(2024 - 01 - 01),
                description: "Lunch".to_owned(),
                total_amount: 12.5,
                tag: TagName::new_unchecked("food"),
                splits: vec![],
            },
            &connection,
        )
        .unwrap();

        assert!(remove_tag(alice.id, "food", &connection).is_ok());
    }

    #[test]
    fn missing_tag_is_not_found() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let user = create_test_user(&connection);

        assert_eq!(
            remove_tag(user.id, "gym", &connection),
            Err(Error::TagNotFound)
        );
        assert_eq!(remove_tag(user.id, "", &connection), Err(Error::TagNotFound));
    }
}
