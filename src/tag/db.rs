//! Database operations for tags.

use rusqlite::Connection;

use crate::{Error, tag::TagName, user::UserID};

/// The tags every new user starts with.
pub const DEFAULT_TAGS: [&str; 5] = ["food", "college", "utilities", "transport", "other"];

/// Initialize the tag table.
pub fn create_tag_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS tag (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            user_id INTEGER NOT NULL,
            UNIQUE(user_id, name),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );",
    )?;

    Ok(())
}

/// Create a tag for the user `user_id`.
///
/// # Errors
///
/// Returns an [Error::DuplicateTag] if the user already has a tag called `name`.
pub fn create_tag(user_id: UserID, name: &TagName, connection: &Connection) -> Result<(), Error> {
    connection
        .execute(
            "INSERT INTO tag (name, user_id) VALUES (?1, ?2);",
            (name.as_ref(), user_id.as_i64()),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateTag(name.to_string()),
            error => error.into(),
        })?;

    Ok(())
}

/// Create the [DEFAULT_TAGS] for a new user.
pub fn create_default_tags(user_id: UserID, connection: &Connection) -> Result<(), Error> {
    for name in DEFAULT_TAGS {
        create_tag(user_id, &TagName::new_unchecked(name), connection)?;
    }

    Ok(())
}

/// Retrieve the names of the user's tags ordered alphabetically.
pub fn get_tag_names(user_id: UserID, connection: &Connection) -> Result<Vec<TagName>, Error> {
    connection
        .prepare("SELECT name FROM tag WHERE user_id = :user_id ORDER BY name ASC;")?
        .query_map(&[(":user_id", &user_id.as_i64())], |row| {
            let name: String = row.get(0)?;
            Ok(TagName::new_unchecked(&name))
        })?
        .map(|maybe_tag| maybe_tag.map_err(|error| error.into()))
        .collect()
}

/// Whether any of the user's expenses are tagged with `name`.
pub fn is_tag_in_use(user_id: UserID, name: &TagName, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM expense WHERE user_id = ?1 AND tag = ?2);",
            (user_id.as_i64(), name.as_ref()),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Delete the user's tag called `name`.
///
/// # Errors
///
/// Returns an [Error::TagNotFound] if the user has no such tag.
pub fn delete_tag(user_id: UserID, name: &TagName, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM tag WHERE user_id = ?1 AND name = ?2",
        (user_id.as_i64(), name.as_ref()),
    )?;

    if rows_affected == 0 {
        return Err(Error::TagNotFound);
    }

    Ok(())
}

#[cfg(test)]
mod tag_query_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        tag::{TagName, create_default_tags, create_tag, delete_tag, get_tag_names},
        test_utils::create_test_user,
        user::create_user,
    };

    fn get_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    #[test]
    fn default_tags_are_sorted() {
        let connection = get_connection();
        let user = create_test_user(&connection);

        create_default_tags(user.id, &connection).unwrap();

        let names: Vec<String> = get_tag_names(user.id, &connection)
            .unwrap()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, ["college", "food", "other", "transport", "utilities"]);
    }

    #[test]
    fn duplicate_tag_is_rejected() {
        let connection = get_connection();
        let user = create_test_user(&connection);
        let name = TagName::new_unchecked("gym");
        create_tag(user.id, &name, &connection).unwrap();

        assert_eq!(
            create_tag(user.id, &name, &connection),
            Err(Error::DuplicateTag("gym".to_owned()))
        );
    }

    #[test]
    fn tags_are_scoped_to_user() {
        let connection = get_connection();
        let alice = create_test_user(&connection);
        let bob = create_user("bob", "password", &connection).unwrap();
        let name = TagName::new_unchecked("gym");

        create_tag(alice.id, &name, &connection).unwrap();
        create_tag(bob.id, &name, &connection).expect("Other users can have the same tag");

        assert_eq!(get_tag_names(bob.id, &connection), Ok(vec![name]));
    }

    #[test]
    fn delete_missing_tag_fails() {
        let connection = get_connection();
        let user = create_test_user(&connection);

        assert_eq!(
            delete_tag(user.id, &TagName::new_unchecked("gym"), &connection),
            Err(Error::TagNotFound)
        );
    }
}
