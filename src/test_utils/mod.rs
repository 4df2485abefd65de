#![allow(missing_docs)]

pub(crate) mod html;
pub(crate) mod http;

use rusqlite::Connection;

use crate::user::{User, create_user};

pub(crate) use html::{assert_valid_html, parse_html_document};
pub(crate) use http::{decrypt_flash, get_flash, get_header, parse_json};

/// Create the user "alice", the first user in a fresh database.
#[track_caller]
pub(crate) fn create_test_user(connection: &Connection) -> User {
    create_user("alice", "hunter2", connection).expect("Could not create test user")
}
