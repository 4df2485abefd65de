//! Tags for categorising expenses, managed through a small JSON API.

mod create;
mod db;
mod delete;
mod domain;

pub use create::add_tag_endpoint;
pub use db::{
    create_default_tags, create_tag, create_tag_table, delete_tag, get_tag_names, is_tag_in_use,
};
pub use delete::delete_tag_endpoint;
pub use domain::{TagName, TagRequest, TagResponse};
