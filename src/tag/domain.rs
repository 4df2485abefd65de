//! Core tag domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// A validated, non-empty, lowercase tag name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
pub struct TagName(String);

impl TagName {
    /// Create a tag name from user input.
    ///
    /// Surrounding whitespace is removed and the name is lowercased, so " Food " and "food" are
    /// the same tag.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyTagName] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyTagName)
        } else {
            Ok(Self(name.to_lowercase()))
        }
    }

    /// Create a tag name without validation.
    ///
    /// The caller should ensure that the string is not empty and already lowercase.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the invariant
    /// is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for TagName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TagName::new(s)
    }
}

impl Display for TagName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The body of a request to add or delete a tag.
#[derive(Debug, Serialize, Deserialize)]
pub struct TagRequest {
    /// The raw tag name entered by the user.
    #[serde(default)]
    pub tag_name: String,
}

/// The body of the response to adding or deleting a tag.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct TagResponse {
    /// Whether the tag was added or deleted.
    pub success: bool,
    /// A message to show the user.
    pub message: String,
    /// All of the user's tags sorted by name, only set on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl TagResponse {
    pub(crate) fn success(message: String, tags: Vec<TagName>) -> Self {
        Self {
            success: true,
            message,
            tags: Some(tags.into_iter().map(|tag| tag.0).collect()),
        }
    }

    pub(crate) fn failure(error: &Error) -> Self {
        Self {
            success: false,
            message: error.user_message(),
            tags: None,
        }
    }
}

#[cfg(test)]
mod tag_name_tests {
    use crate::{Error, tag::TagName};

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(TagName::new(""), Err(Error::EmptyTagName));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        assert_eq!(TagName::new("\n\t \r"), Err(Error::EmptyTagName));
    }

    #[test]
    fn new_trims_and_lowercases() {
        assert_eq!(TagName::new("  Food "), Ok(TagName::new_unchecked("food")));
    }
}
