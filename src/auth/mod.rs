//! User sessions: logging in and out, signing up, and guarding the routes that need a user.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod redirect;
mod sign_up;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_json};
pub use redirect::referer_redirect_path;
pub use sign_up::{get_sign_up_page, post_sign_up};

#[cfg(test)]
pub(crate) use cookie::{COOKIE_EXPIRY, COOKIE_USER_ID};
