//! Logging users in and out, and guarding the routes that need a logged in user.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod redirect;
mod register;
mod session;
mod token;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use log_in::{get_log_in_page, post_log_in, validate_log_in_field};
pub use log_out::get_log_out;
pub use middleware::{AuthState, auth_guard, auth_guard_hx};
pub use redirect::normalize_redirect_url;
pub use register::{get_register_page, register_user, validate_register_field};
pub use session::Session;

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
