//! Reading and writing the encrypted auth cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::{Error, UserID, auth::token::Token};

/// The name of the cookie holding the JSON encoded [Token].
pub(crate) const COOKIE_TOKEN: &str = "token";

/// The default duration for which auth cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(30);

/// Add an auth cookie for `user_id` to the cookie jar that expires `duration`
/// from now.
///
/// The expiry is stored in the local time of `local_offset`.
///
/// # Errors
///
/// Returns an:
/// - [Error::InvalidDateFormat] if the expiry overflows.
/// - [Error::JSONSerializationError] if the token cannot be serialized.
pub fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, Error> {
    let expires_at = expiry_from_now(duration, local_offset)?;

    set_token_cookie(
        jar,
        &Token {
            user_id,
            expires_at,
        },
    )
}

fn expiry_from_now(duration: Duration, local_offset: UtcOffset) -> Result<OffsetDateTime, Error> {
    OffsetDateTime::now_utc()
        .to_offset(local_offset)
        .checked_add(duration)
        .ok_or_else(|| Error::InvalidDateFormat(format!("now + {duration} overflows")))
}

fn set_token_cookie(jar: PrivateCookieJar, token: &Token) -> Result<PrivateCookieJar, Error> {
    let value = serde_json::to_string(token)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_TOKEN, value))
            .expires(token.expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Get the token of the logged in user.
///
/// # Errors
///
/// Returns an:
/// - [Error::CookieMissing] if there is no auth cookie, or it was not encrypted with our key.
/// - [Error::JSONSerializationError] if the cookie does not hold a token.
/// - [Error::TokenExpired] if the token is past its expiry.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::CookieMissing)?;
    let token: Token = serde_json::from_str(cookie.value_trimmed())
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    if token.is_expired(OffsetDateTime::now_utc()) {
        return Err(Error::TokenExpired);
    }

    Ok(token)
}

/// Push the auth cookie expiry out to `duration` from now, unless it already
/// expires later than that.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned. See
/// [get_token_from_cookies] and [set_auth_cookie] for the errors.
pub(crate) fn extend_auth_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, Error> {
    let token = get_token_from_cookies(&jar)?;
    let new_expiry = expiry_from_now(duration, local_offset)?;

    if new_expiry <= token.expires_at {
        return Ok(jar);
    }

    set_token_cookie(
        jar,
        &Token {
            user_id: token.user_id,
            expires_at: new_expiry,
        },
    )
}

/// Overwrite the auth cookie with an expired one, which deletes it on the client.
pub fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime, UtcOffset};

    use crate::{
        Error, UserID,
        auth::cookie::{
            COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, extend_auth_cookie_duration_if_needed,
            get_token_from_cookies, invalidate_auth_cookie, set_auth_cookie,
        },
    };

    fn get_jar() -> PrivateCookieJar {
        PrivateCookieJar::new(Key::from(&Sha512::digest(b"bills")))
    }

    fn sao_paulo() -> UtcOffset {
        UtcOffset::from_hms(-3, 0, 0).unwrap()
    }

    #[track_caller]
    fn assert_date_time_close(left: OffsetDateTime, right: OffsetDateTime) {
        assert!(
            (left - right).abs() < Duration::seconds(1),
            "got date time {left:?}, want {right:?}"
        );
    }

    #[test]
    fn set_cookie_stores_user_and_expiry() {
        let jar = set_auth_cookie(get_jar(), UserID::new(3), DEFAULT_COOKIE_DURATION, sao_paulo())
            .unwrap();

        let token = get_token_from_cookies(&jar).unwrap();
        let cookie = jar.get(COOKIE_TOKEN).unwrap();

        assert_eq!(token.user_id, UserID::new(3));
        assert_eq!(token.expires_at.offset(), sao_paulo());
        assert_date_time_close(
            token.expires_at,
            OffsetDateTime::now_utc() + DEFAULT_COOKIE_DURATION,
        );
        assert_eq!(cookie.expires_datetime(), Some(token.expires_at));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn missing_cookie_is_an_error() {
        assert_eq!(get_token_from_cookies(&get_jar()), Err(Error::CookieMissing));
    }

    #[test]
    fn unencrypted_cookie_is_ignored() {
        let jar = get_jar().add(Cookie::new(COOKIE_TOKEN, "{\"user_id\":1}"));

        assert_eq!(get_token_from_cookies(&jar), Err(Error::CookieMissing));
    }

    #[test]
    fn expired_token_is_rejected() {
        let jar =
            set_auth_cookie(get_jar(), UserID::new(1), Duration::seconds(-1), UtcOffset::UTC)
                .unwrap();

        assert_eq!(get_token_from_cookies(&jar), Err(Error::TokenExpired));
    }

    #[test]
    fn extend_moves_expiry_forward() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), Duration::seconds(5), UtcOffset::UTC)
            .unwrap();

        let jar =
            extend_auth_cookie_duration_if_needed(jar, Duration::minutes(10), UtcOffset::UTC)
                .unwrap();

        let token = get_token_from_cookies(&jar).unwrap();
        assert_date_time_close(
            token.expires_at,
            OffsetDateTime::now_utc() + Duration::minutes(10),
        );
        assert_eq!(token.user_id, UserID::new(1));
    }

    #[test]
    fn extend_keeps_later_expiry() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), Duration::days(7), UtcOffset::UTC)
            .unwrap();
        let want = get_token_from_cookies(&jar).unwrap().expires_at;

        let jar =
            extend_auth_cookie_duration_if_needed(jar, Duration::minutes(5), UtcOffset::UTC)
                .unwrap();

        assert_eq!(get_token_from_cookies(&jar).unwrap().expires_at, want);
    }

    #[test]
    fn invalidate_removes_session() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), DEFAULT_COOKIE_DURATION, UtcOffset::UTC)
            .unwrap();

        let jar = invalidate_auth_cookie(jar);
        let cookie = jar.get(COOKIE_TOKEN).unwrap();

        assert_eq!(cookie.value(), "deleted");
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert!(matches!(
            get_token_from_cookies(&jar),
            Err(Error::JSONSerializationError(_))
        ));
    }
}
