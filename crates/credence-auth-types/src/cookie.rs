//! Cookie builders for access and refresh tokens.
//!
//! The access token rides on a root-path cookie; the refresh token is scoped
//! to the refresh endpoint's path only, so browsers never send it anywhere
//! else. Both are `HttpOnly`. In production they are additionally `Secure`
//! with `SameSite=Strict`; outside production `SameSite=Lax` keeps local
//! development over plain HTTP working.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name for the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// Cookie name for the refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Path the refresh-token cookie is scoped to.
pub const REFRESH_COOKIE_PATH: &str = "/auth/refresh";

fn base_cookie(name: &'static str, value: String, production: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(production)
        .same_site(if production {
            SameSite::Strict
        } else {
            SameSite::Lax
        })
        .build()
}

/// Set the access-token cookie on the jar. Max-Age matches the token lifetime.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use credence_auth_types::cookie::{set_access_token_cookie, ACCESS_TOKEN_COOKIE};
///
/// let jar = CookieJar::new();
/// let jar = set_access_token_cookie(jar, "token_value".to_string(), 900, false);
/// let cookie = jar.get(ACCESS_TOKEN_COOKIE).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(900)));
/// assert!(cookie.http_only().unwrap_or(false));
/// ```
pub fn set_access_token_cookie(
    jar: CookieJar,
    value: String,
    max_age_secs: u64,
    production: bool,
) -> CookieJar {
    let mut cookie = base_cookie(ACCESS_TOKEN_COOKIE, value, production);
    cookie.set_path("/");
    cookie.set_max_age(Duration::seconds(max_age_secs as i64));
    jar.add(cookie)
}

/// Set the refresh-token cookie on the jar, scoped to the refresh path.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use credence_auth_types::cookie::{set_refresh_token_cookie, REFRESH_TOKEN_COOKIE};
///
/// let jar = CookieJar::new();
/// let jar = set_refresh_token_cookie(jar, "refresh_value".to_string(), 2592000, false);
/// let cookie = jar.get(REFRESH_TOKEN_COOKIE).unwrap();
/// assert_eq!(cookie.path(), Some("/auth/refresh"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(2592000)));
/// assert!(cookie.http_only().unwrap_or(false));
/// ```
pub fn set_refresh_token_cookie(
    jar: CookieJar,
    value: String,
    max_age_secs: u64,
    production: bool,
) -> CookieJar {
    let mut cookie = base_cookie(REFRESH_TOKEN_COOKIE, value, production);
    cookie.set_path(REFRESH_COOKIE_PATH);
    cookie.set_max_age(Duration::seconds(max_age_secs as i64));
    jar.add(cookie)
}

/// Clear both token cookies by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use credence_auth_types::cookie::{
///     clear_auth_cookies, set_access_token_cookie, set_refresh_token_cookie,
///     ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE,
/// };
///
/// let jar = CookieJar::new();
/// let jar = set_access_token_cookie(jar, "a".to_string(), 900, false);
/// let jar = set_refresh_token_cookie(jar, "r".to_string(), 2592000, false);
/// let jar = clear_auth_cookies(jar, false);
/// assert_eq!(jar.get(ACCESS_TOKEN_COOKIE).unwrap().max_age(), Some(time::Duration::ZERO));
/// assert_eq!(jar.get(REFRESH_TOKEN_COOKIE).unwrap().max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_auth_cookies(jar: CookieJar, production: bool) -> CookieJar {
    let mut access = base_cookie(ACCESS_TOKEN_COOKIE, String::new(), production);
    access.set_path("/");
    access.set_max_age(Duration::ZERO);
    let mut refresh = base_cookie(REFRESH_TOKEN_COOKIE, String::new(), production);
    refresh.set_path(REFRESH_COOKIE_PATH);
    refresh.set_max_age(Duration::ZERO);
    jar.add(access).add(refresh)
}
