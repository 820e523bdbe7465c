use axum_extra::extract::cookie::PrivateCookieJar;
use time::Duration;

use crate::session::{build_cookie, removal_cookie};
use crate::views::Flash;

const FLASH_COOKIE: &str = "jb_flash";

/// Queues `flash` for the next page rendered for this browser.
pub fn put(jar: PrivateCookieJar, flash: &Flash, secure: bool) -> PrivateCookieJar {
    match serde_json::to_string(flash) {
        Ok(value) => jar.add(build_cookie(FLASH_COOKIE, value, secure, Duration::minutes(5))),
        Err(_) => jar,
    }
}

/// Removes and returns the pending flash message, if any.
pub fn take(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<Flash>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };
    let flash = serde_json::from_str(cookie.value()).ok();
    (jar.remove(removal_cookie(FLASH_COOKIE)), flash)
}
