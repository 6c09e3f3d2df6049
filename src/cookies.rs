//! The two things the store needs from an HTTP stack: reading a named
//! request cookie and setting a response cookie.

use tower_cookies::Cookies;
use tower_cookies::cookie::{Cookie, CookieJar};

/// Read access to the cookies sent with a request.
pub trait CookieSource {
    /// Returns the value of the cookie called `name`, if present.
    fn cookie_value(&self, name: &str) -> Option<String>;
}

/// Write access to the cookies sent with a response.
pub trait CookieSink {
    /// Queues `cookie` to be sent to the client.
    fn set_cookie(&mut self, cookie: Cookie<'static>);
}

impl CookieSource for Cookies {
    fn cookie_value(&self, name: &str) -> Option<String> {
        self.get(name).map(|c| c.value().to_string())
    }
}

impl CookieSink for Cookies {
    fn set_cookie(&mut self, cookie: Cookie<'static>) {
        self.add(cookie);
    }
}

impl CookieSource for CookieJar {
    fn cookie_value(&self, name: &str) -> Option<String> {
        self.get(name).map(|c| c.value().to_string())
    }
}

impl CookieSink for CookieJar {
    fn set_cookie(&mut self, cookie: Cookie<'static>) {
        self.add(cookie);
    }
}
