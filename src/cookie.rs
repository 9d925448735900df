//! Minimal cookie jar access.
//!
//! The browser exposes cookies as one `name=value; name2=value2` string through `document.cookie`, and accepts writes
//! one `Set-Cookie`-style line at a time. [CookieStore] captures those two primitives so the rest of the crate can be
//! exercised without a browser.

use std::{cell::RefCell, collections::BTreeMap};

use log::trace;
use wasm_bindgen::JsCast;

use crate::error::{Error, Result};

pub trait CookieStore {
    /// Every cookie visible to the page, in `document.cookie` form.
    fn raw_cookies(&self) -> Result<String>;

    /// Writes a single cookie line, e.g. `name=value; Path=/; Max-Age=3600`.
    fn write_cookie(&self, line: &str) -> Result<()>;

    fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(find_cookie(&self.raw_cookies()?, name))
    }

    fn set(&self, name: &str, value: &str, max_age: Option<u32>) -> Result<()> {
        let line = format_cookie(name, value, max_age)?;
        trace!("Writing cookie {}", name);
        self.write_cookie(&line)
    }

    fn remove(&self, name: &str) -> Result<()> {
        trace!("Removing cookie {}", name);
        self.write_cookie(&format!("{name}=; Path=/; Max-Age=0; SameSite=Lax"))
    }
}

impl<T> CookieStore for &T
where
    T: CookieStore + ?Sized,
{
    fn raw_cookies(&self) -> Result<String> {
        (**self).raw_cookies()
    }

    fn write_cookie(&self, line: &str) -> Result<()> {
        (**self).write_cookie(line)
    }
}

/// The page's own cookie jar.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentCookies;

impl CookieStore for DocumentCookies {
    fn raw_cookies(&self) -> Result<String> {
        html_document()?
            .cookie()
            .map_err(|err| Error::Browser(format!("failed to read cookies: {err:?}")))
    }

    fn write_cookie(&self, line: &str) -> Result<()> {
        html_document()?
            .set_cookie(line)
            .map_err(|err| Error::Browser(format!("failed to write cookie: {err:?}")))
    }
}

fn html_document() -> Result<web_sys::HtmlDocument> {
    web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.dyn_into::<web_sys::HtmlDocument>().ok())
        .ok_or_else(|| Error::Browser("no HTML document available".to_owned()))
}

/// Finds a cookie's value in a `document.cookie` string.
pub fn find_cookie(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(cookie_name, _)| *cookie_name == name)
        .map(|(_, value)| value.to_owned())
}

fn format_cookie(name: &str, value: &str, max_age: Option<u32>) -> Result<String> {
    if !value.chars().all(is_cookie_octet) {
        return Err(Error::InvalidCookieValue(value.to_owned()));
    }

    let mut line = format!("{name}={value}; Path=/; SameSite=Lax");
    if let Some(max_age) = max_age {
        line.push_str(&format!("; Max-Age={max_age}"));
    }

    Ok(line)
}

// RFC 6265 cookie-octet
fn is_cookie_octet(c: char) -> bool {
    c.is_ascii_graphic() && !matches!(c, '"' | ',' | ';' | '\\')
}

/// A cookie jar kept in memory, for running the token flow outside a browser. Written lines are applied the way a
/// browser applies them, minus expiry timers.
#[derive(Debug, Default)]
pub struct MemoryCookies {
    cookies: RefCell<BTreeMap<String, String>>,
    written: RefCell<Vec<String>>,
}

impl MemoryCookies {
    /// Every line written so far, oldest first.
    pub fn written(&self) -> Vec<String> {
        self.written.borrow().clone()
    }
}

impl CookieStore for MemoryCookies {
    fn raw_cookies(&self) -> Result<String> {
        Ok(self
            .cookies
            .borrow()
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; "))
    }

    fn write_cookie(&self, line: &str) -> Result<()> {
        let mut attributes = line.split(';').map(str::trim);
        let (name, value) = attributes
            .next()
            .and_then(|pair| pair.split_once('='))
            .ok_or_else(|| Error::Browser(format!("malformed cookie line {line:?}")))?;

        self.written.borrow_mut().push(line.to_owned());

        if attributes.any(|attribute| attribute.eq_ignore_ascii_case("Max-Age=0")) {
            self.cookies.borrow_mut().remove(name);
        } else {
            self.cookies.borrow_mut().insert(name.to_owned(), value.to_owned());
        }

        Ok(())
    }
}
