//! Fixed informational pages.
//!
//! The browser flow only needs somewhere to land. Markup is minimal and
//! there is no templating.

use axum::{
    extract::Query,
    response::Html,
};
use serde::Deserialize;

const LAYOUT_HEAD: &str = "<!doctype html><html><head><meta charset=\"utf-8\"><title>Sign up</title></head><body>";
const LAYOUT_TAIL: &str = "</body></html>";

fn page(body: &str) -> Html<String> {
    Html(format!("{LAYOUT_HEAD}{body}{LAYOUT_TAIL}"))
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    pub invite: Option<String>,
}

pub async fn index(Query(query): Query<IndexQuery>) -> Html<String> {
    let invite = query.invite.as_deref().map(escape_html).unwrap_or_default();
    page(&format!(
        "<main id=\"start\" data-invite=\"{invite}\"><h1>Create an account</h1><a href=\"/user_info\">Start</a></main>"
    ))
}

/// Hidden from people, visible to form-filling bots.
const HONEYPOT_INPUT: &str = "<div aria-hidden=\"true\" style=\"position:absolute;left:-10000px\">\
<label>Middle initial <input type=\"text\" name=\"middle_initial\" tabindex=\"-1\" autocomplete=\"off\"></label></div>";

pub async fn user_info() -> Html<String> {
    page(&format!(
        "<h1>About you</h1><form id=\"user_info\" action=\"/credentials\">\
<label>Name <input type=\"text\" name=\"name\" minlength=\"4\" maxlength=\"20\" required></label>\
<label>Email <input type=\"email\" name=\"email\" required></label>\
<label>Display name <input type=\"text\" name=\"display_name\"></label>\
<input type=\"hidden\" name=\"display_name_check_pending\" value=\"0\">\
{HONEYPOT_INPUT}<button type=\"submit\">Next</button></form>"
    ))
}

pub async fn credentials() -> Html<String> {
    page(
        "<h1>Credentials</h1><form id=\"credentials\" action=\"/review\">\
<label>Password <input type=\"password\" name=\"password\" required></label>\
<label>Confirm password <input type=\"password\" name=\"confirm_password\" required></label>\
<label>Recovery phrase <input type=\"text\" name=\"recovery_phrase\" required></label>\
<button type=\"submit\">Next</button></form>",
    )
}

pub async fn review() -> Html<String> {
    page(
        "<h1>Review</h1><form id=\"review\" method=\"post\" action=\"/submit\">\
<input type=\"hidden\" name=\"captcha\" value=\"\">\
<button id=\"submitBtn\" type=\"submit\">Create account</button></form>",
    )
}

pub async fn success() -> Html<String> {
    page("<h1>Account created</h1>")
}

pub async fn failed() -> Html<String> {
    page("<h1>Signup failed</h1><a href=\"/\">Try again</a>")
}

pub async fn session_expired() -> Html<String> {
    page("<h1>Session expired</h1><a href=\"/\">Start over</a>")
}
