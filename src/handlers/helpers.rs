use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};

pub fn hostname_from_url(u: &str) -> String {
    let s = u.trim();
    if s.is_empty() {
        return "".into();
    }
    let s = if let Some(idx) = s.find("://") { &s[idx + 3..] } else { s };
    let host = s.split('/').next().unwrap_or(s);
    host.to_string()
}

pub fn render_template<T: askama::Template>(t: T) -> Response {
    match t.render() {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!(%e, "Template render error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

/// Every form posts back to the single page.
pub fn back_to_dashboard() -> Response {
    Redirect::to("/").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostname_strips_scheme_and_path() {
        assert_eq!(hostname_from_url("http://localhost:8000/api"), "localhost:8000");
        assert_eq!(hostname_from_url("backend.internal"), "backend.internal");
        assert_eq!(hostname_from_url("  "), "");
    }
}
