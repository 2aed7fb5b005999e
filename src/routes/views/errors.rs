use askama::Template;
use axum::{http::StatusCode, response::IntoResponse, response::Response};

use super::{HtmlError, home::HomeTemplate, html_error, render};
use crate::{error::AppError, response::log_app_error};

#[derive(Template)]
#[template(path = "errors/404.html")]
pub struct NotFoundTemplate;

#[derive(Template)]
#[template(path = "errors/500.html")]
pub struct ServerErrorTemplate {
    pub message: String,
}

pub(crate) fn not_found_page() -> HtmlError {
    match render(&NotFoundTemplate) {
        Ok(html) => (StatusCode::NOT_FOUND, html),
        Err(_) => html_error(StatusCode::NOT_FOUND, "Not Found"),
    }
}

pub(crate) fn server_error_page(status: StatusCode, message: impl Into<String>) -> HtmlError {
    let template = ServerErrorTemplate {
        message: message.into(),
    };
    match render(&template) {
        Ok(html) => (status, html),
        Err(_) => html_error(status, "Internal Server Error"),
    }
}

/// Renders an error the way the HTML pages report it. Storage failures land
/// on the home page with the generic notice.
pub(crate) fn page_error(err: AppError) -> HtmlError {
    log_app_error(&err);
    let status = err.status();
    match err {
        AppError::NotFound(_) => not_found_page(),
        AppError::Persistence(message) => {
            let template = HomeTemplate::with_notice(message);
            match render(&template) {
                Ok(html) => (status, html),
                Err(_) => server_error_page(status, "Internal Server Error"),
            }
        }
        other => server_error_page(status, other.message()),
    }
}

pub async fn fallback() -> Response {
    not_found_page().into_response()
}
