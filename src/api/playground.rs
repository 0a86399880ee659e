use askama::Template;
use axum::{response::Html, routing::get, Router};

use crate::domain::DomainError;
use crate::infrastructure::AppState;

#[derive(Template)]
#[template(path = "hello.html")]
pub struct HelloTemplate<'a> {
    pub name: &'a str,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/hello", get(say_hello))
}

#[utoipa::path(
    get,
    path = "/playground/hello",
    responses(
        (status = 200, description = "Static greeting page")
    )
)]
pub async fn say_hello() -> Result<Html<String>, DomainError> {
    let page = HelloTemplate { name: "Martin" }
        .render()
        .map_err(|e| DomainError::Internal(format!("Template rendering failed: {}", e)))?;

    Ok(Html(page))
}
