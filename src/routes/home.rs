use axum::response::Html;

/// Root page, served from the bundled static file.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}
