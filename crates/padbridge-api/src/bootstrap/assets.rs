//! Static browser assets for the edit page.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};

const BOOTSTRAP_JS: &str = include_str!("../../assets/bootstrap.js");
const EDIT_SESSION_CSS: &str = include_str!("../../assets/edit_session.css");

const ASSET_CACHE_CONTROL: &str = "public, max-age=3600";

pub async fn bootstrap_script() -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, ASSET_CACHE_CONTROL),
        ],
        BOOTSTRAP_JS,
    )
        .into_response()
}

pub async fn stylesheet() -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/css; charset=utf-8"),
            (header::CACHE_CONTROL, ASSET_CACHE_CONTROL),
        ],
        EDIT_SESSION_CSS,
    )
        .into_response()
}
