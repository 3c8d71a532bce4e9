use axum::{
    Extension, Router,
    http::{Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;

use super::pool::HttpPool;
use super::protocol::{CONTENT_TYPE_OCTET_STREAM, FetchResponse};
use crate::group::registry::GroupRegistry;

/// Router serving `GET {base_path}{group}/{key}` for the given groups.
/// Anything outside the base path answers 404.
pub fn peer_router(pool: Arc<HttpPool>, groups: Arc<GroupRegistry>) -> Router {
    let base_path = pool.base_path().to_string();

    Router::new()
        .route(&base_path, get(handle_fetch))
        .route(&format!("{}*rest", base_path), get(handle_fetch))
        .fallback(handle_not_found)
        .layer(Extension(pool))
        .layer(Extension(groups))
}

pub async fn handle_fetch(
    Extension(pool): Extension<Arc<HttpPool>>,
    Extension(groups): Extension<Arc<GroupRegistry>>,
    method: Method,
    uri: Uri,
) -> Response {
    let path = uri.path();
    let Some(rest) = path.strip_prefix(pool.base_path()) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    tracing::info!(server = %pool.self_addr(), "{} {}", method, path);

    let Some((group_name, key)) = rest.split_once('/') else {
        return (StatusCode::BAD_REQUEST, "bad request").into_response();
    };

    let (group_name, key) = match (urlencoding::decode(group_name), urlencoding::decode(key)) {
        (Ok(group_name), Ok(key)) => (group_name, key),
        _ => {
            tracing::warn!("Failed to decode peer path: {}", path);
            return (StatusCode::BAD_REQUEST, "bad request").into_response();
        }
    };

    let Some(group) = groups.get(&group_name) else {
        return (
            StatusCode::NOT_FOUND,
            format!("no such group: {}", group_name),
        )
            .into_response();
    };

    let view = match group.get(&key).await {
        Ok(view) => view,
        Err(e) => {
            tracing::error!("Failed to get {:?} from group {}: {}", key, group_name, e);
            return (StatusCode::NOT_FOUND, e.to_string()).into_response();
        }
    };

    let response = FetchResponse {
        value: view.byte_slice(),
    };

    match response.encode() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, CONTENT_TYPE_OCTET_STREAM)],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to encode response: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn handle_not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
