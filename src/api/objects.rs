use std::sync::Arc;
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::error::{GatewayError, Result};
use crate::resolver::{resolve, Resolution};
use crate::state::AppState;
use crate::storage::{HttpMetadata, StoredObject};
use super::listing::listing_response;

/// GET /{key...} and GET /{mount}/{key...} - 读取对象
pub async fn get_object(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
) -> Response {
    match serve(&state, &method, &uri).await {
        Ok(resp) => resp,
        Err(e) => e.into_response(),
    }
}

async fn serve(state: &AppState, method: &Method, uri: &Uri) -> Result<Response> {
    if method != Method::GET {
        return Err(GatewayError::MethodNotAllowed);
    }

    // Mount is picked from the raw first segment, so "/imgur%2Fa.png" stays a default-bucket key
    let (mount, raw_rest) = state.buckets.route(uri.path()).ok_or(GatewayError::NotFound)?;
    let path = urlencoding::decode(uri.path()).map_err(|_| GatewayError::NotFound)?;
    let rest = urlencoding::decode(raw_rest).map_err(|_| GatewayError::NotFound)?;
    let rest = rest.as_ref();
    let store = match mount.store() {
        Some(store) => store,
        None => {
            tracing::debug!("Bucket {} is not configured", mount.name);
            return Err(GatewayError::NotFound);
        }
    };

    let resolution = resolve(store.as_ref(), mount, rest).await.map_err(|e| {
        tracing::warn!("Resolving {} in {} failed: {}", rest, mount.name, e);
        GatewayError::NotFound
    })?;
    tracing::debug!("{} -> {:?}", path, resolution);

    match resolution {
        Resolution::Unique(key) => {
            let object = store.get(&key).await.map_err(|e| {
                tracing::warn!("Fetching {} from {} failed: {}", key, mount.name, e);
                GatewayError::NotFound
            })?;
            object.map(object_response).ok_or(GatewayError::NotFound)
        }
        Resolution::Ambiguous(entries) => Ok(listing_response(mount, &path, &entries)),
        Resolution::NotFound => Err(GatewayError::NotFound),
    }
}

/// Build the object response (metadata + etag) / 构建对象响应
fn object_response(object: StoredObject) -> Response {
    let HttpMetadata {
        content_type,
        content_disposition,
        content_encoding,
        content_language,
        cache_control,
        expires,
        last_modified,
    } = object.metadata;

    let content_type = content_type.unwrap_or_else(|| {
        mime_guess::from_path(&object.key).first_or_octet_stream().to_string()
    });

    let mut resp = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_LENGTH, object.body.len())
        .body(Body::from(object.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response());

    let headers = resp.headers_mut();
    let optional = [
        (header::CONTENT_TYPE, Some(content_type)),
        (header::CONTENT_DISPOSITION, content_disposition),
        (header::CONTENT_ENCODING, content_encoding),
        (header::CONTENT_LANGUAGE, content_language),
        (header::CACHE_CONTROL, cache_control),
        (header::EXPIRES, expires),
        (header::LAST_MODIFIED, last_modified),
        (header::ETAG, Some(object.http_etag)),
    ];
    for (name, value) in optional {
        // Values the store holds but HTTP cannot carry are dropped
        if let Some(value) = value.and_then(|v| HeaderValue::from_str(&v).ok()) {
            headers.insert(name, value);
        }
    }

    resp
}
