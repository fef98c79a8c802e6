use axum::{
    extract::Request,
    http::uri::Uri,
    middleware::Next,
    response::Response,
};
use tracing::info;

/// Collapse repeated slashes and drop a trailing slash so that
/// `/api//health/` routes like `/api/health`.
pub async fn normalize_path(mut req: Request, next: Next) -> Response {
    let uri = req.uri();
    let path = uri.path();

    let normalized = normalized_path(path);

    if normalized != path {
        let mut parts = uri.clone().into_parts();
        let new_path_and_query = if let Some(query) = uri.query() {
            format!("{}?{}", normalized, query)
        } else {
            normalized
        };

        if let Ok(new_uri) = new_path_and_query.parse::<Uri>() {
            parts.path_and_query = new_uri.into_parts().path_and_query;
            if let Ok(new_uri) = Uri::from_parts(parts) {
                *req.uri_mut() = new_uri;
            }
        }
    }

    next.run(req).await
}

fn normalized_path(path: &str) -> String {
    let mut normalized = path.to_string();

    while normalized.contains("//") {
        normalized = normalized.replace("//", "/");
    }

    if normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }

    normalized
}

pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let content_length = response.headers()
        .get(axum::http::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);

    info!(
        method = %method,
        url = %uri,
        status = status,
        length = content_length,
        "HTTP request"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_path() {
        assert_eq!(normalized_path("/api//workout"), "/api/workout");
        assert_eq!(normalized_path("//api///health/"), "/api/health");
        assert_eq!(normalized_path("/"), "/");
        assert_eq!(normalized_path("/api/meal"), "/api/meal");
    }
}
