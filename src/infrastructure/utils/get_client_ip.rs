use actix_web::HttpRequest;

use crate::constants::UNKNOWN_CLIENT;

/// Rate-limit key for a request: the first hop listed in `X-Forwarded-For`,
/// or `"unknown"` when the header is missing or empty.
pub fn client_key(req: &HttpRequest) -> String {
    req.headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|forwarded| forwarded.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
