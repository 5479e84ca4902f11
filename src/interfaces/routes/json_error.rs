use actix_web::{error::JsonPayloadError, web};

use crate::{constants::JSON_BODY_LIMIT, errors::ContactError};

/// Bodies that are not a JSON object of string fields are answered with the
/// same `{ok:false}` envelope as every other rejection.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_BODY_LIMIT)
            .error_handler(|err, _req| {
                log_payload_error(&err);
                ContactError::MalformedBody.into()
            }),
    );
}

fn log_payload_error(err: &JsonPayloadError) {
    tracing::warn!(error = %err, reason = ContactError::MalformedBody.kind(), "Rejected contact payload");
}
