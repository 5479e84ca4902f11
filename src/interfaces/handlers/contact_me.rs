use actix_web::{post, web, HttpRequest, HttpResponse, Responder};

use crate::{
    entities::contact_me::{ContactResponse, ContactSubmission},
    utils::get_client_ip::client_key,
    AppState,
};

/// Honeypot discards and real deliveries produce the same response.
#[post("/contact")]
pub async fn create_contact_me(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Json<ContactSubmission>,
) -> impl Responder {
    let client = client_key(&req);

    match state.contact_handler.submit(form.into_inner(), &client).await {
        Ok(_) => HttpResponse::Ok().json(ContactResponse::accepted()),
        Err(e) => e.to_http_response(),
    }
}
