use actix_web::{get, HttpResponse};

use super::page::{render_page, IndexTemplate};

#[get("/")]
async fn index() -> Result<HttpResponse, actix_web::Error> {
    render_page(IndexTemplate::default())
}

#[get("/health_check")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}
