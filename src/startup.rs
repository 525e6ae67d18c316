use std::{net::TcpListener, sync::Arc};

use actix_files::Files;
use actix_web::{
    dev::Server,
    middleware::Logger,
    web::{self, Data},
    App, HttpServer,
};

use crate::{
    configuration::ApplicationSettings,
    routes::{
        crawl_route, default_route, export_route,
        upload_route::{self, UploadLimit},
    },
    services::ExtractionService,
};

pub fn run(
    listener: TcpListener,
    extraction_service: Arc<dyn ExtractionService>,
    settings: &ApplicationSettings,
) -> Result<Server, std::io::Error> {
    let extraction_service: Data<dyn ExtractionService> = Data::from(extraction_service);
    let upload_limit = Data::new(UploadLimit(settings.max_upload_bytes));
    let form_limit = settings.max_form_bytes;

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(Files::new("/static", "./templates/static").prefer_utf8(true))
            .service(default_route::index)
            .service(default_route::health_check)
            .service(upload_route::upload)
            .service(crawl_route::crawl)
            .service(export_route::export)
            .app_data(web::FormConfig::default().limit(form_limit))
            .app_data(extraction_service.clone())
            .app_data(upload_limit.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
