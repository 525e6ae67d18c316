use actix_web::{error::ErrorInternalServerError, post, web, HttpResponse};
use serde::Deserialize;

use crate::services::{run_crawl, CrawlOutcome, ExtractionService, NO_DATA_MESSAGE};

use super::page::{render_page, IndexTemplate, ResultsView};

#[derive(Deserialize)]
struct CrawlForm {
    #[serde(default)]
    urls: String,
}

/// The "Run Crawler" action. The entered text is always echoed back so a
/// failed submission returns the user to an unchanged form.
#[post("/crawl")]
async fn crawl(
    service: web::Data<dyn ExtractionService>,
    form: web::Form<CrawlForm>,
) -> Result<HttpResponse, actix_web::Error> {
    let urls = form.into_inner().urls;
    let outcome = run_crawl(service.get_ref(), &urls).await;

    let page = match outcome {
        CrawlOutcome::Found(records) => {
            log::info!("Rendering {} records", records.len());
            IndexTemplate {
                urls,
                results: Some(ResultsView::new(&records).map_err(ErrorInternalServerError)?),
                ..Default::default()
            }
        }
        CrawlOutcome::NoData => IndexTemplate {
            urls,
            warning: Some(NO_DATA_MESSAGE.to_string()),
            ..Default::default()
        },
        failure => IndexTemplate {
            urls,
            error: failure.error_message(),
            ..Default::default()
        },
    };

    render_page(page)
}
