use actix_web::{error::ErrorInternalServerError, http::header::ContentType, HttpResponse};
use askama::Template;

use crate::domain::{RecordDetail, ResultRecord, ResultTable, DROPPED_COLUMNS};

#[derive(Template, Default)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub urls: String,
    pub error: Option<String>,
    pub warning: Option<String>,
    pub results: Option<ResultsView>,
}

pub struct ResultsView {
    pub count: usize,
    pub table: ResultTable,
    pub details: Vec<RecordDetail>,
    /// Echoed back by the export form, since nothing is kept server side.
    pub records_json: String,
}

impl ResultsView {
    pub fn new(records: &[ResultRecord]) -> Result<Self, serde_json::Error> {
        let exported: Vec<ResultRecord> =
            records.iter().map(|r| r.without(&DROPPED_COLUMNS)).collect();

        Ok(ResultsView {
            count: records.len(),
            table: ResultTable::from_records(records),
            details: RecordDetail::from_records(records),
            records_json: serde_json::to_string(&exported)?,
        })
    }
}

impl IndexTemplate {
    pub fn with_urls(urls: String) -> Self {
        IndexTemplate {
            urls,
            ..Default::default()
        }
    }

    pub fn with_error(urls: String, error: String) -> Self {
        IndexTemplate {
            urls,
            error: Some(error),
            ..Default::default()
        }
    }
}

pub fn render_page(page: IndexTemplate) -> Result<HttpResponse, actix_web::Error> {
    let body = page.render().map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}
