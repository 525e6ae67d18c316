use actix_web::{
    error::{ErrorBadRequest, ErrorInternalServerError},
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    post, web, HttpResponse,
};
use serde::Deserialize;

use crate::{
    domain::{ResultRecord, ResultTable},
    services::{export_xlsx, EXPORT_FILE_NAME, XLSX_MIME},
};

#[derive(Deserialize)]
struct ExportForm {
    records: String,
}

#[post("/export")]
async fn export(form: web::Form<ExportForm>) -> Result<HttpResponse, actix_web::Error> {
    let records: Vec<ResultRecord> =
        serde_json::from_str(&form.records).map_err(ErrorBadRequest)?;
    if records.is_empty() {
        return Err(ErrorBadRequest("Nothing to export"));
    }

    let table = ResultTable::from_records(&records);
    let bytes = export_xlsx(&table).map_err(|e| {
        log::error!("Failed to build spreadsheet: {}", e);
        ErrorInternalServerError(e)
    })?;

    Ok(HttpResponse::Ok()
        .content_type(XLSX_MIME)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(EXPORT_FILE_NAME.to_string())],
        })
        .body(bytes))
}
