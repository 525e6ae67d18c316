use actix_multipart::Multipart;
use actix_web::{post, web, HttpResponse};
use futures::StreamExt;

use crate::domain::{decode_upload, UploadError};

use super::page::{render_page, IndexTemplate};

pub struct UploadLimit(pub usize);

/// Loads a `.txt` / `.csv` file into the URL box. A bad file leaves the box
/// empty and shows the error, the form stays usable.
#[post("/upload")]
async fn upload(
    mut payload: Multipart,
    limit: web::Data<UploadLimit>,
) -> Result<HttpResponse, actix_web::Error> {
    let page = match read_upload(&mut payload, limit.0).await {
        Ok(text) => IndexTemplate::with_urls(text),
        Err(e) => {
            log::info!("Rejected upload: {}", e);
            IndexTemplate::with_error(String::new(), format!("Error reading file: {}", e))
        }
    };

    render_page(page)
}

async fn read_upload(payload: &mut Multipart, limit: usize) -> Result<String, UploadError> {
    while let Some(field) = payload.next().await {
        let mut field = field.map_err(|e| UploadError::Malformed(e.to_string()))?;
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or_default()
            .to_string();
        if file_name.is_empty() {
            return Err(UploadError::Missing);
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| UploadError::Malformed(e.to_string()))?;
            if bytes.len() + chunk.len() > limit {
                return Err(UploadError::TooLarge { limit });
            }
            bytes.extend_from_slice(&chunk);
        }

        // single file only, anything after the first is ignored
        return decode_upload(&file_name, &bytes);
    }

    Err(UploadError::Missing)
}
