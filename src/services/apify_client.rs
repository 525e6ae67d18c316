use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

use crate::{configuration::ApifySettings, domain::ResultRecord};

#[derive(thiserror::Error, Debug)]
pub enum ExtractionError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Apify API returned {status}: {message}")]
    HttpStatus { status: StatusCode, message: String },
    #[error("actor run {run_id} ended with status {status:?}")]
    RunNotSucceeded { run_id: String, status: RunStatus },
    #[error("invalid Apify base url: {0}")]
    BaseUrl(String),
}

/// Anything that can turn start URLs into result records.
#[async_trait]
pub trait ExtractionService: Send + Sync {
    async fn extract(&self, start_urls: &[String]) -> Result<Vec<ResultRecord>, ExtractionError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum RunStatus {
    Ready,
    Running,
    Succeeded,
    Failed,
    TimingOut,
    TimedOut,
    Aborting,
    Aborted,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Succeeded | RunStatus::Failed | RunStatus::TimedOut | RunStatus::Aborted
        )
    }
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
struct RunInput<'a> {
    #[serde(rename = "start_urls")]
    start_urls: Vec<StartUrl<'a>>,
    extract_detailed_information: bool,
    max_results: u32,
}

#[derive(Serialize, Debug, PartialEq)]
struct StartUrl<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct ApiEnvelope<T> {
    data: T,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ActorRun {
    id: String,
    status: RunStatus,
    default_dataset_id: String,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

pub struct ApifyClient {
    client: Client,
    base_url: Url,
    token: String,
    actor_id: String,
    max_results: u32,
    extract_detailed_information: bool,
    wait_secs: u64,
    page_size: usize,
}

impl ApifyClient {
    pub fn new(settings: &ApifySettings) -> Result<Self, ExtractionError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|e| ExtractionError::BaseUrl(format!("{}: {}", settings.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ExtractionError::BaseUrl(settings.base_url.clone()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(ApifyClient {
            client,
            base_url,
            token: settings.token.clone(),
            actor_id: settings.actor_id.clone(),
            max_results: settings.max_results,
            extract_detailed_information: settings.extract_detailed_information,
            wait_secs: settings.wait_secs,
            page_size: settings.page_size.max(1),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base urls, so the segments are always editable.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn build_run_input<'a>(&self, start_urls: &'a [String]) -> RunInput<'a> {
        RunInput {
            start_urls: start_urls
                .iter()
                .map(|u| u.trim())
                .filter(|u| !u.is_empty())
                .map(|url| StartUrl { url })
                .collect(),
            extract_detailed_information: self.extract_detailed_information,
            max_results: self.max_results,
        }
    }

    async fn start_run(&self, start_urls: &[String]) -> Result<ActorRun, ExtractionError> {
        // Apify addresses `user/actor` as `user~actor` in paths
        let actor = self.actor_id.replace('/', "~");
        let url = self.endpoint(&["v2", "acts", &actor, "runs"]);

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .query(&[("waitForFinish", self.wait_secs)])
            .json(&self.build_run_input(start_urls))
            .send()
            .await?;

        read_data(response).await
    }

    async fn wait_for_run(&self, mut run: ActorRun) -> Result<ActorRun, ExtractionError> {
        while !run.status.is_terminal() {
            log::info!("Actor run {} is {:?}, waiting", run.id, run.status);
            let url = self.endpoint(&["v2", "actor-runs", &run.id]);

            let response = self
                .client
                .get(url)
                .bearer_auth(&self.token)
                .query(&[("waitForFinish", self.wait_secs)])
                .send()
                .await?;

            run = read_data(response).await?;
        }

        Ok(run)
    }

    async fn dataset_items(&self, dataset_id: &str) -> Result<Vec<ResultRecord>, ExtractionError> {
        let url = self.endpoint(&["v2", "datasets", dataset_id, "items"]);
        let mut records = vec![];
        let mut offset = 0;

        loop {
            let response = self
                .client
                .get(url.clone())
                .bearer_auth(&self.token)
                .query(&[
                    ("format", "json".to_string()),
                    ("clean", "true".to_string()),
                    ("offset", offset.to_string()),
                    ("limit", self.page_size.to_string()),
                ])
                .send()
                .await?;

            let page: Vec<ResultRecord> = read_json(response).await?;
            let page_len = page.len();
            records.extend(page);

            if page_len < self.page_size {
                break;
            }
            offset += page_len;
        }

        Ok(records)
    }
}

#[async_trait]
impl ExtractionService for ApifyClient {
    async fn extract(&self, start_urls: &[String]) -> Result<Vec<ResultRecord>, ExtractionError> {
        log::info!(
            "Starting actor {} with {} start urls",
            self.actor_id,
            start_urls.len()
        );

        let run = self.start_run(start_urls).await?;
        let run = self.wait_for_run(run).await?;

        if run.status != RunStatus::Succeeded {
            log::error!("Actor run {} ended with {:?}", run.id, run.status);
            return Err(ExtractionError::RunNotSucceeded {
                run_id: run.id,
                status: run.status,
            });
        }

        let records = self.dataset_items(&run.default_dataset_id).await?;
        log::info!(
            "Actor run {} returned {} records from dataset {}",
            run.id,
            records.len(),
            run.default_dataset_id
        );

        Ok(records)
    }
}

async fn read_data<T: DeserializeOwned>(response: Response) -> Result<T, ExtractionError> {
    let envelope: ApiEnvelope<T> = read_json(response).await?;
    Ok(envelope.data)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ExtractionError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorEnvelope>(&body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => body,
    };
    log::error!("Got {} from Apify: {}", status, message);

    Err(ExtractionError::HttpStatus { status, message })
}
