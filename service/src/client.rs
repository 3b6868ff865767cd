use crate::graph_url::{append, encode};
use crate::{
    DataSource, Error, EventMarker, EventQuery, EventRecord, MetricQuery, RenderRecord, Series,
};

use reqwest::Response;
use url::Url;

use std::sync::LazyLock;

static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);

/// Graph service reachable over HTTP.
#[derive(Debug, Clone)]
pub struct GraphClient {
    base: Url,
}

impl GraphClient {
    pub fn new(base: &str) -> Result<Self, Error> {
        let mut base = Url::parse(base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    pub fn render_url(&self, query: &MetricQuery) -> Result<String, Error> {
        let endpoint = self.base.join("render")?;
        let target = encode(&query.target);

        Ok(append(
            endpoint.as_str(),
            &[
                ("format", "json"),
                ("target", target.as_str()),
                ("from", query.from.as_str()),
                ("until", query.until.as_str()),
            ],
        ))
    }

    pub fn events_url(&self, query: &EventQuery) -> Result<String, Error> {
        let endpoint = self.base.join("events/get_data")?;
        let mut params = vec![("from", query.from.as_str()), ("until", query.until.as_str())];

        let tags = encode(&query.tags.join(" "));
        if !query.tags.is_empty() {
            params.push(("tags", tags.as_str()));
        }

        Ok(append(endpoint.as_str(), &params))
    }
}

impl DataSource for GraphClient {
    async fn fetch_metric(&self, query: &MetricQuery) -> Result<Vec<Series>, Error> {
        let url = self.render_url(query)?;
        let body = http_request(&url).await?;

        let records: Vec<RenderRecord> = serde_json::from_str(&body)?;
        log::debug!("{} -> {} series", query.target, records.len());

        Ok(records.into_iter().map(RenderRecord::into_series).collect())
    }

    async fn fetch_events(&self, query: &EventQuery) -> Result<Vec<EventMarker>, Error> {
        let url = self.events_url(query)?;
        let body = http_request(&url).await?;

        let records: Vec<EventRecord> = serde_json::from_str(&body)?;

        Ok(records.into_iter().map(EventMarker::from).collect())
    }
}

pub async fn http_request(url: &str) -> Result<String, Error> {
    let response = checked_get(url).await?;
    response.text().await.map_err(Error::Fetch)
}

async fn checked_get(url: &str) -> Result<Response, Error> {
    let response = HTTP_CLIENT.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        log::warn!("Graph service request returned {} for: {}", status, url);
        return Err(Error::Status(status.as_u16()));
    }

    Ok(response)
}
