//! Portfolios sub-client — snapshots, names, summaries and creation.

use crate::client::CryptofolioClient;
use crate::domain::portfolio::wire::PortfolioDistributionResponse;
use crate::domain::portfolio::{PortfolioSnapshot, PortfolioSummary};
use crate::error::SdkError;
use crate::http::{AuthPolicy, CryptofolioHttp, FormPart};
use crate::resource::{PageFetcher, ResourcePage, ResourceList, ResourceQuery};
use crate::shared::SortDirection;

use async_trait::async_trait;

/// Filter key of the portfolio list: case-insensitive name substring.
pub const NAME_FILTER: &str = "name";

/// A CSV export to import into a new portfolio.
#[derive(Debug, Clone)]
pub struct PortfolioUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl PortfolioUpload {
    pub fn csv(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: "text/csv".to_string(),
            bytes,
        }
    }
}

pub struct Portfolios<'a> {
    pub(crate) client: &'a CryptofolioClient,
}

impl<'a> Portfolios<'a> {
    /// Full valuation snapshot of one portfolio.
    pub async fn get(&self, name: &str) -> Result<PortfolioSnapshot, SdkError> {
        let url = format!(
            "{}/portfolio?name={}",
            self.client.http.base_url(),
            urlencoding::encode(name)
        );
        let resp: PortfolioDistributionResponse =
            self.client.http.get(&url, AuthPolicy::Bearer).await?;
        Ok(resp.into())
    }

    /// Names of the user's portfolios.
    pub async fn names(&self) -> Result<Vec<String>, SdkError> {
        fetch_names(&self.client.http).await
    }

    /// Card view of one portfolio: total and top holdings.
    pub async fn summary(&self, name: &str) -> Result<PortfolioSummary, SdkError> {
        let snapshot = self.get(name).await?;
        Ok(PortfolioSummary {
            name: name.to_string(),
            ..snapshot.summary()
        })
    }

    /// Create a portfolio, optionally seeded from an exchange export.
    pub async fn create(
        &self,
        name: &str,
        upload: Option<PortfolioUpload>,
    ) -> Result<PortfolioSnapshot, SdkError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SdkError::Validation("Portfolio name is required".to_string()));
        }

        let mut parts = vec![FormPart::text("portfolioName", name)];
        if let Some(upload) = upload {
            parts.push(FormPart::file("file", upload.file_name, upload.mime, upload.bytes));
        }

        let url = format!("{}/portfolio", self.client.http.base_url());
        let resp: PortfolioDistributionResponse = self
            .client
            .http
            .post_multipart(&url, &parts, AuthPolicy::Bearer)
            .await?;
        tracing::info!(portfolio = name, "Portfolio created");
        Ok(resp.into())
    }

    /// List handle over portfolio names, using the client's stale policy.
    pub fn list_handle(&self) -> ResourceList<String> {
        ResourceList::new(
            PortfolioNamesFetcher {
                http: self.client.http.clone(),
            },
            ResourceQuery::new(),
            self.client.stale_policy,
        )
    }
}

async fn fetch_names(http: &CryptofolioHttp) -> Result<Vec<String>, SdkError> {
    let url = format!("{}/portfolio/names", http.base_url());
    Ok(http.get(&url, AuthPolicy::Bearer).await?)
}

/// Serves `/portfolio/names` as a single page. The `name` filter and a sort on
/// `name` are applied locally since the endpoint takes no parameters.
pub struct PortfolioNamesFetcher {
    http: CryptofolioHttp,
}

impl PortfolioNamesFetcher {
    pub fn new(http: CryptofolioHttp) -> Self {
        Self { http }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PageFetcher<String> for PortfolioNamesFetcher {
    async fn fetch_page(&self, query: &ResourceQuery) -> Result<ResourcePage<String>, SdkError> {
        let names = fetch_names(&self.http).await?;
        Ok(ResourcePage::single(filter_names(names, query)))
    }
}

fn filter_names(mut names: Vec<String>, query: &ResourceQuery) -> Vec<String> {
    if let Some(needle) = query.filter_text(NAME_FILTER) {
        let needle = needle.to_lowercase();
        names.retain(|n| n.to_lowercase().contains(&needle));
    }
    match &query.sort {
        Some(sort) if sort.field == NAME_FILTER => {
            names.sort_by_key(|n| n.to_lowercase());
            if sort.direction == SortDirection::Desc {
                names.reverse();
            }
        }
        _ => {}
    }
    names
}
