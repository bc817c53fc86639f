//! Transactions sub-client — filtered listing, recording and CSV import.

use crate::client::CryptofolioClient;
use crate::domain::transaction::wire::TransactionDto;
use crate::domain::transaction::{filter, NewTransaction, Transaction};
use crate::error::SdkError;
use crate::http::{AuthPolicy, CryptofolioHttp, FormPart};
use crate::resource::{PageFetcher, PageResponse, ResourceList, ResourcePage, ResourceQuery};

use async_trait::async_trait;

pub struct Transactions<'a> {
    pub(crate) client: &'a CryptofolioClient,
}

impl<'a> Transactions<'a> {
    /// One page of transactions matching `query`.
    pub async fn list(&self, query: &ResourceQuery) -> Result<ResourcePage<Transaction>, SdkError> {
        fetch_transactions(&self.client.http, query).await
    }

    /// Record a trade. Returns the stored transaction with its id.
    pub async fn add(&self, transaction: &NewTransaction) -> Result<Transaction, SdkError> {
        transaction.validate().map_err(SdkError::Validation)?;

        let url = format!("{}/transaction", self.client.http.base_url());
        let body = TransactionDto::from(transaction);
        let resp: TransactionDto = self
            .client
            .http
            .post(&url, &body, AuthPolicy::Bearer)
            .await?;
        let created = Transaction::from(resp);
        tracing::info!(
            id = created.id.as_deref().unwrap_or_default(),
            portfolio = %created.portfolio_name,
            pair = %created.pair,
            "Transaction recorded"
        );
        Ok(created)
    }

    /// Import an exchange export into `portfolio`. `symbols` restricts the
    /// import to those assets; empty imports everything.
    pub async fn upload(
        &self,
        portfolio: &str,
        file_name: &str,
        bytes: Vec<u8>,
        symbols: &[String],
    ) -> Result<(), SdkError> {
        if portfolio.trim().is_empty() {
            return Err(SdkError::Validation("Portfolio name is required".to_string()));
        }

        let mut parts = Vec::with_capacity(symbols.len() + 1);
        parts.push(FormPart::file("file", file_name, "text/csv", bytes));
        parts.extend(symbols.iter().map(|s| FormPart::text("symbols", s.as_str())));

        let url = format!(
            "{}/transaction/upload/{}",
            self.client.http.base_url(),
            urlencoding::encode(portfolio)
        );
        let _: serde_json::Value = self
            .client
            .http
            .post_multipart(&url, &parts, AuthPolicy::Bearer)
            .await?;
        tracing::info!(portfolio, symbols = symbols.len(), "Transactions uploaded");
        Ok(())
    }

    /// List handle over all transactions, using the client's stale policy.
    pub fn list_handle(&self) -> ResourceList<Transaction> {
        self.list_handle_with(ResourceQuery::new())
    }

    /// List handle preset to one portfolio.
    pub fn portfolio_list_handle(&self, portfolio: &str) -> ResourceList<Transaction> {
        self.list_handle_with(ResourceQuery::new().with_filter(filter::PORTFOLIO_NAME, portfolio))
    }

    fn list_handle_with(&self, query: ResourceQuery) -> ResourceList<Transaction> {
        ResourceList::new(
            TransactionPageFetcher::new(self.client.http.clone()),
            query,
            self.client.stale_policy,
        )
    }
}

async fn fetch_transactions(
    http: &CryptofolioHttp,
    query: &ResourceQuery,
) -> Result<ResourcePage<Transaction>, SdkError> {
    let url = format!("{}/transaction/filter?{}", http.base_url(), query.to_query_string());
    let resp: PageResponse<TransactionDto> = http.get(&url, AuthPolicy::Bearer).await?;
    resp.try_map(|dto| Ok::<_, SdkError>(Transaction::from(dto)))
}

/// `GET /transaction/filter` as a [`PageFetcher`].
pub struct TransactionPageFetcher {
    http: CryptofolioHttp,
}

impl TransactionPageFetcher {
    pub fn new(http: CryptofolioHttp) -> Self {
        Self { http }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PageFetcher<Transaction> for TransactionPageFetcher {
    async fn fetch_page(
        &self,
        query: &ResourceQuery,
    ) -> Result<ResourcePage<Transaction>, SdkError> {
        fetch_transactions(&self.http, query).await
    }
}
