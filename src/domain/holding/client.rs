//! Holdings sub-client — single holding detail.

use crate::client::CryptofolioClient;
use crate::domain::holding::wire::HoldingResponse;
use crate::domain::holding::Holding;
use crate::error::SdkError;
use crate::http::AuthPolicy;

pub struct Holdings<'a> {
    pub(crate) client: &'a CryptofolioClient,
}

impl<'a> Holdings<'a> {
    /// Detail of `symbol` within `portfolio`.
    pub async fn get(&self, portfolio: &str, symbol: &str) -> Result<Holding, SdkError> {
        let url = format!(
            "{}/portfolio/{}/holding/{}",
            self.client.http.base_url(),
            urlencoding::encode(portfolio),
            urlencoding::encode(symbol)
        );
        let resp: HoldingResponse = self.client.http.get(&url, AuthPolicy::Bearer).await?;
        Ok(resp.into())
    }
}
