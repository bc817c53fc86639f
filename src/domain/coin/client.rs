//! Coins sub-client.

use crate::client::CryptofolioClient;
use crate::domain::coin::wire::CoinInformationResponse;
use crate::domain::coin::CoinInformation;
use crate::error::SdkError;
use crate::http::AuthPolicy;

pub struct Coins<'a> {
    pub(crate) client: &'a CryptofolioClient,
}

impl<'a> Coins<'a> {
    /// Current price of every asset held in `portfolio`.
    pub async fn information(&self, portfolio: &str) -> Result<Vec<CoinInformation>, SdkError> {
        let url = format!(
            "{}/transaction/information/all/{}",
            self.client.http.base_url(),
            urlencoding::encode(portfolio)
        );
        let resp: Vec<CoinInformationResponse> =
            self.client.http.post_empty(&url, AuthPolicy::Bearer).await?;
        Ok(resp.into_iter().map(CoinInformation::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::TokenStore;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_information_posts_to_portfolio_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transaction/information/all/Binance"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "symbol": "BTC", "currentPrice": 64000.5 }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = CryptofolioClient::builder()
            .base_url(&server.uri())
            .token_store(TokenStore::in_memory())
            .build()
            .unwrap();
        let coins = client.coins().information("Binance").await.unwrap();
        assert_eq!(coins[0].current_price, dec!(64000.5));
    }
}
