use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;

use crate::models::{RawCandle, Side};

const PI42_PUBLIC_BASE: &str = "https://api.pi42.com";
const PI42_AUTH_BASE: &str = "https://fapi.pi42.com";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum Pi42Error {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("pi42 api error: {0}")]
    Api(reqwest::StatusCode),

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("failed to sign request: {0}")]
    Signing(String),
}

/// Client for the Pi42 futures API
///
/// Market data is public; wallet and order endpoints are authenticated
/// with an HMAC-SHA256 signature over the urlencoded query (GET) or the
/// exact JSON body (POST), sent in the `signature` header alongside
/// `api-key`.
#[derive(Clone)]
pub struct Pi42Client {
    client: Client,
    api_key: String,
    api_secret: String,
    public_base: String,
    auth_base: String,
}

// ============== Response Types ==============

/// Numeric fields arrive as JSON strings on some endpoints
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumOrStr {
    Num(f64),
    Str(String),
}

impl NumOrStr {
    fn as_f64(&self) -> Option<f64> {
        match self {
            NumOrStr::Num(n) => Some(*n),
            NumOrStr::Str(s) => s.parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct KlineRaw {
    open: NumOrStr,
    high: NumOrStr,
    low: NumOrStr,
    close: NumOrStr,
}

impl KlineRaw {
    fn into_candle(self) -> Result<RawCandle, Pi42Error> {
        let field = |value: &NumOrStr, name: &str| {
            value
                .as_f64()
                .ok_or_else(|| Pi42Error::Malformed(format!("kline field {} is not numeric", name)))
        };

        Ok(RawCandle {
            open: field(&self.open, "open")?,
            high: field(&self.high, "high")?,
            low: field(&self.low, "low")?,
            close: field(&self.close, "close")?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WalletDetails {
    #[serde(default)]
    unrealised_pnl_isolated: Option<NumOrStr>,
}

// ============== Implementation ==============

fn sign(secret: &str, payload: &str) -> Result<String, Pi42Error> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| Pi42Error::Signing(e.to_string()))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

impl Pi42Client {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self::with_base_urls(
            api_key,
            api_secret,
            PI42_PUBLIC_BASE.to_string(),
            PI42_AUTH_BASE.to_string(),
        )
    }

    /// Construct against custom base URLs (used by tests)
    pub fn with_base_urls(
        api_key: String,
        api_secret: String,
        public_base: String,
        auth_base: String,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_secret,
            public_base,
            auth_base,
        }
    }

    /// Fetch OHLC candles, oldest first
    /// Endpoint: POST /v1/market/klines (public)
    pub async fn fetch_klines(
        &self,
        pair: &str,
        interval: &str,
        limit: u32,
    ) -> Result<Vec<RawCandle>, Pi42Error> {
        let url = format!("{}/v1/market/klines", self.public_base);
        let params = serde_json::json!({
            "pair": pair,
            "interval": interval,
            "limit": limit,
        });

        let response = self.client.post(&url).json(&params).send().await?;

        if !response.status().is_success() {
            return Err(Pi42Error::Api(response.status()));
        }

        let klines: Vec<KlineRaw> = response.json().await?;
        klines.into_iter().map(KlineRaw::into_candle).collect()
    }

    /// Fetch the isolated unrealised PnL from the futures wallet
    /// Endpoint: GET /v1/wallet/futures-wallet/details (authenticated)
    ///
    /// A missing field is reported as 0.0, matching the exchange's
    /// behaviour for accounts with no open position.
    pub async fn fetch_unrealized_pnl(&self) -> Result<f64, Pi42Error> {
        let url = format!("{}/v1/wallet/futures-wallet/details", self.auth_base);
        let timestamp = Utc::now().timestamp_millis().to_string();
        let params = [("timestamp", timestamp.as_str())];

        let query =
            serde_urlencoded::to_string(params).map_err(|e| Pi42Error::Signing(e.to_string()))?;
        let signature = sign(&self.api_secret, &query)?;

        let response = self
            .client
            .get(&url)
            .header("api-key", &self.api_key)
            .header("signature", signature)
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Pi42Error::Api(response.status()));
        }

        let details: WalletDetails = response.json().await?;
        match details.unrealised_pnl_isolated {
            None => Ok(0.0),
            Some(value) => value.as_f64().ok_or_else(|| {
                Pi42Error::Malformed("unrealisedPnlIsolated is not numeric".to_string())
            }),
        }
    }

    /// Place a market order
    /// Endpoint: POST /v1/order/place-order (authenticated)
    ///
    /// The signature covers the exact JSON body bytes, so the serialized
    /// string is signed and then sent as-is.
    pub async fn place_order(
        &self,
        pair: &str,
        side: Side,
        quantity: f64,
    ) -> Result<(), Pi42Error> {
        let url = format!("{}/v1/order/place-order", self.auth_base);
        let timestamp = Utc::now().timestamp_millis().to_string();
        let params = serde_json::json!({
            "timestamp": timestamp,
            "placeType": "ORDER_FORM",
            "symbol": pair,
            "side": side.as_order_side(),
            "reduceOnly": false,
            "quantity": quantity,
            "type": "MARKET",
            "marginAsset": "INR",
            "deviceType": "WEB",
            "userCategory": "EXTERNAL",
        });

        let body = serde_json::to_string(&params)?;
        let signature = sign(&self.api_secret, &body)?;

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .header("signature", signature)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Pi42Error::Api(response.status()));
        }

        tracing::info!(
            "Order placed: {} {} {}",
            side.as_order_side(),
            quantity,
            pair
        );
        Ok(())
    }
}
