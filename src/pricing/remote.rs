/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use crate::config::config_file::Prices;
use crate::pricing::{AssetKey, PriceSource, Quote, QuoteError, QuoteResult};
use anyhow::{bail, Error};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Quotes from an HTTP market data service. One GET per batch:
/// `{api_url}/quotes?symbols=a,b,c`, answered with
/// `{"quotes": [{"symbol": "a", "price": 1.0, "change": 0.1}]}`.
pub struct RemotePriceSource {
	client: reqwest::blocking::Client,
	base_url: String,
	api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuotesHolder {
	pub quotes: Vec<RemoteQuote>,
}

#[derive(Debug, Deserialize)]
pub struct RemoteQuote {
	pub symbol: String,
	pub price: f64,
	#[serde(default)]
	pub change: Option<f64>,
}

impl RemotePriceSource {
	pub fn new(config: &Prices) -> Result<Self, Error> {
		let Some(base_url) = &config.api_url else {
			bail!("no prices.api_url in config");
		};

		let timeout = Duration::from_secs(
			config.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
		);
		let client = reqwest::blocking::Client::builder()
			.timeout(timeout)
			.build()?;

		Ok(Self {
			client,
			base_url: base_url.trim_end_matches('/').to_string(),
			api_key: config.api_key.clone(),
		})
	}

	fn fetch(&self, keys: &[AssetKey]) -> Result<QuotesHolder, QuoteError> {
		let url = format!("{}/quotes", self.base_url);
		let symbols = keys
			.iter()
			.map(|k| k.name.as_str())
			.collect::<Vec<_>>()
			.join(",");

		let mut request = self.client.get(&url).query(&[("symbols", symbols)]);
		if let Some(api_key) = &self.api_key {
			request = request.header("Authorization", format!("Bearer {}", api_key));
		}

		debug!(url = %url, count = keys.len(), "requesting quotes");
		let response = request
			.send()
			.map_err(|e| QuoteError::Network(e.to_string()))?;

		if !response.status().is_success() {
			return Err(QuoteError::Status(response.status().as_u16()));
		}

		response
			.json::<QuotesHolder>()
			.map_err(|e| QuoteError::Parse(e.to_string()))
	}
}

/// Pairs each requested key with the quote returned for its name.
pub fn match_quotes(
	keys: &[AssetKey],
	holder: QuotesHolder,
) -> HashMap<AssetKey, QuoteResult> {
	let by_symbol: HashMap<String, RemoteQuote> = holder
		.quotes
		.into_iter()
		.map(|q| (q.symbol.clone(), q))
		.collect();

	keys.iter()
		.map(|key| {
			let result = match by_symbol.get(&key.name) {
				Some(q) if q.price.is_finite() && q.price > 0.0 => Ok(Quote {
					price: q.price,
					day_change: q.change.filter(|c| c.is_finite()),
				}),
				Some(q) => Err(QuoteError::Parse(format!(
					"unusable price {} for {}",
					q.price, key
				))),
				None => Err(QuoteError::NotFound(key.to_string())),
			};
			(key.clone(), result)
		})
		.collect()
}

impl PriceSource for RemotePriceSource {
	fn quote(&self, key: &AssetKey) -> QuoteResult {
		self.quotes(std::slice::from_ref(key))
			.remove(key)
			.unwrap_or_else(|| Err(QuoteError::NotFound(key.to_string())))
	}

	fn quotes(&self, keys: &[AssetKey]) -> HashMap<AssetKey, QuoteResult> {
		if keys.is_empty() {
			return HashMap::new();
		}

		match self.fetch(keys) {
			Ok(holder) => match_quotes(keys, holder),
			Err(e) => keys.iter().map(|k| (k.clone(), Err(e.clone()))).collect(),
		}
	}
}
