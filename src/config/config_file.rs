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
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
	pub prices: Option<Prices>,
}

/// Where live quotes come from. Without an `api_url`, synthetic prices
/// are used.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Prices {
	pub api_url: Option<String>,
	pub api_key: Option<String>,
	pub api_key_cmd: Option<String>,

	/// How long a fetched quote stays fresh (default 300)
	pub cache_seconds: Option<u64>,

	/// Per-request timeout (default 10)
	pub timeout_seconds: Option<u64>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_prices_section() {
		let config: Config = toml::from_str(
			r#"
			[prices]
			api_url = "https://quotes.example.com/v1"
			api_key_cmd = "pass show quotes"
			cache_seconds = 60
			"#,
		)
		.unwrap();

		let prices = config.prices.unwrap();
		assert_eq!(prices.api_url.as_deref(), Some("https://quotes.example.com/v1"));
		assert_eq!(prices.cache_seconds, Some(60));
		assert_eq!(prices.timeout_seconds, None);
		assert!(prices.api_key.is_none());
	}

	#[test]
	fn test_empty_config() {
		let config: Config = toml::from_str("").unwrap();
		assert!(config.prices.is_none());
	}
}
