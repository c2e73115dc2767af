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
use crate::pricing::{AssetKey, PriceSource, QuoteResult};
use std::collections::HashMap;
use tracing::warn;

/// Asks the primary source first and substitutes the fallback's quote for
/// every failure. No retries.
pub struct FallbackPriceSource<P, F> {
	primary: P,
	fallback: F,
}

impl<P: PriceSource, F: PriceSource> FallbackPriceSource<P, F> {
	pub fn new(primary: P, fallback: F) -> Self {
		Self { primary, fallback }
	}
}

impl<P: PriceSource, F: PriceSource> PriceSource for FallbackPriceSource<P, F> {
	fn quote(&self, key: &AssetKey) -> QuoteResult {
		match self.primary.quote(key) {
			Ok(quote) => Ok(quote),
			Err(e) => {
				warn!("Quote for {} unavailable: {}. Using fallback price.", key, e);
				self.fallback.quote(key)
			},
		}
	}

	fn quotes(&self, keys: &[AssetKey]) -> HashMap<AssetKey, QuoteResult> {
		let mut results = self.primary.quotes(keys);

		let failed: Vec<AssetKey> = keys
			.iter()
			.filter(|k| !matches!(results.get(*k), Some(Ok(_))))
			.cloned()
			.collect();

		if failed.is_empty() {
			return results;
		}

		for key in &failed {
			match results.get(key) {
				Some(Err(e)) => warn!(
					"Quote for {} unavailable: {}. Using fallback price.",
					key, e
				),
				_ => warn!("No quote returned for {}. Using fallback price.", key),
			}
		}

		results.extend(self.fallback.quotes(&failed));
		results
	}
}
