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
use crate::pricing::{AssetKey, PriceSource, Quote, QuoteError, QuoteResult};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_FRESHNESS: Duration = Duration::from_secs(300);

/// Remembers successful quotes for a fixed freshness window. A batch
/// lookup forwards only the stale or missing keys to the inner source, in
/// one batch. Failures are never cached.
pub struct CachedPriceSource<S> {
	inner: S,
	freshness: Duration,
	entries: Mutex<HashMap<AssetKey, (Instant, Quote)>>,
}

impl<S: PriceSource> CachedPriceSource<S> {
	pub fn new(inner: S, freshness: Duration) -> Self {
		Self {
			inner,
			freshness,
			entries: Mutex::new(HashMap::new()),
		}
	}

	/// A panic while holding the lock leaves at worst a stale entry behind,
	/// so poisoning is ignored.
	fn entries(&self) -> MutexGuard<'_, HashMap<AssetKey, (Instant, Quote)>> {
		self.entries.lock().unwrap_or_else(|e| e.into_inner())
	}
}

impl<S: PriceSource> PriceSource for CachedPriceSource<S> {
	fn quote(&self, key: &AssetKey) -> QuoteResult {
		self.quotes(std::slice::from_ref(key))
			.remove(key)
			.unwrap_or_else(|| Err(QuoteError::NotFound(key.to_string())))
	}

	fn quotes(&self, keys: &[AssetKey]) -> HashMap<AssetKey, QuoteResult> {
		let now = Instant::now();
		let mut results = HashMap::new();
		let mut missing = Vec::new();

		{
			let entries = self.entries();
			for key in keys {
				match entries.get(key) {
					Some((fetched, quote))
						if now.duration_since(*fetched) < self.freshness =>
					{
						results.insert(key.clone(), Ok(*quote));
					},
					_ => {
						if !missing.contains(key) {
							missing.push(key.clone());
						}
					},
				}
			}
		}

		if missing.is_empty() {
			return results;
		}

		debug!(
			cached = results.len(),
			fetching = missing.len(),
			"refreshing quotes"
		);

		let fetched = self.inner.quotes(&missing);
		let fetched_at = Instant::now();
		let mut entries = self.entries();

		for key in missing {
			let result = fetched
				.get(&key)
				.cloned()
				.unwrap_or_else(|| Err(QuoteError::NotFound(key.to_string())));

			if let Ok(quote) = &result {
				entries.insert(key.clone(), (fetched_at, *quote));
			}
			results.insert(key, result);
		}

		results
	}
}
