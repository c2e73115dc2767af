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
pub mod cache;
pub mod fallback;
pub mod mock;
pub mod remote;

use crate::store::transaction::AssetType;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Identifies what is being priced.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetKey {
	pub name: String,
	pub asset_type: AssetType,
}

impl AssetKey {
	pub fn new(name: &str, asset_type: AssetType) -> Self {
		Self {
			name: name.to_string(),
			asset_type,
		}
	}
}

impl fmt::Display for AssetKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({})", self.name, self.asset_type)
	}
}

/// Latest known unit price, and the change since the previous close if the
/// source knows it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quote {
	pub price: f64,
	pub day_change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuoteError {
	#[error("Network error: {0}")]
	Network(String),
	#[error("Quote request failed with status {0}")]
	Status(u16),
	#[error("Parsing error: {0}")]
	Parse(String),
	#[error("No quote for {0}")]
	NotFound(String),
}

pub type QuoteResult = Result<Quote, QuoteError>;

/// Anything that can tell the current price of an asset. Lookups may be
/// remote and may fail; consumers decide what to do about failures.
pub trait PriceSource: Send + Sync {
	fn quote(&self, key: &AssetKey) -> QuoteResult;

	/// Looks up many assets at once. Sources that can batch requests should
	/// override this; the default asks for each key in turn.
	fn quotes(&self, keys: &[AssetKey]) -> HashMap<AssetKey, QuoteResult> {
		keys.iter().map(|k| (k.clone(), self.quote(k))).collect()
	}
}

impl<S: PriceSource + ?Sized> PriceSource for Box<S> {
	fn quote(&self, key: &AssetKey) -> QuoteResult {
		(**self).quote(key)
	}

	fn quotes(&self, keys: &[AssetKey]) -> HashMap<AssetKey, QuoteResult> {
		(**self).quotes(keys)
	}
}
