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
use crate::pricing::{AssetKey, PriceSource, Quote, QuoteResult};
use crate::store::transaction::AssetType;
use crate::util::date::Date;

/// Synthetic prices derived only from the asset name and the day of month,
/// so that reports are reproducible without a market data feed. Never
/// fails.
#[derive(Clone, Debug)]
pub struct MockPriceSource {
	as_of: Date,
}

impl MockPriceSource {
	pub fn new(as_of: Date) -> Self {
		Self { as_of }
	}

	fn base_price(asset_type: AssetType) -> f64 {
		match asset_type {
			AssetType::Stock => 100.0,
			AssetType::MutualFund => 50.0,
			AssetType::Bond => 1000.0,
			AssetType::Gold => 70.0,
		}
	}
}

impl PriceSource for MockPriceSource {
	fn quote(&self, key: &AssetKey) -> QuoteResult {
		let len = key.name.chars().count() as u64;
		let day = self.as_of.day() as u64;

		let price = MockPriceSource::base_price(key.asset_type)
			+ 1.5 * len as f64
			+ 0.5 * day as f64;
		let day_change = 0.25 * (((len + day) % 5) as f64 - 2.0);

		Ok(Quote {
			price,
			day_change: Some(day_change),
		})
	}
}
