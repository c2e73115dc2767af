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
use crate::investment::valuation::Valuation;
use crate::store::transaction::AssetType;
use crate::util::amount::safe_div;
use std::collections::BTreeMap;

/// Current value per asset class, in the canonical class order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Allocation {
	by_type: BTreeMap<AssetType, f64>,
}

impl Allocation {
	pub fn from_valuations(valuations: &[Valuation]) -> Self {
		let mut by_type = BTreeMap::new();
		for v in valuations {
			*by_type.entry(v.asset_type).or_insert(0.0) += v.current_value();
		}
		Self { by_type }
	}

	pub fn value_of(&self, asset_type: AssetType) -> f64 {
		self.by_type.get(&asset_type).copied().unwrap_or(0.0)
	}

	pub fn total(&self) -> f64 {
		self.by_type.values().sum()
	}

	/// Share of the total value held in this class, in percent.
	pub fn share_of(&self, asset_type: AssetType) -> f64 {
		safe_div(self.value_of(asset_type), self.total()) * 100.0
	}

	/// Classes with at least one current holding, with their values.
	pub fn iter(&self) -> impl Iterator<Item = (AssetType, f64)> + '_ {
		self.by_type.iter().map(|(t, v)| (*t, *v))
	}

	pub fn is_empty(&self) -> bool {
		self.by_type.is_empty()
	}
}
