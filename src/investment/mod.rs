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
pub mod allocation;
pub mod holding;
pub mod lot;
pub mod portfolio;
pub mod sale;
pub mod summary;
pub mod valuation;

use crate::store::transaction::Transaction;

/// Orders transactions by date, oldest first. The sort is stable, so
/// transactions sharing a date keep their log order.
pub(crate) fn by_date<'a>(
	transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<&'a Transaction> {
	let mut sorted: Vec<&Transaction> = transactions.into_iter().collect();
	sorted.sort_by_key(|t| t.date());
	sorted
}

#[cfg(test)]
pub(crate) mod fixtures;
