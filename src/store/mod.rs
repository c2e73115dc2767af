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
pub mod journal;
pub mod memory;
pub mod transaction;

use crate::store::transaction::{Transaction, TransactionInput};
use anyhow::Error;

/// The append-only log of transactions that every other view is derived
/// from. Implementations serialize appends against each other; reads see a
/// consistent snapshot and may lag a concurrent append.
pub trait TransactionStore: Send + Sync {
	/// Validates the input, assigns it an identifier and appends it. On
	/// failure the log is unchanged.
	fn append(&self, input: TransactionInput) -> Result<Transaction, Error>;

	/// Every transaction in append order.
	fn snapshot(&self) -> Result<Vec<Transaction>, Error>;

	/// Every transaction, newest first.
	fn list(&self) -> Result<Vec<Transaction>, Error> {
		let mut transactions = self.snapshot()?;
		transactions.reverse();
		Ok(transactions)
	}
}
