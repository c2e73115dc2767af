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
use crate::store::memory::MemoryStore;
use crate::store::transaction::{Transaction, TransactionInput};
use crate::store::TransactionStore;
use anyhow::{anyhow, bail, Error};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// A transaction log persisted as a JSON-lines file: one record per line,
/// oldest first. The whole file is read and validated when opened, and
/// every append writes exactly one line.
#[derive(Debug)]
pub struct JournalStore {
	path: PathBuf,
	memory: MemoryStore,
	// Set when the last record on disk has no trailing newline.
	unterminated: AtomicBool,
}

impl JournalStore {
	/// Opens the journal at `path`. A missing file is an empty journal; it
	/// is created on the first append.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
		let path = path.as_ref().to_path_buf();

		let (transactions, unterminated) = if path.exists() {
			let content = fs::read_to_string(&path).map_err(|e| {
				anyhow!("failed to read journal {}: {}", path.display(), e)
			})?;
			let transactions = parse_journal(&content)
				.map_err(|e| anyhow!("{}: {}", path.display(), e))?;
			let unterminated = !content.is_empty() && !content.ends_with('\n');
			if unterminated {
				warn!(path = %path.display(), "journal does not end with a newline");
			}
			(transactions, unterminated)
		} else {
			info!(path = %path.display(), "journal does not exist yet; starting empty");
			(Vec::new(), false)
		};

		debug!(
			path = %path.display(),
			count = transactions.len(),
			"loaded journal"
		);

		Ok(Self {
			path,
			memory: MemoryStore::from_transactions(transactions),
			unterminated: AtomicBool::new(unterminated),
		})
	}
}

impl TransactionStore for JournalStore {
	fn append(&self, input: TransactionInput) -> Result<Transaction, Error> {
		self.memory.append_with(input, |transaction| {
			// Runs under the log's lock, so the flag cannot race.
			let mut line = String::new();
			if self.unterminated.load(Ordering::Relaxed) {
				line.push('\n');
			}
			line.push_str(&serde_json::to_string(transaction)?);
			line.push('\n');

			let mut file = OpenOptions::new()
				.append(true)
				.create(true)
				.open(&self.path)
				.map_err(|e| {
					anyhow!("failed to open journal {}: {}", self.path.display(), e)
				})?;
			file.write_all(line.as_bytes())?;
			self.unterminated.store(false, Ordering::Relaxed);

			debug!(id = %transaction.id, path = %self.path.display(), "wrote transaction to journal");
			Ok(())
		})
	}

	fn snapshot(&self) -> Result<Vec<Transaction>, Error> {
		self.memory.snapshot()
	}
}

/// Parses and validates every record of a journal. Blank lines are
/// skipped; anything else must be a valid transaction with a unique ID.
pub fn parse_journal(content: &str) -> Result<Vec<Transaction>, Error> {
	let mut transactions = Vec::new();
	let mut seen_ids = HashSet::new();

	for (i, line) in content.lines().enumerate() {
		let line_number = i + 1;
		if line.trim().is_empty() {
			continue;
		}

		let transaction: Transaction = serde_json::from_str(line)
			.map_err(|e| anyhow!("line {}: malformed record: {}", line_number, e))?;

		transaction
			.input
			.validate()
			.map_err(|e| anyhow!("line {}: {}", line_number, e))?;

		if !seen_ids.insert(transaction.id.clone()) {
			bail!("line {}: duplicate transaction id {}", line_number, transaction.id);
		}

		transactions.push(transaction);
	}

	Ok(transactions)
}
