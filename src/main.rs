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
use crate::config::loader::load_config;
use crate::investment::portfolio::Portfolio;
use crate::pricing::cache::{CachedPriceSource, DEFAULT_FRESHNESS};
use crate::pricing::fallback::FallbackPriceSource;
use crate::pricing::mock::MockPriceSource;
use crate::pricing::remote::RemotePriceSource;
use crate::pricing::PriceSource;
use crate::reports::holdings_reporter::HoldingsReporter;
use crate::reports::realized_reporter::RealizedReporter;
use crate::reports::summary_reporter::SummaryReporter;
use crate::reports::transaction_reporter::TransactionReporter;
use crate::store::journal::JournalStore;
use crate::store::transaction::{AssetType, TransactionInput, TransactionType};
use crate::store::TransactionStore;
use crate::util::date::Date;
use anyhow::{bail, Error};
use clap::{Parser, ValueEnum};
use std::time::Duration;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod investment;
mod pricing;
mod reports;
mod store;
mod util;

#[derive(Parser)]
#[command(
	name = "folio",
	version,
	about = "Personal investment portfolio tracker"
)]
struct Cli {
	// ----------------
	// -- POSITIONAL --
	// ----------------
	/// The command to execute
	command: Directive,

	/// Asset class to restrict the holdings and ugl reports to
	#[arg(required = false)]
	term: Option<String>,

	// -----------
	// -- FLAGS --
	// -----------
	/// Specifies the journal file
	#[arg(short)]
	file: String,

	/// Value holdings as of this date, and date new transactions with it
	/// (YYYY-MM-DD, default today)
	#[arg(short, long)]
	date: Option<String>,

	/// Custom config file location (default: ~/.config/folio/config.toml)
	#[arg(long)]
	config: Option<String>,

	/// Never ask the configured quote service; use synthetic prices
	#[arg(long)]
	offline: bool,

	/// Decimal places to show for monetary amounts
	#[arg(short, long)]
	precision: Option<usize>,

	// ------------------
	// -- ADD COMMAND --
	// ------------------
	/// Transaction type: buy, sell, deposit or withdrawal
	#[arg(long = "type")]
	kind: Option<String>,

	/// Asset name, for buys and sells
	#[arg(short, long)]
	asset: Option<String>,

	/// Asset class: stock, mutual fund, bond or gold
	#[arg(long)]
	class: Option<String>,

	#[arg(short, long)]
	quantity: Option<f64>,

	/// Unit price
	#[arg(long)]
	price: Option<f64>,

	/// Total amount; for trades it defaults to quantity times price
	#[arg(long)]
	amount: Option<f64>,
}

impl Cli {
	/// Anything beyond this is never wanted for a currency amount; it only
	/// guards against printing runs of zeroes by accident
	const MAX_PRECISION: usize = 10;

	const DEFAULT_PRECISION: usize = 2;

	/// Extra validations on top of what clap does
	fn validate(&self) -> Result<(), Error> {
		if let Some(prec) = self.precision {
			if prec > Cli::MAX_PRECISION {
				bail!("Maximum precision is {}", Cli::MAX_PRECISION);
			}
		}

		if self.term.is_some()
			&& !matches!(self.command, Directive::Holdings | Directive::Ugl)
		{
			bail!("Only the holdings and ugl commands take an asset class");
		}

		Ok(())
	}

	fn as_of(&self) -> Result<Date, Error> {
		match &self.date {
			Some(d) => Date::from_str(d),
			None => Ok(Date::today()),
		}
	}

	fn asset_type_filter(&self) -> Result<Option<AssetType>, Error> {
		self.term.as_deref().map(AssetType::from_str).transpose()
	}

	/// Builds the record for the add command. Validation is left to the
	/// store so that the rules live in one place.
	fn transaction_input(&self, date: Date) -> Result<TransactionInput, Error> {
		let Some(kind) = &self.kind else {
			bail!("No transaction type specified (--type)");
		};
		let kind = TransactionType::from_str(kind)?;
		let asset_type = self.class.as_deref().map(AssetType::from_str).transpose()?;

		let total_amount = match self.amount {
			Some(amount) => amount,
			None => self.quantity.unwrap_or(0.0) * self.price.unwrap_or(0.0),
		};

		Ok(TransactionInput {
			date,
			kind,
			asset_name: self.asset.clone(),
			asset_type,
			quantity: self.quantity,
			price: self.price,
			total_amount,
		})
	}
}

#[derive(ValueEnum, Clone, PartialEq)]
enum Directive {
	Add, // record a transaction
	Tx,  // transaction history

	Holdings, // current positions at market value
	Ugl,      // unrealized gains/losses report
	Rgl,      // realized gains/losses report

	Summary, // portfolio dashboard figures
	Alloc,   // value by asset class

	Check, // find possible data integrity concerns
}

fn main() -> Result<(), Error> {
	init_tracing();

	let args = Cli::parse();
	args.validate()?;

	let as_of = args.as_of()?;
	let precision = args.precision.unwrap_or(Cli::DEFAULT_PRECISION);
	let store = JournalStore::open(&args.file)?;

	match args.command {
		Directive::Add => {
			let transaction = store.append(args.transaction_input(as_of)?)?;
			TransactionReporter::new(vec![transaction], precision).print();
		},
		Directive::Tx => {
			TransactionReporter::new(store.list()?, precision).print();
		},
		Directive::Holdings => {
			let portfolio = Portfolio::from_store(&store)?;
			let prices = price_source(&args, as_of)?;
			let valuations =
				portfolio.valuations(&prices, args.asset_type_filter()?);
			HoldingsReporter::new(valuations, precision).print_positions();
		},
		Directive::Ugl => {
			let portfolio = Portfolio::from_store(&store)?;
			let prices = price_source(&args, as_of)?;
			let valuations =
				portfolio.valuations(&prices, args.asset_type_filter()?);
			HoldingsReporter::new(valuations, precision).print_unrealized();
		},
		Directive::Rgl => {
			let portfolio = Portfolio::from_store(&store)?;
			RealizedReporter::new(portfolio.realized(), precision).print();
		},
		Directive::Summary => {
			let portfolio = Portfolio::from_store(&store)?;
			let prices = price_source(&args, as_of)?;
			SummaryReporter::new(precision)
				.print_summary(&portfolio.summary(&prices));
		},
		Directive::Alloc => {
			let portfolio = Portfolio::from_store(&store)?;
			let prices = price_source(&args, as_of)?;
			SummaryReporter::new(precision)
				.print_allocation(&portfolio.allocation(&prices));
		},
		Directive::Check => {
			// the journal was fully validated when it was opened
			for t in store.snapshot()? {
				if let Some(diff) = t.amount_mismatch() {
					warn!(
						"Transaction {} on {}: total amount {} is off from quantity x price by {}",
						t.id,
						t.date(),
						t.total_amount(),
						diff
					);
				}
			}
			println!("Done");
		},
	}

	Ok(())
}

/// Logs go to stderr so report output stays clean; RUST_LOG overrides the
/// default level.
fn init_tracing() {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
		)
		.with_writer(std::io::stderr)
		.init();
}

/// Synthetic prices, unless a quote service is configured and we are not
/// offline. Quotes from the service are cached, and any asset it fails to
/// price gets a synthetic one instead.
fn price_source(args: &Cli, as_of: Date) -> Result<Box<dyn PriceSource>, Error> {
	let mock = MockPriceSource::new(as_of);
	if args.offline {
		return Ok(Box::new(mock));
	}

	let config = load_config(args.config.as_ref(), true)?;
	match config.prices {
		Some(prices) if prices.api_url.is_some() => {
			let remote = RemotePriceSource::new(&prices)?;
			let freshness = prices
				.cache_seconds
				.map(Duration::from_secs)
				.unwrap_or(DEFAULT_FRESHNESS);
			Ok(Box::new(FallbackPriceSource::new(
				CachedPriceSource::new(remote, freshness),
				mock,
			)))
		},
		_ => {
			debug!("no quote service configured; using synthetic prices");
			Ok(Box::new(mock))
		},
	}
}
