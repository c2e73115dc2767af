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
use crate::config::config_file::Config;
use anyhow::{anyhow, bail, Error};
use dirs::home_dir;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = ".config/folio/config.toml";

/// Fetches the config from the given path, or the default path if none.
/// A missing default file means an empty config; a missing custom file is
/// an error. The boolean argument indicates whether credentials should be
/// resolved, i.e. whether live quotes will be requested.
pub fn load_config(
	custom_config_path: Option<&String>,
	expand_auth: bool,
) -> Result<Config, Error> {
	let config_path = match custom_config_path {
		Some(p) => PathBuf::from(p),
		None => match home_dir() {
			Some(home) => home.join(DEFAULT_CONFIG_PATH),
			None => {
				debug!("no home directory; using default config");
				return Ok(Config::default());
			},
		},
	};

	if !config_path.exists() {
		if custom_config_path.is_some() {
			bail!("config file {} does not exist", config_path.display());
		}
		return Ok(Config::default());
	}

	let content = fs::read_to_string(&config_path)?;
	let config = parse_config(&content)?;

	if expand_auth {
		expand_api_key(config)
	} else {
		Ok(config)
	}
}

pub fn parse_config(content: &str) -> Result<Config, Error> {
	toml::from_str(content).map_err(|e| anyhow!("failed to parse config: {}", e))
}

/// Executes prices.api_key_cmd if applicable, and puts the result in
/// prices.api_key.
fn expand_api_key(mut config: Config) -> Result<Config, Error> {
	if let Some(prices) = &mut config.prices {
		if prices.api_key_cmd.is_some() && prices.api_key.is_some() {
			bail!("Only one of prices.api_key and prices.api_key_cmd may be specified")
		}

		if let Some(api_key_cmd) = &prices.api_key_cmd {
			let output = Command::new("sh")
				.arg("-c")
				.arg(api_key_cmd)
				.output()
				.map_err(|e| anyhow!("failed to execute api_key_cmd: {}", e))?;

			if !output.status.success() {
				bail!(
					"prices api_key_cmd failed with status {}: {}",
					output.status,
					String::from_utf8_lossy(&output.stderr)
				);
			}

			let key = String::from_utf8(output.stdout)
				.map_err(|e| anyhow!("failed to parse command output: {}", e))?;
			prices.api_key = Some(key.trim().to_string());
		}
	}

	Ok(config)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	fn write_config(content: &str) -> tempfile::NamedTempFile {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(content.as_bytes()).unwrap();
		file
	}

	#[test]
	fn test_missing_custom_config_fails() {
		let path = "/definitely/not/here/config.toml".to_string();
		assert!(load_config(Some(&path), false).is_err());
	}

	#[test]
	fn test_api_key_cmd_is_expanded() {
		let file = write_config(
			"[prices]\napi_url = \"http://localhost\"\napi_key_cmd = \"echo '  secret  '\"\n",
		);
		let path = file.path().to_string_lossy().to_string();

		let config = load_config(Some(&path), true).unwrap();
		assert_eq!(config.prices.unwrap().api_key.as_deref(), Some("secret"));

		let config = load_config(Some(&path), false).unwrap();
		assert!(config.prices.unwrap().api_key.is_none());
	}

	#[test]
	fn test_key_and_cmd_are_exclusive() {
		let file = write_config("[prices]\napi_key = \"a\"\napi_key_cmd = \"echo b\"\n");
		let path = file.path().to_string_lossy().to_string();
		assert!(load_config(Some(&path), true).is_err());
	}

	#[test]
	fn test_invalid_toml() {
		assert!(parse_config("[prices\n").is_err());
	}
}
