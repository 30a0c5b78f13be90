use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::{
  env,
  net::{IpAddr, Ipv4Addr},
  sync::RwLock,
};

static CONFIG_FILE: &str = "config/config.toml";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
  pub hostname: String,
  pub bind: IpAddr,
  pub port: u16,
  /// Secret shared with the external accounts module that issues the tokens.
  pub jwt_secret: String,
  pub login_url: String,
  /// Page size shared by every feed view.
  pub items_on_page: usize,
  /// TTL of the home-feed cache slot, measured from population.
  pub cache_ttl_secs: u64,
}

impl Default for Settings {
  fn default() -> Self {
    Settings {
      hostname: "localhost".into(),
      bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
      port: 8998,
      jwt_secret: "changeme".into(),
      login_url: "/auth/login/".into(),
      items_on_page: 10,
      cache_ttl_secs: 20,
    }
  }
}

lazy_static! {
  static ref SETTINGS: RwLock<Settings> = RwLock::new(match Settings::init() {
    Ok(c) => c,
    Err(e) => panic!("{}", e),
  });
}

impl Settings {
  /// Reads config from the built-in defaults, then an optional config file,
  /// then the environment (with prefix QUILL). Eg. `QUILL_PORT=8080` would
  /// set the `port` key.
  fn init() -> Result<Self, ConfigError> {
    Config::builder()
      .add_source(Config::try_from(&Settings::default())?)
      .add_source(File::with_name(&Self::get_config_location()).required(false))
      .add_source(
        Environment::with_prefix("QUILL")
          .separator("__")
          .try_parsing(true),
      )
      .build()?
      .try_deserialize()
  }

  /// Returns the config as a struct.
  pub fn get() -> Self {
    SETTINGS.read().unwrap().to_owned()
  }

  pub fn get_config_location() -> String {
    env::var("QUILL_CONFIG_LOCATION").unwrap_or_else(|_| CONFIG_FILE.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::Settings;

  #[test]
  fn test_defaults() {
    let settings = Settings::get();
    assert_eq!(settings.items_on_page, 10);
    assert_eq!(settings.cache_ttl_secs, 20);
  }
}
