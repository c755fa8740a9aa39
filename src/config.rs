/*
 * Teacher Dashboard, keeping class tracking organized
 * Copyright (C) 2019-2020 Adrien 'Litarvan' Navratil
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */
use std::fs;
use std::path::Path;
use std::process::exit;
use std::time::Duration;

use log::{info, warn, error};
use failure::Fail;
use lazy_static::lazy_static;
use serde_derive::{Serialize, Deserialize};

lazy_static! {
    pub static ref CONFIG: DashConfig = load();
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    // Login and registration live on their own service, everything else on the dashboard API
    pub api_url: String,
    pub auth_url: String,

    pub session_path: String,
    pub request_timeout_secs: u64,

    pub success_revert_ms: u64,
    pub reset_stale_options: bool
}

impl Default for DashConfig {
    fn default() -> DashConfig {
        DashConfig {
            api_url: "https://teacher-dashboard-backend.onrender.com".to_string(),
            auth_url: "https://pccoe-learningtool-registration-login.onrender.com".to_string(),

            session_path: "./session.json".to_string(),
            request_timeout_secs: 30,

            success_revert_ms: 3000,
            reset_stale_options: false
        }
    }
}

impl DashConfig {
    pub fn success_revert(&self) -> Duration {
        Duration::from_millis(self.success_revert_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Lets a deployment point at another backend without touching the file.
    pub fn with_env_overrides(mut self) -> DashConfig {
        if let Ok(url) = std::env::var("DASHBOARD_API_URL") {
            info!("Dashboard API origin overridden to '{}'", url);
            self.api_url = url;
        }

        if let Ok(url) = std::env::var("DASHBOARD_AUTH_URL") {
            info!("Auth API origin overridden to '{}'", url);
            self.auth_url = url;
        }

        self.api_url = self.api_url.trim_end_matches('/').to_string();
        self.auth_url = self.auth_url.trim_end_matches('/').to_string();

        if self.api_url != self.auth_url {
            warn!("Auth and dashboard APIs are served from different origins ('{}' and '{}')", self.auth_url, self.api_url);
        }

        self
    }
}

pub fn read(path: &Path) -> ConfigResult<DashConfig> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str::<DashConfig>(&content)?)
}

pub fn write_default(path: &Path) -> ConfigResult<()> {
    let content = toml::to_string(&DashConfig::default())?;
    fs::write(path, content)?;

    Ok(())
}

fn load() -> DashConfig {
    let config_path = match std::env::var("DASHBOARD_CONFIG") {
        Ok(c) => c,
        Err(_) => "./dashboard.toml".to_string()
    };
    let path = Path::new(&config_path);

    if !path.exists() {
        warn!("Configuration file at '{}' does not exist, creating a default one", config_path);

        match write_default(path) {
            Ok(_) => {
                warn!("Review it before restarting the dashboard");
                exit(0);
            },
            Err(e) => error!("Failed writing default config at '{}', please check if the parent folder exists \
            and if the program has the permission to write in there: {}", config_path, e)
        }

        exit(1);
    }

    info!("Reading config from '{}'", config_path);

    match read(path) {
        Ok(c) => c.with_env_overrides(),
        Err(e) => {
            error!("Error while loading the config file : {}", e);
            exit(1);
        }
    }
}

#[derive(Debug, Fail)]
pub enum ConfigError {
    #[fail(display = "Can't read or write the config file, the program may not have the permissions : {}", error)]
    IOError {
        error: std::io::Error
    },

    #[fail(display = "There is probably a syntax error in the config file : {}", error)]
    ParsingError {
        error: toml::de::Error
    },

    #[fail(display = "Failed serializing the config, this is very bad, please contact the devs : {}", error)]
    SerializingError {
        error: toml::ser::Error
    }
}

from_error!(std::io::Error, ConfigError, IOError);
from_error!(toml::de::Error, ConfigError, ParsingError);
from_error!(toml::ser::Error, ConfigError, SerializingError);
