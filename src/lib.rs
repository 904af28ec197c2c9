pub mod config;
pub mod core;
pub mod db;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, secrets::EnvFile, toml_config::RankingsTomlConfig};

#[cfg(feature = "cli")]
pub use config::{CalcArgs, MysqlArgs, RankingsConfig, SecretsArgs};

#[cfg(feature = "mysql")]
pub use db::MysqlSource;

pub use core::{etl::EtlEngine, pipeline::RankingsPipeline};
pub use domain::model::{Cell, RankingRecord, Table};
pub use utils::error::{Result, ToolkitError};
