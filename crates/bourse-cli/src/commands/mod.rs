mod history;
mod market;

use std::time::Instant;

use bourse_core::{BourseConfig, Envelope, MarketService, Warehouse, SCHEMA_VERSION};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata::Metadata;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

pub fn run(cli: &Cli, config: &BourseConfig) -> Result<Envelope<Value>, CliError> {
    let started = Instant::now();

    let mut warehouse_config = config.warehouse.clone();
    if let Some(db) = &cli.db {
        warehouse_config.db_path = db.clone();
    }
    tracing::debug!(db_path = %warehouse_config.db_path.display(), "opening warehouse");
    let service = MarketService::new(Warehouse::open(warehouse_config)?);

    let command_result = match &cli.command {
        Command::Instruments => market::instruments(&service)?,
        Command::Dates => market::dates(&service)?,
        Command::Latest => market::latest(&service)?,
        Command::Overview => market::overview(&service)?,
        Command::Summary(args) => market::summary(args, &service)?,
        Command::Status => market::status(&service)?,
        Command::History(args) => history::history(args, config.default_history_days, &service)?,
        Command::Range(args) => history::range(args, &service)?,
    };

    let CommandResult { data, warnings } = command_result;
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let mut metadata = Metadata::new(latency_ms);
    for warning in warnings {
        metadata.push_warning(warning);
    }

    let meta = metadata.into_envelope_meta(SCHEMA_VERSION)?;
    Ok(Envelope::success(meta, data))
}
