use bourse_core::{MarketService, Warehouse};

use crate::cli::SummaryArgs;
use crate::error::CliError;

use super::CommandResult;

pub fn instruments(service: &MarketService<Warehouse>) -> Result<CommandResult, CliError> {
    let instruments = service.instruments()?;
    Ok(CommandResult::ok(serde_json::to_value(instruments)?))
}

pub fn dates(service: &MarketService<Warehouse>) -> Result<CommandResult, CliError> {
    let dates = service.session_dates()?;
    Ok(CommandResult::ok(serde_json::to_value(dates)?))
}

pub fn latest(service: &MarketService<Warehouse>) -> Result<CommandResult, CliError> {
    let sessions = service.latest_session()?;
    Ok(CommandResult::ok(serde_json::to_value(sessions)?))
}

pub fn overview(service: &MarketService<Warehouse>) -> Result<CommandResult, CliError> {
    let entries = service.overview()?;
    let result = CommandResult::ok(serde_json::to_value(&entries)?);
    if entries.is_empty() {
        return Ok(result.with_warning("no sessions stored"));
    }
    Ok(result)
}

pub fn summary(
    args: &SummaryArgs,
    service: &MarketService<Warehouse>,
) -> Result<CommandResult, CliError> {
    let summary = service.market_summary(args.top)?;
    Ok(CommandResult::ok(serde_json::to_value(summary)?))
}

pub fn status(service: &MarketService<Warehouse>) -> Result<CommandResult, CliError> {
    let status = service.store_status()?;
    let mut data = serde_json::to_value(status)?;
    if let Some(object) = data.as_object_mut() {
        object.insert(
            String::from("dbPath"),
            serde_json::Value::String(service.store().db_path().display().to_string()),
        );
    }
    Ok(CommandResult::ok(data))
}
