use bourse_core::{InstrumentCode, MarketService, SessionRange, ValidationError, Warehouse};

use crate::cli::{HistoryArgs, RangeArgs};
use crate::error::CliError;

use super::CommandResult;

pub fn history(
    args: &HistoryArgs,
    default_days: usize,
    service: &MarketService<Warehouse>,
) -> Result<CommandResult, CliError> {
    let code = InstrumentCode::parse(&args.code)?;
    let days = args.days.unwrap_or(default_days);
    if days == 0 {
        return Err(ValidationError::NonPositiveWindow { field: "days" }.into());
    }

    let sessions = if args.from_start {
        service.full_history(&code, days)?
    } else {
        service.stock_history(&code, days)?
    };

    let result = CommandResult::ok(serde_json::to_value(&sessions)?);
    if sessions.is_empty() {
        return Ok(result.with_warning(format!("no sessions stored for {code}")));
    }
    Ok(result)
}

pub fn range(
    args: &RangeArgs,
    service: &MarketService<Warehouse>,
) -> Result<CommandResult, CliError> {
    let code = InstrumentCode::parse(&args.code)?;
    let range = SessionRange::parse(&args.start, &args.end)?;

    let sessions = service.session_range(&code, &range)?;
    Ok(CommandResult::ok(serde_json::to_value(sessions)?))
}
