use serde::Serialize;
use serde_json::json;

use tickwatch_core::{
    AddOutcome, RemoveOutcome, Symbol, WatchlistEntry, WatchlistError, WatchlistStore,
};

use crate::cli::{WatchArgs, WatchCommand, WatchSymbolArgs};
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct WatchlistView<'a> {
    count: usize,
    symbols: &'a [WatchlistEntry],
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<&'static str>,
}

pub fn run(args: &WatchArgs, store: &mut WatchlistStore) -> Result<CommandResult, CliError> {
    match &args.command {
        WatchCommand::Add(symbol_args) => add(symbol_args, store),
        WatchCommand::Remove(symbol_args) => remove(symbol_args, store),
        WatchCommand::List => list(store),
    }
}

fn add(args: &WatchSymbolArgs, store: &mut WatchlistStore) -> Result<CommandResult, CliError> {
    // Validate up front so every outcome payload carries the normalized
    // symbol, including the persist-failure path.
    let symbol = Symbol::parse(&args.symbol)?;

    match store.add(symbol.as_str()) {
        Ok(AddOutcome::Added(entry)) => {
            let data = json!({
                "action": "added",
                "symbol": entry.symbol,
                "added_date": entry.added_date,
                "count": store.len(),
            });
            Ok(CommandResult::ok(data))
        }
        Ok(AddOutcome::Duplicate(symbol)) => {
            let data = json!({
                "action": "unchanged",
                "symbol": symbol,
                "count": store.len(),
            });
            Ok(CommandResult::ok(data)
                .with_warning(format!("'{symbol}' is already on the watchlist")))
        }
        Err(WatchlistError::Validation(error)) => Err(error.into()),
        // The in-memory add already happened; the session keeps working and
        // the lost write is surfaced as a warning.
        Err(error @ WatchlistError::Persist { .. }) => {
            let data = json!({
                "action": "added",
                "symbol": symbol,
                "count": store.len(),
            });
            Ok(CommandResult::ok(data).with_warning(error.to_string()))
        }
    }
}

fn remove(args: &WatchSymbolArgs, store: &mut WatchlistStore) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;

    match store.remove(symbol.as_str()) {
        Ok(RemoveOutcome::Removed(symbol)) => {
            let data = json!({
                "action": "removed",
                "symbol": symbol,
                "count": store.len(),
            });
            Ok(CommandResult::ok(data))
        }
        Ok(RemoveOutcome::NotTracked(symbol)) => {
            let data = json!({
                "action": "unchanged",
                "symbol": symbol,
                "count": store.len(),
            });
            Ok(CommandResult::ok(data)
                .with_warning(format!("'{symbol}' was not on the watchlist")))
        }
        Err(WatchlistError::Validation(error)) => Err(error.into()),
        Err(error @ WatchlistError::Persist { .. }) => {
            let data = json!({
                "action": "removed",
                "symbol": symbol,
                "count": store.len(),
            });
            Ok(CommandResult::ok(data).with_warning(error.to_string()))
        }
    }
}

fn list(store: &WatchlistStore) -> Result<CommandResult, CliError> {
    let view = WatchlistView {
        count: store.len(),
        symbols: store.entries(),
        hint: store
            .is_empty()
            .then_some("watchlist is empty; add a symbol with 'tickwatch watch add <SYMBOL>'"),
    };

    Ok(CommandResult::ok(serde_json::to_value(view)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    fn symbol_args(raw: &str) -> WatchSymbolArgs {
        WatchSymbolArgs {
            symbol: raw.to_owned(),
        }
    }

    #[test]
    fn add_payload_names_the_normalized_symbol() {
        let dir = tempdir().expect("tempdir");
        let mut store = WatchlistStore::load(dir.path().join("watchlist.json"));

        let result = add(&symbol_args(" aapl "), &mut store).expect("add");
        assert_eq!(result.data["action"], "added");
        assert_eq!(result.data["symbol"], "AAPL");
        assert_eq!(result.data["count"], 1);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn persist_failure_payload_keeps_the_same_shape() {
        let dir = tempdir().expect("tempdir");
        // A directory path makes every rewrite fail.
        let mut store = WatchlistStore::load(dir.path());

        let result = add(&symbol_args("AAPL"), &mut store).expect("add");
        assert_eq!(result.data["action"], "added");
        assert_eq!(result.data["symbol"], "AAPL");
        assert_eq!(result.data["count"], 1);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("failed to persist"));

        let result = remove(&symbol_args("AAPL"), &mut store).expect("remove");
        assert_eq!(result.data["action"], "removed");
        assert_eq!(result.data["symbol"], "AAPL");
        assert_eq!(result.data["count"], 0);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn removing_an_untracked_symbol_warns_but_succeeds() {
        let dir = tempdir().expect("tempdir");
        let mut store = WatchlistStore::load(dir.path().join("watchlist.json"));

        let result = remove(&symbol_args("MSFT"), &mut store).expect("remove");
        assert_eq!(result.data["action"], "unchanged");
        assert_eq!(result.data["symbol"], "MSFT");
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn empty_list_payload_carries_a_hint() {
        let dir = tempdir().expect("tempdir");
        let mut store = WatchlistStore::load(dir.path().join("watchlist.json"));

        let result = list(&store).expect("list");
        assert_eq!(result.data["count"], 0);
        assert!(result.data["hint"].as_str().expect("hint").contains("watch add"));

        store.add("AAPL").expect("add");
        let result = list(&store).expect("list");
        assert_eq!(result.data["count"], 1);
        assert!(result.data.get("hint").is_none());
    }

    #[test]
    fn invalid_input_is_rejected_before_any_mutation() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("watchlist.json");
        let mut store = WatchlistStore::load(&path);

        let error = add(&symbol_args("9AAPL"), &mut store).expect_err("must fail");
        assert!(matches!(error, CliError::Validation(_)));
        assert!(store.is_empty());
        assert!(!path.exists());
    }
}
