mod show;
mod watch;

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tickwatch_core::{
    Envelope, EnvelopeError, ProviderId, ReqwestHttpClient, WatchlistStore, YahooAdapter,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata::Metadata;

#[derive(Debug)]
pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub provider: Option<ProviderId>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            provider: None,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_error(mut self, error: EnvelopeError) -> Self {
        self.errors.push(error);
        self
    }

    pub fn with_provider(mut self, provider: ProviderId) -> Self {
        self.provider = Some(provider);
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let started = Instant::now();
    let mut store = WatchlistStore::load(&cli.watchlist);

    let command_result = match &cli.command {
        Command::Watch(args) => watch::run(args, &mut store)?,
        Command::Show(args) => {
            let adapter = build_adapter(cli.mock)?;
            show::run(args, &store, &adapter).await?
        }
    };

    let CommandResult {
        data,
        warnings,
        errors,
        provider,
    } = command_result;

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let mut metadata = Metadata::new(provider, latency_ms);
    for warning in warnings {
        metadata.push_warning(warning);
    }

    let meta = metadata.into_envelope_meta()?;
    Ok(Envelope::with_errors(meta, data, errors))
}

fn build_adapter(mock: bool) -> Result<YahooAdapter, CliError> {
    if mock {
        return Ok(YahooAdapter::mock());
    }

    let http = ReqwestHttpClient::new().map_err(|error| CliError::Command(error.to_string()))?;
    Ok(YahooAdapter::new(Arc::new(http)))
}
