use serde_json::Value;
use tickwatch_core::Envelope;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            println!("{payload}");
        }
        OutputFormat::Ndjson => {
            let payload = serde_json::to_string(envelope)?;
            println!("{payload}");
        }
        OutputFormat::Table => render_table(envelope)?,
    }

    Ok(())
}

fn render_table(envelope: &Envelope<Value>) -> Result<(), CliError> {
    println!("request_id  : {}", envelope.meta.request_id);
    println!("generated_at: {}", envelope.meta.generated_at);
    if let Some(provider) = envelope.meta.provider {
        println!("provider    : {provider}");
    }
    println!("latency_ms  : {}", envelope.meta.latency_ms);

    if !envelope.meta.warnings.is_empty() {
        println!("warnings:");
        for warning in &envelope.meta.warnings {
            println!("  - {warning}");
        }
    }

    let data = &envelope.data;
    if data.get("chart").is_some() {
        render_show_data(data);
    } else {
        println!("data:");
        let pretty_data = serde_json::to_string_pretty(data)?;
        for line in pretty_data.lines() {
            println!("  {line}");
        }
    }

    if !envelope.errors.is_empty() {
        println!("errors:");
        for error in &envelope.errors {
            println!("  - {}: {}", error.code, error.message);
        }
    }

    Ok(())
}

fn render_show_data(data: &Value) {
    if let Some(symbol) = data.get("symbol").and_then(Value::as_str) {
        let long_name = data
            .pointer("/profile/long_name")
            .and_then(Value::as_str)
            .unwrap_or(symbol);
        println!();
        println!("{long_name} ({symbol})");
    }

    if let Some(cap) = data
        .pointer("/profile/market_cap_display")
        .and_then(Value::as_str)
    {
        println!("market cap  : {cap}");
    }

    if let Some(summary) = data.get("summary") {
        let current = summary.get("current_price").and_then(Value::as_f64);
        let change = summary.get("price_change").and_then(Value::as_f64);
        let percent = summary.get("percent_change").and_then(Value::as_f64);
        if let (Some(current), Some(change), Some(percent)) = (current, change, percent) {
            println!("price       : {current:.2} ({change:+.2}, {percent:+.2}%)");
        }
    }

    if let Some(chart) = data.get("chart").and_then(Value::as_array) {
        if !chart.is_empty() {
            println!();
            for line in chart {
                if let Some(line) = line.as_str() {
                    println!("{line}");
                }
            }
        }
    }

    if let Some(recent) = data.get("recent").and_then(Value::as_array) {
        if !recent.is_empty() {
            println!();
            println!(
                "{:<12} {:>10} {:>10} {:>10} {:>10} {:>12}",
                "date", "open", "high", "low", "close", "volume"
            );
            for bar in recent {
                let cell = |key: &str| bar.get(key).and_then(Value::as_f64).unwrap_or(f64::NAN);
                let volume = bar
                    .get("volume")
                    .and_then(Value::as_u64)
                    .map_or_else(|| String::from("-"), |v| v.to_string());
                println!(
                    "{:<12} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>12}",
                    bar.get("date").and_then(Value::as_str).unwrap_or("-"),
                    cell("open"),
                    cell("high"),
                    cell("low"),
                    cell("close"),
                    volume
                );
            }
        }
    }

    if data.get("bar_count").and_then(Value::as_u64) == Some(0) {
        println!("no price data for the requested range");
    }
}
