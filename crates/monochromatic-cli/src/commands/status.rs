use clap::Args;
use monochromatic_core::{FixedPower, MinuteOfDay, SysfsPower};
use serde::Serialize;

use super::open_settings;

#[derive(Args)]
pub struct StatusArgs {
    /// Evaluate at this time of day (HH:MM) instead of now
    #[arg(long)]
    at: Option<MinuteOfDay>,
    /// Use this battery percentage instead of reading the system battery
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    battery: Option<u8>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct StatusReport {
    enabled: bool,
    allowed: bool,
    active: bool,
    time: String,
    battery_percent: u8,
    reasons: Vec<&'static str>,
}

pub fn run(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = open_settings()?;
    let now = args.at.unwrap_or_else(MinuteOfDay::now);

    let allowance = match args.battery {
        Some(pct) => settings.evaluate_at(now, &FixedPower::percent(pct)),
        None => settings.evaluate_at(now, &SysfsPower::default()),
    };

    let enabled = settings.is_enabled();
    let report = StatusReport {
        enabled,
        allowed: allowance.is_allowed(),
        active: enabled && allowance.is_allowed(),
        time: now.to_string(),
        battery_percent: allowance.battery_percent,
        reasons: allowance.reasons(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Enabled: {}", report.enabled);
        println!("Allowed: {}", report.allowed);
        println!("Active:  {}", report.active);
        println!("Time:    {}", report.time);
        println!("Battery: {}%", report.battery_percent);
        if !report.reasons.is_empty() {
            println!("Reasons: {}", report.reasons.join(", "));
        }
    }
    Ok(())
}
