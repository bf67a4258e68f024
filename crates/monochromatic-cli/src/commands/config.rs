use clap::Subcommand;
use monochromatic_core::PreferenceKey;

use super::open_settings;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a preference value
    Get {
        /// Preference key (e.g. "always_on", "enable_time")
        key: String,
    },
    /// Set a preference value
    Set {
        /// Preference key
        key: String,
        /// New value; times accept HH:MM
        value: String,
    },
    /// List all preferences
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Reset preferences to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let settings = open_settings()?;
    match action {
        ConfigAction::Get { key } => {
            let key: PreferenceKey = key.parse()?;
            println!("{}", settings.value(key));
        }
        ConfigAction::Set { key, value } => {
            let key: PreferenceKey = key.parse()?;
            let value = key.parse_value(&value)?;
            settings.set_value(key, value)?;
            println!("ok");
        }
        ConfigAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&settings.snapshot())?);
            } else {
                for key in PreferenceKey::ALL {
                    println!("{key} = {}", settings.value(key));
                }
            }
        }
        ConfigAction::Reset => {
            settings.reset()?;
            println!("preferences reset to defaults");
        }
    }
    Ok(())
}
