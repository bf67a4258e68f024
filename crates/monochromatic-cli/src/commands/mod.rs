pub mod config;
pub mod status;

use monochromatic_core::{Settings, StaticCapability, TomlStore};

/// Settings over the user's preference file. Desktop hosts need no extra
/// permission, so the capability check always passes.
pub fn open_settings() -> Result<Settings<TomlStore, StaticCapability>, Box<dyn std::error::Error>> {
    let store = TomlStore::open_default()?;
    log::debug!("using preferences at {}", store.path().display());
    Ok(Settings::new(store, StaticCapability(true)))
}
