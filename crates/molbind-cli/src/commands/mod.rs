pub mod attributes;
pub mod colour;
pub mod deliver;
pub mod superpose;
pub mod viewer;

use crate::error::Result;
use crate::settings::Settings;

/// The user's settings file with `-S` overrides applied on top.
pub(crate) fn load_settings(set_values: &[String]) -> Result<Settings> {
    let mut settings = Settings::load_from(&Settings::default_path()?)?;
    settings.apply_set_values(set_values)?;
    Ok(settings)
}
