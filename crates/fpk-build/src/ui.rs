use std::collections::BTreeMap;

use fpk_core::Variables;
use serde::Serialize;

use crate::config::to_indented_json;

/// Top-level key of URL-type desktop entries.
pub const UI_URL_KEY: &str = ".url";

/// Icon path template; the desktop substitutes the size for `{0}`.
pub const UI_ICON_TEMPLATE: &str = "images/icon-{0}.png";

/// One desktop entry in `app/ui/config`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiConfigEntry {
    pub title: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub protocol: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub port: String,
    pub url: String,
    #[serde(rename = "allUsers")]
    pub all_users: bool,
}

impl UiConfigEntry {
    pub fn for_service(vars: &Variables) -> Self {
        Self {
            title: vars.service_name.clone(),
            icon: UI_ICON_TEMPLATE.to_owned(),
            entry_type: "url".to_owned(),
            protocol: "http".to_owned(),
            port: vars.first_port.clone(),
            url: "/".to_owned(),
            all_users: true,
        }
    }
}

/// Default `app/ui/config`: a single `<service>.Application` URL entry.
pub fn render_ui_config(vars: &Variables) -> Result<String, serde_json::Error> {
    let entry_key = format!("{}.Application", vars.service_name);
    let entries = BTreeMap::from([(entry_key, UiConfigEntry::for_service(vars))]);
    let config = BTreeMap::from([(UI_URL_KEY, entries)]);
    to_indented_json(&config)
}
