use chrono::{DateTime, Utc};
use fruit_porter_core::SettingId;
use serde::Serialize;

/// A site-wide key/value setting, e.g. the active theme.
#[derive(Debug, Clone, Serialize)]
pub struct Setting {
    pub id: SettingId,
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}
