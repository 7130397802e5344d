use chrono::Utc;

use crate::models::Setting;
use crate::store::query::{Predicate, Query};
use crate::store::Database;

pub struct SettingRepository<'a> {
    db: &'a mut Database,
}

impl<'a> SettingRepository<'a> {
    pub fn new(db: &'a mut Database) -> Self {
        Self { db }
    }

    pub fn all(&self) -> Vec<Setting> {
        Query::new().run(&self.db.settings)
    }

    pub fn get(&self, key: &str) -> Option<Setting> {
        Query::new()
            .filter(Predicate::KeyEq(key.to_owned()))
            .run_one(&self.db.settings)
    }

    /// Updates a setting, or creates it if the key is new.
    pub fn set(&mut self, key: &str, value: String) -> Setting {
        if let Some(existing) = self.db.settings.iter_mut().find(|s| s.key == key) {
            existing.value = value;
            existing.updated_at = Utc::now();
            return existing.clone();
        }
        let id = self.db.issue_setting_id();
        let setting = Setting {
            id,
            key: key.to_owned(),
            value,
            updated_at: Utc::now(),
        };
        self.db.settings.push(setting.clone());
        setting
    }
}
