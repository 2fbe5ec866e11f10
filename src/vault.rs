//! Typed persistence façade.
//!
//! Every logical entity has one accessor pair here, and every storage key lives here.
//! Reads that fail or cannot be parsed fall back to a default; writes that fail are
//! logged and reported as `false`. Nothing from the backend reaches the caller as an
//! error.

use std::collections::BTreeMap;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::date_key::DateKey;
use crate::fields::Plan;
use crate::settings::{Friends, Settings};
use crate::storage::KeyValueStore;
use crate::task::DayRecord;

const DAILY_TASKS_KEY: &str = "dailyTasks";
const SETTINGS_KEY: &str = "soundSettings";
const NOTES_KEY: &str = "notepadContent";
const FRIENDS_KEY: &str = "friends";
const PLAN_KEY: &str = "currentPlan";

pub type DailyTasks = BTreeMap<DateKey, DayRecord>;

/// Cheaply cloneable handle over a shared storage backend.
#[derive(Clone)]
pub struct Vault {
    backend: Rc<dyn KeyValueStore>,
}

impl Vault {
    pub fn new<S: KeyValueStore + 'static>(backend: S) -> Self {
        Vault { backend: Rc::new(backend) }
    }

    pub fn from_shared(backend: Rc<dyn KeyValueStore>) -> Self {
        Vault { backend }
    }

    pub fn load_daily_tasks(&self) -> DailyTasks {
        self.load_or(DAILY_TASKS_KEY, DailyTasks::new())
    }

    pub fn save_daily_tasks(&self, days: &DailyTasks) -> bool {
        self.save(DAILY_TASKS_KEY, days)
    }

    pub fn load_settings(&self) -> Settings {
        self.load_or(SETTINGS_KEY, Settings::default())
    }

    pub fn save_settings(&self, settings: &Settings) -> bool {
        self.save(SETTINGS_KEY, settings)
    }

    pub fn load_notes(&self) -> String {
        self.load_or(NOTES_KEY, String::new())
    }

    pub fn save_notes(&self, notes: &str) -> bool {
        self.save(NOTES_KEY, notes)
    }

    pub fn load_friends(&self) -> Friends {
        self.load_or(FRIENDS_KEY, Friends::default())
    }

    pub fn save_friends(&self, friends: &Friends) -> bool {
        self.save(FRIENDS_KEY, friends)
    }

    pub fn load_plan(&self) -> Plan {
        self.load_or(PLAN_KEY, Plan::default())
    }

    pub fn save_plan(&self, plan: Plan) -> bool {
        self.save(PLAN_KEY, &plan)
    }

    fn load_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                warn!(key, error = %e, "read failed, using default");
                return default;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "stored value is malformed, using default");
                default
            }
        }
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let data = match serde_json::to_string(value) {
            Ok(data) => data,
            Err(e) => {
                warn!(key, error = %e, "could not serialize value");
                return false;
            }
        };
        match self.backend.set(key, &data) {
            Ok(()) => {
                debug!(key, bytes = data.len(), "saved");
                true
            }
            Err(e) => {
                warn!(key, error = %e, "write failed, keeping in-memory value");
                false
            }
        }
    }
}
