use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::catalog::{ItemId, ItemKind};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Sun => DayOfWeek::Sunday,
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
        }
    }
}

/// Start times offered on one weekday.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct DaySlots(
    #[serde(with = "crate::models::time_format::hh_mm_list")] pub Vec<NaiveTime>,
);

pub type WeeklySchedule = BTreeMap<DayOfWeek, DaySlots>;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Instructor {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub specialty: Option<String>,
    /// Net price per package id. A `null` entry is the same as no entry.
    #[serde(default, alias = "package_rates")]
    pub package_rates: HashMap<ItemId, Option<f64>>,
    #[serde(default, alias = "service_rates")]
    pub service_rates: HashMap<ItemId, Option<f64>>,
    #[serde(default)]
    pub weekly_schedule: WeeklySchedule,
}

impl Instructor {
    pub fn rates(&self, kind: ItemKind) -> &HashMap<ItemId, Option<f64>> {
        match kind {
            ItemKind::Package => &self.package_rates,
            ItemKind::Service => &self.service_rates,
        }
    }

    /// The instructor's net override for an item, if one is defined.
    pub fn rate_for(&self, kind: ItemKind, item_id: ItemId) -> Option<f64> {
        self.rates(kind).get(&item_id).copied().flatten()
    }

    pub fn has_availability(&self) -> bool {
        self.weekly_schedule.values().any(|slots| !slots.0.is_empty())
    }

    pub fn slots_on(&self, day: DayOfWeek) -> &[NaiveTime] {
        self.weekly_schedule
            .get(&day)
            .map(|slots| slots.0.as_slice())
            .unwrap_or(&[])
    }
}
