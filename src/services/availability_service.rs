use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::instructor::{DayOfWeek, Instructor};

/// How far ahead bookable slots are offered.
pub const DEFAULT_HORIZON_DAYS: u64 = 14;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Slot {
    pub date: NaiveDate,
    #[serde(with = "crate::models::time_format::hh_mm")]
    pub time: NaiveTime,
}

impl Slot {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

pub struct AvailabilityService;

impl AvailabilityService {
    /// Whether `slot` falls on one of the instructor's weekly times, is not
    /// a holiday, and starts after `now`.
    pub fn is_bookable(
        instructor: &Instructor,
        holidays: &[NaiveDate],
        now: NaiveDateTime,
        slot: &Slot,
    ) -> bool {
        if holidays.contains(&slot.date) || slot.starts_at() <= now {
            return false;
        }
        let day = DayOfWeek::from(slot.date.weekday());
        instructor.slots_on(day).contains(&slot.time)
    }

    /// Concrete slots from today through `horizon_days` ahead, in order.
    pub fn upcoming_slots(
        instructor: &Instructor,
        holidays: &[NaiveDate],
        now: NaiveDateTime,
        horizon_days: u64,
    ) -> Vec<Slot> {
        let today = now.date();
        let mut slots = Vec::new();

        for offset in 0..=horizon_days {
            let Some(date) = today.checked_add_days(Days::new(offset)) else {
                break;
            };
            if holidays.contains(&date) {
                continue;
            }

            let mut times = instructor.slots_on(DayOfWeek::from(date.weekday())).to_vec();
            times.sort();
            times.dedup();

            slots.extend(
                times
                    .into_iter()
                    .map(|time| Slot { date, time })
                    .filter(|slot| slot.starts_at() > now),
            );
        }

        slots
    }
}
