//! Creative-writing booking wizard.
//!
//! The wizard walks `child → package → instructor → schedule`. Which step
//! follows which is decided by [`TRANSITIONS`], a table of
//! `(from, direction, guard) → to` rules evaluated top to bottom; the first
//! rule whose guard holds wins. Leaving a step forwards first requires that
//! step to be complete.

use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    cart::{BookingPayload, CartEntry},
    catalog::{CatalogItem, CreativeWritingPackage, ItemId},
    child::ChildSelection,
    instructor::Instructor,
    pricing::{PriceRange, PricingConfig, PricingPolicy},
};
use crate::services::availability_service::{AvailabilityService, Slot};
use crate::services::pricing_service::PricingService;
use crate::store::catalog::Catalog;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStep {
    Child,
    Package,
    Instructor,
    Schedule,
}

impl fmt::Display for BookingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BookingStep::Child => "child",
            BookingStep::Package => "package",
            BookingStep::Instructor => "instructor",
            BookingStep::Schedule => "schedule",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Back,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Next => write!(f, "next"),
            Direction::Back => write!(f, "back"),
        }
    }
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("The {step} step is incomplete")]
    Validation {
        step: BookingStep,
        fields: Vec<String>,
    },

    #[error("Unknown package: {0}")]
    UnknownPackage(ItemId),

    #[error("Unknown instructor: {0}")]
    UnknownInstructor(ItemId),

    #[error("Unknown child profile: {0}")]
    UnknownProfile(ItemId),

    #[error("Instructor {0} has no weekly availability")]
    NoAvailability(ItemId),

    #[error("Slot {date} {time} is not available")]
    SlotUnavailable { date: NaiveDate, time: NaiveTime },

    #[error("This action is not available on the {0} step")]
    WrongStep(BookingStep),

    #[error("Cannot move {direction} from the {step} step")]
    NoTransition {
        step: BookingStep,
        direction: Direction,
    },
}

impl BookingError {
    fn missing(step: BookingStep, fields: &[&str]) -> Self {
        BookingError::Validation {
            step,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// What the user has picked so far. Nothing here is persisted until confirm.
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingSelection {
    pub child: Option<ChildSelection>,
    pub package_id: Option<ItemId>,
    pub instructor_id: Option<ItemId>,
    pub slot: Option<Slot>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum BookingAction {
    SelectChild {
        child: ChildSelection,
    },
    #[serde(rename_all = "camelCase")]
    SelectPackage {
        package_id: ItemId,
    },
    #[serde(rename_all = "camelCase")]
    SelectInstructor {
        instructor_id: ItemId,
    },
    SelectSlot {
        date: NaiveDate,
        #[serde(with = "crate::models::time_format::hh_mm")]
        time: NaiveTime,
    },
    Next,
    Back,
}

type Guard = fn(&BookingSelection, &Catalog) -> bool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Effect {
    None,
    SelectFirstInstructor,
}

struct Transition {
    from: BookingStep,
    direction: Direction,
    when: Guard,
    to: BookingStep,
    effect: Effect,
}

fn always(_: &BookingSelection, _: &Catalog) -> bool {
    true
}

fn free_package(selection: &BookingSelection, catalog: &Catalog) -> bool {
    selection
        .package_id
        .and_then(|id| catalog.package(id))
        .map(|package| package.is_free())
        .unwrap_or(false)
}

fn free_package_with_instructors(selection: &BookingSelection, catalog: &Catalog) -> bool {
    free_package(selection, catalog) && !catalog.instructors.is_empty()
}

const TRANSITIONS: &[Transition] = &[
    Transition {
        from: BookingStep::Child,
        direction: Direction::Next,
        when: always,
        to: BookingStep::Package,
        effect: Effect::None,
    },
    // Free introductory sessions go to whoever is listed first
    Transition {
        from: BookingStep::Package,
        direction: Direction::Next,
        when: free_package_with_instructors,
        to: BookingStep::Schedule,
        effect: Effect::SelectFirstInstructor,
    },
    Transition {
        from: BookingStep::Package,
        direction: Direction::Next,
        when: always,
        to: BookingStep::Instructor,
        effect: Effect::None,
    },
    Transition {
        from: BookingStep::Instructor,
        direction: Direction::Next,
        when: always,
        to: BookingStep::Schedule,
        effect: Effect::None,
    },
    Transition {
        from: BookingStep::Package,
        direction: Direction::Back,
        when: always,
        to: BookingStep::Child,
        effect: Effect::None,
    },
    Transition {
        from: BookingStep::Instructor,
        direction: Direction::Back,
        when: always,
        to: BookingStep::Package,
        effect: Effect::None,
    },
    Transition {
        from: BookingStep::Schedule,
        direction: Direction::Back,
        when: free_package,
        to: BookingStep::Package,
        effect: Effect::None,
    },
    Transition {
        from: BookingStep::Schedule,
        direction: Direction::Back,
        when: always,
        to: BookingStep::Instructor,
        effect: Effect::None,
    },
];

/// Serializable view of a wizard for clients.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingState {
    pub step: BookingStep,
    pub selection: BookingSelection,
    pub price_range: Option<PriceRange>,
    pub final_price: Option<f64>,
}

pub struct BookingFlow {
    catalog: Arc<Catalog>,
    policy: PricingPolicy,
    pricing: PricingConfig,
    step: BookingStep,
    selection: BookingSelection,
}

impl BookingFlow {
    pub fn new(catalog: Arc<Catalog>, policy: PricingPolicy, pricing: PricingConfig) -> Self {
        Self {
            catalog,
            policy,
            pricing,
            step: BookingStep::Child,
            selection: BookingSelection::default(),
        }
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> &BookingSelection {
        &self.selection
    }

    pub fn selected_package(&self) -> Option<&CreativeWritingPackage> {
        self.selection
            .package_id
            .and_then(|id| self.catalog.package(id))
    }

    pub fn selected_instructor(&self) -> Option<&Instructor> {
        self.selection
            .instructor_id
            .and_then(|id| self.catalog.instructor(id))
    }

    /// Range for the chosen package across all instructors.
    pub fn price_range(&self) -> Option<PriceRange> {
        self.selected_package().map(|package| {
            PricingService::price_range_with(
                package,
                &self.catalog.instructors,
                self.policy,
                &self.pricing,
            )
        })
    }

    /// Defined once both a package and an instructor are chosen (or the
    /// package is free).
    pub fn final_price(&self) -> Option<f64> {
        PricingService::final_price(
            self.selected_package(),
            self.selected_instructor(),
            self.policy,
            &self.pricing,
        )
    }

    pub fn state(&self) -> BookingState {
        BookingState {
            step: self.step,
            selection: self.selection.clone(),
            price_range: self.price_range(),
            final_price: self.final_price(),
        }
    }

    pub fn apply(&mut self, action: BookingAction, now: NaiveDateTime) -> Result<BookingStep, BookingError> {
        match action {
            BookingAction::SelectChild { child } => self.select_child(child)?,
            BookingAction::SelectPackage { package_id } => self.select_package(package_id)?,
            BookingAction::SelectInstructor { instructor_id } => {
                self.select_instructor(instructor_id)?
            }
            BookingAction::SelectSlot { date, time } => {
                self.select_slot(Slot { date, time }, now)?
            }
            BookingAction::Next => return self.next(),
            BookingAction::Back => return self.back(),
        }
        Ok(self.step)
    }

    pub fn select_child(&mut self, child: ChildSelection) -> Result<(), BookingError> {
        self.expect_step(BookingStep::Child)?;
        if let ChildSelection::Profile { profile_id } = child {
            if self.catalog.child_profile(profile_id).is_none() {
                return Err(BookingError::UnknownProfile(profile_id));
            }
        }
        self.selection.child = Some(child);
        Ok(())
    }

    pub fn select_package(&mut self, package_id: ItemId) -> Result<(), BookingError> {
        self.expect_step(BookingStep::Package)?;
        if self.catalog.package(package_id).is_none() {
            return Err(BookingError::UnknownPackage(package_id));
        }
        self.selection.package_id = Some(package_id);
        Ok(())
    }

    pub fn select_instructor(&mut self, instructor_id: ItemId) -> Result<(), BookingError> {
        self.expect_step(BookingStep::Instructor)?;
        if self.catalog.instructor(instructor_id).is_none() {
            return Err(BookingError::UnknownInstructor(instructor_id));
        }
        if self.selection.instructor_id != Some(instructor_id) {
            self.selection.slot = None;
        }
        self.selection.instructor_id = Some(instructor_id);
        Ok(())
    }

    pub fn select_slot(&mut self, slot: Slot, now: NaiveDateTime) -> Result<(), BookingError> {
        self.expect_step(BookingStep::Schedule)?;
        self.check_slot(&slot, now)?;
        self.selection.slot = Some(slot);
        Ok(())
    }

    /// Slots the chosen instructor can still be booked for.
    pub fn available_slots(&self, now: NaiveDateTime, horizon_days: u64) -> Vec<Slot> {
        match self.selected_instructor() {
            Some(instructor) => AvailabilityService::upcoming_slots(
                instructor,
                &self.catalog.holidays,
                now,
                horizon_days,
            ),
            None => Vec::new(),
        }
    }

    pub fn next(&mut self) -> Result<BookingStep, BookingError> {
        self.validate_step(self.step)?;
        self.transition(Direction::Next)
    }

    pub fn back(&mut self) -> Result<BookingStep, BookingError> {
        self.transition(Direction::Back)
    }

    /// Turn a complete selection into a booking cart entry.
    pub fn confirm(&self, now: NaiveDateTime) -> Result<CartEntry, BookingError> {
        self.expect_step(BookingStep::Schedule)?;
        for step in [
            BookingStep::Child,
            BookingStep::Package,
            BookingStep::Instructor,
        ] {
            self.validate_step(step)?;
        }

        let slot = self
            .selection
            .slot
            .ok_or_else(|| BookingError::missing(BookingStep::Schedule, &["date", "time"]))?;
        self.check_slot(&slot, now)?;

        let (child, package, instructor, total) = match (
            self.selection.child.clone(),
            self.selected_package(),
            self.selected_instructor(),
            self.final_price(),
        ) {
            (Some(child), Some(package), Some(instructor), Some(total)) => {
                (child, package, instructor, total)
            }
            _ => return Err(BookingError::missing(self.step, &["selection"])),
        };

        Ok(CartEntry::Booking(BookingPayload {
            package_id: package.id,
            package_name: package.name.clone(),
            instructor_id: instructor.id,
            instructor_name: instructor.name.clone(),
            child,
            date: slot.date,
            time: slot.time,
            total,
        }))
    }

    fn transition(&mut self, direction: Direction) -> Result<BookingStep, BookingError> {
        let rule = TRANSITIONS
            .iter()
            .find(|t| {
                t.from == self.step
                    && t.direction == direction
                    && (t.when)(&self.selection, &self.catalog)
            })
            .ok_or(BookingError::NoTransition {
                step: self.step,
                direction,
            })?;

        if rule.effect == Effect::SelectFirstInstructor {
            if let Some(first) = self.catalog.instructors.first() {
                if self.selection.instructor_id != Some(first.id) {
                    self.selection.slot = None;
                }
                self.selection.instructor_id = Some(first.id);
            }
        }

        log::debug!("Booking wizard {:?}: {} -> {}", direction, self.step, rule.to);
        self.step = rule.to;
        Ok(self.step)
    }

    fn expect_step(&self, step: BookingStep) -> Result<(), BookingError> {
        if self.step == step {
            Ok(())
        } else {
            Err(BookingError::WrongStep(self.step))
        }
    }

    fn validate_step(&self, step: BookingStep) -> Result<(), BookingError> {
        match step {
            BookingStep::Child => match &self.selection.child {
                None => Err(BookingError::missing(step, &["child"])),
                Some(child) => {
                    let missing = child.missing_fields();
                    if missing.is_empty() {
                        Ok(())
                    } else {
                        Err(BookingError::missing(step, &missing))
                    }
                }
            },
            BookingStep::Package => match self.selection.package_id {
                None => Err(BookingError::missing(step, &["package"])),
                Some(id) if self.catalog.package(id).is_none() => {
                    Err(BookingError::UnknownPackage(id))
                }
                Some(_) => Ok(()),
            },
            BookingStep::Instructor => {
                let id = self
                    .selection
                    .instructor_id
                    .ok_or_else(|| BookingError::missing(step, &["instructor"]))?;
                let instructor = self
                    .catalog
                    .instructor(id)
                    .ok_or(BookingError::UnknownInstructor(id))?;
                if instructor.has_availability() {
                    Ok(())
                } else {
                    Err(BookingError::NoAvailability(id))
                }
            }
            BookingStep::Schedule => match self.selection.slot {
                None => Err(BookingError::missing(step, &["date", "time"])),
                Some(_) => Ok(()),
            },
        }
    }

    fn check_slot(&self, slot: &Slot, now: NaiveDateTime) -> Result<(), BookingError> {
        let instructor = self
            .selected_instructor()
            .ok_or_else(|| BookingError::missing(BookingStep::Instructor, &["instructor"]))?;

        if AvailabilityService::is_bookable(instructor, &self.catalog.holidays, now, slot) {
            Ok(())
        } else {
            Err(BookingError::SlotUnavailable {
                date: slot.date,
                time: slot.time,
            })
        }
    }
}
