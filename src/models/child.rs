use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::catalog::ItemId;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChildProfile {
    pub id: ItemId,
    pub name: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
}

/// Who the booking is for, as entered on the first wizard step.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum ChildSelection {
    /// One of the account's saved child profiles.
    #[serde(rename_all = "camelCase")]
    Profile { profile_id: ItemId },
    /// A child typed into the form. Fields stay optional so a half-filled
    /// form can be held by the wizard and rejected on `next`.
    #[serde(rename_all = "camelCase")]
    New {
        #[serde(default)]
        name: String,
        #[serde(default)]
        birth_date: Option<NaiveDate>,
        #[serde(default)]
        gender: Option<Gender>,
    },
    /// The account holder books for themselves.
    #[serde(rename = "self")]
    Myself,
}

impl ChildSelection {
    /// Names of the form fields still missing.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        match self {
            ChildSelection::New {
                name,
                birth_date,
                gender,
            } => {
                let mut missing = Vec::new();
                if name.trim().is_empty() {
                    missing.push("name");
                }
                if birth_date.is_none() {
                    missing.push("birthDate");
                }
                if gender.is_none() {
                    missing.push("gender");
                }
                missing
            }
            ChildSelection::Profile { .. } | ChildSelection::Myself => Vec::new(),
        }
    }

    pub fn display_name(&self, profiles: &[ChildProfile]) -> Option<String> {
        match self {
            ChildSelection::Profile { profile_id } => profiles
                .iter()
                .find(|p| p.id == *profile_id)
                .map(|p| p.name.clone()),
            ChildSelection::New { name, .. } => Some(name.trim().to_string()),
            ChildSelection::Myself => None,
        }
    }
}
