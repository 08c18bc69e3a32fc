use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Booked time labels per date key (`day_month_year` -> {"hh:mm AM"}).
pub type BookedSlots = BTreeMap<String, BTreeSet<String>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub line1: String,
    #[serde(default)]
    pub line2: String,
}

/// Stored doctor document. Never serialized to API callers directly;
/// see [`DoctorProfile`] and [`DoctorListing`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub image: String,
    pub speciality: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub about: String,
    pub available: bool,
    pub fee: f64,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub booked_slots: BookedSlots,
    pub created_at: DateTime<Utc>,
}

impl Doctor {
    pub fn is_slot_booked(&self, slot_date: &str, slot_time: &str) -> bool {
        self.booked_slots
            .get(slot_date)
            .is_some_and(|times| times.contains(slot_time))
    }

    /// Adds the slot; returns false if it was already taken.
    pub fn book_slot(&mut self, slot_date: &str, slot_time: &str) -> bool {
        self.booked_slots
            .entry(slot_date.to_string())
            .or_default()
            .insert(slot_time.to_string())
    }

    /// Removes the slot, dropping the date entry once it is empty.
    pub fn release_slot(&mut self, slot_date: &str, slot_time: &str) -> bool {
        let Some(times) = self.booked_slots.get_mut(slot_date) else {
            return false;
        };
        let removed = times.remove(slot_time);
        if times.is_empty() {
            self.booked_slots.remove(slot_date);
        }
        removed
    }

    pub fn to_profile(&self) -> DoctorProfile {
        DoctorProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            image: self.image.clone(),
            speciality: self.speciality.clone(),
            degree: self.degree.clone(),
            experience: self.experience.clone(),
            about: self.about.clone(),
            available: self.available,
            fee: self.fee,
            address: self.address.clone(),
            booked_slots: self.booked_slots.clone(),
            created_at: self.created_at,
        }
    }

    pub fn to_listing(&self) -> DoctorListing {
        DoctorListing {
            id: self.id.clone(),
            name: self.name.clone(),
            image: self.image.clone(),
            speciality: self.speciality.clone(),
            degree: self.degree.clone(),
            experience: self.experience.clone(),
            about: self.about.clone(),
            available: self.available,
            fee: self.fee,
            address: self.address.clone(),
            booked_slots: self.booked_slots.clone(),
        }
    }
}

/// Doctor as seen by the doctor themself or an admin: no password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub available: bool,
    pub fee: f64,
    pub address: Address,
    pub booked_slots: BookedSlots,
    pub created_at: DateTime<Utc>,
}

/// Public directory entry: no password, no email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorListing {
    pub id: String,
    pub name: String,
    pub image: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub available: bool,
    pub fee: f64,
    pub address: Address,
    pub booked_slots: BookedSlots,
}

/// Partial update applied by the store; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct DoctorPatch {
    pub fee: Option<f64>,
    pub address: Option<Address>,
    pub available: Option<bool>,
    pub about: Option<String>,
}

impl DoctorPatch {
    pub fn is_empty(&self) -> bool {
        self.fee.is_none() && self.address.is_none() && self.available.is_none() && self.about.is_none()
    }

    pub fn apply(self, doctor: &mut Doctor) {
        if let Some(fee) = self.fee {
            doctor.fee = fee;
        }
        if let Some(address) = self.address {
            doctor.address = address;
        }
        if let Some(available) = self.available {
            doctor.available = available;
        }
        if let Some(about) = self.about {
            doctor.about = about;
        }
    }
}
