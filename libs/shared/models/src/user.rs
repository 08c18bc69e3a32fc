use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::doctor::Address;

pub const DEFAULT_PHONE: &str = "000000000";
pub const NOT_SELECTED: &str = "Not Selected";

/// Stored patient account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_phone")]
    pub phone: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default = "not_selected")]
    pub gender: String,
    #[serde(default = "not_selected")]
    pub dob: String,
    pub created_at: DateTime<Utc>,
}

fn default_phone() -> String {
    DEFAULT_PHONE.to_string()
}

fn not_selected() -> String {
    NOT_SELECTED.to_string()
}

impl User {
    pub fn new(id: String, name: String, email: String, password_hash: String) -> Self {
        Self {
            id,
            name,
            email,
            password_hash,
            image: String::new(),
            phone: default_phone(),
            address: Address::default(),
            gender: not_selected(),
            dob: not_selected(),
            created_at: Utc::now(),
        }
    }

    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            image: self.image.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            gender: self.gender.clone(),
            dob: self.dob.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image: String,
    pub phone: String,
    pub address: Address,
    pub gender: String,
    pub dob: String,
}

#[derive(Debug, Clone)]
pub struct UserPatch {
    pub name: String,
    pub phone: String,
    pub address: Option<Address>,
    pub gender: String,
    pub dob: String,
}

impl UserPatch {
    pub fn apply(self, user: &mut User) {
        user.name = self.name;
        user.phone = self.phone;
        if let Some(address) = self.address {
            user.address = address;
        }
        user.gender = self.gender;
        user.dob = self.dob;
    }
}
