use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_models::{
    Appointment, AppointmentFilter, Doctor, DoctorPatch, User, UserPatch,
};

use crate::store::{ClinicStore, StoreError, StoreResult};
use crate::supabase::{ApiError, SupabaseClient};

/// [`ClinicStore`] over Supabase's PostgREST API.
///
/// Single-document reads and writes go through the table endpoints. The
/// workflow operations call the SQL functions in `migrations/001_init.sql`,
/// each of which runs in one transaction; a partial unique index on
/// `(doctor_id, slot_date, slot_time) where not cancelled` backs `book_slot`.
pub struct SupabaseStore {
    supabase: SupabaseClient,
}

impl SupabaseStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    async fn select<T: DeserializeOwned>(&self, path: &str) -> StoreResult<Vec<T>> {
        let rows: Vec<Value> = self.supabase.request(Method::GET, path, None).await?;
        decode_rows(rows)
    }

    async fn select_one<T: DeserializeOwned>(&self, path: &str) -> StoreResult<Option<T>> {
        Ok(self.select(path).await?.into_iter().next())
    }

    async fn insert<T: DeserializeOwned>(&self, table: &str, row: Value) -> StoreResult<T> {
        let path = format!("/rest/v1/{}", table);
        let result: Result<Vec<Value>, _> = self
            .supabase
            .request_with_headers(
                Method::POST,
                &path,
                Some(row),
                Some(SupabaseClient::representation_headers()),
            )
            .await;

        let rows = result.map_err(|e| {
            let duplicate = api_error(&e)
                .filter(|api| api.is_unique_violation())
                .map(|api| StoreError::Duplicate(api.message.clone()));
            duplicate.unwrap_or_else(|| StoreError::from(e))
        })?;

        decode_rows(rows)?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Backend(format!("Insert into {} returned no rows", table)))
    }

    async fn patch<T: DeserializeOwned>(&self, path: &str, changes: Value) -> StoreResult<Option<T>> {
        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                path,
                Some(changes),
                Some(SupabaseClient::representation_headers()),
            )
            .await?;
        Ok(decode_rows(rows)?.into_iter().next())
    }

    async fn call<T: DeserializeOwned>(&self, function: &str, args: Value) -> StoreResult<T> {
        self.supabase.rpc(function, args).await.map_err(|e| {
            let raised = api_error(&e).map(|api| map_raised(function, api));
            raised.unwrap_or_else(|| StoreError::from(e))
        })
    }
}

fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> StoreResult<Vec<T>> {
    rows.into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| StoreError::Backend(format!("Failed to decode row: {}", e)))
}

fn api_error(err: &anyhow::Error) -> Option<&ApiError> {
    err.downcast_ref::<ApiError>()
}

/// Maps the exceptions raised by the SQL functions back onto [`StoreError`].
fn map_raised(function: &str, api: &ApiError) -> StoreError {
    match api.message.as_str() {
        "slot_taken" => StoreError::SlotTaken,
        "doctor_not_found" => StoreError::NotFound("Doctor"),
        "appointment_not_found" => StoreError::NotFound("Appointment"),
        "appointment_cancelled" => StoreError::Closed("cancelled"),
        "appointment_completed" => StoreError::Closed("completed"),
        _ if function == "book_slot" && api.is_unique_violation() => StoreError::SlotTaken,
        _ => {
            warn!("{} failed: {}", function, api);
            StoreError::Backend(api.to_string())
        }
    }
}

fn eq(value: &str) -> String {
    format!("eq.{}", urlencoding::encode(value))
}

fn to_row<T: serde::Serialize>(value: &T) -> StoreResult<Value> {
    serde_json::to_value(value).map_err(|e| StoreError::Backend(e.to_string()))
}

#[async_trait]
impl ClinicStore for SupabaseStore {
    async fn insert_doctor(&self, doctor: Doctor) -> StoreResult<Doctor> {
        debug!("Inserting doctor {}", doctor.id);
        self.insert("doctors", to_row(&doctor)?).await
    }

    async fn find_doctor(&self, doctor_id: &str) -> StoreResult<Option<Doctor>> {
        self.select_one(&format!("/rest/v1/doctors?id={}", eq(doctor_id))).await
    }

    async fn find_doctor_by_email(&self, email: &str) -> StoreResult<Option<Doctor>> {
        self.select_one(&format!("/rest/v1/doctors?email={}", eq(email))).await
    }

    async fn list_doctors(&self) -> StoreResult<Vec<Doctor>> {
        self.select("/rest/v1/doctors?order=created_at.asc").await
    }

    async fn update_doctor(&self, doctor_id: &str, patch: DoctorPatch) -> StoreResult<Option<Doctor>> {
        if patch.is_empty() {
            return self.find_doctor(doctor_id).await;
        }

        let mut changes = Map::new();
        if let Some(fee) = patch.fee {
            changes.insert("fee".to_string(), json!(fee));
        }
        if let Some(address) = patch.address {
            changes.insert("address".to_string(), to_row(&address)?);
        }
        if let Some(available) = patch.available {
            changes.insert("available".to_string(), json!(available));
        }
        if let Some(about) = patch.about {
            changes.insert("about".to_string(), json!(about));
        }

        let path = format!("/rest/v1/doctors?id={}", eq(doctor_id));
        self.patch(&path, Value::Object(changes)).await
    }

    async fn toggle_availability(&self, doctor_id: &str) -> StoreResult<Option<Doctor>> {
        match self
            .call("toggle_doctor_availability", json!({ "p_doctor_id": doctor_id }))
            .await
        {
            Ok(doctor) => Ok(Some(doctor)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn delete_doctor(&self, doctor_id: &str) -> StoreResult<Option<u64>> {
        self.call("delete_doctor", json!({ "p_doctor_id": doctor_id })).await
    }

    async fn insert_user(&self, user: User) -> StoreResult<User> {
        debug!("Inserting user {}", user.id);
        self.insert("users", to_row(&user)?).await
    }

    async fn find_user(&self, user_id: &str) -> StoreResult<Option<User>> {
        self.select_one(&format!("/rest/v1/users?id={}", eq(user_id))).await
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.select_one(&format!("/rest/v1/users?email={}", eq(email))).await
    }

    async fn update_user(&self, user_id: &str, patch: UserPatch) -> StoreResult<Option<User>> {
        let mut changes = json!({
            "name": patch.name,
            "phone": patch.phone,
            "gender": patch.gender,
            "dob": patch.dob,
        });
        if let Some(address) = patch.address {
            changes["address"] = to_row(&address)?;
        }

        let path = format!("/rest/v1/users?id={}", eq(user_id));
        self.patch(&path, changes).await
    }

    async fn delete_user(&self, user_id: &str) -> StoreResult<Option<u64>> {
        self.call("delete_user", json!({ "p_user_id": user_id })).await
    }

    async fn find_appointment(&self, appointment_id: &str) -> StoreResult<Option<Appointment>> {
        self.select_one(&format!("/rest/v1/appointments?id={}", eq(appointment_id))).await
    }

    async fn list_appointments(&self, filter: &AppointmentFilter) -> StoreResult<Vec<Appointment>> {
        let mut query = Vec::new();
        if let Some(doctor_id) = &filter.doctor_id {
            query.push(format!("doctor_id={}", eq(doctor_id)));
        }
        if let Some(user_id) = &filter.user_id {
            query.push(format!("user_id={}", eq(user_id)));
        }
        query.push("order=created_at.asc".to_string());

        self.select(&format!("/rest/v1/appointments?{}", query.join("&"))).await
    }

    async fn book_slot(&self, appointment: Appointment) -> StoreResult<Appointment> {
        debug!(
            "Booking slot {} {} with doctor {}",
            appointment.slot_date, appointment.slot_time, appointment.doctor_id
        );
        self.call("book_slot", json!({ "p_appointment": to_row(&appointment)? })).await
    }

    async fn cancel_appointment(&self, appointment_id: &str) -> StoreResult<Appointment> {
        self.call("cancel_appointment", json!({ "p_appointment_id": appointment_id })).await
    }

    async fn complete_appointment(&self, appointment_id: &str) -> StoreResult<Appointment> {
        self.call("complete_appointment", json!({ "p_appointment_id": appointment_id })).await
    }

    async fn set_payment_order(&self, appointment_id: &str, order_id: &str) -> StoreResult<Appointment> {
        let path = format!("/rest/v1/appointments?id={}", eq(appointment_id));
        self.patch(&path, json!({ "payment_order_id": order_id }))
            .await?
            .ok_or(StoreError::NotFound("Appointment"))
    }

    async fn mark_paid(&self, appointment_id: &str) -> StoreResult<Appointment> {
        let path = format!(
            "/rest/v1/appointments?id={}&cancelled=eq.false",
            eq(appointment_id)
        );
        match self.patch(&path, json!({ "payment": true })).await? {
            Some(appointment) => Ok(appointment),
            None => match self.find_appointment(appointment_id).await? {
                Some(_) => Err(StoreError::Closed("cancelled")),
                None => Err(StoreError::NotFound("Appointment")),
            },
        }
    }
}
