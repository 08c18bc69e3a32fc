use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{ClinicStore, MemoryStore};
use shared_models::{Address, Appointment, Doctor, Role, User};
use shared_payments::{PaymentError, PaymentGateway, PaymentOrder};

use crate::jwt::issue_token;
use crate::password::hash_password;
use crate::state::AppState;

pub const TEST_PASSWORD: &str = "password123";

pub struct TestConfig {
    pub jwt_secret: String,
    pub admin_email: String,
    pub admin_password: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            admin_email: "admin@carebook.test".to_string(),
            admin_password: "admin-password".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            jwt_secret: self.jwt_secret.clone(),
            admin_email: self.admin_email.clone(),
            admin_password: self.admin_password.clone(),
            razorpay_key_id: "rzp_test_key".to_string(),
            razorpay_key_secret: "rzp_test_secret".to_string(),
            ..AppConfig::default()
        }
    }
}

/// In-process payment gateway. Orders start as `created` until [`StubGateway::settle`].
#[derive(Default)]
pub struct StubGateway {
    orders: Mutex<HashMap<String, PaymentOrder>>,
}

impl StubGateway {
    pub fn settle(&self, order_id: &str) {
        let mut orders = self.orders.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(order) = orders.get_mut(order_id) {
            order.status = "paid".to_string();
        }
    }

    /// Registers an order the API never created, e.g. one for another receipt.
    pub fn insert(&self, order: PaymentOrder) {
        let mut orders = self.orders.lock().unwrap_or_else(|e| e.into_inner());
        orders.insert(order.id.clone(), order);
    }
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn create_order(
        &self,
        amount: u64,
        currency: &str,
        receipt: &str,
    ) -> Result<PaymentOrder, PaymentError> {
        let order = PaymentOrder {
            id: format!("order_{}", Uuid::new_v4().simple()),
            amount,
            currency: currency.to_string(),
            receipt: Some(receipt.to_string()),
            status: "created".to_string(),
        };
        self.insert(order.clone());
        Ok(order)
    }

    async fn fetch_order(&self, order_id: &str) -> Result<PaymentOrder, PaymentError> {
        let orders = self.orders.lock().unwrap_or_else(|e| e.into_inner());
        orders.get(order_id).cloned().ok_or_else(|| PaymentError::Api {
            status: 400,
            message: "The id provided does not exist".to_string(),
        })
    }
}

/// Shared state over an in-memory store, with handles to the concrete backends.
pub struct TestContext {
    pub config: TestConfig,
    pub store: Arc<MemoryStore>,
    pub payments: Arc<StubGateway>,
    pub state: Arc<AppState>,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        let config = TestConfig::default();
        let store = Arc::new(MemoryStore::new());
        let payments = Arc::new(StubGateway::default());
        let state = Arc::new(AppState::new(
            config.to_app_config(),
            store.clone(),
            payments.clone(),
        ));
        Self {
            config,
            store,
            payments,
            state,
        }
    }

    pub async fn seed_doctor(&self, name: &str, email: &str) -> Doctor {
        let doctor = TestDoctor::new(name, email).to_doctor();
        self.store
            .insert_doctor(doctor)
            .await
            .expect("seed doctor")
    }

    pub async fn seed_patient(&self, name: &str, email: &str) -> User {
        let user = User::new(
            Uuid::new_v4().to_string(),
            name.to_string(),
            email.to_string(),
            hash_password(TEST_PASSWORD).expect("hash"),
        );
        self.store.insert_user(user).await.expect("seed patient")
    }

    /// Books straight through the store, bypassing the grid check.
    pub async fn seed_appointment(
        &self,
        doctor: &Doctor,
        user: &User,
        slot_date: &str,
        slot_time: &str,
    ) -> Appointment {
        let appointment = Appointment {
            id: Uuid::new_v4().to_string(),
            doctor_id: doctor.id.clone(),
            user_id: user.id.clone(),
            slot_date: slot_date.to_string(),
            slot_time: slot_time.to_string(),
            fee: doctor.fee,
            cancelled: false,
            is_completed: false,
            payment: false,
            payment_order_id: None,
            doctor_name: doctor.name.clone(),
            doctor_speciality: doctor.speciality.clone(),
            doctor_image: doctor.image.clone(),
            patient_name: user.name.clone(),
            patient_email: user.email.clone(),
            created_at: Utc::now(),
        };
        self.store
            .book_slot(appointment)
            .await
            .expect("seed appointment")
    }

    pub fn token_for(&self, principal_id: &str, role: Role) -> String {
        JwtTestUtils::create_test_token(principal_id, role, &self.config.jwt_secret)
    }

    pub fn admin_token(&self) -> String {
        self.token_for(&self.config.admin_email, Role::Admin)
    }
}

pub struct TestDoctor {
    pub name: String,
    pub email: String,
    pub speciality: String,
    pub fee: f64,
}

impl TestDoctor {
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            speciality: "General physician".to_string(),
            fee: 50.0,
        }
    }

    pub fn to_doctor(&self) -> Doctor {
        Doctor {
            id: Uuid::new_v4().to_string(),
            name: self.name.clone(),
            email: self.email.clone(),
            password_hash: hash_password(TEST_PASSWORD).expect("hash"),
            image: String::new(),
            speciality: self.speciality.clone(),
            degree: "MBBS".to_string(),
            experience: "4 Years".to_string(),
            about: String::new(),
            available: true,
            fee: self.fee,
            address: Address::default(),
            booked_slots: Default::default(),
            created_at: Utc::now(),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(principal_id: &str, role: Role, secret: &str) -> String {
        issue_token(principal_id, role, secret, None).expect("test token")
    }

    pub fn create_expired_token(principal_id: &str, role: Role, secret: &str) -> String {
        issue_token(principal_id, role, secret, Some(-1)).expect("test token")
    }
}
