//! Shared fixtures for unit and HTTP tests.

use async_trait::async_trait;
use axum_test::TestServer;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::config::{Config, StoreConfig};
use crate::db::errors::{DbError, Result};
use crate::db::models::submissions::FamilySubmission;
use crate::form::{FamilyForm, FormController, FormField};
use crate::store::SubmissionStore;

pub fn sample_submission() -> FamilySubmission {
    FamilySubmission {
        family_name: "Rivera".to_string(),
        number_of_adults: 2,
        number_of_children: 3,
        street_address: "12 Elm Street".to_string(),
        city: "Springfield".to_string(),
        zip_code: "02134".to_string(),
        phone_number: "555-0100".to_string(),
        email_address: "rivera@example.com".to_string(),
    }
}

/// The sample submission as raw form input, in field order.
pub fn sample_form_pairs() -> Vec<(String, String)> {
    let form = sample_form();
    FormField::ALL
        .into_iter()
        .map(|field| (field.name().to_string(), form.value(field)))
        .collect()
}

pub fn sample_form() -> FamilyForm {
    let record = sample_submission();
    FamilyForm {
        family_name: record.family_name,
        number_of_adults: record.number_of_adults,
        number_of_children: record.number_of_children,
        street_address: record.street_address,
        city: record.city,
        zip_code: record.zip_code,
        phone_number: record.phone_number,
        email_address: record.email_address,
    }
}

/// Type the sample submission into a controller, one field at a time.
pub fn fill_sample(controller: &FormController) {
    for (name, value) in sample_form_pairs() {
        controller.update_field(&name, &value).expect("sample fields are known");
    }
}

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        store: StoreConfig::Memory,
        ..Default::default()
    }
}

/// A test server over an empty in-memory store.
pub async fn create_test_app() -> TestServer {
    crate::Application::new(create_test_config())
        .await
        .expect("Failed to create application")
        .into_test_server()
}

/// What a [`ScriptedStore`] answers when asked for its row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountScript {
    Value(u64),
    Fail,
    Panic,
}

/// A store with a fixed, scripted count that records every call.
///
/// The count never changes on insert, which makes it easy to pin a scenario like "499 rows
/// already stored". A gated store blocks every count until the returned [`Notify`] fires.
#[derive(Debug)]
pub struct ScriptedStore {
    count: Mutex<CountScript>,
    fail_inserts: bool,
    gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<&'static str>>,
    inserted: Mutex<Vec<FamilySubmission>>,
}

impl ScriptedStore {
    pub fn new(count: CountScript) -> Self {
        Self {
            count: Mutex::new(count),
            fail_inserts: false,
            gate: None,
            calls: Mutex::new(Vec::new()),
            inserted: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_inserts(mut self) -> Self {
        self.fail_inserts = true;
        self
    }

    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn set_count(&self, count: CountScript) {
        *self.count.lock().unwrap() = count;
    }

    /// Store calls so far, in order: `"count"` or `"insert"`
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn insert_calls(&self) -> usize {
        self.calls().iter().filter(|call| **call == "insert").count()
    }

    /// Records accepted by successful inserts
    pub fn inserted(&self) -> Vec<FamilySubmission> {
        self.inserted.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionStore for ScriptedStore {
    fn backend(&self) -> &'static str {
        "scripted"
    }

    async fn count_submissions(&self) -> Result<u64> {
        self.calls.lock().unwrap().push("count");
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let script = *self.count.lock().unwrap();
        match script {
            CountScript::Value(count) => Ok(count),
            CountScript::Fail => Err(DbError::Other(anyhow::anyhow!("scripted count failure"))),
            CountScript::Panic => panic!("scripted count panic"),
        }
    }

    async fn insert_submission(&self, record: &FamilySubmission) -> Result<()> {
        self.calls.lock().unwrap().push("insert");
        if self.fail_inserts {
            return Err(DbError::Rejected {
                status: 400,
                body: "scripted insert failure".to_string(),
            });
        }
        self.inserted.lock().unwrap().push(record.clone());
        Ok(())
    }
}
