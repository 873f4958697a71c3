use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::admissions::domain::{
    AdmissionLevel, Application, ApplicationId, ApplicationIntake, ApplicationStatus,
    MaritalStatus,
};
use crate::workflows::admissions::notifications::{DispatchError, NotificationDispatcher};
use crate::workflows::admissions::repository::{
    ApplicationRepository, ApplicationUpdate, RepositoryError,
};
use crate::workflows::admissions::rules::ReviewPayload;
use crate::workflows::admissions::service::ReviewService;
use crate::workflows::admissions::admissions_router;

pub(super) fn intake() -> ApplicationIntake {
    ApplicationIntake {
        full_name: "Ama Mensah".to_string(),
        email: "ama.mensah@example.com".to_string(),
        phone: "+233557083554".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1988, 4, 12).expect("valid date"),
        marital_status: MaritalStatus::Married,
        photo_reference: Some("s3://admissions/photos/ama.jpg".to_string()),
        admission_level: AdmissionLevel::Licensing,
        church_name: "Grace Chapel".to_string(),
        fellowship: "Accra Central".to_string(),
        association: "Greater Accra".to_string(),
    }
}

pub(super) fn application(status: ApplicationStatus) -> Application {
    Application {
        id: ApplicationId("adm-test-1".to_string()),
        full_name: "Ama Mensah".to_string(),
        email: "ama.mensah@example.com".to_string(),
        phone: "+233557083554".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1988, 4, 12).expect("valid date"),
        marital_status: MaritalStatus::Married,
        photo_reference: None,
        admission_level: AdmissionLevel::Licensing,
        church_name: "Grace Chapel".to_string(),
        fellowship: "Accra Central".to_string(),
        association: "Greater Accra".to_string(),
        sector: None,
        status,
        submitted_at: None,
        local_review: None,
        association_review: None,
        vp_review: None,
        rejection_reason: None,
    }
}

pub(super) fn notes_payload(notes: &str) -> ReviewPayload {
    ReviewPayload {
        notes: Some(notes.to_string()),
        ..ReviewPayload::default()
    }
}

pub(super) fn reason_payload(reason: &str) -> ReviewPayload {
    ReviewPayload {
        rejection_reason: Some(reason.to_string()),
        ..ReviewPayload::default()
    }
}

pub(super) fn sector_payload(sector: &str) -> ReviewPayload {
    ReviewPayload {
        sector: Some(sector.to_string()),
        ..ReviewPayload::default()
    }
}

pub(super) fn build_service() -> (
    ReviewService<MemoryRepository, MemoryDispatcher>,
    Arc<MemoryRepository>,
    Arc<MemoryDispatcher>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let dispatcher = Arc::new(MemoryDispatcher::default());
    let service = ReviewService::new(repository.clone(), dispatcher.clone());
    (service, repository, dispatcher)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ApplicationId, Application>>>,
}

impl MemoryRepository {
    pub(super) fn seed(&self, application: Application) {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .insert(application.id.clone(), application);
    }
}

impl ApplicationRepository for MemoryRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn load(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn conditional_update(
        &self,
        id: &ApplicationId,
        expected_status: ApplicationStatus,
        update: &ApplicationUpdate,
    ) -> Result<Application, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        if record.status != expected_status {
            return Err(RepositoryError::ConcurrentModification);
        }
        update.apply_to(record);
        Ok(record.clone())
    }
}

/// Serves a snapshot frozen at construction time from `load`, while writes
/// go through to the live repository. Lets tests drive the lost-update race
/// deterministically within one thread.
pub(super) struct StaleLoadRepository {
    pub(super) inner: MemoryRepository,
    stale: Application,
}

impl StaleLoadRepository {
    pub(super) fn new(inner: MemoryRepository, stale: Application) -> Self {
        Self { inner, stale }
    }
}

impl ApplicationRepository for StaleLoadRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        self.inner.insert(application)
    }

    fn load(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        if *id == self.stale.id {
            return Ok(Some(self.stale.clone()));
        }
        self.inner.load(id)
    }

    fn conditional_update(
        &self,
        id: &ApplicationId,
        expected_status: ApplicationStatus,
        update: &ApplicationUpdate,
    ) -> Result<Application, RepositoryError> {
        self.inner.conditional_update(id, expected_status, update)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct SentNotification {
    pub(super) phone: String,
    pub(super) recipient_name: String,
    pub(super) status: ApplicationStatus,
}

#[derive(Default)]
pub(super) struct MemoryDispatcher {
    events: Mutex<Vec<SentNotification>>,
    allowlist_events: Mutex<Vec<String>>,
    fail: Mutex<bool>,
}

impl MemoryDispatcher {
    pub(super) fn events(&self) -> Vec<SentNotification> {
        self.events.lock().expect("dispatch mutex poisoned").clone()
    }

    pub(super) fn allowlist_events(&self) -> Vec<String> {
        self.allowlist_events
            .lock()
            .expect("dispatch mutex poisoned")
            .clone()
    }

    pub(super) fn fail_next_sends(&self) {
        *self.fail.lock().expect("dispatch mutex poisoned") = true;
    }

    fn failing(&self) -> bool {
        *self.fail.lock().expect("dispatch mutex poisoned")
    }
}

impl NotificationDispatcher for MemoryDispatcher {
    fn send_status_notification(
        &self,
        phone: &str,
        recipient_name: &str,
        status: ApplicationStatus,
    ) -> Result<(), DispatchError> {
        if self.failing() {
            return Err(DispatchError::Transport("gateway offline".to_string()));
        }
        self.events
            .lock()
            .expect("dispatch mutex poisoned")
            .push(SentNotification {
                phone: phone.to_string(),
                recipient_name: recipient_name.to_string(),
                status,
            });
        Ok(())
    }

    fn send_allowlist_approval(&self, phone: &str) -> Result<(), DispatchError> {
        if self.failing() {
            return Err(DispatchError::Transport("gateway offline".to_string()));
        }
        self.allowlist_events
            .lock()
            .expect("dispatch mutex poisoned")
            .push(phone.to_string());
        Ok(())
    }
}

pub(super) fn admissions_router_with_service(
    service: ReviewService<MemoryRepository, MemoryDispatcher>,
) -> axum::Router {
    admissions_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
