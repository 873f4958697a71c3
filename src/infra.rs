use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;
use ministry_admissions::config::MessagingConfig;
use ministry_admissions::workflows::admissions::{
    status_message, Application, ApplicationId, ApplicationRepository, ApplicationStatus,
    ApplicationUpdate, DispatchError, NotificationDispatcher, RepositoryError,
};
use ministry_admissions::workflows::allowlist::{
    AllowlistRecordId, AllowlistRepository, AllowlistRepositoryError, ApprovedApplicant,
    PhoneChangeAudit,
};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    records: Arc<Mutex<HashMap<ApplicationId, Application>>>,
}

impl ApplicationRepository for InMemoryApplicationRepository {
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

#[derive(Default, Clone)]
pub(crate) struct InMemoryAllowlistRepository {
    records: Arc<Mutex<HashMap<AllowlistRecordId, ApprovedApplicant>>>,
    audits: Arc<Mutex<Vec<PhoneChangeAudit>>>,
}

impl AllowlistRepository for InMemoryAllowlistRepository {
    fn insert(
        &self,
        record: ApprovedApplicant,
    ) -> Result<ApprovedApplicant, AllowlistRepositoryError> {
        let mut guard = self.records.lock().expect("allowlist mutex poisoned");
        if guard
            .values()
            .any(|existing| existing.phone_number == record.phone_number)
        {
            return Err(AllowlistRepositoryError::DuplicatePhone);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn get(
        &self,
        id: &AllowlistRecordId,
    ) -> Result<Option<ApprovedApplicant>, AllowlistRepositoryError> {
        let guard = self.records.lock().expect("allowlist mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_by_phone(
        &self,
        phone_number: &str,
    ) -> Result<Option<ApprovedApplicant>, AllowlistRepositoryError> {
        let guard = self.records.lock().expect("allowlist mutex poisoned");
        Ok(guard
            .values()
            .find(|record| record.phone_number == phone_number)
            .cloned())
    }

    fn update_notes(
        &self,
        id: &AllowlistRecordId,
        notes: Option<String>,
    ) -> Result<ApprovedApplicant, AllowlistRepositoryError> {
        let mut guard = self.records.lock().expect("allowlist mutex poisoned");
        let record = guard.get_mut(id).ok_or(AllowlistRepositoryError::NotFound)?;
        record.notes = notes;
        Ok(record.clone())
    }

    fn update_phone(
        &self,
        id: &AllowlistRecordId,
        phone_number: &str,
    ) -> Result<ApprovedApplicant, AllowlistRepositoryError> {
        let mut guard = self.records.lock().expect("allowlist mutex poisoned");
        if guard
            .values()
            .any(|record| record.phone_number == phone_number && record.id != *id)
        {
            return Err(AllowlistRepositoryError::DuplicatePhone);
        }
        let record = guard.get_mut(id).ok_or(AllowlistRepositoryError::NotFound)?;
        record.phone_number = phone_number.to_string();
        Ok(record.clone())
    }

    fn append_audit(&self, audit: PhoneChangeAudit) -> Result<(), AllowlistRepositoryError> {
        self.audits.lock().expect("audit mutex poisoned").push(audit);
        Ok(())
    }

    fn audit_history(
        &self,
        id: &AllowlistRecordId,
    ) -> Result<Vec<PhoneChangeAudit>, AllowlistRepositoryError> {
        let guard = self.audits.lock().expect("audit mutex poisoned");
        Ok(guard
            .iter()
            .filter(|audit| audit.record_id == *id)
            .cloned()
            .collect())
    }
}

/// Stand-in for the SMS gateway: renders the same templates a real
/// provider adapter would send and logs them instead of transmitting.
pub(crate) struct LoggingSmsGateway {
    sender_id: String,
}

impl LoggingSmsGateway {
    pub(crate) fn new(config: &MessagingConfig) -> Self {
        Self {
            sender_id: config.sender_id.clone(),
        }
    }
}

impl NotificationDispatcher for LoggingSmsGateway {
    fn send_status_notification(
        &self,
        phone: &str,
        recipient_name: &str,
        status: ApplicationStatus,
    ) -> Result<(), DispatchError> {
        let message = status_message(status, recipient_name);
        info!(sender = %self.sender_id, %phone, status = status.label(), %message, "sms dispatched");
        Ok(())
    }

    fn send_allowlist_approval(&self, phone: &str) -> Result<(), DispatchError> {
        let message = ministry_admissions::workflows::admissions::notifications::allowlist_approval_message();
        info!(sender = %self.sender_id, %phone, %message, "sms dispatched");
        Ok(())
    }
}
