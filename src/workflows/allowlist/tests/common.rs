use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::workflows::admissions::domain::ApplicationStatus;
use crate::workflows::admissions::notifications::{DispatchError, NotificationDispatcher};
use crate::workflows::allowlist::domain::{AllowlistRecordId, ApprovedApplicant, PhoneChangeAudit};
use crate::workflows::allowlist::repository::{AllowlistRepository, AllowlistRepositoryError};
use crate::workflows::allowlist::service::AllowlistService;

pub(super) fn build_service() -> (
    AllowlistService<MemoryAllowlistRepository, RecordingDispatcher>,
    Arc<MemoryAllowlistRepository>,
    Arc<RecordingDispatcher>,
) {
    let repository = Arc::new(MemoryAllowlistRepository::default());
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let service = AllowlistService::new(repository.clone(), dispatcher.clone());
    (service, repository, dispatcher)
}

#[derive(Default)]
pub(super) struct MemoryAllowlistRepository {
    records: Mutex<HashMap<AllowlistRecordId, ApprovedApplicant>>,
    audits: Mutex<Vec<PhoneChangeAudit>>,
}

impl MemoryAllowlistRepository {
    pub(super) fn audit_rows(&self) -> Vec<PhoneChangeAudit> {
        self.audits.lock().expect("audit mutex poisoned").clone()
    }
}

impl AllowlistRepository for MemoryAllowlistRepository {
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

#[derive(Default)]
pub(super) struct RecordingDispatcher {
    approvals: Mutex<Vec<String>>,
    fail: Mutex<bool>,
}

impl RecordingDispatcher {
    pub(super) fn approvals(&self) -> Vec<String> {
        self.approvals
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

impl NotificationDispatcher for RecordingDispatcher {
    fn send_status_notification(
        &self,
        _phone: &str,
        _recipient_name: &str,
        _status: ApplicationStatus,
    ) -> Result<(), DispatchError> {
        Ok(())
    }

    fn send_allowlist_approval(&self, phone: &str) -> Result<(), DispatchError> {
        if self.failing() {
            return Err(DispatchError::Transport("gateway offline".to_string()));
        }
        self.approvals
            .lock()
            .expect("dispatch mutex poisoned")
            .push(phone.to_string());
        Ok(())
    }
}
