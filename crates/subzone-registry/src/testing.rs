//! In-process provider double for unit tests.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;
use subzone_core::{DnsProvider, DnsRecord, RecordRequest, Result, SubzoneError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Zone,
    List,
    Create { name: String, content: String },
    Update { id: String, content: String },
    Delete { id: String },
}

#[derive(Default)]
pub struct FakeProvider {
    pub zone: String,
    pub records: Mutex<Vec<DnsRecord>>,
    calls: Mutex<Vec<Call>>,
    next_id: Mutex<u32>,
    pub fail_list: Mutex<bool>,
    pub fail_create: Mutex<HashSet<String>>,
    pub fail_update: Mutex<HashSet<String>>,
    pub refuse_update: Mutex<HashSet<String>>,
    pub fail_delete: Mutex<HashSet<String>>,
    pub delay: Mutex<Option<Duration>>,
    pub list_delay: Mutex<Option<Duration>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self {
            zone: "example.com".into(),
            next_id: Mutex::new(100),
            ..Default::default()
        }
    }

    pub fn with_records(records: Vec<DnsRecord>) -> Self {
        let provider = Self::new();
        *provider.records.lock().unwrap() = records;
        provider
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that mutate records
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::Zone | Call::List))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn pause(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

pub fn ns_record(id: &str, name: &str, content: &str) -> DnsRecord {
    DnsRecord {
        id: id.into(),
        name: name.into(),
        record_type: "NS".into(),
        content: content.into(),
        comment: None,
        tags: vec![],
        created_on: None,
        modified_on: None,
    }
}

#[async_trait]
impl DnsProvider for FakeProvider {
    async fn zone_name(&self) -> Result<String> {
        self.record(Call::Zone);
        Ok(self.zone.clone())
    }

    async fn list_records(&self) -> Result<Vec<DnsRecord>> {
        self.record(Call::List);
        if *self.fail_list.lock().unwrap() {
            return Err(SubzoneError::Http("connection reset".into()));
        }
        // Listed before the delay, so later changes are missed.
        let records = self.records.lock().unwrap().clone();
        let delay = *self.list_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(records)
    }

    async fn create_record(&self, record: &RecordRequest) -> Result<String> {
        self.record(Call::Create {
            name: record.name.clone(),
            content: record.content.clone(),
        });
        self.pause().await;
        if self.fail_create.lock().unwrap().contains(&record.content) {
            return Err(SubzoneError::Api {
                code: 400,
                message: "create failed".into(),
            });
        }
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            next.to_string()
        };
        self.records
            .lock()
            .unwrap()
            .push(ns_record(&id, &record.name, &record.content));
        Ok(id)
    }

    async fn update_record(&self, id: &str, record: &RecordRequest) -> Result<bool> {
        self.record(Call::Update {
            id: id.into(),
            content: record.content.clone(),
        });
        self.pause().await;
        if self.fail_update.lock().unwrap().contains(id) {
            return Err(SubzoneError::Http("update failed".into()));
        }
        if self.refuse_update.lock().unwrap().contains(id) {
            return Ok(false);
        }
        for r in self.records.lock().unwrap().iter_mut().filter(|r| r.id == id) {
            r.content.clone_from(&record.content);
        }
        Ok(true)
    }

    async fn delete_record(&self, id: &str) -> Result<bool> {
        self.record(Call::Delete { id: id.into() });
        self.pause().await;
        if self.fail_delete.lock().unwrap().contains(id) {
            return Err(SubzoneError::Http("delete failed".into()));
        }
        self.records.lock().unwrap().retain(|r| r.id != id);
        Ok(true)
    }
}
