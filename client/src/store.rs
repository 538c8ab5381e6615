//! In-memory notification history.
//!
//! Newest-first ordering; records unique by id. History loaded from the
//! backend arrives pre-ordered and is never re-sorted; pushed records are
//! prepended. The unread count is always recomputed, never cached.

use shared::types::NotificationRecord;

#[derive(Debug, Default)]
pub struct NotificationStore {
    records: Vec<NotificationRecord>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[NotificationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replace the whole list with a freshly fetched history.
    pub fn replace_all(&mut self, records: Vec<NotificationRecord>) {
        self.records = records;
    }

    /// Prepend a pushed record. Returns `false` (and changes nothing) when a
    /// record with the same id is already present.
    pub fn push_front(&mut self, record: NotificationRecord) -> bool {
        if self.records.iter().any(|r| r.id == record.id) {
            return false;
        }
        self.records.insert(0, record);
        true
    }

    /// Mark one record read. Returns `false` when the id is unknown.
    pub fn mark_read(&mut self, id: i64) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        for record in &mut self.records {
            record.read = true;
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn unread_count(&self) -> usize {
        self.records.iter().filter(|r| !r.read).count()
    }
}
