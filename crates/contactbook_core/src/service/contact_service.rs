//! Contact use-case service.
//!
//! # Responsibility
//! - Provide the CRUD/query entry points used by the HTTP layer.
//! - Apply the configured search and birthday-window policies.
//! - Emit metadata-only log events for every operation.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Log lines carry ids, counts and error codes, never contact field values.

use crate::clock::Clock;
use crate::model::contact::{Contact, ContactId, ContactInput};
use crate::repo::contact_repo::{ContactListQuery, ContactRepository, RepoError, RepoResult};
use crate::search::birthdays::BirthdayWindowMode;
use crate::search::filter::{ContactSearch, SearchMode};
use chrono::NaiveDate;
use log::{error, log, warn, Level};
use std::time::Instant;

/// Matching policies applied by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactServiceOptions {
    pub search_mode: SearchMode,
    pub birthday_window: BirthdayWindowMode,
}

/// Use-case service wrapper for contact operations.
pub struct ContactService<R: ContactRepository> {
    repo: R,
    options: ContactServiceOptions,
}

impl<R: ContactRepository> ContactService<R> {
    /// Creates a service with default (compatible) matching policies.
    pub fn new(repo: R) -> Self {
        Self::with_options(repo, ContactServiceOptions::default())
    }

    /// Creates a service with explicit matching policies.
    pub fn with_options(repo: R, options: ContactServiceOptions) -> Self {
        Self { repo, options }
    }

    pub fn options(&self) -> ContactServiceOptions {
        self.options
    }

    /// Validates and stores a new contact.
    pub fn create_contact(&self, input: &ContactInput) -> RepoResult<Contact> {
        let started_at = Instant::now();
        let result = self.repo.create_contact(input);
        finish("contact_create", Level::Info, started_at, result, |contact| {
            format!("id={}", contact.id)
        })
    }

    pub fn get_contact(&self, id: ContactId) -> RepoResult<Contact> {
        let started_at = Instant::now();
        let result = self.repo.get_contact(id);
        finish("contact_get", Level::Debug, started_at, result, |contact| {
            format!("id={}", contact.id)
        })
    }

    /// Lists one sorted page of contacts.
    pub fn list_contacts(&self, query: &ContactListQuery) -> RepoResult<Vec<Contact>> {
        let started_at = Instant::now();
        let result = self.repo.list_contacts(query);
        finish("contact_list", Level::Debug, started_at, result, |items| {
            format!(
                "page={} page_size={} sorted={} count={}",
                query.page,
                query.page_size,
                query.sort_by.is_some(),
                items.len()
            )
        })
    }

    /// Lists every contact in storage order.
    pub fn list_all_contacts(&self) -> RepoResult<Vec<Contact>> {
        let started_at = Instant::now();
        let result = self.repo.list_all_contacts();
        finish("contact_list_all", Level::Debug, started_at, result, |items| {
            format!("count={}", items.len())
        })
    }

    /// Replaces every writable field of an existing contact.
    pub fn update_contact(&self, id: ContactId, input: &ContactInput) -> RepoResult<Contact> {
        let started_at = Instant::now();
        let result = self.repo.update_contact(id, input);
        finish("contact_update", Level::Info, started_at, result, |contact| {
            format!("id={}", contact.id)
        })
    }

    pub fn delete_contact(&self, id: ContactId) -> RepoResult<()> {
        let started_at = Instant::now();
        let result = self.repo.delete_contact(id);
        finish("contact_delete", Level::Info, started_at, result, |_| format!("id={id}"))
    }

    /// Searches with the configured `SearchMode`.
    pub fn search_contacts(&self, search: &ContactSearch) -> RepoResult<Vec<Contact>> {
        let started_at = Instant::now();
        let result = self.repo.search_contacts(search, self.options.search_mode);
        finish("contact_search", Level::Debug, started_at, result, |items| {
            format!("mode={:?} count={}", self.options.search_mode, items.len())
        })
    }

    /// Contacts with a birthday in the 7-day window starting at `reference`.
    pub fn upcoming_birthdays(&self, reference: NaiveDate) -> RepoResult<Vec<Contact>> {
        let started_at = Instant::now();
        let result = self
            .repo
            .upcoming_birthdays(reference, self.options.birthday_window);
        finish("contact_birthdays", Level::Debug, started_at, result, |items| {
            format!(
                "reference={reference} mode={:?} count={}",
                self.options.birthday_window,
                items.len()
            )
        })
    }

    /// Same as `upcoming_birthdays`, with "today" taken from `clock`.
    pub fn upcoming_birthdays_from(&self, clock: &dyn Clock) -> RepoResult<Vec<Contact>> {
        self.upcoming_birthdays(clock.today())
    }
}

fn finish<T>(
    event: &'static str,
    ok_level: Level,
    started_at: Instant,
    result: RepoResult<T>,
    describe: impl FnOnce(&T) -> String,
) -> RepoResult<T> {
    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(value) => {
            log!(
                ok_level,
                "event={event} module=service status=ok {} duration_ms={duration_ms}",
                describe(value)
            );
        }
        Err(err @ (RepoError::Validation(_) | RepoError::NotFound(_))) => {
            warn!(
                "event={event} module=service status=error duration_ms={duration_ms} error_code={}",
                error_code(err)
            );
        }
        Err(err) => {
            error!(
                "event={event} module=service status=error duration_ms={duration_ms} error_code={} error={err}",
                error_code(err)
            );
        }
    }
    result
}

/// Stable machine-readable code for a repository error.
pub fn error_code(err: &RepoError) -> &'static str {
    match err {
        RepoError::Validation(_) => "validation_failed",
        RepoError::NotFound(_) => "not_found",
        RepoError::Db(_) => "storage_failed",
        RepoError::InvalidData(_) => "invalid_data",
        RepoError::UninitializedConnection { .. }
        | RepoError::MissingRequiredTable(_)
        | RepoError::MissingRequiredColumn { .. } => "storage_not_ready",
    }
}
