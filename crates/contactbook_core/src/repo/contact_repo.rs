//! Contact repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over the `contacts` table.
//! - Sorted + paginated listing, substring search, birthday windows.
//!
//! # Invariants
//! - Every list/search result is ordered; ties fall back to `id ASC`.
//! - Pagination never errors for out-of-range pages, it returns `[]`.
//! - Read paths reject rows whose birthday has no `MM-DD` part.

use crate::db::schema::{current_user_version, CONTACT_COLUMNS, SCHEMA_VERSION};
use crate::db::DbError;
use crate::model::contact::{Contact, ContactId, ContactInput};
use crate::model::validation::ValidationError;
use crate::search::birthdays::{BirthdayWindow, BirthdayWindowMode};
use crate::search::filter::{build_search_predicate, ContactSearch, SearchMode};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CONTACT_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    email,
    phone,
    birthday,
    additional_data
FROM contacts";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for contact persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound(ContactId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Sortable contact columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    FirstName,
    LastName,
    Email,
}

impl SortKey {
    /// Parses a `sort_by` value; unknown keys yield `None` (storage order).
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "first_name" => Some(Self::FirstName),
            "last_name" => Some(Self::LastName),
            "email" => Some(Self::Email),
            _ => None,
        }
    }

    fn column(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Only the exact string `desc` selects descending order.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Listing options: sort the full table, then slice one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactListQuery {
    /// 1-based page number.
    pub page: i64,
    /// Rows per page.
    pub page_size: i64,
    /// `None` keeps storage order.
    pub sort_by: Option<SortKey>,
    pub sort_order: SortOrder,
}

impl Default for ContactListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            sort_by: None,
            sort_order: SortOrder::Asc,
        }
    }
}

impl ContactListQuery {
    /// Builds a query from raw request values.
    pub fn from_raw(
        page: i64,
        page_size: i64,
        sort_by: Option<&str>,
        sort_order: Option<&str>,
    ) -> Self {
        Self {
            page,
            page_size,
            sort_by: sort_by.and_then(SortKey::parse),
            sort_order: SortOrder::parse(sort_order),
        }
    }

    /// Rejects `page < 1` and `page_size < 1`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.page < 1 {
            return Err(ValidationError::InvalidPaging {
                field: "page",
                value: self.page,
            });
        }
        if self.page_size < 1 {
            return Err(ValidationError::InvalidPaging {
                field: "page_size",
                value: self.page_size,
            });
        }
        Ok(())
    }

    /// Row offset of the first item on the page, `None` on overflow.
    fn offset(&self) -> Option<i64> {
        (self.page - 1).checked_mul(self.page_size)
    }
}

/// Repository interface for contact operations.
pub trait ContactRepository {
    fn create_contact(&self, input: &ContactInput) -> RepoResult<Contact>;
    fn get_contact(&self, id: ContactId) -> RepoResult<Contact>;
    fn list_contacts(&self, query: &ContactListQuery) -> RepoResult<Vec<Contact>>;
    fn list_all_contacts(&self) -> RepoResult<Vec<Contact>>;
    fn update_contact(&self, id: ContactId, input: &ContactInput) -> RepoResult<Contact>;
    fn delete_contact(&self, id: ContactId) -> RepoResult<()>;
    fn search_contacts(&self, search: &ContactSearch, mode: SearchMode)
        -> RepoResult<Vec<Contact>>;
    fn upcoming_birthdays(
        &self,
        reference: NaiveDate,
        mode: BirthdayWindowMode,
    ) -> RepoResult<Vec<Contact>>;
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    /// Constructs a repository from a bootstrapped connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `user_version` is not the current
    ///   schema version.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the
    ///   `contacts` table does not have the expected shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Constructs a repository without re-running the `try_new` checks.
    ///
    /// Only for connections that already passed `try_new` and whose schema
    /// cannot change afterwards, such as one owned by a long-lived store.
    pub fn assume_ready(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_contacts(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Contact>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut contacts = Vec::new();

        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }

        Ok(contacts)
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn create_contact(&self, input: &ContactInput) -> RepoResult<Contact> {
        input.validate()?;

        self.conn.execute(
            "INSERT INTO contacts (
                first_name,
                last_name,
                email,
                phone,
                birthday,
                additional_data
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                input.first_name.as_str(),
                input.last_name.as_str(),
                input.email.as_str(),
                input.phone.as_str(),
                input.birthday.as_str(),
                input.additional_data.as_str(),
            ],
        )?;

        self.get_contact(self.conn.last_insert_rowid())
    }

    fn get_contact(&self, id: ContactId) -> RepoResult<Contact> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => parse_contact_row(row),
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn list_contacts(&self, query: &ContactListQuery) -> RepoResult<Vec<Contact>> {
        query.validate()?;

        let Some(offset) = query.offset() else {
            return Ok(Vec::new());
        };

        let mut sql = format!("{CONTACT_SELECT_SQL} ORDER BY ");
        if let Some(key) = query.sort_by {
            sql.push_str(key.column());
            sql.push(' ');
            sql.push_str(query.sort_order.keyword());
            sql.push_str(", ");
        }
        sql.push_str("id ASC LIMIT ? OFFSET ?");

        self.query_contacts(
            &sql,
            vec![Value::Integer(query.page_size), Value::Integer(offset)],
        )
    }

    fn list_all_contacts(&self) -> RepoResult<Vec<Contact>> {
        self.query_contacts(&format!("{CONTACT_SELECT_SQL} ORDER BY id ASC"), Vec::new())
    }

    fn update_contact(&self, id: ContactId, input: &ContactInput) -> RepoResult<Contact> {
        input.validate()?;

        let changed = self.conn.execute(
            "UPDATE contacts
             SET
                first_name = ?1,
                last_name = ?2,
                email = ?3,
                phone = ?4,
                birthday = ?5,
                additional_data = ?6
             WHERE id = ?7;",
            params![
                input.first_name.as_str(),
                input.last_name.as_str(),
                input.email.as_str(),
                input.phone.as_str(),
                input.birthday.as_str(),
                input.additional_data.as_str(),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        self.get_contact(id)
    }

    fn delete_contact(&self, id: ContactId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM contacts WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn search_contacts(
        &self,
        search: &ContactSearch,
        mode: SearchMode,
    ) -> RepoResult<Vec<Contact>> {
        let (predicate, bind_values) = build_search_predicate(search, mode);
        let sql = format!("{CONTACT_SELECT_SQL} WHERE {predicate} ORDER BY id ASC");
        self.query_contacts(&sql, bind_values)
    }

    fn upcoming_birthdays(
        &self,
        reference: NaiveDate,
        mode: BirthdayWindowMode,
    ) -> RepoResult<Vec<Contact>> {
        let window = BirthdayWindow::starting_at(reference);
        let sql = format!(
            "{CONTACT_SELECT_SQL} WHERE {} ORDER BY id ASC",
            window.predicate("birthday", mode)
        );
        let bind_values = vec![Value::Text(window.start), Value::Text(window.end)];
        self.query_contacts(&sql, bind_values)
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version = current_user_version(conn)?;
    if actual_version != SCHEMA_VERSION {
        return Err(RepoError::UninitializedConnection {
            expected_version: SCHEMA_VERSION,
            actual_version,
        });
    }

    let has_table: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'contacts'
        );",
        [],
        |row| row.get(0),
    )?;
    if has_table == 0 {
        return Err(RepoError::MissingRequiredTable("contacts"));
    }

    for &column in CONTACT_COLUMNS {
        let has_column: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM pragma_table_info('contacts') WHERE name = ?1
            );",
            [column],
            |row| row.get(0),
        )?;
        if has_column == 0 {
            return Err(RepoError::MissingRequiredColumn {
                table: "contacts",
                column,
            });
        }
    }

    Ok(())
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<Contact> {
    let id: ContactId = row.get("id")?;
    let birthday: String = row.get("birthday")?;
    if birthday.get(5..10).is_none() {
        return Err(RepoError::InvalidData(format!(
            "invalid birthday value `{birthday}` in contacts.birthday for id {id}"
        )));
    }

    Ok(Contact {
        id,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        birthday,
        additional_data: row.get("additional_data")?,
    })
}
