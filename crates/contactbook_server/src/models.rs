use contactbook_core::{Contact, ContactSearch};
use serde::{Deserialize, Serialize};

/// Wire shape of a contact, version 1.
///
/// Maps only the public contact fields; storage details never leak through it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecordV1 {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birthday: String,
    pub additional_data: String,
}

impl From<Contact> for ContactRecordV1 {
    fn from(value: Contact) -> Self {
        Self {
            id: value.id,
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            phone: value.phone,
            birthday: value.birthday,
            additional_data: value.additional_data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub contact: ContactRecordV1,
}

#[derive(Debug, Serialize)]
pub struct ContactListResponse {
    pub contacts: Vec<ContactRecordV1>,
}

impl From<Vec<Contact>> for ContactListResponse {
    fn from(value: Vec<Contact>) -> Self {
        Self {
            contacts: value.into_iter().map(ContactRecordV1::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ContactListParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContactSearchParams {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
}

impl From<ContactSearchParams> for ContactSearch {
    fn from(value: ContactSearchParams) -> Self {
        Self {
            name: value.name,
            surname: value.surname,
            email: value.email,
        }
    }
}
