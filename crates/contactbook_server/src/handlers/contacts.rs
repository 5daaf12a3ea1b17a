use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use contactbook_core::{ContactId, ContactInput, ContactListQuery, ContactSearch};

use crate::app_state::AppState;
use crate::errors::ApiError;
use crate::models::{
    ContactListParams, ContactListResponse, ContactRecordV1, ContactResponse,
    ContactSearchParams, MessageResponse,
};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PAGE_SIZE: i64 = 10;

pub async fn create_contact(
    State(state): State<AppState>,
    body: Result<Json<ContactInput>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(input) = body?;
    state
        .store
        .run(move |service| service.create_contact(&input))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Contact created",
        }),
    ))
}

pub async fn list_contacts(
    State(state): State<AppState>,
    params: Result<Query<ContactListParams>, QueryRejection>,
) -> Result<Json<ContactListResponse>, ApiError> {
    let Query(params) = params?;
    let query = ContactListQuery::from_raw(
        params.page.unwrap_or(DEFAULT_PAGE),
        params.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        params.sort_by.as_deref(),
        params.sort_order.as_deref(),
    );
    let contacts = state
        .store
        .run(move |service| service.list_contacts(&query))
        .await?;
    Ok(Json(contacts.into()))
}

pub async fn list_all_contacts(
    State(state): State<AppState>,
) -> Result<Json<ContactListResponse>, ApiError> {
    let contacts = state
        .store
        .run(|service| service.list_all_contacts())
        .await?;
    Ok(Json(contacts.into()))
}

pub async fn search_contacts(
    State(state): State<AppState>,
    params: Result<Query<ContactSearchParams>, QueryRejection>,
) -> Result<Json<ContactListResponse>, ApiError> {
    let Query(params) = params?;
    let search = ContactSearch::from(params);
    let contacts = state
        .store
        .run(move |service| service.search_contacts(&search))
        .await?;
    Ok(Json(contacts.into()))
}

pub async fn upcoming_birthdays(
    State(state): State<AppState>,
) -> Result<Json<ContactListResponse>, ApiError> {
    let clock = Arc::clone(&state.clock);
    let contacts = state
        .store
        .run(move |service| service.upcoming_birthdays_from(clock.as_ref()))
        .await?;
    Ok(Json(contacts.into()))
}

pub async fn get_contact(
    State(state): State<AppState>,
    id: Result<Path<ContactId>, PathRejection>,
) -> Result<Json<ContactResponse>, ApiError> {
    let Path(id) = id?;
    let contact = state
        .store
        .run(move |service| service.get_contact(id))
        .await?;
    Ok(Json(ContactResponse {
        contact: ContactRecordV1::from(contact),
    }))
}

pub async fn update_contact(
    State(state): State<AppState>,
    id: Result<Path<ContactId>, PathRejection>,
    body: Result<Json<ContactInput>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id?;
    let Json(input) = body?;
    state
        .store
        .run(move |service| service.update_contact(id, &input))
        .await?;
    Ok(Json(MessageResponse {
        message: "Contact updated",
    }))
}

pub async fn delete_contact(
    State(state): State<AppState>,
    id: Result<Path<ContactId>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id?;
    state
        .store
        .run(move |service| service.delete_contact(id))
        .await?;
    Ok(Json(MessageResponse {
        message: "Contact deleted",
    }))
}
