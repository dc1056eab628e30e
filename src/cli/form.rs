//! Create/edit forms driven from the command line.
//!
//! A [`Form`] binds a set of field values to the same schema the server
//! enforces, validates locally, then submits with POST (create) or PATCH
//! (edit). Every outcome is reported as a [`Toast`].

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use uuid::Uuid;

use crate::cli::api::{ApiClient, ClientError};
use crate::cli::toast::Toast;
use crate::types::Entity;
use crate::validation::{
    BillboardInput, CategoryInput, ColorInput, ProductInput, SettingsInput, SizeInput, StoreInput, Validate,
    ValidationError,
};

#[derive(Debug, Error)]
pub enum FormError {
    #[error("invalid values: {0}")]
    Invalid(#[from] ValidationError),

    #[error("a request is already in flight")]
    Busy,

    #[error("initial data has no valid id")]
    MissingId,

    #[error("delete is only available when editing")]
    NotEditing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(Uuid),
}

impl FormMode {
    /// Edit when initial data was supplied, Create otherwise
    pub fn from_initial(initial: Option<&Value>) -> Result<Self, FormError> {
        match initial {
            None => Ok(FormMode::Create),
            Some(row) => row
                .get("id")
                .and_then(Value::as_str)
                .and_then(|id| Uuid::parse_str(id).ok())
                .map(FormMode::Edit)
                .ok_or(FormError::MissingId),
        }
    }
}

/// Where to go after a successful save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveRedirect {
    To(String),
    /// `/<id of the created row>`
    Created,
    Stay,
}

/// Everything that differs between the entity forms
#[derive(Clone)]
pub struct FormSpec {
    pub title: &'static str,
    pub noun: &'static str,
    pub collection_path: String,
    pub save_redirect: SaveRedirect,
    pub delete_redirect: String,
    pub delete_hint: &'static str,
    failure_description: Option<&'static str>,
    defaults: Value,
    normalize: fn(&Value) -> Result<Value, ValidationError>,
}

impl FormSpec {
    pub fn entity(entity: Entity, store_id: Uuid) -> Self {
        let list_route = format!("/{}/{}", store_id, entity.segment());
        let (defaults, normalize): (Value, fn(&Value) -> Result<Value, ValidationError>) = match entity {
            Entity::Billboard => (json!({ "label": "", "imageUrl": "" }), normalize_with::<BillboardInput>),
            Entity::Category => (json!({ "name": "", "billboardId": "" }), normalize_with::<CategoryInput>),
            Entity::Color => (json!({ "name": "", "value": "" }), normalize_with::<ColorInput>),
            Entity::Size => (json!({ "name": "", "value": "" }), normalize_with::<SizeInput>),
            Entity::Product => (
                json!({
                    "name": "",
                    "images": [],
                    "price": 0,
                    "categoryId": "",
                    "colorId": "",
                    "sizeId": "",
                    "isFeatured": false,
                    "isArchived": false
                }),
                normalize_with::<ProductInput>,
            ),
        };

        Self {
            title: entity.title(),
            noun: entity.noun(),
            collection_path: format!("/api/{}/{}", store_id, entity.segment()),
            save_redirect: SaveRedirect::To(list_route.clone()),
            delete_redirect: list_route,
            delete_hint: entity.dependents_hint(),
            failure_description: None,
            defaults,
            normalize,
        }
    }

    /// New-store modal
    pub fn new_store() -> Self {
        Self {
            title: "Store",
            noun: "store",
            collection_path: "/api/stores".to_string(),
            save_redirect: SaveRedirect::Created,
            delete_redirect: "/".to_string(),
            delete_hint: "Make sure you removed all products and categories first.",
            failure_description: Some("Your store was not created. Please try again."),
            defaults: json!({ "name": "" }),
            normalize: normalize_with::<StoreInput>,
        }
    }

    /// Store settings page: rename or delete an existing store
    pub fn store_settings() -> Self {
        Self {
            save_redirect: SaveRedirect::Stay,
            failure_description: Some("Your store was not updated. Please try again."),
            normalize: normalize_with::<SettingsInput>,
            ..Self::new_store()
        }
    }

    pub fn item_path(&self, id: Uuid) -> String {
        format!("{}/{}", self.collection_path, id)
    }
}

fn normalize_with<T: Validate + Serialize>(candidate: &Value) -> Result<Value, ValidationError> {
    let input = T::validate(candidate)?;
    serde_json::to_value(input).map_err(|e| ValidationError::root(e.to_string()))
}

/// Result of a submit or delete
#[derive(Debug, Clone)]
pub struct FormOutcome {
    pub toast: Toast,
    /// Route the dashboard would navigate to
    pub redirect: Option<String>,
    pub data: Option<Value>,
}

impl FormOutcome {
    fn failed(toast: Toast) -> Self {
        Self {
            toast,
            redirect: None,
            data: None,
        }
    }
}

/// Marks a request in flight until dropped
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, FormError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| FormError::Busy)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Form {
    spec: FormSpec,
    mode: FormMode,
    values: Map<String, Value>,
    in_flight: AtomicBool,
}

impl Form {
    /// Start from `initial` (edit) or the entity defaults (create)
    pub fn new(spec: FormSpec, initial: Option<Value>) -> Result<Self, FormError> {
        let mode = FormMode::from_initial(initial.as_ref())?;
        let values = match initial.unwrap_or_else(|| spec.defaults.clone()) {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Ok(Self {
            spec,
            mode,
            values,
            in_flight: AtomicBool::new(false),
        })
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.values.insert(field.into(), value);
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn heading(&self) -> String {
        match self.mode {
            FormMode::Create => format!("Create {}", self.spec.noun),
            FormMode::Edit(_) => format!("Edit {}", self.spec.noun),
        }
    }

    pub fn action_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Create",
            FormMode::Edit(_) => "Save changes",
        }
    }

    pub fn toast_message(&self) -> String {
        match self.mode {
            FormMode::Create => format!("{} created.", self.spec.title),
            FormMode::Edit(_) => format!("{} updated.", self.spec.title),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// The payload that would be sent, or the local validation failure
    pub fn payload(&self) -> Result<Value, ValidationError> {
        (self.spec.normalize)(&Value::Object(self.values.clone()))
    }

    /// Validate, then POST or PATCH. Invalid values never reach the server.
    pub async fn submit(&self, client: &ApiClient) -> Result<FormOutcome, FormError> {
        let payload = self.payload()?;
        let _guard = InFlight::acquire(&self.in_flight)?;

        let result = match self.mode {
            FormMode::Create => client.post(&self.spec.collection_path, &payload).await,
            FormMode::Edit(id) => client.patch(&self.spec.item_path(id), &payload).await,
        };

        Ok(match result {
            Ok(data) => FormOutcome {
                toast: Toast::success(self.toast_message()),
                redirect: self.save_redirect(&data),
                data: Some(data),
            },
            Err(err) => {
                tracing::debug!("{} failed: {}", self.heading(), err);
                FormOutcome::failed(self.failure_toast(&err))
            }
        })
    }

    /// Delete the edited row once `confirm` agrees. `Ok(None)` when declined.
    pub async fn delete(
        &self,
        client: &ApiClient,
        confirm: impl FnOnce() -> bool,
    ) -> Result<Option<FormOutcome>, FormError> {
        let FormMode::Edit(id) = self.mode else {
            return Err(FormError::NotEditing);
        };
        if !confirm() {
            return Ok(None);
        }
        let _guard = InFlight::acquire(&self.in_flight)?;

        Ok(Some(match client.delete(&self.spec.item_path(id)).await {
            Ok(data) => FormOutcome {
                toast: Toast::success(format!("{} deleted.", self.spec.title)),
                redirect: Some(self.spec.delete_redirect.clone()),
                data: Some(data),
            },
            Err(err) => {
                tracing::debug!("Delete {} {} failed: {}", self.spec.noun, id, err);
                FormOutcome::failed(Toast::error(self.spec.delete_hint))
            }
        }))
    }

    fn save_redirect(&self, data: &Value) -> Option<String> {
        match &self.spec.save_redirect {
            SaveRedirect::To(route) => Some(route.clone()),
            SaveRedirect::Created => data.get("id").and_then(Value::as_str).map(|id| format!("/{}", id)),
            SaveRedirect::Stay => None,
        }
    }

    fn failure_toast(&self, err: &ClientError) -> Toast {
        if err.status() == Some(StatusCode::CONFLICT) {
            return Toast::error_titled(
                format!("{} already taken.", self.spec.noun),
                format!("Please choose another {}.", self.spec.noun),
            );
        }
        let description = match self.spec.failure_description {
            Some(description) => description.to_string(),
            None => format!("{} fail. Please try again.", self.toast_message()),
        };
        Toast::error_titled("Something went wrong.", description)
    }
}
