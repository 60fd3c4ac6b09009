//! Form definitions and validation.
//!
//! Raw forms deserialize every field as a `String` (missing fields become
//! empty strings), so a malformed submission always reaches `validate` and
//! comes back as per-field messages instead of an extractor rejection.
//! Validation never touches the database: the item form is handed the list
//! of stores that exist at submission time.

use std::collections::BTreeMap;

use serde::Deserialize;

use grocery_core::{ItemCategory, Price, PriceError, StoreId};

use crate::models::{GroceryItem, GroceryStore, ItemInput, StoreInput};

pub const TITLE_MAX: usize = 80;
pub const ADDRESS_MAX: usize = 200;
pub const NAME_MAX: usize = 80;
pub const PHOTO_URL_MAX: usize = 200;

const REQUIRED: &str = "This field is required.";
const INVALID_CHOICE: &str = "Not a valid choice.";
const INVALID_URL: &str = "Invalid URL.";
const INVALID_DECIMAL: &str = "Not a valid decimal value.";
const NEGATIVE_PRICE: &str = "Price cannot be negative.";

/// Per-field validation messages, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against `field`.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages for one field (empty when the field is valid).
    #[must_use]
    pub fn for_field(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// Names of the fields that have at least one message.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }
}

/// An `<option>` in a rendered `<select>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

// =============================================================================
// Store form
// =============================================================================

/// Submitted fields of the add/edit store form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreForm {
    pub title: String,
    pub address: String,
}

impl StoreForm {
    /// Pre-populate from an existing store.
    #[must_use]
    pub fn from_store(store: &GroceryStore) -> Self {
        Self {
            title: store.title.clone(),
            address: store.address.clone(),
        }
    }

    /// Validate the submission.
    ///
    /// # Errors
    ///
    /// Returns every field-level problem found.
    pub fn validate(&self) -> Result<StoreInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = required_text(&mut errors, "title", &self.title, TITLE_MAX);
        let address = required_text(&mut errors, "address", &self.address, ADDRESS_MAX);

        match (title, address) {
            (Some(title), Some(address)) if errors.is_empty() => Ok(StoreInput { title, address }),
            _ => Err(errors),
        }
    }
}

// =============================================================================
// Item form
// =============================================================================

/// Submitted fields of the add/edit item form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ItemForm {
    pub name: String,
    pub price: String,
    pub category: String,
    pub photo_url: String,
    /// Store id, as chosen in the store `<select>`.
    pub store: String,
}

impl ItemForm {
    /// Pre-populate from an existing item.
    #[must_use]
    pub fn from_item(item: &GroceryItem) -> Self {
        Self {
            name: item.name.clone(),
            price: item.price.to_plain_string(),
            category: item.category.as_str().to_owned(),
            photo_url: item.photo_url.clone(),
            store: item.store_id.to_string(),
        }
    }

    /// Validate the submission against the stores that currently exist.
    ///
    /// # Errors
    ///
    /// Returns every field-level problem found, including a store id that
    /// is not among `stores`.
    pub fn validate(&self, stores: &[GroceryStore]) -> Result<ItemInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = required_text(&mut errors, "name", &self.name, NAME_MAX);
        let price = self.validate_price(&mut errors);
        let category = self.validate_category(&mut errors);
        let photo_url = self.validate_photo_url(&mut errors);
        let store_id = self.validate_store(&mut errors, stores);

        match (name, price, category, photo_url, store_id) {
            (Some(name), Some(price), Some(category), Some(photo_url), Some(store_id))
                if errors.is_empty() =>
            {
                Ok(ItemInput {
                    name,
                    price,
                    category,
                    photo_url,
                    store_id,
                })
            }
            _ => Err(errors),
        }
    }

    fn validate_price(&self, errors: &mut FieldErrors) -> Option<Price> {
        let raw = self.price.trim();
        if raw.is_empty() {
            errors.add("price", REQUIRED);
            return None;
        }
        match Price::parse(raw) {
            Ok(price) => Some(price),
            Err(PriceError::Invalid) => {
                errors.add("price", INVALID_DECIMAL);
                None
            }
            Err(PriceError::Negative) => {
                errors.add("price", NEGATIVE_PRICE);
                None
            }
        }
    }

    fn validate_category(&self, errors: &mut FieldErrors) -> Option<ItemCategory> {
        if self.category.trim().is_empty() {
            errors.add("category", REQUIRED);
            return None;
        }
        self.category
            .parse::<ItemCategory>()
            .map_err(|_| errors.add("category", INVALID_CHOICE))
            .ok()
    }

    fn validate_photo_url(&self, errors: &mut FieldErrors) -> Option<String> {
        let url = required_text(errors, "photo_url", &self.photo_url, PHOTO_URL_MAX)?;
        if is_web_url(&url) {
            Some(url)
        } else {
            errors.add("photo_url", INVALID_URL);
            None
        }
    }

    fn validate_store(
        &self,
        errors: &mut FieldErrors,
        stores: &[GroceryStore],
    ) -> Option<StoreId> {
        if self.store.trim().is_empty() {
            errors.add("store", REQUIRED);
            return None;
        }
        let found = self
            .store
            .parse::<StoreId>()
            .ok()
            .filter(|id| stores.iter().any(|store| store.id == *id));
        if found.is_none() {
            errors.add("store", INVALID_CHOICE);
        }
        found
    }

    /// Category `<option>`s with the submitted value selected.
    #[must_use]
    pub fn category_options(&self) -> Vec<SelectOption> {
        let selected = self.category.parse::<ItemCategory>().ok();
        ItemCategory::ALL
            .into_iter()
            .map(|category| SelectOption {
                value: category.as_str().to_owned(),
                label: category.label().to_owned(),
                selected: selected == Some(category),
            })
            .collect()
    }

    /// Store `<option>`s with the submitted value selected.
    #[must_use]
    pub fn store_options(&self, stores: &[GroceryStore]) -> Vec<SelectOption> {
        let selected = self.store.parse::<StoreId>().ok();
        stores
            .iter()
            .map(|store| SelectOption {
                value: store.id.to_string(),
                label: store.title.clone(),
                selected: selected == Some(store.id),
            })
            .collect()
    }
}

// =============================================================================
// Field checks
// =============================================================================

/// Trimmed value of a required text field no longer than `max` characters.
fn required_text(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    max: usize,
) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    if value.chars().count() > max {
        errors.add(field, format!("Field cannot be longer than {max} characters."));
        return None;
    }
    Some(value.to_owned())
}

/// Absolute http(s) URL with a host.
fn is_web_url(value: &str) -> bool {
    url::Url::parse(value)
        .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn store(id: i64, title: &str) -> GroceryStore {
        GroceryStore {
            id: StoreId::new(id),
            title: title.to_owned(),
            address: "1 Main St".to_owned(),
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn milk_form(store: &str) -> ItemForm {
        ItemForm {
            name: "Milk".to_owned(),
            price: "3.50".to_owned(),
            category: "dairy".to_owned(),
            photo_url: "http://x/milk.jpg".to_owned(),
            store: store.to_owned(),
        }
    }

    #[test]
    fn test_store_form_valid() {
        let form = StoreForm {
            title: "  Corner Mart ".to_owned(),
            address: "1 Main St".to_owned(),
        };
        let input = form.validate().unwrap();
        assert_eq!(input.title, "Corner Mart");
        assert_eq!(input.address, "1 Main St");
    }

    #[test]
    fn test_store_form_requires_fields() {
        let errors = StoreForm::default().validate().unwrap_err();
        assert_eq!(errors.for_field("title"), [REQUIRED.to_owned()]);
        assert_eq!(errors.for_field("address"), [REQUIRED.to_owned()]);
    }

    #[test]
    fn test_store_form_length_limits_count_characters() {
        let form = StoreForm {
            title: "é".repeat(TITLE_MAX),
            address: "a".repeat(ADDRESS_MAX + 1),
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.for_field("title").is_empty());
        assert_eq!(
            errors.for_field("address"),
            ["Field cannot be longer than 200 characters.".to_owned()]
        );
    }

    #[test]
    fn test_item_form_valid() {
        let stores = [store(1, "Corner Mart")];
        let input = milk_form("1").validate(&stores).unwrap();

        assert_eq!(input.name, "Milk");
        assert_eq!(input.price, Price::parse("3.50").unwrap());
        assert_eq!(input.category, ItemCategory::Dairy);
        assert_eq!(input.photo_url, "http://x/milk.jpg");
        assert_eq!(input.store_id, StoreId::new(1));
    }

    #[test]
    fn test_item_form_rejects_unknown_store() {
        let stores = [store(1, "Corner Mart")];
        let errors = milk_form("2").validate(&stores).unwrap_err();
        assert_eq!(errors.for_field("store"), [INVALID_CHOICE.to_owned()]);
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["store"]);
    }

    #[test]
    fn test_item_form_rejects_non_numeric_store() {
        let stores = [store(1, "Corner Mart")];
        let errors = milk_form("corner").validate(&stores).unwrap_err();
        assert_eq!(errors.for_field("store"), [INVALID_CHOICE.to_owned()]);
    }

    #[test]
    fn test_item_form_price_rules() {
        let stores = [store(1, "Corner Mart")];

        let mut form = milk_form("1");
        form.price = "cheap".to_owned();
        let errors = form.validate(&stores).unwrap_err();
        assert_eq!(errors.for_field("price"), [INVALID_DECIMAL.to_owned()]);

        form.price = "-2".to_owned();
        let errors = form.validate(&stores).unwrap_err();
        assert_eq!(errors.for_field("price"), [NEGATIVE_PRICE.to_owned()]);

        form.price = String::new();
        let errors = form.validate(&stores).unwrap_err();
        assert_eq!(errors.for_field("price"), [REQUIRED.to_owned()]);
    }

    #[test]
    fn test_item_form_category_must_be_known() {
        let stores = [store(1, "Corner Mart")];
        let mut form = milk_form("1");
        form.category = "candy".to_owned();
        let errors = form.validate(&stores).unwrap_err();
        assert_eq!(errors.for_field("category"), [INVALID_CHOICE.to_owned()]);
    }

    #[test]
    fn test_item_form_photo_url_rules() {
        let stores = [store(1, "Corner Mart")];
        for bad in ["not a url", "ftp://x/milk.jpg", "mailto:someone@example.com"] {
            let mut form = milk_form("1");
            form.photo_url = bad.to_owned();
            let errors = form.validate(&stores).unwrap_err();
            assert_eq!(errors.for_field("photo_url"), [INVALID_URL.to_owned()], "{bad}");
        }

        let mut form = milk_form("1");
        form.photo_url = format!("https://x/{}", "a".repeat(PHOTO_URL_MAX));
        let errors = form.validate(&stores).unwrap_err();
        assert_eq!(
            errors.for_field("photo_url"),
            ["Field cannot be longer than 200 characters.".to_owned()]
        );
    }

    #[test]
    fn test_item_form_empty_reports_every_field() {
        let errors = ItemForm::default().validate(&[]).unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(
            fields,
            vec!["category", "name", "photo_url", "price", "store"]
        );
    }

    #[test]
    fn test_from_item_round_trips_through_validate() {
        let stores = [store(4, "Corner Mart")];
        let input = milk_form("4").validate(&stores).unwrap();
        let item = GroceryItem {
            id: grocery_core::ItemId::new(1),
            name: input.name.clone(),
            price: input.price,
            category: input.category,
            photo_url: input.photo_url.clone(),
            store_id: input.store_id,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(ItemForm::from_item(&item).validate(&stores).unwrap(), input);
    }

    #[test]
    fn test_select_options_mark_selection() {
        let stores = [store(1, "Corner Mart"), store(2, "Fresh Co")];
        let form = milk_form("2");

        let selected_stores: Vec<_> = form
            .store_options(&stores)
            .into_iter()
            .filter(|o| o.selected)
            .map(|o| o.label)
            .collect();
        assert_eq!(selected_stores, vec!["Fresh Co".to_owned()]);

        let selected_categories: Vec<_> = form
            .category_options()
            .into_iter()
            .filter(|o| o.selected)
            .map(|o| o.value)
            .collect();
        assert_eq!(selected_categories, vec!["dairy".to_owned()]);
    }
}
