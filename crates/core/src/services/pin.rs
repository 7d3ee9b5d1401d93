//! Pin service.
//!
//! Pins carry an optional stored title; when it is absent the display
//! title falls back through tags, then the source URL host, then a
//! fixed placeholder. The fallback is evaluated at read time (and at
//! each repin hop) so it always reflects the pin's current attributes.

use pinboard_common::{AppError, AppResult, IdGenerator};
use pinboard_db::{
    entities::{picture, pin},
    repositories::{PinRepository, PinRow},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Pin service for business logic.
#[derive(Clone)]
pub struct PinService {
    pin_repo: PinRepository,
    id_gen: IdGenerator,
}

/// Input for creating a new pin.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePinInput {
    #[validate(length(max = 256))]
    pub title: Option<String>,

    #[validate(length(max = 1024))]
    pub tags: Option<String>,

    #[validate(url)]
    pub source_url: Option<String>,

    /// URL reference to the pin's image.
    #[validate(length(min = 1, max = 1024))]
    pub image_url: String,
}

impl PinService {
    /// Create a new pin service.
    #[must_use]
    pub fn new(pin_repo: PinRepository) -> Self {
        Self {
            pin_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create an original pin and its picture. A blank title is stored
    /// as null so the display title stays derived.
    pub async fn create(
        &self,
        user_id: &str,
        board_id: &str,
        input: CreatePinInput,
    ) -> AppResult<pin::Model> {
        input.validate()?;

        let pin_id = self.id_gen.generate();

        let pin_model = pin::ActiveModel {
            id: Set(pin_id.clone()),
            user_id: Set(user_id.to_string()),
            board_id: Set(board_id.to_string()),
            title: Set(normalize_title(input.title)),
            tags: Set(input.tags),
            source_url: Set(input.source_url),
            original_pin_id: Set(None),
            ..Default::default()
        };

        let picture_model = picture::ActiveModel {
            id: Set(self.id_gen.generate()),
            pin_id: Set(pin_id),
            uploaded_url: Set(Some(input.image_url)),
            ..Default::default()
        };

        self.pin_repo
            .create_with_picture(pin_model, picture_model)
            .await
    }

    /// Repin an existing pin onto one of `user_id`'s boards.
    ///
    /// The new pin points at the source pin, copies its descriptive
    /// attributes, and gets its own picture row referencing the same
    /// image URL. A stored title copies verbatim; an absent one stays
    /// absent, so derivation re-runs at each hop.
    pub async fn repin(
        &self,
        user_id: &str,
        source_pin_id: &str,
        target_board_id: &str,
    ) -> AppResult<pin::Model> {
        let source = self
            .pin_repo
            .find_detail(source_pin_id)
            .await?
            .ok_or_else(|| AppError::PinNotFound(source_pin_id.to_string()))?;

        let pin_id = self.id_gen.generate();

        let pin_model = pin::ActiveModel {
            id: Set(pin_id.clone()),
            user_id: Set(user_id.to_string()),
            board_id: Set(target_board_id.to_string()),
            title: Set(source.title),
            tags: Set(source.tags),
            source_url: Set(source.source_url),
            original_pin_id: Set(Some(source_pin_id.to_string())),
            ..Default::default()
        };

        let picture_model = picture::ActiveModel {
            id: Set(self.id_gen.generate()),
            pin_id: Set(pin_id),
            uploaded_url: Set(source.image_url),
            ..Default::default()
        };

        self.pin_repo
            .create_with_picture(pin_model, picture_model)
            .await
    }

    /// Get a pin with its board, author and picture.
    pub async fn get_detail(&self, pin_id: &str) -> AppResult<PinRow> {
        self.pin_repo
            .find_detail(pin_id)
            .await?
            .ok_or_else(|| AppError::PinNotFound(pin_id.to_string()))
    }

    /// List a board's pins, most recent first.
    pub async fn list_for_board(&self, board_id: &str) -> AppResult<Vec<PinRow>> {
        self.pin_repo.find_by_board(board_id).await
    }

    /// List the newest pins across all boards.
    pub async fn list_recent(&self, limit: u64) -> AppResult<Vec<PinRow>> {
        self.pin_repo.find_recent(limit).await
    }

    /// Delete a pin. Only the pin's owner may do this; the store
    /// cascades to its picture, repins, likes and comments.
    pub async fn delete(&self, acting_user_id: &str, pin_id: &str) -> AppResult<()> {
        let pin = self.pin_repo.get_by_id(pin_id).await?;

        if pin.user_id != acting_user_id {
            return Err(AppError::Forbidden(
                "Only the pin owner can delete it".to_string(),
            ));
        }

        self.pin_repo.delete(pin).await
    }
}

/// Collapse a blank or whitespace-only title to `None`.
fn normalize_title(title: Option<String>) -> Option<String> {
    title.filter(|t| !t.trim().is_empty())
}

/// Resolve a pin's display title: the stored title if present,
/// otherwise derived from tags or source URL.
#[must_use]
pub fn resolve_title(
    title: Option<&str>,
    tags: Option<&str>,
    source_url: Option<&str>,
) -> String {
    match title {
        Some(t) if !t.trim().is_empty() => t.to_string(),
        _ => derive_title(tags, source_url),
    }
}

/// Derive a display title from tags or a source URL.
///
/// The first comma-separated tag wins, trimmed and with its first
/// character uppercased. Failing that, the source URL's host (scheme
/// and leading `www.` stripped) yields `"Pin from <host>"`. Failing
/// both, `"Untitled Pin"`.
#[must_use]
pub fn derive_title(tags: Option<&str>, source_url: Option<&str>) -> String {
    if let Some(tags) = tags {
        let first = tags.split(',').next().unwrap_or("").trim();
        if !first.is_empty() {
            return capitalize(first);
        }
    }

    if let Some(url) = source_url {
        let stripped = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .unwrap_or(url);
        let stripped = stripped.strip_prefix("www.").unwrap_or(stripped);
        let host = stripped.split('/').next().unwrap_or("").trim();
        if !host.is_empty() {
            return format!("Pin from {host}");
        }
    }

    "Untitled Pin".to_string()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
