//! Wire rows for the letters table.
//!
//! Rows are decoded into these DTOs first and converted to domain letters in
//! one pass, so a malformed row surfaces as a decode error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::domain::{Behavior, Letter, LetterId, NewLetter};

#[derive(Debug, Deserialize)]
pub(super) struct LetterRowDto {
    pub(super) id: Uuid,
    pub(super) name: String,
    pub(super) age: Option<i64>,
    pub(super) email: Option<String>,
    pub(super) phone: Option<String>,
    pub(super) behavior: String,
    pub(super) wishlist: String,
    pub(super) image_url: Option<String>,
    #[serde(default)]
    pub(super) is_read: bool,
    pub(super) created_at: DateTime<Utc>,
}

impl LetterRowDto {
    pub(super) fn into_domain(self) -> Result<Letter, String> {
        let id = self.id;
        let age = self
            .age
            .map(|age| {
                u8::try_from(age).map_err(|_| format!("row {id} has out-of-range age {age}"))
            })
            .transpose()?;
        let behavior: Behavior = self
            .behavior
            .parse()
            .map_err(|err| format!("row {id}: {err}"))?;
        let image_url = self
            .image_url
            .filter(|raw| !raw.is_empty())
            .map(|raw| {
                Url::parse(&raw).map_err(|err| format!("row {id} has invalid image_url: {err}"))
            })
            .transpose()?;

        Ok(Letter {
            id: LetterId::from_uuid(id),
            name: self.name,
            age,
            email: self.email,
            phone: self.phone,
            behavior,
            wishlist: self.wishlist,
            image_url,
            is_read: self.is_read,
            created_at: self.created_at,
        })
    }
}

/// Insert payload. `id`, `is_read` and `created_at` are assigned by the
/// backend.
#[derive(Debug, Serialize)]
pub(super) struct NewLetterRowDto<'a> {
    name: &'a str,
    age: Option<u8>,
    email: Option<&'a str>,
    phone: Option<&'a str>,
    behavior: &'static str,
    wishlist: &'a str,
    image_url: Option<&'a str>,
}

impl<'a> From<&'a NewLetter> for NewLetterRowDto<'a> {
    fn from(letter: &'a NewLetter) -> Self {
        Self {
            name: letter.name(),
            age: letter.age(),
            email: letter.email(),
            phone: letter.phone(),
            behavior: letter.behavior().as_str(),
            wishlist: letter.wishlist(),
            image_url: letter.image_url().map(Url::as_str),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ReadFlagDto {
    pub(super) is_read: bool,
}

pub(super) fn decode_rows(body: &[u8]) -> Result<Vec<Letter>, String> {
    let rows: Vec<LetterRowDto> =
        serde_json::from_slice(body).map_err(|err| format!("invalid letter rows: {err}"))?;
    rows.into_iter().map(LetterRowDto::into_domain).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LetterDraft;
    use serde_json::json;

    fn row(overrides: serde_json::Value) -> Vec<u8> {
        let mut base = json!({
            "id": "3f2a9c1b-0000-4000-8000-000000000001",
            "name": "Tom",
            "age": 7,
            "email": null,
            "phone": "555-0100",
            "behavior": "nice",
            "wishlist": "a kite",
            "image_url": null,
            "is_read": false,
            "created_at": "2025-12-01T09:00:00.123456+00:00"
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), overrides.as_object()) {
            for (key, value) in extra {
                base.insert(key.clone(), value.clone());
            }
        }
        serde_json::to_vec(&json!([base])).expect("serialise row")
    }

    #[test]
    fn decodes_a_backend_row() {
        let letters = decode_rows(&row(json!({
            "image_url": "https://abc.example.co/storage/v1/object/public/letter-images/1-a.jpg"
        })))
        .expect("row decodes");

        let letter = &letters[0];
        assert_eq!(letter.name, "Tom");
        assert_eq!(letter.age, Some(7));
        assert_eq!(letter.behavior, Behavior::Nice);
        assert_eq!(letter.id.ticket_number(), "3F2A9C1B");
        assert!(letter.image_url.is_some());
    }

    #[test]
    fn missing_read_flag_defaults_to_unread() {
        let mut body: serde_json::Value =
            serde_json::from_slice(&row(json!({}))).expect("valid json");
        if let Some(first) = body[0].as_object_mut() {
            first.remove("is_read");
        }
        let bytes = serde_json::to_vec(&body).expect("serialise");

        let letters = decode_rows(&bytes).expect("row decodes");

        assert!(!letters[0].is_read);
    }

    #[test]
    fn unknown_behaviour_is_a_decode_error() {
        let err = decode_rows(&row(json!({ "behavior": "grumpy" }))).expect_err("bad row");
        assert!(err.contains("grumpy"), "unexpected message: {err}");
    }

    #[test]
    fn out_of_range_age_is_a_decode_error() {
        let err = decode_rows(&row(json!({ "age": 300 }))).expect_err("bad row");
        assert!(err.contains("300"), "unexpected message: {err}");
    }

    #[test]
    fn insert_payload_uses_column_names() {
        let letter = LetterDraft {
            name: "Amy".into(),
            wishlist: "a sled".into(),
            behavior: Behavior::Naughty,
            ..LetterDraft::default()
        }
        .validate()
        .expect("valid draft")
        .into_new_letter(None);

        let payload = serde_json::to_value(NewLetterRowDto::from(&letter)).expect("serialise");

        assert_eq!(payload["behavior"], "naughty");
        assert_eq!(payload["image_url"], serde_json::Value::Null);
        assert!(payload.get("is_read").is_none());
    }
}
