// Identity extraction from a validated callback
use crate::models::IdentityRecord;

use super::callback::ValidatedCallback;
use super::signature::HASH_FIELD;

pub struct IdentityExtractor;

impl IdentityExtractor {
    /// Map a validated callback to an [`IdentityRecord`]
    ///
    /// Optional fields that are absent or empty become `None`.
    #[must_use]
    pub fn extract(validated: &ValidatedCallback) -> IdentityRecord {
        let params = validated.params();
        let field = |key: &str| params.get(key).unwrap_or_default().to_string();
        let optional = |key: &str| params.present(key).map(ToString::to_string);

        let first_name = field("first_name");
        let last_name = field("last_name");

        IdentityRecord {
            uid: field("id"),
            display_name: format!("{first_name} {last_name}"),
            username: optional("username"),
            first_name,
            last_name,
            avatar_url: optional("photo_url"),
            issued_at: validated.auth_date(),
            raw_info: params
                .iter()
                .filter(|(key, _)| *key != HASH_FIELD)
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        }
    }
}
