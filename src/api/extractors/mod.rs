//! Request extractors that validate their payload before the handler runs.

mod validated_json;
mod validated_multipart;

pub use validated_json::ValidatedJson;
pub use validated_multipart::{FromMultipart, MultipartForm, ValidatedMultipart};

/// Every violated rule as a user-facing message, ordered by field name.
pub(crate) fn validation_messages(errors: &validator::ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect()
}
