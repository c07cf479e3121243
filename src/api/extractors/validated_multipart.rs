//! Validated `multipart/form-data` extractor for forms that carry uploads.

use std::collections::HashMap;
use std::path::Path;

use axum::{
    async_trait,
    extract::{FromRef, FromRequest, Multipart, Request},
};
use validator::Validate;

use super::validation_messages;
use crate::errors::{AppError, AppResult};
use crate::types::{UploadDir, UploadWriter, UploadedFile};

/// Build a request type from a parsed multipart form.
///
/// Problems that prevent a field from being read at all (missing or
/// non-numeric ids) are pushed onto `errors` and a placeholder is used, so
/// they are reported together with the `validator` rule violations.
pub trait FromMultipart: Sized {
    fn from_form(form: &mut MultipartForm, errors: &mut Vec<String>) -> Self;
}

/// Text fields and non-empty file parts of a multipart body.
///
/// Field names are matched case-insensitively, ignoring `_` and `-`, so
/// `coverImageFile` and `cover_image_file` are the same field.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

impl MultipartForm {
    /// Drain every part of the body, streaming file parts into `staging`.
    /// Empty file parts count as absent.
    pub async fn read(mut multipart: Multipart, staging: &Path) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?
        {
            let Some(name) = field.name().map(normalize_key) else {
                continue;
            };

            match field.file_name().map(str::to_owned) {
                Some(file_name) => {
                    let mut writer = UploadWriter::create(staging, file_name).await?;
                    while let Some(chunk) = field
                        .chunk()
                        .await
                        .map_err(|e| AppError::bad_request(e.body_text()))?
                    {
                        writer.write(&chunk).await?;
                    }
                    let file = writer.finish().await?;
                    if !file.is_empty() {
                        form.files.insert(name, file);
                    }
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::bad_request(e.body_text()))?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// Build a form from already separated parts.
    pub fn from_parts<K: AsRef<str>>(
        fields: impl IntoIterator<Item = (K, String)>,
        files: impl IntoIterator<Item = (K, UploadedFile)>,
    ) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (normalize_key(k.as_ref()), v))
                .collect(),
            files: files
                .into_iter()
                .map(|(k, v)| (normalize_key(k.as_ref()), v))
                .collect(),
        }
    }

    pub fn text(&mut self, key: &str) -> Option<String> {
        self.fields.remove(&normalize_key(key))
    }

    /// Text value, empty when missing (length rules then report it).
    pub fn text_or_default(&mut self, key: &str) -> String {
        self.text(key).unwrap_or_default()
    }

    /// Optional integer; blank counts as absent.
    pub fn optional_i32(&mut self, key: &str, label: &str, errors: &mut Vec<String>) -> Option<i32> {
        let raw = self.text(key)?;
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                errors.push(format!("{} must be a whole number.", label));
                None
            }
        }
    }

    pub fn required_i32(&mut self, key: &str, label: &str, errors: &mut Vec<String>) -> i32 {
        let before = errors.len();
        match self.optional_i32(key, label, errors) {
            Some(value) => value,
            None => {
                if errors.len() == before {
                    errors.push(format!("{} is required.", label));
                }
                0
            }
        }
    }

    pub fn file(&mut self, key: &str) -> Option<UploadedFile> {
        self.files.remove(&normalize_key(key))
    }
}

/// Multipart body parsed into `T` and checked with its `validator` rules.
///
/// File parts are staged in the state's [`UploadDir`]; if the form is
/// rejected they are removed again.
pub struct ValidatedMultipart<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedMultipart<T>
where
    S: Send + Sync,
    UploadDir: FromRef<S>,
    T: FromMultipart + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let UploadDir(staging) = UploadDir::from_ref(state);
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        let mut form = MultipartForm::read(multipart, &staging).await?;

        let mut errors = Vec::new();
        let value = T::from_form(&mut form, &mut errors);
        if let Err(e) = value.validate() {
            errors.extend(validation_messages(&e));
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        Ok(ValidatedMultipart(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;

    #[derive(Debug, Validate)]
    struct TrackForm {
        #[validate(length(min = 1, message = "Title is required."))]
        title: String,
        story_id: i32,
        file: Option<UploadedFile>,
    }

    impl FromMultipart for TrackForm {
        fn from_form(form: &mut MultipartForm, errors: &mut Vec<String>) -> Self {
            Self {
                title: form.text_or_default("title"),
                story_id: form.required_i32("storyId", "Story ID", errors),
                file: form.file("file"),
            }
        }
    }

    const BOUNDARY: &str = "XBOUNDARYX";

    fn staging() -> (tempfile::TempDir, UploadDir) {
        let dir = tempfile::tempdir().unwrap();
        let staging = UploadDir(dir.path().join("staging"));
        (dir, staging)
    }

    fn staged_count(staging: &UploadDir) -> usize {
        std::fs::read_dir(&staging.0).map(|d| d.count()).unwrap_or(0)
    }

    fn multipart_request(parts: &[(&str, Option<&str>, &str)]) -> Request {
        let mut body = String::new();
        for (name, file_name, value) in parts {
            body.push_str(&format!("--{}\r\n", BOUNDARY));
            match file_name {
                Some(file_name) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                    name, file_name
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    name
                )),
            }
            body.push_str(value);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{}--\r\n", BOUNDARY));

        axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_reads_fields_and_streams_file_to_staging() {
        let (_dir, staging) = staging();
        let req = multipart_request(&[
            ("title", None, "Chapter 1"),
            ("story_id", None, "7"),
            ("file", Some("one.mp3"), "bytes"),
        ]);

        let ValidatedMultipart(form) =
            ValidatedMultipart::<TrackForm>::from_request(req, &staging)
                .await
                .unwrap();

        assert_eq!(form.title, "Chapter 1");
        assert_eq!(form.story_id, 7);
        let file = form.file.unwrap();
        assert_eq!(file.extension(), ".mp3");
        assert_eq!(file.size, 5);
        assert!(file.staged_path().starts_with(&staging.0));
        assert_eq!(std::fs::read(file.staged_path()).unwrap(), b"bytes");
    }

    #[tokio::test]
    async fn test_empty_file_counts_as_missing() {
        let (_dir, staging) = staging();
        let req = multipart_request(&[
            ("title", None, "Chapter 1"),
            ("storyId", None, "7"),
            ("file", Some("one.mp3"), ""),
        ]);

        let ValidatedMultipart(form) =
            ValidatedMultipart::<TrackForm>::from_request(req, &staging)
                .await
                .unwrap();

        assert!(form.file.is_none());
        assert_eq!(staged_count(&staging), 0);
    }

    #[tokio::test]
    async fn test_collects_every_error() {
        let (_dir, staging) = staging();
        let req = multipart_request(&[
            ("storyId", None, "seven"),
            ("file", Some("one.mp3"), "bytes"),
        ]);

        let err = ValidatedMultipart::<TrackForm>::from_request(req, &staging)
            .await
            .err()
            .unwrap();
        // the rejected form's upload is not kept
        assert_eq!(staged_count(&staging), 0);

        match err {
            AppError::Validation(errors) => {
                assert_eq!(
                    errors,
                    vec![
                        "Story ID must be a whole number.".to_string(),
                        "Title is required.".to_string()
                    ]
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_truncated_upload_leaves_no_partial_file() {
        let (_dir, staging) = staging();
        let body = format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"one.mp3\"\r\n\r\npartial audio",
            BOUNDARY
        );
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();

        let result = ValidatedMultipart::<TrackForm>::from_request(req, &staging).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(staged_count(&staging), 0);
    }

    #[test]
    fn test_required_i32_reports_missing() {
        let mut form = MultipartForm::default();
        let mut errors = Vec::new();

        assert_eq!(form.required_i32("authorId", "Author ID", &mut errors), 0);
        assert_eq!(errors, vec!["Author ID is required.".to_string()]);
    }
}
