//! Custom Extractors
//!
//! Multipart form collection and path parsing helpers.

use std::collections::HashMap;

use axum::extract::{FromRequest, Multipart, Request};
use rust_decimal::Decimal;

use crate::domain::services::PhotoUpload;
use crate::shared::error::AppError;

/// Parse a numeric path segment.
pub fn parse_id(raw: &str, entity: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid {} ID", entity)))
}

/// A fully buffered multipart form.
///
/// Text fields keep every value sent under the same name, so repeated
/// fields such as `product_ids` survive. File fields without a file name
/// or without content are dropped, matching an untouched file input.
#[derive(Debug, Default)]
pub struct MultipartForm {
    texts: HashMap<String, Vec<String>>,
    files: HashMap<String, Vec<PhotoUpload>>,
}

impl MultipartForm {
    pub async fn collect(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field.bytes().await?;
                    if file_name.trim().is_empty() || bytes.is_empty() {
                        continue;
                    }
                    form.files.entry(name).or_default().push(PhotoUpload {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
                None => {
                    let value = field.text().await?;
                    form.texts.entry(name).or_default().push(value);
                }
            }
        }

        Ok(form)
    }

    /// First non-blank value of a text field.
    pub fn text(&self, name: &str) -> Option<String> {
        self.texts
            .get(name)?
            .iter()
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .map(String::from)
    }

    /// Money field; blank or missing is zero.
    pub fn decimal(&self, name: &str) -> Result<Decimal, AppError> {
        match self.text(name) {
            None => Ok(Decimal::ZERO),
            Some(raw) => raw
                .replace(',', ".")
                .parse()
                .map_err(|_| AppError::BadRequest(format!("{} must be a number", name))),
        }
    }

    /// Every non-blank value of a repeated ID field, in order.
    pub fn ids(&self, name: &str) -> Result<Vec<i64>, AppError> {
        self.texts
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(|v| {
                v.parse()
                    .map_err(|_| AppError::BadRequest(format!("{} must contain numeric IDs", name)))
            })
            .collect()
    }

    pub fn files(&mut self, name: &str) -> Vec<PhotoUpload> {
        self.files.remove(name).unwrap_or_default()
    }

    pub fn file(&mut self, name: &str) -> Option<PhotoUpload> {
        self.files(name).into_iter().next()
    }
}

impl<S> FromRequest<S> for MultipartForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Self::collect(multipart).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn form(texts: &[(&str, &str)]) -> MultipartForm {
        let mut form = MultipartForm::default();
        for (name, value) in texts {
            form.texts
                .entry(name.to_string())
                .or_default()
                .push(value.to_string());
        }
        form
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42", "wash job").unwrap(), 42);
        assert!(matches!(parse_id("abc", "wash job"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_decimal_defaults_to_zero() {
        let form = form(&[("charged_amount", " ")]);
        assert_eq!(form.decimal("charged_amount").unwrap(), Decimal::ZERO);
        assert_eq!(form.decimal("missing").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_decimal_accepts_comma() {
        let form = form(&[("charged_amount", "85,50")]);
        assert_eq!(form.decimal("charged_amount").unwrap(), dec!(85.50));
    }

    #[test]
    fn test_decimal_rejects_text() {
        let form = form(&[("charged_amount", "abc")]);
        assert!(form.decimal("charged_amount").is_err());
    }

    #[test]
    fn test_repeated_ids_keep_order() {
        let form = form(&[("product_ids", "3"), ("product_ids", ""), ("product_ids", "3"), ("product_ids", "1")]);
        assert_eq!(form.ids("product_ids").unwrap(), vec![3, 3, 1]);
        assert!(form.ids("missing").unwrap().is_empty());
    }

    #[test]
    fn test_files_are_taken_once() {
        let mut form = MultipartForm::default();
        form.files.insert(
            "photos".into(),
            vec![PhotoUpload {
                file_name: "a.jpg".into(),
                bytes: vec![1],
            }],
        );

        assert_eq!(form.files("photos").len(), 1);
        assert!(form.file("photos").is_none());
    }
}
