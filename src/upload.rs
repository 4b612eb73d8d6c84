//! Multipart intake and the binary asset abstraction shared by reports,
//! blogs and profile pictures.

use std::collections::HashMap;

use axum::{
    body::Body,
    extract::Multipart,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use base64::{Engine, engine::general_purpose::STANDARD};

use crate::error::{AppError, AppResult};

pub const PDF_MIME: &str = "application/pdf";

/// Uploaded or stored bytes together with their MIME type.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryAsset {
    pub data: Vec<u8>,
    pub content_type: String,
}

impl BinaryAsset {
    pub fn new(data: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            data,
            content_type: content_type.into(),
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type == PDF_MIME
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    /// Inline `data:` URI used for profile pictures.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.data))
    }

    /// Human readable size, e.g. `"1.50 MB"`.
    pub fn size_label(&self) -> String {
        format!("{:.2} MB", self.data.len() as f64 / (1024.0 * 1024.0))
    }

    pub fn into_download(self, disposition: Disposition) -> Response {
        let mut response = (StatusCode::OK, Body::from(self.data)).into_response();
        let headers = response.headers_mut();
        if let Ok(value) = HeaderValue::from_str(&self.content_type) {
            headers.insert(header::CONTENT_TYPE, value);
        }
        if let Some(value) = disposition.header_value() {
            headers.insert(header::CONTENT_DISPOSITION, value);
        }
        response
    }
}

#[derive(Debug, Clone)]
pub enum Disposition {
    None,
    Inline,
    Attachment(String),
}

impl Disposition {
    fn header_value(&self) -> Option<HeaderValue> {
        match self {
            Disposition::None => None,
            Disposition::Inline => Some(HeaderValue::from_static("inline")),
            Disposition::Attachment(name) => {
                let safe: String = name
                    .chars()
                    .filter(|c| *c != '"' && *c != '\\' && !c.is_control())
                    .collect();
                HeaderValue::from_str(&format!("attachment; filename=\"{safe}\"")).ok()
            }
        }
    }
}

/// A fully buffered multipart body: text parts by name and file parts by name.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, BinaryAsset>,
}

impl MultipartForm {
    /// Buffers every part. File parts must be PDFs or images and no larger
    /// than `max_file_bytes`.
    pub async fn read(mut multipart: Multipart, max_file_bytes: usize) -> AppResult<Self> {
        let mut form = MultipartForm::default();
        while let Some(field) = multipart.next_field().await? {
            let name = match field.name() {
                Some(n) => n.to_string(),
                None => continue,
            };

            if field.file_name().is_none() {
                let value = field.text().await?;
                form.fields.insert(name, value);
                continue;
            }

            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field.bytes().await?;
            if data.is_empty() {
                continue;
            }
            if data.len() > max_file_bytes {
                return Err(AppError::validation(format!("File `{name}` is too large")));
            }

            let asset = BinaryAsset::new(data.to_vec(), content_type);
            if !asset.is_pdf() && !asset.is_image() {
                return Err(AppError::validation(format!(
                    "File `{name}` must be a PDF or an image"
                )));
            }
            form.files.insert(name, asset);
        }
        Ok(form)
    }

    /// Non-blank text field.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn take_image(&mut self, name: &str) -> AppResult<Option<BinaryAsset>> {
        match self.files.remove(name) {
            Some(asset) if !asset.is_image() => Err(AppError::validation(format!(
                "File `{name}` must be an image"
            ))),
            other => Ok(other),
        }
    }

    pub fn take_pdf(&mut self, name: &str) -> AppResult<Option<BinaryAsset>> {
        match self.files.remove(name) {
            Some(asset) if !asset.is_pdf() => Err(AppError::validation(format!(
                "File `{name}` must be a PDF"
            ))),
            other => Ok(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{extract::FromRequest, http::Request};

    use super::*;

    const BOUNDARY: &str = "X-BOUNDARY";

    fn multipart_request(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn text_part(name: &str, value: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
    }

    fn file_part(name: &str, file: &str, mime: &str, data: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file}\"\r\nContent-Type: {mime}\r\n\r\n{data}\r\n"
        )
    }

    #[tokio::test]
    async fn splits_text_and_file_parts() {
        let body = format!(
            "{}{}--{BOUNDARY}--\r\n",
            text_part("reportName", "Solar 2030"),
            file_part("thumbnail", "t.png", "image/png", "PNGDATA"),
        );
        let multipart = Multipart::from_request(multipart_request(body), &()).await.unwrap();
        let mut form = MultipartForm::read(multipart, 1024).await.unwrap();

        assert_eq!(form.text("reportName"), Some("Solar 2030"));
        let thumb = form.take_image("thumbnail").unwrap().unwrap();
        assert_eq!(thumb.data, b"PNGDATA");
        assert_eq!(thumb.content_type, "image/png");
    }

    #[tokio::test]
    async fn rejects_unsupported_mime() {
        let body = format!(
            "{}--{BOUNDARY}--\r\n",
            file_part("file", "x.exe", "application/x-msdownload", "MZ")
        );
        let multipart = Multipart::from_request(multipart_request(body), &()).await.unwrap();
        assert!(MultipartForm::read(multipart, 1024).await.is_err());
    }

    #[tokio::test]
    async fn rejects_oversized_files() {
        let body = format!(
            "{}--{BOUNDARY}--\r\n",
            file_part("file", "r.pdf", PDF_MIME, "0123456789")
        );
        let multipart = Multipart::from_request(multipart_request(body), &()).await.unwrap();
        assert!(MultipartForm::read(multipart, 4).await.is_err());
    }

    #[test]
    fn data_uri_and_size_label() {
        let asset = BinaryAsset::new(b"hi".to_vec(), "image/png");
        assert_eq!(asset.to_data_uri(), "data:image/png;base64,aGk=");

        let big = BinaryAsset::new(vec![0; 1024 * 1024 + 512 * 1024], PDF_MIME);
        assert_eq!(big.size_label(), "1.50 MB");
    }

    #[test]
    fn attachment_names_are_quoted_safely() {
        let value = Disposition::Attachment("Q3 \"Solar\".pdf".into())
            .header_value()
            .unwrap();
        assert_eq!(value, "attachment; filename=\"Q3 Solar.pdf\"");
    }
}
