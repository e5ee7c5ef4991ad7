//! File attachments for multipart uploads

use reqwest::multipart::{Form, Part};

use crate::error::HttpResult;

/// A file to attach to an outgoing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub name: String,
    pub data: Vec<u8>,
    pub content_type: Option<String>,
}

impl FileContent {
    /// Create a file attachment
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            content_type: None,
        }
    }

    /// Set the MIME type
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    fn into_part(self) -> HttpResult<Part> {
        let part = Part::bytes(self.data).file_name(self.name);
        match self.content_type {
            Some(mime) => Ok(part.mime_str(&mime)?),
            None => Ok(part),
        }
    }
}

/// Build the multipart body: `payload_json` plus one `file{n}` part per attachment
pub(crate) fn build_form(payload_json: String, files: Vec<FileContent>) -> HttpResult<Form> {
    let mut form = Form::new().text("payload_json", payload_json);
    for (index, file) in files.into_iter().enumerate() {
        form = form.part(format!("file{index}"), file.into_part()?);
    }
    Ok(form)
}
