//! Attachment loading and `multipart/form-data` encoding.
//!
//! # Design
//! Attachments are read fully into memory while the request is built and
//! dropped with it. Every request gets a fresh boundary: a fixed marker
//! followed by a UUID v4, so part content cannot collide with it by chance.

use std::fs;
use std::path::Path;

use serde_json::Value;
use uuid::Uuid;

use crate::error::ClientError;
use crate::Fields;

const BOUNDARY_MARKER: &str = "-------------";
const EOL: &str = "\r\n";

/// A local file embedded as one multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Base file name; used as both the part name and its filename.
    pub name: String,
    pub content: Vec<u8>,
}

/// Read every path into an attachment, failing on the first unreadable one.
///
/// A repeated base name overwrites the earlier attachment's content in
/// place.
pub fn load_attachments<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Attachment>, ClientError> {
    let mut attachments: Vec<Attachment> = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let content = fs::read(path).map_err(|source| ClientError::Attachment {
            path: path.to_path_buf(),
            source,
        })?;
        let name = base_name(path);
        match attachments.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.content = content,
            None => attachments.push(Attachment { name, content }),
        }
    }
    Ok(attachments)
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Per-request multipart boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    delimiter: String,
}

impl Boundary {
    pub fn generate() -> Self {
        Self::from_token(&Uuid::new_v4().simple().to_string())
    }

    pub fn from_token(token: &str) -> Self {
        Self {
            delimiter: format!("{BOUNDARY_MARKER}{token}"),
        }
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.delimiter)
    }
}

/// Encode text fields followed by attachments, closed by a single final
/// boundary.
pub fn encode_multipart(boundary: &Boundary, fields: &Fields, attachments: &[Attachment]) -> Vec<u8> {
    let delimiter = boundary.delimiter();
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(format!("--{delimiter}{EOL}").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"{EOL}{EOL}").as_bytes(),
        );
        body.extend_from_slice(field_text(value).as_bytes());
        body.extend_from_slice(EOL.as_bytes());
    }

    for attachment in attachments {
        let name = &attachment.name;
        body.extend_from_slice(format!("--{delimiter}{EOL}").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"; filename=\"{name}\"{EOL}")
                .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Transfer-Encoding: binary{EOL}{EOL}").as_bytes());
        body.extend_from_slice(&attachment.content);
        body.extend_from_slice(EOL.as_bytes());
    }

    body.extend_from_slice(format!("--{delimiter}--{EOL}").as_bytes());
    body
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn generated_boundaries_are_unique_and_marked() {
        let a = Boundary::generate();
        let b = Boundary::generate();
        assert_ne!(a, b);
        assert!(a.delimiter().starts_with("-------------"));
        assert_eq!(
            a.content_type(),
            format!("multipart/form-data; boundary={}", a.delimiter())
        );
    }

    #[test]
    fn encodes_fields_then_files_with_one_closing_boundary() {
        let boundary = Boundary::from_token("abc");
        let attachments = vec![Attachment {
            name: "a.txt".to_string(),
            content: b"hello".to_vec(),
        }];
        let body = encode_multipart(&boundary, &fields(json!({"title": "Doc", "n": 3})), &attachments);
        let expected = "---------------abc\r\n\
             Content-Disposition: form-data; name=\"n\"\r\n\r\n3\r\n\
             ---------------abc\r\n\
             Content-Disposition: form-data; name=\"title\"\r\n\r\nDoc\r\n\
             ---------------abc\r\n\
             Content-Disposition: form-data; name=\"a.txt\"; filename=\"a.txt\"\r\n\
             Content-Transfer-Encoding: binary\r\n\r\nhello\r\n\
             ---------------abc--\r\n";
        assert_eq!(String::from_utf8(body).unwrap(), expected);
    }

    #[test]
    fn null_field_is_sent_as_empty_text() {
        let boundary = Boundary::from_token("zz");
        let attachments = vec![Attachment {
            name: "a.txt".to_string(),
            content: b"x".to_vec(),
        }];
        let body = encode_multipart(&boundary, &fields(json!({"note": null})), &attachments);
        let body = String::from_utf8(body).unwrap();
        assert!(body.contains("name=\"note\"\r\n\r\n\r\n"), "{body}");
        assert!(!body.contains("null"));
    }

    #[test]
    fn binary_content_is_kept_verbatim() {
        let boundary = Boundary::from_token("bin");
        let content = vec![0u8, 159, 146, 150, 255];
        let attachments = vec![Attachment {
            name: "blob".to_string(),
            content: content.clone(),
        }];
        let body = encode_multipart(&boundary, &Fields::new(), &attachments);
        assert!(body.windows(content.len()).any(|w| w == content.as_slice()));
    }

    #[test]
    fn missing_file_fails_with_its_path() {
        let err = load_attachments(&["/definitely/not/here.bin"]).unwrap_err();
        match err {
            ClientError::Attachment { path, .. } => {
                assert_eq!(path, PathBuf::from("/definitely/not/here.bin"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_names_keep_last_content() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("one");
        let second = dir.path().join("two");
        fs::create_dir(&first).unwrap();
        fs::create_dir(&second).unwrap();
        fs::write(first.join("report.csv"), "old").unwrap();
        fs::write(second.join("report.csv"), "new").unwrap();
        fs::write(dir.path().join("other.txt"), "x").unwrap();

        let attachments = load_attachments(&[
            first.join("report.csv"),
            dir.path().join("other.txt"),
            second.join("report.csv"),
        ])
        .unwrap();

        assert_eq!(attachments.len(), 2);
        assert_eq!(attachments[0].name, "report.csv");
        assert_eq!(attachments[0].content, b"new");
        assert_eq!(attachments[1].name, "other.txt");
    }
}
