use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("cannot read attachment image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot read downloadable file {path}: {source}")]
    Download {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("downloadable file path {0} has no file name")]
    NoFileName(PathBuf),
}

/// Resources and wording for the attachment shown at the attachment step.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AttachmentConfig {
    pub image_path: PathBuf,
    pub download_path: PathBuf,
    /// Appended to the streamed reply text.
    pub announcement: String,
    pub download_label: String,
    /// Shown under the attachment; not part of the transcript.
    pub closing_note: String,
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            image_path: PathBuf::from("poc_gantt.png"),
            download_path: PathBuf::from("poc_gantt.pptx"),
            announcement:
                "\n\nI've also generated a Gantt chart for you to see the timeline of the project."
                    .to_string(),
            download_label: "You can download the Gantt chart".to_string(),
            closing_note: "I hope this helps! Let me know if you have any questions.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub path: PathBuf,
    pub size: u64,
}

/// A named binary payload, carried base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub mime: &'static str,
    pub size: u64,
    pub data_base64: String,
}

impl Download {
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }

    /// Decode the payload and write it into `dir` under its filename.
    pub fn save_to(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        let bytes = STANDARD.decode(&self.data_base64)?;
        std::fs::create_dir_all(dir)?;
        let target = dir.join(&self.filename);
        std::fs::write(&target, bytes)?;
        Ok(target)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub image: ImageRef,
    pub download: Download,
    pub download_label: String,
    pub closing_note: String,
}

impl Attachment {
    pub fn load(config: &AttachmentConfig) -> Result<Self, AttachmentError> {
        let image_size = std::fs::read(&config.image_path)
            .map(|bytes| bytes.len() as u64)
            .map_err(|source| AttachmentError::Image {
                path: config.image_path.clone(),
                source,
            })?;

        let filename = config
            .download_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| AttachmentError::NoFileName(config.download_path.clone()))?;
        let data = std::fs::read(&config.download_path).map_err(|source| {
            AttachmentError::Download {
                path: config.download_path.clone(),
                source,
            }
        })?;

        Ok(Self {
            image: ImageRef {
                path: config.image_path.clone(),
                size: image_size,
            },
            download: Download {
                filename,
                mime: "application/octet-stream",
                size: data.len() as u64,
                data_base64: STANDARD.encode(data),
            },
            download_label: config.download_label.clone(),
            closing_note: config.closing_note.clone(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Writes an image and a download into `dir` and returns a config pointing at them.
    pub(crate) fn fixture(dir: &TempDir) -> AttachmentConfig {
        let image_path = dir.path().join("chart.png");
        let download_path = dir.path().join("plan.pptx");
        std::fs::write(&image_path, [0x89, b'P', b'N', b'G']).unwrap();
        std::fs::write(&download_path, b"slide deck bytes").unwrap();
        AttachmentConfig {
            image_path,
            download_path,
            ..AttachmentConfig::default()
        }
    }

    #[test]
    fn loads_both_resources() {
        let dir = TempDir::new().unwrap();
        let config = fixture(&dir);

        let attachment = Attachment::load(&config).unwrap();
        assert_eq!(attachment.image.size, 4);
        assert_eq!(attachment.download.filename, "plan.pptx");
        assert_eq!(attachment.download.mime, "application/octet-stream");
        assert_eq!(attachment.download.size, 16);
        assert_eq!(
            STANDARD.decode(&attachment.download.data_base64).unwrap(),
            b"slide deck bytes"
        );
        assert_eq!(
            attachment.download.content_disposition(),
            "attachment; filename=\"plan.pptx\""
        );
    }

    #[test]
    fn missing_image_is_an_error() {
        let dir = TempDir::new().unwrap();
        let config = AttachmentConfig {
            image_path: dir.path().join("absent.png"),
            ..fixture(&dir)
        };

        let err = Attachment::load(&config).unwrap_err();
        assert!(matches!(err, AttachmentError::Image { .. }));
    }

    #[test]
    fn missing_download_is_an_error() {
        let dir = TempDir::new().unwrap();
        let config = AttachmentConfig {
            download_path: dir.path().join("absent.pptx"),
            ..fixture(&dir)
        };

        let err = Attachment::load(&config).unwrap_err();
        assert!(matches!(err, AttachmentError::Download { .. }));
    }

    #[test]
    fn directory_is_not_an_image() {
        let dir = TempDir::new().unwrap();
        let config = AttachmentConfig {
            image_path: dir.path().to_path_buf(),
            ..fixture(&dir)
        };

        assert!(matches!(
            Attachment::load(&config),
            Err(AttachmentError::Image { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn image_without_read_permission_is_an_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let config = fixture(&dir);
        std::fs::set_permissions(&config.image_path, std::fs::Permissions::from_mode(0o000))
            .unwrap();
        // Privileged users read through permission bits; nothing to check then.
        if std::fs::File::open(&config.image_path).is_ok() {
            return;
        }

        assert!(matches!(
            Attachment::load(&config),
            Err(AttachmentError::Image { .. })
        ));
    }

    #[test]
    fn saves_decoded_payload() {
        let dir = TempDir::new().unwrap();
        let attachment = Attachment::load(&fixture(&dir)).unwrap();

        let out = TempDir::new().unwrap();
        let saved = attachment.download.save_to(&out.path().join("downloads")).unwrap();
        assert_eq!(saved.file_name().unwrap(), "plan.pptx");
        assert_eq!(std::fs::read(saved).unwrap(), b"slide deck bytes");
    }
}
