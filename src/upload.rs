//! Client-side checks on a logo before it is sent anywhere.

use crate::config::ConfiguratorConfig;
use crate::error::{ConfiguratorError, Result};

/// What the widget needs to know about a picked or dropped file.
pub trait LogoFile: Clone {
    fn name(&self) -> String;
    fn mime_type(&self) -> String;
    /// Size in bytes.
    fn size(&self) -> f64;
}

impl LogoFile for web_sys::File {
    fn name(&self) -> String { web_sys::File::name(self) }
    fn mime_type(&self) -> String { self.type_() }
    fn size(&self) -> f64 { web_sys::Blob::size(self) }
}

pub fn validate_logo_file<F: LogoFile>(file: &F, config: &ConfiguratorConfig) -> Result<()> {
    let mime = file.mime_type();
    if !config.accepted_types.iter().any(|t| t.eq_ignore_ascii_case(&mime)) {
        return Err(ConfiguratorError::UnsupportedFileType(mime));
    }
    let size = file.size();
    if size > config.max_upload_bytes as f64 {
        return Err(ConfiguratorError::FileTooLarge { size, limit_mb: config.max_upload_mb() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeFile;

    #[test]
    fn accepts_the_supported_image_types() {
        let config = ConfiguratorConfig::default();
        for mime in ["image/png", "image/jpeg", "image/jpg", "image/svg+xml"] {
            assert!(validate_logo_file(&FakeFile::new("logo", mime, 1024.0), &config).is_ok(), "{}", mime);
        }
    }

    #[test]
    fn rejects_other_types() {
        let config = ConfiguratorConfig::default();
        for mime in ["image/gif", "image/webp", "application/pdf", ""] {
            let err = validate_logo_file(&FakeFile::new("logo", mime, 10.0), &config).unwrap_err();
            assert!(matches!(err, ConfiguratorError::UnsupportedFileType(_)), "{}", mime);
        }
    }

    #[test]
    fn size_limit_is_inclusive() {
        let config = ConfiguratorConfig::default();
        let limit = 5.0 * 1024.0 * 1024.0;
        assert!(validate_logo_file(&FakeFile::new("a.png", "image/png", limit), &config).is_ok());
        let err = validate_logo_file(&FakeFile::new("b.png", "image/png", limit + 1.0), &config).unwrap_err();
        assert!(matches!(err, ConfiguratorError::FileTooLarge { limit_mb: 5, .. }));
    }
}
