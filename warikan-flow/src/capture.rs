//! Capture flow with offline fallback
//!
//! ```text
//! CheckConnectivity
//!   ├── Online: Upload
//!   │     ├── Success: navigate to receipt details
//!   │     └── Failure: fallback
//!   └── Offline: fallback
//!
//! fallback
//!   ├── Camera photo: save to device library
//!   └── Library photo: cannot re-save, inform the user
//! ```
//!
//! Every terminal branch produces a [`CaptureOutcome`] carrying the
//! navigation target, a status or error message for the capture screen,
//! and a haptic cue. Platform effects sit behind the [`Connectivity`],
//! [`MediaLibrary`] and [`ReceiptUploader`] seams.

use async_trait::async_trait;
use shared::ReceiptParseResult;
use thiserror::Error;
use warikan_client::{ClientError, HttpClient};

/// Where the photo came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoSource {
    /// Taken with the camera just now; not yet in the user's library
    Camera,
    /// Picked from the library; already persisted there
    Library,
}

/// A photo ready for upload
#[derive(Debug, Clone)]
pub struct CapturedPhoto {
    pub jpeg: Vec<u8>,
    pub file_name: String,
    pub source: PhotoSource,
}

/// Errors from the platform seams
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaptureError {
    /// Photo library access denied; the user can open settings
    #[error("Photo library access is denied")]
    PermissionDenied,

    /// Saving the photo failed for another reason
    #[error("Could not save the photo: {0}")]
    SaveFailed(String),
}

/// Haptic feedback cue fired on a terminal branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticCue {
    Success,
    Warning,
    Error,
}

/// Where to navigate after the flow finishes
#[derive(Debug, Clone, PartialEq)]
pub enum NavTarget {
    /// Upload succeeded; open the editing screen with the parse result
    ReceiptDetails(ReceiptParseResult),
    /// Stay on (return to) the capture screen
    BackToCapture,
}

/// Terminal result of one capture flow run
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureOutcome {
    pub navigation: NavTarget,
    /// Status or error message passed along as a navigation parameter
    pub status: String,
    pub haptic: HapticCue,
    /// True when the message should offer to open system settings
    pub offer_settings: bool,
}

impl CaptureOutcome {
    fn back(status: impl Into<String>, haptic: HapticCue) -> Self {
        Self {
            navigation: NavTarget::BackToCapture,
            status: status.into(),
            haptic,
            offer_settings: false,
        }
    }
}

/// Connectivity check seam
#[async_trait]
pub trait Connectivity {
    async fn is_online(&self) -> bool;
}

/// Device photo library seam
#[async_trait]
pub trait MediaLibrary {
    async fn save_to_library(&self, photo: &CapturedPhoto) -> Result<(), CaptureError>;
}

/// Upload seam, implemented by the HTTP client
#[async_trait]
pub trait ReceiptUploader {
    async fn upload_receipt(&self, photo: &CapturedPhoto)
    -> Result<ReceiptParseResult, ClientError>;
}

#[async_trait]
impl ReceiptUploader for HttpClient {
    async fn upload_receipt(
        &self,
        photo: &CapturedPhoto,
    ) -> Result<ReceiptParseResult, ClientError> {
        HttpClient::upload_receipt(self, photo.jpeg.clone(), photo.file_name.clone()).await
    }
}

/// Run the capture flow to a terminal outcome
///
/// Runs to completion once started; the caller disables the capture
/// button until the outcome arrives.
pub async fn run_capture_flow(
    photo: CapturedPhoto,
    connectivity: &dyn Connectivity,
    library: &dyn MediaLibrary,
    uploader: &dyn ReceiptUploader,
) -> CaptureOutcome {
    if !connectivity.is_online().await {
        tracing::info!("Offline, skipping upload");
        return fallback(&photo, library, "You're offline.").await;
    }

    match uploader.upload_receipt(&photo).await {
        Ok(parsed) => {
            tracing::info!(items = parsed.items.len(), "Receipt uploaded");
            CaptureOutcome {
                navigation: NavTarget::ReceiptDetails(parsed),
                status: "Receipt uploaded".into(),
                haptic: HapticCue::Success,
                offer_settings: false,
            }
        }
        Err(e) => {
            tracing::warn!("Receipt upload failed: {e}");
            fallback(&photo, library, "Upload failed.").await
        }
    }
}

/// Keep the photo instead of discarding it
///
/// Camera photos exist nowhere else yet, so they are saved to the
/// device library automatically. Library photos are already persisted
/// and cannot be re-saved; the user is told upload needs connectivity.
async fn fallback(
    photo: &CapturedPhoto,
    library: &dyn MediaLibrary,
    reason: &str,
) -> CaptureOutcome {
    match photo.source {
        PhotoSource::Camera => match library.save_to_library(photo).await {
            Ok(()) => CaptureOutcome::back(
                format!("{reason} The photo was saved to your library; upload it once you're back online."),
                HapticCue::Warning,
            ),
            Err(CaptureError::PermissionDenied) => CaptureOutcome {
                navigation: NavTarget::BackToCapture,
                status: format!(
                    "{reason} The photo could not be saved because library access is denied."
                ),
                haptic: HapticCue::Error,
                offer_settings: true,
            },
            Err(e) => {
                tracing::error!("Fallback save failed: {e}");
                CaptureOutcome::back(format!("{reason} {e}."), HapticCue::Error)
            }
        },
        PhotoSource::Library => CaptureOutcome::back(
            format!("{reason} The photo stays in your library; uploading needs a connection."),
            HapticCue::Warning,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FakeNet {
        online: bool,
    }

    #[async_trait]
    impl Connectivity for FakeNet {
        async fn is_online(&self) -> bool {
            self.online
        }
    }

    #[derive(Default)]
    struct FakeLibrary {
        saves: Mutex<u32>,
        error: Option<CaptureError>,
    }

    #[async_trait]
    impl MediaLibrary for FakeLibrary {
        async fn save_to_library(&self, _photo: &CapturedPhoto) -> Result<(), CaptureError> {
            *self.saves.lock().unwrap() += 1;
            match &self.error {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }
    }

    #[derive(Default)]
    struct FakeUploader {
        uploads: Mutex<u32>,
        fail: bool,
    }

    #[async_trait]
    impl ReceiptUploader for FakeUploader {
        async fn upload_receipt(
            &self,
            _photo: &CapturedPhoto,
        ) -> Result<ReceiptParseResult, ClientError> {
            *self.uploads.lock().unwrap() += 1;
            if self.fail {
                Err(ClientError::Internal("upstream down".into()))
            } else {
                Ok(ReceiptParseResult {
                    total: Some(1234.0),
                    ..ReceiptParseResult::sample()
                })
            }
        }
    }

    fn photo(source: PhotoSource) -> CapturedPhoto {
        CapturedPhoto {
            jpeg: vec![0xFF, 0xD8],
            file_name: "receipt.jpg".into(),
            source,
        }
    }

    #[tokio::test]
    async fn test_online_upload_success_navigates_to_details() {
        let net = FakeNet { online: true };
        let library = FakeLibrary::default();
        let uploader = FakeUploader::default();

        let outcome =
            run_capture_flow(photo(PhotoSource::Camera), &net, &library, &uploader).await;

        let expected = ReceiptParseResult {
            total: Some(1234.0),
            ..ReceiptParseResult::sample()
        };
        assert_eq!(outcome.navigation, NavTarget::ReceiptDetails(expected));
        assert_eq!(outcome.haptic, HapticCue::Success);
        assert_eq!(*library.saves.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_online_upload_failure_saves_camera_photo() {
        let net = FakeNet { online: true };
        let library = FakeLibrary::default();
        let uploader = FakeUploader {
            fail: true,
            ..Default::default()
        };

        let outcome =
            run_capture_flow(photo(PhotoSource::Camera), &net, &library, &uploader).await;

        assert_eq!(outcome.navigation, NavTarget::BackToCapture);
        assert_eq!(outcome.haptic, HapticCue::Warning);
        assert_eq!(*library.saves.lock().unwrap(), 1);
        assert!(outcome.status.contains("saved to your library"));
    }

    #[tokio::test]
    async fn test_offline_skips_upload_entirely() {
        let net = FakeNet { online: false };
        let library = FakeLibrary::default();
        let uploader = FakeUploader::default();

        let outcome =
            run_capture_flow(photo(PhotoSource::Camera), &net, &library, &uploader).await;

        assert_eq!(*uploader.uploads.lock().unwrap(), 0);
        assert_eq!(outcome.navigation, NavTarget::BackToCapture);
        assert_eq!(*library.saves.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_offline_library_photo_is_not_resaved() {
        let net = FakeNet { online: false };
        let library = FakeLibrary::default();
        let uploader = FakeUploader::default();

        let outcome =
            run_capture_flow(photo(PhotoSource::Library), &net, &library, &uploader).await;

        assert_eq!(*library.saves.lock().unwrap(), 0);
        assert_eq!(outcome.haptic, HapticCue::Warning);
        assert!(outcome.status.contains("stays in your library"));
    }

    #[tokio::test]
    async fn test_permission_denial_offers_settings() {
        let net = FakeNet { online: false };
        let library = FakeLibrary {
            error: Some(CaptureError::PermissionDenied),
            ..Default::default()
        };
        let uploader = FakeUploader::default();

        let outcome =
            run_capture_flow(photo(PhotoSource::Camera), &net, &library, &uploader).await;

        assert_eq!(outcome.haptic, HapticCue::Error);
        assert!(outcome.offer_settings);
    }

    #[tokio::test]
    async fn test_save_failure_is_an_error_cue() {
        let net = FakeNet { online: false };
        let library = FakeLibrary {
            error: Some(CaptureError::SaveFailed("disk full".into())),
            ..Default::default()
        };
        let uploader = FakeUploader::default();

        let outcome =
            run_capture_flow(photo(PhotoSource::Camera), &net, &library, &uploader).await;

        assert_eq!(outcome.haptic, HapticCue::Error);
        assert!(!outcome.offer_settings);
        assert!(outcome.status.contains("disk full"));
    }
}
