//! Warikan Flow - screen flow logic for the settle-up app
//!
//! Models the two screens' behavior without any UI toolkit: the receipt
//! editing screen as one cohesive state record with explicit transition
//! functions, and the capture screen's upload flow with its offline
//! fallback. Platform effects (connectivity, photo library, haptics)
//! sit behind trait seams so every branch is unit-testable.

pub mod capture;
pub mod settle;

pub use capture::{
    CaptureError, CaptureOutcome, CapturedPhoto, Connectivity, HapticCue, MediaLibrary, NavTarget,
    PhotoSource, ReceiptUploader, run_capture_flow,
};
pub use settle::{SettleScreen, SyncOutcome, SyncState, TransactionSync};
