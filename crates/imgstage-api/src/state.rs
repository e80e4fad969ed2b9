//! Shared application state.

use imgstage_core::UploadConfig;
use imgstage_storage::LocalStorage;

pub struct AppState {
    pub storage: LocalStorage,
    pub config: UploadConfig,
}
