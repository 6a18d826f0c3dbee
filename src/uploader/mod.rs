pub mod clock;
pub mod core;
pub mod error;
pub mod progress;
pub mod store;
pub mod task;
pub mod transport;
pub mod validator;

pub use self::core::{BatchReport, UploadOptions, UploadQueue};
pub use error::{StoreError, TransportError, UploadError};
pub use store::TaskStore;
pub use task::{UploadStatus, UploadTask};
