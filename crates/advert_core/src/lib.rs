//! Advert core: pure data model and naming rules shared by the scraper.
mod advert;
mod model;
mod sanitize;
mod summary;
mod window;

pub use advert::advert_id;
pub use model::{AttachmentRecord, Content, InputRow, JobRecord};
pub use sanitize::{sanitize_filename, sanitize_filename_with_max, DEFAULT_MAX_FILENAME_LEN};
pub use summary::Summary;
pub use window::{CheckpointPolicy, RowWindow};
