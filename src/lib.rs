pub mod cli;
pub mod codec;
pub mod config;
pub mod constants;
pub mod convert;
pub mod discovery;
pub mod error;
pub mod logger;
pub mod report;
pub mod transport;
pub mod upload;
pub mod utils;

pub use codec::{Codec, EncodeOptions, WebpCodec};
pub use config::{ConvertConfig, UploadConfig};
pub use convert::{convert_all, derive_output_name, run_conversion};
pub use discovery::{discover, entry_kind, has_extension, EntryKind};
pub use error::{PipelineError, Result};
pub use report::{run_isolated, BatchReport, ItemOutcome, ItemState, Stage};
pub use transport::{PutObjectRequest, PutOutcome, Transport, WranglerTransport};
pub use upload::{run_upload, upload_all};
