/// WebP quality used for every conversion (0-100, higher = larger/better).
pub const WEBP_QUALITY: u8 = 80;
/// WebP encoder effort (libwebp "method", 0-6, higher = slower/smaller).
pub const WEBP_EFFORT: u8 = 6;

pub const SOURCE_EXTENSION: &str = "png";
pub const TARGET_EXTENSION: &str = "webp";

/// Name of the output folder created inside the source folder.
pub const OUTPUT_SUBDIR: &str = "webp";

pub const ENV_SOURCE_FOLDER: &str = "PNG_FOLDER_NAME";
pub const ENV_BUCKET: &str = "R2_BUCKET";
pub const ENV_KEY_PREFIX: &str = "R2_KEY_PREFIX";
pub const ENV_UPLOAD_TIMEOUT: &str = "UPLOAD_TIMEOUT_SECS";
pub const ENV_WRANGLER_BIN: &str = "WRANGLER_BIN";

pub const DEFAULT_WRANGLER_BIN: &str = "wrangler";
pub const WRANGLER_INSTALL_HINT: &str =
    "npm install -g wrangler\nor\nnpm install wrangler --save-dev";

/// Location note printed after an upload run.
pub const REMOTE_LOCATION_NOTE: &str = "webp-images/";

pub const TIMEOUT_POLL_INTERVAL_MS: u64 = 100;

pub const PROGRESS_BAR_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";

// Common output message prefixes
pub const SUMMARY_PREFIX: &str = "📊";
pub const FOLDER_PREFIX: &str = "📁";
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️";
pub const RATIO_PREFIX: &str = "🎯";
pub const TIME_PREFIX: &str = "⏱️";
pub const REMOTE_PREFIX: &str = "☁️";
