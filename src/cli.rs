use crate::constants::{
    ENV_BUCKET, ENV_KEY_PREFIX, ENV_SOURCE_FOLDER, ENV_UPLOAD_TIMEOUT, ENV_WRANGLER_BIN,
};
use crate::error::Result;
use crate::report::BatchReport;
use clap::{Args, Parser};
use tracing::error;

#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    #[arg(short = 'v', long, help = "Show debug output, including spawned commands")]
    pub verbose: bool,

    #[arg(short = 'q', long, help = "Only print warnings, errors and the summary")]
    pub quiet: bool,

    #[arg(
        long,
        help = "Exit non-zero on stage errors or failed items",
        long_help = "By default the process exits 0 even when the stage could not start \
                     or some files failed; problems are only reported in the log and summary. \
                     With --strict a stage error or any failed file gives a non-zero exit code."
    )]
    pub strict: bool,
}

#[derive(Parser, Debug)]
#[command(
    name = "png-to-webp",
    about = "Convert every PNG in a folder to WebP",
    long_about = "Converts each PNG file directly inside the source folder to WebP \
                  (quality 80, effort 6) and writes the results to <source>/webp. \
                  A file that fails to convert is reported and skipped; the rest of the batch continues.",
    version,
    after_help = "EXAMPLES:\n  \
    PNG_FOLDER_NAME=./images png-to-webp\n  \
    png-to-webp --source ./images --quiet"
)]
pub struct ConvertArgs {
    #[arg(
        long,
        env = ENV_SOURCE_FOLDER,
        help = "Folder containing the PNG files",
        long_help = "Folder containing the PNG files. Subfolders are ignored. \
                     Output is written to <source>/webp."
    )]
    pub source: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Parser, Debug)]
#[command(
    name = "upload-to-r2",
    about = "Upload converted WebP files to an R2 bucket with wrangler",
    long_about = "Uploads every .webp file in <source>/webp to the configured R2 bucket using \
                  `wrangler r2 object put --remote`. The object key is the file name. \
                  A file that fails to upload is reported and skipped; the rest of the batch continues.",
    version,
    after_help = "EXAMPLES:\n  \
    PNG_FOLDER_NAME=./images R2_BUCKET=assets upload-to-r2\n  \
    upload-to-r2 --source ./images --bucket assets --timeout 120"
)]
pub struct UploadArgs {
    #[arg(
        long,
        env = ENV_SOURCE_FOLDER,
        help = "Folder that was converted (files are read from <source>/webp)"
    )]
    pub source: Option<String>,

    #[arg(long, env = ENV_BUCKET, help = "Destination R2 bucket")]
    pub bucket: Option<String>,

    #[arg(
        long,
        env = ENV_KEY_PREFIX,
        help = "Prefix prepended to every object key (default: none)"
    )]
    pub key_prefix: Option<String>,

    #[arg(
        long,
        env = ENV_UPLOAD_TIMEOUT,
        help = "Seconds to wait for each upload before killing it (default: no limit)"
    )]
    pub timeout: Option<u64>,

    #[arg(
        long,
        env = ENV_WRANGLER_BIN,
        help = "wrangler executable to run (default: wrangler)"
    )]
    pub wrangler: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Prints the stage result and applies the exit-code policy.
///
/// Without `strict` every outcome exits 0; problems live in the log and the
/// summary only.
pub fn conclude(outcome: Result<BatchReport>, strict: bool) -> anyhow::Result<()> {
    match outcome {
        Ok(report) => {
            if report.total > 0 {
                println!("{}", report);
            }
            if strict && report.has_failures() {
                let names: Vec<String> = report
                    .failed_items()
                    .map(|path| path.display().to_string())
                    .collect();
                anyhow::bail!(
                    "{} of {} files failed: {}",
                    report.failed,
                    report.total,
                    names.join(", ")
                );
            }
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            if strict {
                return Err(e.into());
            }
            Ok(())
        }
    }
}
