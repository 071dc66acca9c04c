use clap::Parser;
use webp_batch::cli::{conclude, UploadArgs};
use webp_batch::logger::{self, Verbosity};
use webp_batch::{run_upload, UploadConfig, WranglerTransport};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = UploadArgs::parse();
    logger::init(Verbosity::from_flags(args.common.quiet, args.common.verbose));

    let outcome = UploadConfig::from_args(&args).and_then(|config| {
        tracing::info!("🚀 Starting upload to R2 bucket {}...", config.bucket);
        tracing::info!("📁 Input: {}", config.output_dir().display());
        let transport = WranglerTransport::new(config.wrangler_bin.clone(), config.timeout);
        run_upload(&config, &transport)
    });

    conclude(outcome, args.common.strict)
}
