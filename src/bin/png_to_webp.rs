use clap::Parser;
use webp_batch::cli::{conclude, ConvertArgs};
use webp_batch::logger::{self, Verbosity};
use webp_batch::{run_conversion, ConvertConfig, WebpCodec};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = ConvertArgs::parse();
    logger::init(Verbosity::from_flags(args.common.quiet, args.common.verbose));

    let outcome = ConvertConfig::from_args(&args).and_then(|config| {
        tracing::info!("🚀 Starting PNG to WebP conversion...");
        tracing::info!("📁 Input: {}", config.source_dir.display());
        tracing::info!("📁 Output: {}", config.output_dir().display());
        run_conversion(&config, &WebpCodec)
    });

    conclude(outcome, args.common.strict)
}
