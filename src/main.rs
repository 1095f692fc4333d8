use clap::Parser;
use log::{error, info, LevelFilter};
use snafu::ErrorCompat;

mod args;
mod vip;

use crate::args::Args;
use crate::vip::{InputSource, RunOptions};

fn input_source(args: &Args) -> Option<InputSource> {
    match (&args.config, &args.feed) {
        (Some(config), _) => Some(InputSource::ConfigFile(config.clone())),
        (None, Some(feed)) => Some(InputSource::Feed {
            path: feed.clone(),
            provider: args
                .feed_type
                .clone()
                .unwrap_or_else(|| "civic_json".to_string()),
        }),
        (None, None) => None,
    }
}

fn main() {
    let args = Args::parse();
    if args.verbose {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }
    info!("args: {:?}", args);

    let input = match input_source(&args) {
        Some(x) => x,
        None => {
            eprintln!("Either --config or --feed must be provided");
            std::process::exit(2);
        }
    };
    let opts = RunOptions {
        out: args.out.clone(),
        reference: args.reference.clone(),
        max_width: args.max_width,
        max_height: args.max_height,
        preview: args.preview,
    };

    if let Err(e) = vip::run_vip(&input, &opts) {
        error!("Error occured {:?}", e);
        eprintln!("An error occured: {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
