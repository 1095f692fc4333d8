use clap::Parser;

/// Reads voter information feeds and lays out the information popups for
/// polling locations and candidates.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The configuration file listing the feed sources and the popup settings.
    /// For more information about the file format, read the documentation of the `voter_info` crate.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, optional) A single feed file to read instead of a configuration file.
    #[clap(short, long, value_parser)]
    pub feed: Option<String>,

    /// (default civic_json) The type of the feed passed with --feed: civic_json or csv.
    #[clap(long, value_parser)]
    pub feed_type: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary will be written in JSON format to the given
    /// location. Setting this option overrides the path that may be specified in the configuration file.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, vipinfo will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (points) The maximum width of a popup. Overrides the configuration file.
    #[clap(long, value_parser)]
    pub max_width: Option<f64>,

    /// (points) The maximum height of a popup. Overrides the configuration file.
    #[clap(long, value_parser)]
    pub max_height: Option<f64>,

    /// If passed as an argument, prints a text preview of every popup on stderr.
    #[clap(long, takes_value = false)]
    pub preview: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
