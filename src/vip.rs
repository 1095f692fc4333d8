use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use voter_info::ordering::sort_for_display;
use voter_info::popup::{InfoPopupView, PopupLayout, PopupMetrics, Rect};
use voter_info::render::{PopupRenderer, TextRenderer};
use voter_info::*;

use std::fs;
use std::io::Write;
use std::path::Path;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

pub mod config_reader;
mod io_civic;
mod io_common;
mod io_csv;

use crate::vip::config_reader::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum VipError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON content"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Expected an integer in the JSON content"))]
    ParsingJsonNumber {},
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading a CSV line"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("Line {lineno} is too short"))]
    CsvLineTooShort { lineno: usize },
    #[snafu(display("Line {lineno}: cannot read the position on the ballot {value:?}"))]
    CsvBallotOrder { lineno: usize, value: String },
    #[snafu(display("Feed provider not implemented: {provider}"))]
    UnknownProvider { provider: String },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("The feed path {path} does not name a file"))]
    MissingFileName { path: String },
    #[snafu(display("Record store error"))]
    Store { source: StoreError },
    #[snafu(display("Popup layout error"))]
    Popup { source: PopupError },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between calculated summary and reference summary {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type VipResult<T> = Result<T, VipError>;

/// Where the feeds come from.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum InputSource {
    /// A configuration file listing the feed sources.
    ConfigFile(String),
    /// A single feed file, read with the given provider.
    Feed { path: String, provider: String },
}

/// Options of a run that do not come from the configuration file.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct RunOptions {
    pub out: Option<String>,
    pub reference: Option<String>,
    pub max_width: Option<f64>,
    pub max_height: Option<f64>,
    pub preview: bool,
}

fn read_feed<S: RecordStore>(
    root_path: &Path,
    cfs: &FileSource,
    store: &mut S,
) -> VipResult<Vec<PollingLocationWrapper>> {
    let p = root_path.join(&cfs.file_path).display().to_string();
    info!("Attempting to read feed file {:?}", p);
    match cfs.provider.as_str() {
        "civic_json" => io_civic::read_civic_feed(p, store),
        "csv" => io_csv::read_csv_candidates(p, cfs, store),
        x => UnknownProviderSnafu { provider: x }.fail(),
    }
}

/// Imports all the feed sources, in order, and returns the locations found.
pub fn load_feeds<S: RecordStore>(
    config: &VipConfig,
    root_path: &Path,
    store: &mut S,
) -> VipResult<Vec<PollingLocationWrapper>> {
    if config.feed_sources.is_empty() {
        whatever!("No feed sources in the configuration");
    }
    let mut locations: Vec<PollingLocationWrapper> = Vec::new();
    for cfs in config.feed_sources.iter() {
        let mut found = read_feed(root_path, cfs, store)?;
        locations.append(&mut found);
    }
    info!(
        "load_feeds: {} contests, {} candidates, {} locations",
        store.contest_ids().len(),
        store.candidate_count(),
        locations.len()
    );
    Ok(locations)
}

/// The candidates of each contest, in display order.
pub fn contests_in_display_order<S: RecordStore>(
    store: &S,
) -> VipResult<Vec<(ContestId, Vec<(CandidateId, &CandidateRecord)>)>> {
    let mut res = Vec::new();
    for cid in store.contest_ids() {
        let mut candidates = store.candidates_of(cid).context(StoreSnafu {})?;
        sort_for_display(&mut candidates);
        res.push((cid, candidates));
    }
    Ok(res)
}

/// One popup per location, then one per candidate in display order.
pub fn build_popups<S: RecordStore>(
    store: &S,
    locations: &[PollingLocationWrapper],
    bounds: Rect,
    metrics: &PopupMetrics,
) -> VipResult<Vec<PopupLayout>> {
    let mut wrappers: Vec<PollingLocationWrapper> = locations.to_vec();
    for (_, candidates) in contests_in_display_order(store)? {
        for (_, c) in candidates {
            wrappers.push(PollingLocationWrapper::from(c));
        }
    }
    let mut res: Vec<PopupLayout> = Vec::new();
    for w in wrappers.iter() {
        let layout =
            InfoPopupView::create_with_metrics(bounds, w, metrics).context(PopupSnafu {})?;
        if layout.truncated {
            warn!(
                "build_popups: content of {:?} {:?} does not fit in {}x{}",
                w.kind, w.name, bounds.width, bounds.height
            );
        }
        res.push(layout);
    }
    Ok(res)
}

fn popups_to_json(wrappers_and_layouts: &[(String, &PopupLayout)]) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for (name, layout) in wrappers_and_layouts.iter() {
        l.push(json!({
            "kind": layout.kind.label(),
            "name": name,
            "width": layout.frame.width,
            "height": layout.frame.height,
            "truncated": layout.truncated,
            "lines": layout.text_lines(),
        }));
    }
    l
}

pub fn build_summary_js<S: RecordStore>(
    config: &VipConfig,
    store: &S,
    locations: &[PollingLocationWrapper],
    popups: &[PopupLayout],
    bounds: Rect,
) -> VipResult<JSValue> {
    let mut contests: Vec<JSValue> = Vec::new();
    let mut names: Vec<String> = locations.iter().map(|l| l.name.clone()).collect();
    for (cid, candidates) in contests_in_display_order(store)? {
        let contest = store
            .contest(cid)
            .whatever_context::<_, VipError>(format!("{} is missing from the store", cid))?;
        let candidate_names: Vec<&str> =
            candidates.iter().map(|(_, c)| c.display_name()).collect();
        names.extend(candidate_names.iter().map(|s| s.to_string()));
        contests.push(json!({
            "office": contest.office,
            "ballotTitle": contest.ballot_title,
            "type": contest.contest_type,
            "district": contest.district_name,
            "candidates": candidate_names,
        }));
    }
    let named: Vec<(String, &PopupLayout)> = names.into_iter().zip(popups.iter()).collect();
    Ok(json!({
        "config": {
            "election": config.output_settings.election_name,
            "maxWidth": bounds.width,
            "maxHeight": bounds.height,
        },
        "contests": contests,
        "popups": popups_to_json(&named),
    }))
}

/// Reads the configuration, imports the feeds and builds the summary.
pub fn compute_summary(
    config: &VipConfig,
    root_path: &Path,
    opts: &RunOptions,
) -> VipResult<(JSValue, Vec<PopupLayout>)> {
    let settings = config.popup_settings();
    let bounds = Rect::sized(
        opts.max_width.unwrap_or(settings.max_width),
        opts.max_height.unwrap_or(settings.max_height),
    );
    let metrics = settings.metrics();
    metrics.validate().context(PopupSnafu {})?;

    let mut store = InMemoryStore::new();
    let locations = load_feeds(config, root_path, &mut store)?;
    let popups = build_popups(&store, &locations, bounds, &metrics)?;
    let summary = build_summary_js(config, &store, &locations, &popups, bounds)?;
    Ok((summary, popups))
}

fn resolve_input(input: &InputSource) -> VipResult<(VipConfig, String)> {
    match input {
        InputSource::ConfigFile(path) => {
            let config = read_config(path)?;
            let root = Path::new(path.as_str())
                .parent()
                .context(MissingParentDirSnafu {})?;
            Ok((config, root.display().to_string()))
        }
        InputSource::Feed { path, provider } => {
            let p = Path::new(path.as_str());
            let root = p.parent().context(MissingParentDirSnafu {})?;
            let file_name = p
                .file_name()
                .and_then(|s| s.to_str())
                .context(MissingFileNameSnafu { path })?;
            Ok((
                VipConfig::for_feed(file_name, provider),
                root.display().to_string(),
            ))
        }
    }
}

fn write_output(pretty: &str, out: Option<String>) -> VipResult<()> {
    match out.as_deref() {
        None | Some("stdout") => {
            println!("{}", pretty);
            Ok(())
        }
        Some(path) => {
            info!("Writing summary to {:?}", path);
            fs::write(path, pretty).context(WritingOutputSnafu { path })
        }
    }
}

/// Writes a text preview of each popup, one after the other.
fn write_previews<W: Write>(w: &mut W, popups: &[PopupLayout], metrics: PopupMetrics) -> VipResult<()> {
    let renderer = TextRenderer { metrics };
    for p in popups.iter() {
        writeln!(w, "{}", renderer.render(p)).context(WritingOutputSnafu { path: "preview" })?;
    }
    Ok(())
}

pub fn run_vip(input: &InputSource, opts: &RunOptions) -> VipResult<()> {
    let (config, root) = resolve_input(input)?;
    debug!("config: {:?}", config);
    let root_p = Path::new(root.as_str());

    let (summary_js, popups) = compute_summary(&config, root_p, opts)?;

    // Previews go to stderr, stdout may carry the summary.
    if opts.preview {
        write_previews(
            &mut std::io::stderr().lock(),
            &popups,
            config.popup_settings().metrics(),
        )?;
    }

    let pretty_js = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;
    let out = opts.out.clone().or_else(|| {
        config
            .output_settings
            .output_path
            .as_ref()
            .map(|p| root_p.join(p).display().to_string())
    });
    write_output(&pretty_js, out)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = opts.reference.clone() {
        let summary_ref = read_summary(summary_p.clone())?;
        let pretty_js_ref = serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_ref != pretty_js {
            warn!("Found differences with the reference summary");
            print_diff(pretty_js_ref.as_str(), pretty_js.as_str(), "\n");
            return ReferenceMismatchSnafu { path: summary_p }.fail();
        }
        info!("Summary matches the reference {:?}", summary_p);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dir(name: &str) -> String {
        format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    fn test_wrapper(test_name: &str) -> VipResult<()> {
        let dir = test_dir(test_name);
        let opts = RunOptions {
            out: Some(format!("{}/{}_summary.out.json", std::env::temp_dir().display(), test_name)),
            reference: Some(format!("{}/{}_expected_summary.json", dir, test_name)),
            ..RunOptions::default()
        };
        run_vip(
            &InputSource::ConfigFile(format!("{}/{}_config.json", dir, test_name)),
            &opts,
        )
    }

    #[test]
    fn simple() {
        let _ = env_logger::builder().is_test(true).try_init();
        let res = test_wrapper("simple");
        assert!(res.is_ok(), "{:?}", res);
    }

    #[test]
    fn simple_summary_content() {
        let dir = test_dir("simple");
        let config = read_config(&format!("{}/simple_config.json", dir)).unwrap();
        let (summary, popups) =
            compute_summary(&config, Path::new(dir.as_str()), &RunOptions::default()).unwrap();
        assert_eq!(
            summary["contests"][0]["candidates"],
            json!(["Yolanda Park", "Adam Young", "Xavier Lee"])
        );
        assert_eq!(
            summary["contests"][1]["candidates"],
            json!(["Carl Diaz", "Beth Ray"])
        );
        assert_eq!(popups.len(), 7);
        for p in popups.iter() {
            assert!(p.frame.fits_in(&Rect::sized(300.0, 200.0)));
        }
    }

    #[test]
    fn smaller_bounds_from_options() {
        let dir = test_dir("simple");
        let config = read_config(&format!("{}/simple_config.json", dir)).unwrap();
        let opts = RunOptions {
            max_width: Some(100.0),
            max_height: Some(50.0),
            ..RunOptions::default()
        };
        let (summary, popups) = compute_summary(&config, Path::new(dir.as_str()), &opts).unwrap();
        assert_eq!(summary["config"]["maxWidth"], json!(100.0));
        assert!(popups.iter().any(|p| p.truncated));
        for p in popups.iter() {
            assert!(p.frame.fits_in(&Rect::sized(100.0, 50.0)));
        }
    }

    #[test]
    fn single_feed_input() {
        let dir = test_dir("simple");
        let input = InputSource::Feed {
            path: format!("{}/feed.json", dir),
            provider: "civic_json".to_string(),
        };
        let (config, root) = resolve_input(&input).unwrap();
        let (summary, _) =
            compute_summary(&config, Path::new(root.as_str()), &RunOptions::default()).unwrap();
        assert_eq!(summary["config"]["election"], json!("feed.json"));
        assert_eq!(summary["contests"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn unknown_provider() {
        let dir = test_dir("simple");
        let config = VipConfig::for_feed("feed.json", "xml");
        let res = compute_summary(&config, Path::new(dir.as_str()), &RunOptions::default());
        assert!(matches!(res, Err(VipError::UnknownProvider { .. })));
    }

    #[test]
    fn feed_path_without_file_name() {
        let input = InputSource::Feed {
            path: "feeds/..".to_string(),
            provider: "csv".to_string(),
        };
        let res = resolve_input(&input);
        assert!(
            matches!(res, Err(VipError::MissingFileName { ref path }) if path == "feeds/.."),
            "{:?}",
            res
        );
    }

    #[test]
    fn negative_padding_in_settings_is_rejected() {
        let dir = test_dir("simple");
        let mut config = VipConfig::for_feed("feed.json", "civic_json");
        config.popup_settings = Some(PopupSettings {
            padding: Some(-50.0),
            ..PopupSettings::DEFAULT_SETTINGS
        });
        let res = compute_summary(&config, Path::new(dir.as_str()), &RunOptions::default());
        assert!(
            matches!(
                res,
                Err(VipError::Popup {
                    source: PopupError::InvalidMetrics { .. }
                })
            ),
            "{:?}",
            res
        );
    }

    #[test]
    fn previews_are_written_to_the_given_stream() {
        let dir = test_dir("simple");
        let config = read_config(&format!("{}/simple_config.json", dir)).unwrap();
        let (_, popups) =
            compute_summary(&config, Path::new(dir.as_str()), &RunOptions::default()).unwrap();
        let mut buf: Vec<u8> = Vec::new();
        write_previews(&mut buf, &popups, config.popup_settings().metrics()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Yolanda Park"));
        assert!(text.contains("City Hall"));
        assert!(!text.trim_start().starts_with('{'));
    }

    #[test]
    fn reference_mismatch_is_reported() {
        let dir = test_dir("simple");
        let opts = RunOptions {
            out: Some(format!("{}/mismatch_summary.out.json", std::env::temp_dir().display())),
            reference: Some(format!("{}/feed.json", dir)),
            ..RunOptions::default()
        };
        let res = run_vip(
            &InputSource::ConfigFile(format!("{}/simple_config.json", dir)),
            &opts,
        );
        assert!(matches!(res, Err(VipError::ReferenceMismatch { .. })));
    }
}
