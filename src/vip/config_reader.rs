use crate::vip::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use voter_info::popup::{PopupMetrics, Rect};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "electionName")]
    pub election_name: String,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "firstRowIndex")]
    _first_row_index: Option<JSValue>,
    #[serde(rename = "contestColumnIndex")]
    _contest_column_index: Option<JSValue>,
}

impl FileSource {
    pub fn new(provider: &str, file_path: &str) -> FileSource {
        FileSource {
            provider: provider.to_string(),
            file_path: file_path.to_string(),
            _first_row_index: None,
            _contest_column_index: None,
        }
    }

    /// The first row with data, starting at 1. Defaults to 2, right after the header.
    pub fn first_row_index(&self) -> VipResult<usize> {
        if self._first_row_index.is_some() {
            let x = read_js_int(&self._first_row_index)?;
            ensure!(x >= 1, ParsingJsonNumberSnafu {});
            Ok(x as usize)
        } else {
            Ok(2)
        }
    }

    /// The column holding the contest name, counted from 0.
    ///
    /// The configuration counts columns from 1, like spreadsheets do.
    pub fn contest_column_index(&self) -> VipResult<usize> {
        if self._contest_column_index.is_some() {
            let x = read_js_int(&self._contest_column_index)?;
            ensure!(x >= 1, ParsingJsonNumberSnafu {});
            Ok((x - 1) as usize)
        } else {
            Ok(0)
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PopupSettings {
    #[serde(rename = "maxWidth")]
    pub max_width: f64,
    #[serde(rename = "maxHeight")]
    pub max_height: f64,
    pub padding: Option<f64>,
    #[serde(rename = "preferredWidth")]
    pub preferred_width: Option<f64>,
    #[serde(rename = "minWidth")]
    pub min_width: Option<f64>,
    #[serde(rename = "minHeight")]
    pub min_height: Option<f64>,
}

impl PopupSettings {
    pub const DEFAULT_SETTINGS: PopupSettings = PopupSettings {
        max_width: 300.0,
        max_height: 200.0,
        padding: None,
        preferred_width: None,
        min_width: None,
        min_height: None,
    };

    pub fn bounds(&self) -> Rect {
        Rect::sized(self.max_width, self.max_height)
    }

    pub fn metrics(&self) -> PopupMetrics {
        let d = PopupMetrics::DEFAULT;
        PopupMetrics {
            padding: self.padding.unwrap_or(d.padding),
            preferred_width: self.preferred_width.unwrap_or(d.preferred_width),
            min_width: self.min_width.unwrap_or(d.min_width),
            min_height: self.min_height.unwrap_or(d.min_height),
            ..d
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct VipConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "feedSources")]
    pub feed_sources: Vec<FileSource>,
    #[serde(rename = "popupSettings")]
    pub popup_settings: Option<PopupSettings>,
}

impl VipConfig {
    /// A configuration that imports a single feed file.
    pub fn for_feed(file_name: &str, provider: &str) -> VipConfig {
        VipConfig {
            output_settings: OutputSettings {
                election_name: file_name.to_string(),
                output_path: None,
            },
            feed_sources: vec![FileSource::new(provider, file_name)],
            popup_settings: None,
        }
    }

    pub fn popup_settings(&self) -> PopupSettings {
        self.popup_settings
            .clone()
            .unwrap_or(PopupSettings::DEFAULT_SETTINGS)
    }
}

pub fn read_config(path: &str) -> VipResult<VipConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: VipConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: String) -> VipResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_summary: {:?}", js);
    Ok(js)
}

/// Reads an integer that feeds may write either as a number or as a string.
pub fn read_js_int(x: &Option<JSValue>) -> VipResult<i64> {
    match x {
        Some(JSValue::Number(n)) => n.as_i64().context(ParsingJsonNumberSnafu {}),
        Some(JSValue::String(s)) => s
            .trim()
            .parse::<i64>()
            .ok()
            .context(ParsingJsonNumberSnafu {}),
        _ => None.context(ParsingJsonNumberSnafu {}),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_numbers_and_strings() {
        assert_eq!(read_js_int(&Some(serde_json::json!(3))).unwrap(), 3);
        assert_eq!(read_js_int(&Some(serde_json::json!(" 12"))).unwrap(), 12);
        assert!(read_js_int(&Some(serde_json::json!("first"))).is_err());
        assert!(read_js_int(&None).is_err());
    }

    #[test]
    fn popup_settings_override_metrics() {
        let js = r#"{
            "outputSettings": {"electionName": "test"},
            "feedSources": [{"provider": "csv", "filePath": "a.csv", "firstRowIndex": "3"}],
            "popupSettings": {"maxWidth": 320, "maxHeight": 180, "padding": 4}
        }"#;
        let config: VipConfig = serde_json::from_str(js).unwrap();
        let settings = config.popup_settings();
        assert_eq!(settings.bounds(), Rect::sized(320.0, 180.0));
        assert_eq!(settings.metrics().padding, 4.0);
        assert_eq!(
            settings.metrics().preferred_width,
            PopupMetrics::DEFAULT.preferred_width
        );
        assert_eq!(config.feed_sources[0].first_row_index().unwrap(), 3);
        assert_eq!(config.feed_sources[0].contest_column_index().unwrap(), 0);
    }

    #[test]
    fn contest_column_is_one_based() {
        let cfs: FileSource = serde_json::from_str(
            r#"{"provider": "csv", "filePath": "a.csv", "contestColumnIndex": 8}"#,
        )
        .unwrap();
        assert_eq!(cfs.contest_column_index().unwrap(), 7);
        let cfs: FileSource = serde_json::from_str(
            r#"{"provider": "csv", "filePath": "a.csv", "contestColumnIndex": "0"}"#,
        )
        .unwrap();
        assert!(cfs.contest_column_index().is_err());
    }

    #[test]
    fn defaults_without_popup_settings() {
        let config = VipConfig::for_feed("feed.json", "civic_json");
        assert_eq!(config.popup_settings(), PopupSettings::DEFAULT_SETTINGS);
        assert_eq!(config.feed_sources[0].first_row_index().unwrap(), 2);
    }
}
