//! Layout of the information popup shown for a polling place or a candidate.
//!
//! The popup is laid out in two passes:
//! * the natural layout wraps every field of the wrapper at the preferred
//!   content width. It only depends on the content and on the metrics.
//! * the natural size is then raised to the minimum size and capped by the
//!   maximum bounds given by the caller. The content is placed in the final
//!   frame, and whatever does not fit is cut with an ellipsis.
//!
//! Because the natural size does not depend on the bounds, a larger bounding
//! box never produces a smaller popup.

use log::debug;
use snafu::prelude::*;

use crate::config::*;

pub const ELLIPSIS: char = '…';

// Tolerance on lengths, in points. Sizes computed as `content + 2 * padding`
// do not always give back `content` exactly once the padding is removed.
const EPSILON: f64 = 1e-9;

/// A rectangle, in points.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle anchored at the origin.
    pub fn sized(width: f64, height: f64) -> Rect {
        Rect::new(0.0, 0.0, width, height)
    }

    /// True if a rectangle of this size fits in a rectangle of the size of `other`.
    pub fn fits_in(&self, other: &Rect) -> bool {
        self.width <= other.width && self.height <= other.height
    }
}

/// Font and spacing metrics used to measure the content.
///
/// All the glyphs of a style are assumed to have the same advance width.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct PopupMetrics {
    pub padding: f64,
    pub title_line_height: f64,
    pub body_line_height: f64,
    /// Vertical space between two lines.
    pub line_spacing: f64,
    pub title_glyph_width: f64,
    pub body_glyph_width: f64,
    /// The width at which the content wraps, excluding the padding.
    pub preferred_width: f64,
    pub min_width: f64,
    pub min_height: f64,
}

impl PopupMetrics {
    pub const DEFAULT: PopupMetrics = PopupMetrics {
        padding: 8.0,
        title_line_height: 20.0,
        body_line_height: 16.0,
        line_spacing: 4.0,
        title_glyph_width: 8.0,
        body_glyph_width: 7.0,
        preferred_width: 240.0,
        min_width: 64.0,
        min_height: 40.0,
    };

    fn line_height(&self, style: TextStyle) -> f64 {
        match style {
            TextStyle::Title => self.title_line_height,
            TextStyle::Body => self.body_line_height,
        }
    }

    fn glyph_width(&self, style: TextStyle) -> f64 {
        match style {
            TextStyle::Title => self.title_glyph_width,
            TextStyle::Body => self.body_glyph_width,
        }
    }

    /// The number of glyphs of the given style that fit in the given width.
    fn glyphs_in(&self, style: TextStyle, width: f64) -> usize {
        let g = self.glyph_width(style);
        if width <= 0.0 || g <= 0.0 {
            0
        } else {
            ((width + EPSILON) / g).floor() as usize
        }
    }

    /// Checks that all the metrics are finite, that sizes are positive and
    /// that spacings are not negative.
    pub fn validate(&self) -> Result<(), PopupError> {
        let positive = [
            ("title_line_height", self.title_line_height),
            ("body_line_height", self.body_line_height),
            ("title_glyph_width", self.title_glyph_width),
            ("body_glyph_width", self.body_glyph_width),
            ("preferred_width", self.preferred_width),
        ];
        let non_negative = [
            ("padding", self.padding),
            ("line_spacing", self.line_spacing),
            ("min_width", self.min_width),
            ("min_height", self.min_height),
        ];
        for &(metric, value) in positive.iter() {
            ensure!(
                value.is_finite() && value > 0.0,
                InvalidMetricsSnafu { metric, value }
            );
        }
        for &(metric, value) in non_negative.iter() {
            ensure!(
                value.is_finite() && value >= 0.0,
                InvalidMetricsSnafu { metric, value }
            );
        }
        Ok(())
    }
}

impl Default for PopupMetrics {
    fn default() -> Self {
        PopupMetrics::DEFAULT
    }
}

/// The field of the wrapper that a line of the popup comes from.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum PopupField {
    Name,
    Address,
    Hours,
    Party,
    Phone,
    Email,
    Url,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum TextStyle {
    Title,
    Body,
}

/// One line of text placed in the popup.
#[derive(PartialEq, Debug, Clone)]
pub struct PopupLine {
    pub field: PopupField,
    pub style: TextStyle,
    pub text: String,
    /// In the coordinates of the popup (the top-left corner is at 0,0).
    pub frame: Rect,
}

/// The result of laying out a popup.
#[derive(PartialEq, Debug, Clone)]
pub struct PopupLayout {
    pub kind: LocationKind,
    /// Same origin as the maximum bounds, and never larger.
    pub frame: Rect,
    pub lines: Vec<PopupLine>,
    /// True if some of the content was cut to fit in the frame.
    pub truncated: bool,
}

impl PopupLayout {
    /// The fields that are at least partially visible, in display order.
    pub fn visible_fields(&self) -> Vec<PopupField> {
        let mut res: Vec<PopupField> = Vec::new();
        for l in self.lines.iter() {
            if res.last() != Some(&l.field) {
                res.push(l.field);
            }
        }
        res
    }

    pub fn text_lines(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }
}

/// Builds popups sized to their content.
pub struct InfoPopupView;

impl InfoPopupView {
    /// Lays out a popup for the wrapper, with the default metrics.
    ///
    /// `max_bounds` is the largest popup the caller accepts, usually anchored at
    /// the origin. Fails if it has no area, or if the metrics are not usable.
    pub fn create(
        max_bounds: Rect,
        wrapper: &PollingLocationWrapper,
    ) -> Result<PopupLayout, PopupError> {
        InfoPopupView::create_with_metrics(max_bounds, wrapper, &PopupMetrics::DEFAULT)
    }

    pub fn create_with_metrics(
        max_bounds: Rect,
        wrapper: &PollingLocationWrapper,
        metrics: &PopupMetrics,
    ) -> Result<PopupLayout, PopupError> {
        let (bw, bh) = (max_bounds.width, max_bounds.height);
        ensure!(
            bw.is_finite() && bh.is_finite() && bw > 0.0 && bh > 0.0,
            InvalidBoundsSnafu {
                width: bw,
                height: bh
            }
        );
        metrics.validate()?;

        let natural = natural_lines(wrapper, metrics);
        let (natural_w, natural_h) = natural_size(&natural, metrics);
        let width = natural_w.max(metrics.min_width).min(bw);
        let height = natural_h.max(metrics.min_height).min(bh);
        debug!(
            "InfoPopupView: {:?} {:?}: natural {}x{} -> {}x{} (max {}x{})",
            wrapper.kind, wrapper.name, natural_w, natural_h, width, height, bw, bh
        );

        let (lines, truncated) = place_lines(&natural, width, height, metrics);
        Ok(PopupLayout {
            kind: wrapper.kind,
            frame: Rect::new(max_bounds.x, max_bounds.y, width, height),
            lines,
            truncated,
        })
    }
}

// A wrapped line before placement.
struct NaturalLine {
    field: PopupField,
    style: TextStyle,
    text: String,
}

fn present_fields(wrapper: &PollingLocationWrapper) -> Vec<(PopupField, TextStyle, &str)> {
    let optional = [
        (PopupField::Address, &wrapper.address),
        (PopupField::Hours, &wrapper.hours),
        (PopupField::Party, &wrapper.party),
        (PopupField::Phone, &wrapper.phone),
        (PopupField::Email, &wrapper.email),
        (PopupField::Url, &wrapper.url),
    ];
    let mut res = vec![(PopupField::Name, TextStyle::Title, wrapper.name.as_str())];
    for (field, value) in optional {
        if let Some(s) = value {
            res.push((field, TextStyle::Body, s.as_str()));
        }
    }
    // Empty fields take no space.
    res.retain(|(_, _, s)| !s.trim().is_empty());
    res
}

fn natural_lines(wrapper: &PollingLocationWrapper, metrics: &PopupMetrics) -> Vec<NaturalLine> {
    let mut res: Vec<NaturalLine> = Vec::new();
    for (field, style, text) in present_fields(wrapper) {
        let max_chars = metrics.glyphs_in(style, metrics.preferred_width).max(1);
        for line in wrap_text(text, max_chars) {
            res.push(NaturalLine {
                field,
                style,
                text: line,
            });
        }
    }
    res
}

fn natural_size(lines: &[NaturalLine], metrics: &PopupMetrics) -> (f64, f64) {
    let mut content_w: f64 = 0.0;
    let mut content_h: f64 = 0.0;
    for (idx, l) in lines.iter().enumerate() {
        let w = l.text.chars().count() as f64 * metrics.glyph_width(l.style);
        content_w = content_w.max(w);
        if idx > 0 {
            content_h += metrics.line_spacing;
        }
        content_h += metrics.line_height(l.style);
    }
    (
        content_w + 2.0 * metrics.padding,
        content_h + 2.0 * metrics.padding,
    )
}

fn place_lines(
    natural: &[NaturalLine],
    width: f64,
    height: f64,
    metrics: &PopupMetrics,
) -> (Vec<PopupLine>, bool) {
    let available_w = width - 2.0 * metrics.padding;
    let bottom = height - metrics.padding;
    let mut placed: Vec<(PopupLine, usize)> = Vec::new();
    let mut truncated = false;
    let mut y = metrics.padding;

    for l in natural {
        let line_h = metrics.line_height(l.style);
        let fit = metrics.glyphs_in(l.style, available_w);
        if y + line_h > bottom + EPSILON || fit == 0 {
            truncated = true;
            if let Some((last, last_fit)) = placed.last_mut() {
                last.text = with_ellipsis(&last.text, *last_fit);
                last.frame.width = glyph_span(&last.text, last.style, metrics);
            }
            break;
        }
        let (text, cut) = fit_text(&l.text, fit);
        truncated |= cut;
        let frame = Rect::new(
            metrics.padding,
            y,
            glyph_span(&text, l.style, metrics),
            line_h,
        );
        placed.push((
            PopupLine {
                field: l.field,
                style: l.style,
                text,
                frame,
            },
            fit,
        ));
        y += line_h + metrics.line_spacing;
    }
    (placed.into_iter().map(|(l, _)| l).collect(), truncated)
}

fn glyph_span(text: &str, style: TextStyle, metrics: &PopupMetrics) -> f64 {
    text.chars().count() as f64 * metrics.glyph_width(style)
}

/// Cuts the text to at most `fit` glyphs, ending with an ellipsis if anything was cut.
fn fit_text(text: &str, fit: usize) -> (String, bool) {
    if text.chars().count() <= fit {
        (text.to_string(), false)
    } else {
        let mut s: String = text.chars().take(fit.saturating_sub(1)).collect();
        s.push(ELLIPSIS);
        (s, true)
    }
}

/// Marks a line as followed by hidden content.
fn with_ellipsis(text: &str, fit: usize) -> String {
    if text.chars().count() < fit {
        format!("{}{}", text, ELLIPSIS)
    } else {
        let mut s: String = text.chars().take(fit.saturating_sub(1)).collect();
        s.push(ELLIPSIS);
        s
    }
}

/// Greedy word wrapping. Words longer than a line are broken.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len: usize = 0;
    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = chars.split_off(max_chars);
            lines.push(chars.iter().collect());
            chars = rest;
        }
        if chars.is_empty() {
            continue;
        }
        let word_len = chars.len();
        if current_len == 0 {
            current = chars.iter().collect();
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.extend(chars.iter());
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::replace(&mut current, chars.iter().collect()));
            current_len = word_len;
        }
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> PollingLocationWrapper {
        PollingLocationWrapper::new(LocationKind::Candidate, "Jane Doe").with_party("Independent")
    }

    fn long_location() -> PollingLocationWrapper {
        PollingLocationWrapper::new(
            LocationKind::PollingLocation,
            "Martin Luther King Jr. Elementary School Gymnasium",
        )
        .with_address(
            "1234 Extraordinarily Long Boulevard Name, Apartment Complex Annex B, Springfield, IL 62701",
        )
        .with_hours(
            "Monday through Friday 7:00 AM to 8:00 PM, Saturday 9:00 AM to 5:00 PM, closed on Sunday",
        )
    }

    fn assert_inside(layout: &PopupLayout, bounds: &Rect) {
        assert!(layout.frame.fits_in(bounds), "{:?} > {:?}", layout.frame, bounds);
        for l in layout.lines.iter() {
            assert!(l.frame.x + l.frame.width <= layout.frame.width);
            assert!(l.frame.y + l.frame.height <= layout.frame.height);
        }
    }

    #[test]
    fn jane_doe_fits_with_both_fields() {
        let bounds = Rect::sized(300.0, 200.0);
        let layout = InfoPopupView::create(bounds, &jane()).unwrap();
        assert_inside(&layout, &bounds);
        assert_eq!(
            layout.visible_fields(),
            vec![PopupField::Name, PopupField::Party]
        );
        assert_eq!(layout.text_lines(), vec!["Jane Doe", "Independent"]);
        assert!(!layout.truncated);
        // 16 + 11 body glyphs of 7, 16 + 20 + 4 + 16
        assert_eq!(layout.frame, Rect::sized(93.0, 56.0));
    }

    #[test]
    fn minimal_content_gets_the_floor_size() {
        let bounds = Rect::sized(300.0, 200.0);
        let w = PollingLocationWrapper::new(LocationKind::Candidate, "A");
        let layout = InfoPopupView::create(bounds, &w).unwrap();
        assert!(layout.frame.width >= 60.0);
        assert!(layout.frame.height >= 40.0);
        assert_eq!(layout.frame, Rect::sized(64.0, 40.0));
        assert_eq!(layout.text_lines(), vec!["A"]);
    }

    #[test]
    fn floor_gives_way_to_small_bounds() {
        let bounds = Rect::sized(10.0, 10.0);
        let w = PollingLocationWrapper::new(LocationKind::Candidate, "A");
        let layout = InfoPopupView::create(bounds, &w).unwrap();
        assert_eq!(layout.frame, bounds);
        assert!(layout.lines.is_empty());
        assert!(layout.truncated);
    }

    #[test]
    fn invalid_bounds_are_rejected() {
        let w = jane();
        for (width, height) in [
            (0.0, 100.0),
            (100.0, 0.0),
            (-5.0, 100.0),
            (f64::NAN, 100.0),
            (100.0, f64::INFINITY),
        ] {
            let res = InfoPopupView::create(Rect::sized(width, height), &w);
            assert!(
                matches!(res, Err(PopupError::InvalidBounds { .. })),
                "{}x{}",
                width,
                height
            );
        }
    }

    #[test]
    fn same_input_same_popup() {
        let bounds = Rect::sized(200.0, 120.0);
        let a = InfoPopupView::create(bounds, &long_location()).unwrap();
        let b = InfoPopupView::create(bounds, &long_location()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn larger_bounds_never_give_smaller_popups() {
        let wrappers = vec![
            jane(),
            long_location(),
            PollingLocationWrapper::new(LocationKind::DropOffLocation, "A"),
        ];
        let sizes = [
            (30.0, 20.0),
            (64.0, 40.0),
            (120.0, 60.0),
            (200.0, 80.0),
            (300.0, 200.0),
            (800.0, 600.0),
        ];
        for w in wrappers.iter() {
            for (w1, h1) in sizes.iter() {
                for (w2, h2) in sizes.iter() {
                    let b1 = Rect::sized(*w1, *h1);
                    let b2 = Rect::sized(*w2, *h2);
                    if !b1.fits_in(&b2) {
                        continue;
                    }
                    let p1 = InfoPopupView::create(b1, w).unwrap();
                    let p2 = InfoPopupView::create(b2, w).unwrap();
                    assert_inside(&p1, &b1);
                    assert_inside(&p2, &b2);
                    assert!(p1.frame.fits_in(&p2.frame), "{:?} {:?}", p1.frame, p2.frame);
                }
            }
        }
    }

    #[test]
    fn long_content_is_wrapped_then_cut() {
        let bounds = Rect::sized(200.0, 100.0);
        let layout = InfoPopupView::create(bounds, &long_location()).unwrap();
        assert_eq!(layout.frame, bounds);
        assert!(layout.truncated);
        assert_inside(&layout, &bounds);
        let last = layout.lines.last().unwrap();
        assert!(last.text.ends_with(ELLIPSIS));
    }

    #[test]
    fn long_content_wraps_without_cut_when_room() {
        let bounds = Rect::sized(800.0, 600.0);
        let layout = InfoPopupView::create(bounds, &long_location()).unwrap();
        assert!(!layout.truncated);
        assert!(layout.lines.len() > 3);
        assert_eq!(
            layout.visible_fields(),
            vec![PopupField::Name, PopupField::Address, PopupField::Hours]
        );
        // Wrapped at the preferred width.
        assert!(layout.frame.width <= 240.0 + 16.0);
    }

    #[test]
    fn empty_fields_collapse() {
        let bounds = Rect::sized(300.0, 200.0);
        let with_empty = jane().with_address("").with_hours("   ");
        let a = InfoPopupView::create(bounds, &with_empty).unwrap();
        let b = InfoPopupView::create(bounds, &jane()).unwrap();
        assert_eq!(a.frame, b.frame);
        assert_eq!(a.visible_fields(), b.visible_fields());
    }

    #[test]
    fn popup_keeps_the_bounds_origin() {
        let bounds = Rect::new(10.0, 20.0, 300.0, 200.0);
        let layout = InfoPopupView::create(bounds, &jane()).unwrap();
        assert_eq!(layout.frame.x, 10.0);
        assert_eq!(layout.frame.y, 20.0);
    }

    #[test]
    fn fractional_padding_keeps_all_fields() {
        let w = jane().with_hours("9 AM to 5 PM daily");
        for i in 1..50 {
            let metrics = PopupMetrics {
                padding: i as f64 / 10.0,
                ..PopupMetrics::DEFAULT
            };
            let layout =
                InfoPopupView::create_with_metrics(Rect::sized(800.0, 600.0), &w, &metrics)
                    .unwrap();
            assert!(!layout.truncated, "padding {}", metrics.padding);
            assert_eq!(
                layout.text_lines(),
                vec!["Jane Doe", "9 AM to 5 PM daily", "Independent"],
                "padding {}",
                metrics.padding
            );
        }
    }

    #[test]
    fn unusable_metrics_are_rejected() {
        let bounds = Rect::sized(300.0, 200.0);
        let bad = [
            PopupMetrics {
                padding: -50.0,
                ..PopupMetrics::DEFAULT
            },
            PopupMetrics {
                preferred_width: f64::NAN,
                ..PopupMetrics::DEFAULT
            },
            PopupMetrics {
                min_width: -1.0,
                ..PopupMetrics::DEFAULT
            },
            PopupMetrics {
                body_glyph_width: 0.0,
                ..PopupMetrics::DEFAULT
            },
        ];
        for metrics in bad.iter() {
            let res = InfoPopupView::create_with_metrics(bounds, &jane(), metrics);
            assert!(
                matches!(res, Err(PopupError::InvalidMetrics { .. })),
                "{:?}",
                metrics
            );
        }
        assert_eq!(PopupMetrics::DEFAULT.validate(), Ok(()));
    }

    #[test]
    fn wrap_breaks_long_words() {
        assert_eq!(wrap_text("abcdefgh ij", 3), vec!["abc", "def", "gh", "ij"]);
        assert_eq!(wrap_text("aa bb cc", 5), vec!["aa bb", "cc"]);
        assert!(wrap_text("   ", 5).is_empty());
    }

    #[test]
    fn candidate_record_to_popup() {
        let c = CandidateRecord {
            party: Some("Green".to_string()),
            phone: Some("555-0100".to_string()),
            ..CandidateRecord::named("Ann Smith")
        };
        let w = PollingLocationWrapper::from(&c);
        let layout = InfoPopupView::create(Rect::sized(300.0, 200.0), &w).unwrap();
        assert_eq!(layout.kind, LocationKind::Candidate);
        assert_eq!(
            layout.visible_fields(),
            vec![PopupField::Name, PopupField::Party, PopupField::Phone]
        );
    }
}
