//! Slide discovery and ordering.

use crate::container::ContainerEntry;
use regex::Regex;
use std::sync::LazyLock;

/// Matches slide members such as `ppt/slides/slide12.xml` and captures the number.
static SLIDE_PATH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"slides/slide([0-9]+)\.xml").unwrap());

/// A slide member together with its resolved number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideRef<'e> {
    /// Number parsed from the member path, 0 if the digits do not fit.
    pub number: u64,
    /// The container member holding the slide XML.
    pub entry: &'e ContainerEntry,
}

/// Pick the slide members out of a container listing, in ascending slide number.
///
/// The container's directory order is arbitrary, so the number embedded
/// in the path decides presentation order. Equal numbers keep their
/// container order.
pub fn select_slides(entries: &[ContainerEntry]) -> Vec<SlideRef<'_>> {
    let mut slides: Vec<SlideRef<'_>> = entries
        .iter()
        .filter_map(|entry| {
            slide_number(&entry.logical_path).map(|number| SlideRef { number, entry })
        })
        .collect();

    // sort_by_key is stable.
    slides.sort_by_key(|slide| slide.number);
    slides
}

/// Slide number for a member path, or `None` if the path is not a slide.
fn slide_number(path: &str) -> Option<u64> {
    let captures = SLIDE_PATH_REGEX.captures(path)?;
    let digits = captures.get(1).map_or("", |m| m.as_str());
    Some(digits.parse().unwrap_or(0))
}
