use crate::error::{Error, Result};
use std::fmt;

/// An inclusive, 1-based span of pages that becomes one output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start >= 1 && end >= start);
        PageRange { start, end }
    }

    pub fn is_single_page(&self) -> bool {
        self.start == self.end
    }
}

/// Renders as pdftk's range expression: "5" for a single page, "5-8" otherwise.
impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_page() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Check a list of cut points against the document's page count.
///
/// The list is expected in ascending order. Duplicates are found by comparing
/// each element to its predecessor, and the first repeat is reported. On
/// success the page count is appended unless it is already the last element,
/// so the compiled ranges always reach the end of the document.
pub fn validate_cut_points(cut_points: &[u32], total_pages: u32) -> Result<Vec<u32>> {
    if let Some(pair) = cut_points.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(Error::DuplicateCutPoints {
            page: pair[1],
            pages: cut_points.to_vec(),
        });
    }

    let mut pages = cut_points.to_vec();
    match pages.last() {
        Some(&last) if last > total_pages => {
            return Err(Error::CutPointExceedsPageCount {
                page: last,
                total: total_pages,
                pages,
            });
        }
        Some(&last) if last == total_pages => {}
        _ => pages.push(total_pages),
    }

    Ok(pages)
}

/// Turn validated cut points into consecutive ranges starting at page 1.
pub fn compile_ranges(cut_points: &[u32]) -> Vec<PageRange> {
    let mut start = 1;
    cut_points
        .iter()
        .map(|&cut| {
            let range = PageRange::new(start, cut);
            start = cut + 1;
            range
        })
        .collect()
}
