//! Ratio-constrained boundary computation
//!
//! Turns detected gaps into cut rows that respect a height budget of
//! `width * aspect_ratio`. Within budget the latest gap wins; without one the
//! cut may stretch to the next gap (bounded) or fall back to a hard cut.

use super::types::{PanelBoundaries, SplitOptions};
use crate::gap::Gap;
use tracing::{debug, warn};

/// Ratio-constrained splitter
pub struct RatioSplitter;

impl RatioSplitter {
    /// Compute cut rows for a page
    pub fn split(
        page_height: u32,
        page_width: u32,
        gaps: &[Gap],
        options: &SplitOptions,
    ) -> PanelBoundaries {
        let max_panel_height = options.max_panel_height(page_width);

        let rows = if page_height == 0 {
            vec![0]
        } else if gaps.is_empty() {
            debug!(max_panel_height, "no gaps, tiling at fixed height");
            Self::tile(page_height, max_panel_height)
        } else {
            Self::walk(page_height, max_panel_height, gaps, options)
        };

        PanelBoundaries {
            rows,
            page_height,
            max_panel_height,
        }
    }

    /// Uniform tiling `0, h, 2h, ..., page_height`
    pub fn tile(page_height: u32, max_panel_height: u32) -> Vec<u32> {
        let step = max_panel_height.max(1);
        let mut rows = vec![0];
        let mut y = step;
        while y < page_height {
            rows.push(y);
            y += step;
        }
        if page_height > 0 {
            rows.push(page_height);
        }
        rows
    }

    /// Content extent after trimming top/bottom margin gaps
    pub fn content_extent(page_height: u32, gaps: &[Gap], options: &SplitOptions) -> (u32, u32) {
        let panel_gaps: Vec<&Gap> = gaps
            .iter()
            .filter(|g| g.is_at_least(options.min_panel_gap_height))
            .collect();

        let mut remaining = panel_gaps.as_slice();
        let mut start_y = 0;
        if let Some((first, rest)) = remaining.split_first() {
            if first.start < options.edge_margin {
                start_y = (first.end + 1).min(page_height);
                remaining = rest;
            }
        }

        let mut end_y = page_height;
        if let Some(last) = remaining.last() {
            if i64::from(last.end) > i64::from(page_height) - i64::from(options.edge_margin) {
                end_y = last.start;
            }
        }

        (start_y, end_y.max(start_y))
    }

    /// Latest gap whose midpoint lies in `(lo, hi]`; first wins on ties
    pub(crate) fn latest_gap_in(gaps: &[Gap], lo: u32, hi: u32) -> Option<&Gap> {
        gaps.iter()
            .filter(|g| g.mid > lo && g.mid <= hi)
            .reduce(|best, g| if g.mid > best.mid { g } else { best })
    }

    /// Earliest gap whose midpoint lies past `lo`, trimmed margins included
    pub(crate) fn next_gap_after(gaps: &[Gap], lo: u32) -> Option<&Gap> {
        gaps.iter().filter(|g| g.mid > lo).min_by_key(|g| g.mid)
    }

    fn walk(page_height: u32, max_panel_height: u32, gaps: &[Gap], options: &SplitOptions) -> Vec<u32> {
        let (start_y, end_y) = Self::content_extent(page_height, gaps, options);
        let stretch_limit = max_panel_height.saturating_mul(options.max_stretch_factor);

        let mut rows = vec![start_y];
        let mut current = start_y;

        while current < end_y {
            if end_y - current <= max_panel_height {
                rows.push(end_y);
                break;
            }

            let ceiling = current + max_panel_height;
            let next = if let Some(gap) = Self::latest_gap_in(gaps, current, ceiling) {
                gap.mid
            } else {
                match Self::next_gap_after(gaps, ceiling) {
                    // A gap at or past end_y closes the page there
                    Some(gap) if gap.mid - current <= stretch_limit => {
                        let to = gap.mid.min(end_y);
                        debug!(from = current, to, "no gap in budget, stretching to next gap");
                        to
                    }
                    Some(_) => {
                        debug!(from = current, to = ceiling, "next gap too far, hard cut");
                        ceiling
                    }
                    None => {
                        warn!(
                            from = current,
                            to = end_y,
                            height = end_y - current,
                            "no gap left, keeping oversized residual panel"
                        );
                        end_y
                    }
                }
            };

            rows.push(next);
            current = next;
        }

        if rows.last() != Some(&end_y) {
            rows.push(end_y);
        }

        debug!(?rows, start_y, end_y, "boundaries computed");
        rows
    }
}
