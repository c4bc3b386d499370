//! Segment chopping for extracting sub-ranges from layer output.

use crate::segment::Segment;

/// Extracts a sub-range of segments from a layer's line.
///
/// Given a list of segments that represent a layer's content starting at `layer_x`,
/// this function extracts the portion that falls within the interval
/// `[cut_start, cut_start + cut_width)`.
///
/// If a segment straddles a cut boundary, it is split using `Segment::split_at`.
/// If the cut range extends beyond the segments, blank space is added.
///
/// # Arguments
///
/// * `segments` - The layer's segment list for this line
/// * `layer_x` - The x-offset where the layer starts on screen
/// * `cut_start` - The left edge of the cut interval
/// * `cut_width` - The width of the cut interval
///
/// # Returns
///
/// A list of segments covering exactly `cut_width` display columns,
/// starting at `cut_start`.
pub fn chop_segments(
    segments: &[Segment],
    layer_x: u16,
    cut_start: u16,
    cut_width: u16,
) -> Vec<Segment> {
    if cut_width == 0 {
        return vec![];
    }

    let cut_end = cut_start + cut_width;
    let mut result = Vec::new();
    let mut current_x = layer_x;

    for seg in segments {
        if seg.is_empty() || seg.is_control {
            continue;
        }

        let seg_width = seg.width() as u16;
        let seg_end = current_x + seg_width;

        // Segment entirely before cut range
        if seg_end <= cut_start {
            current_x = seg_end;
            continue;
        }

        // Segment entirely after cut range
        if current_x >= cut_end {
            break;
        }

        // Segment overlaps cut range
        let mut segment_to_add = seg.clone();

        // Trim left if segment starts before cut_start
        if current_x < cut_start {
            let trim_left = (cut_start - current_x) as usize;
            let (_left, right) = segment_to_add.split_at(trim_left);
            segment_to_add = right;
            current_x = cut_start;
        }

        // Trim right if segment extends beyond cut_end
        let remaining_width = (cut_end - current_x) as usize;
        if segment_to_add.width() > remaining_width {
            let (left, _right) = segment_to_add.split_at(remaining_width);
            segment_to_add = left;
        }

        if !segment_to_add.is_empty() {
            current_x += segment_to_add.width() as u16;
            result.push(segment_to_add);
        }

        if current_x >= cut_end {
            break;
        }
    }

    // Pad with blank if segments don't fill the cut range
    let total_width: usize = result.iter().map(|s| s.width()).sum();
    if (total_width as u16) < cut_width {
        let padding = " ".repeat((cut_width as usize) - total_width);
        result.push(Segment::new(padding));
    }

    result
}
