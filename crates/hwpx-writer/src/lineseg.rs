//! Line segment estimation
//!
//! Every HWPX paragraph carries a `hp:linesegarray`: a cache of where each
//! visual line starts and how tall it is. Hangul Office re-measures on load,
//! so the values only need to be plausible and reproducible. Text is
//! measured with a fixed two-class model: wide (CJK) characters take a full
//! character height, everything else half of it.

/// Flag bit marking the first line of a paragraph
pub const LINE_FIRST: u32 = 0x2_0000;
/// Flag bit marking the last line of a paragraph
pub const LINE_LAST: u32 = 0x4_0000;

/// Code points above this count as full width
const WIDE_CHAR_THRESHOLD: u32 = 0x2000;

/// One estimated visual line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSegment {
    /// Offset of the first character of the line, in characters
    pub text_pos: usize,
    pub vert_pos: u32,
    pub vert_size: u32,
    pub text_height: u32,
    pub baseline: u32,
    pub spacing: u32,
    pub horz_size: u32,
    pub flags: u32,
}

impl LineSegment {
    /// A single-line segment with explicit metrics
    pub fn single(vert_size: u32, baseline: u32, spacing: u32, horz_size: u32) -> Self {
        Self {
            text_pos: 0,
            vert_pos: 0,
            vert_size,
            text_height: vert_size,
            baseline,
            spacing,
            horz_size,
            flags: LINE_FIRST | LINE_LAST,
        }
    }

    /// Whether this is the first line
    pub fn is_first(&self) -> bool {
        self.flags & LINE_FIRST != 0
    }

    /// Whether this is the last line
    pub fn is_last(&self) -> bool {
        self.flags & LINE_LAST != 0
    }
}

/// Estimate line breaks for `text`
///
/// Always returns at least one segment. Offsets are strictly increasing and
/// start at 0; only the first segment has [`LINE_FIRST`] and only the last
/// has [`LINE_LAST`].
pub fn compute_line_breaks(
    text: &str,
    char_height: u32,
    line_spacing_percent: u32,
    line_width: u32,
) -> Vec<LineSegment> {
    let spacing = saturate(
        u64::from(char_height) * u64::from(line_spacing_percent.saturating_sub(100)) / 100,
    );
    let pitch = u64::from(char_height) + u64::from(spacing);
    let baseline = (f64::from(char_height) * 0.85) as u32;

    let chars: Vec<char> = text.chars().collect();
    let mut starts = vec![0usize];
    let mut width: u64 = 0;
    for (i, ch) in chars.iter().enumerate() {
        width += if u32::from(*ch) > WIDE_CHAR_THRESHOLD {
            u64::from(char_height)
        } else {
            u64::from(char_height / 2)
        };
        if width > u64::from(line_width) && i + 1 < chars.len() {
            starts.push(i + 1);
            width = 0;
        }
    }

    let count = starts.len();
    starts
        .into_iter()
        .enumerate()
        .map(|(index, text_pos)| {
            let mut flags = 0;
            if index == 0 {
                flags |= LINE_FIRST;
            }
            if index == count - 1 {
                flags |= LINE_LAST;
            }
            LineSegment {
                text_pos,
                vert_pos: saturate(index as u64 * pitch),
                vert_size: char_height,
                text_height: char_height,
                baseline,
                spacing,
                horz_size: line_width,
                flags,
            }
        })
        .collect()
}

fn saturate(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Serialize segments as a `hp:linesegarray` element
pub fn lineseg_xml(segments: &[LineSegment]) -> String {
    let mut xml = String::from("<hp:linesegarray>");
    for seg in segments {
        xml.push_str(&format!(
            "<hp:lineseg textpos=\"{}\" vertpos=\"{}\" vertsize=\"{}\" textheight=\"{}\" \
             baseline=\"{}\" spacing=\"{}\" horzpos=\"0\" horzsize=\"{}\" flags=\"{}\"/>",
            seg.text_pos,
            seg.vert_pos,
            seg.vert_size,
            seg.text_height,
            seg.baseline,
            seg.spacing,
            seg.horz_size,
            seg.flags
        ));
    }
    xml.push_str("</hp:linesegarray>");
    xml
}
