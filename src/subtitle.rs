use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::Result;

pub const WORDS_PER_SEGMENT: usize = 5;
pub const MIN_SEGMENT_MS: u64 = 1_200;
pub const DEFAULT_TOTAL_MS: u64 = 34_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionSegment {
    pub index: usize,
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
}

/// Five-word captions laid end to end, each `total_ms / n` long.
///
/// Captions are never stretched to `MIN_SEGMENT_MS`: doing so would push the
/// tail past `total_ms` and leave the last captions zero width.
pub fn build_timeline(text: &str, total_ms: u64) -> Vec<CaptionSegment> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let chunks: Vec<String> = words
        .chunks(WORDS_PER_SEGMENT)
        .map(|chunk| chunk.join(" "))
        .collect();
    let count = chunks.len() as u64;
    let seg = total_ms / count;
    if seg < MIN_SEGMENT_MS {
        warn!(
            "{} captions over {} ms leaves {} ms each, below the {} ms reading minimum",
            count, total_ms, seg, MIN_SEGMENT_MS
        );
    }

    let mut cur = 0;
    chunks
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let start = cur;
            let end = total_ms.min(cur + seg);
            cur = end;
            CaptionSegment {
                index: i + 1,
                start_ms: start,
                end_ms: end,
                text,
            }
        })
        .collect()
}

pub fn to_srt(timeline: &[CaptionSegment]) -> String {
    timeline
        .iter()
        .map(|seg| {
            format!(
                "{}\n{} --> {}\n{}\n\n",
                seg.index,
                format_srt_time(seg.start_ms),
                format_srt_time(seg.end_ms),
                seg.text
            )
        })
        .collect()
}

pub fn write_srt(path: &Path, timeline: &[CaptionSegment]) -> Result<()> {
    fs::write(path, to_srt(timeline))?;
    Ok(())
}

pub fn format_srt_time(total_ms: u64) -> String {
    let ms = total_ms % 1000;
    let total_sec = total_ms / 1000;
    let s = total_sec % 60;
    let total_min = total_sec / 60;
    let m = total_min % 60;
    let h = total_min / 60;
    format!("{:02}:{:02}:{:02},{:03}", h, m, s, ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_contiguous(timeline: &[CaptionSegment], total_ms: u64) {
        for pair in timeline.windows(2) {
            assert_eq!(pair[0].end_ms, pair[1].start_ms);
            assert!(pair[0].start_ms <= pair[1].start_ms);
        }
        if let Some(first) = timeline.first() {
            assert_eq!(first.start_ms, 0);
        }
        if let Some(last) = timeline.last() {
            assert!(last.end_ms <= total_ms);
        }
    }

    #[test]
    fn empty_text_has_no_segments() {
        assert!(build_timeline("", DEFAULT_TOTAL_MS).is_empty());
        assert!(build_timeline(" \n\t", DEFAULT_TOTAL_MS).is_empty());
    }

    #[test]
    fn splits_into_five_word_chunks() {
        let timeline = build_timeline("one two three four five six seven", 10_000);
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].text, "one two three four five");
        assert_eq!(timeline[1].text, "six seven");
        assert_eq!((timeline[0].start_ms, timeline[0].end_ms), (0, 5_000));
        assert_eq!((timeline[1].start_ms, timeline[1].end_ms), (5_000, 10_000));
        assert_eq!(timeline[1].index, 2);
    }

    #[test]
    fn segments_share_the_total_evenly() {
        let text = "a b c d e f g h i j k l m n o";
        let timeline = build_timeline(text, 4_000);
        assert_eq!(timeline.len(), 3);
        assert!(timeline.iter().all(|s| s.end_ms - s.start_ms == 1_333));
        assert_eq!(timeline[2].end_ms, 3_999);
        assert_contiguous(&timeline, 4_000);
    }

    #[test]
    fn segments_below_the_reading_minimum_are_not_stretched() {
        // 4 captions over 2400 ms: stretching to 1200 ms would end at 4800
        let text = vec!["w"; 20].join(" ");
        let timeline = build_timeline(&text, 2_400);
        assert_eq!(timeline.len(), 4);
        assert!(timeline.iter().all(|s| s.end_ms - s.start_ms == 600));
        assert_eq!(timeline[3].end_ms, 2_400);
    }

    #[test]
    fn short_total_shares_time_evenly() {
        let timeline = build_timeline("A B C D E F G H", 1_000);
        assert_eq!(timeline.len(), 2);
        assert_eq!((timeline[0].start_ms, timeline[0].end_ms), (0, 500));
        assert_eq!((timeline[1].start_ms, timeline[1].end_ms), (500, 1_000));
    }

    #[test]
    fn very_long_narration_never_collapses_segments() {
        let text = vec!["w"; 500].join(" ");
        let timeline = build_timeline(&text, DEFAULT_TOTAL_MS);
        assert_eq!(timeline.len(), 100);
        assert!(timeline.iter().all(|s| s.end_ms > s.start_ms));
        assert_contiguous(&timeline, DEFAULT_TOTAL_MS);
    }

    #[test]
    fn segments_reproduce_the_narration() {
        let text = "Top 100 #1: Bitcoin (BTC) is a cryptocurrency project in the ecosystem. \
                    This is not financial advice.";
        let timeline = build_timeline(text, DEFAULT_TOTAL_MS);
        let joined = timeline
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(
            joined.split_whitespace().collect::<Vec<_>>(),
            text.split_whitespace().collect::<Vec<_>>()
        );
        assert_eq!(timeline.len(), text.split_whitespace().count().div_ceil(5));
        assert_contiguous(&timeline, DEFAULT_TOTAL_MS);
    }

    #[test]
    fn formats_timestamps() {
        assert_eq!(format_srt_time(0), "00:00:00,000");
        assert_eq!(format_srt_time(34_000), "00:00:34,000");
        assert_eq!(format_srt_time(3_723_004), "01:02:03,004");
    }

    #[test]
    fn renders_srt_blocks() {
        let timeline = build_timeline("one two three four five six", 4_000);
        assert_eq!(
            to_srt(&timeline),
            "1\n00:00:00,000 --> 00:00:02,000\none two three four five\n\n\
             2\n00:00:02,000 --> 00:00:04,000\nsix\n\n"
        );
    }
}
