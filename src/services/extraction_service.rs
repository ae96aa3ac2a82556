use std::collections::HashSet;

use regex::Regex;

use crate::models::chat::{DaySpots, ExtractedSpot};
use crate::models::spot::SpotContext;
use crate::services::storage_service::ImageUrlResolver;

const DEFAULT_VISIT_TIME: &str = "09:00";

// Window of segment text around a matched title that is searched for a time.
const TIME_WINDOW_BEFORE: usize = 50;
const TIME_WINDOW_AFTER: usize = 150;

/// Splits an assistant reply into (day number, segment) pairs based on
/// explicit "Day N" markers. The marker itself is excluded from the segment,
/// and text before the first marker is not attributed to any day. A reply
/// with no markers at all is treated as a single day-1 segment.
pub fn split_day_segments(text: &str) -> Vec<(u32, String)> {
    let marker = Regex::new(r"(?i)\bday\s+(\d+)[:\-\s]").unwrap();

    let mut boundaries: Vec<(u32, usize, usize)> = Vec::new();
    for caps in marker.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        if let Ok(day) = caps[1].parse::<u32>() {
            boundaries.push((day, whole.start(), whole.end()));
        }
    }

    if boundaries.is_empty() {
        return vec![(1, text.to_string())];
    }

    let mut segments = Vec::with_capacity(boundaries.len());
    for (i, &(day, _, content_start)) in boundaries.iter().enumerate() {
        let content_end = boundaries
            .get(i + 1)
            .map(|&(_, next_start, _)| next_start)
            .unwrap_or(text.len());
        segments.push((day, text[content_start..content_end].to_string()));
    }

    segments
}

/// Finds catalog spots mentioned in one day segment. Matching is an exact
/// case-insensitive substring test against the full spot title; no fuzzy or
/// partial matching, so a spot only ever matches where its real name appears.
///
/// `used` is shared across every segment of one extraction pass: a spot
/// claimed by an earlier day is skipped here even if its title appears again,
/// which keeps each spot on exactly one day per response.
pub fn match_spots_in_segment(
    segment: &str,
    day: u32,
    spots: &[SpotContext],
    used: &mut HashSet<String>,
    resolver: &ImageUrlResolver,
) -> Vec<ExtractedSpot> {
    let segment_lower = segment.to_lowercase();
    let mut matched = Vec::new();

    for spot in spots {
        if used.contains(&spot.id) {
            continue;
        }

        let title_lower = spot.title.to_lowercase();
        if title_lower.is_empty() {
            continue;
        }

        let Some(position) = segment_lower.find(&title_lower) else {
            continue;
        };

        let (Some(lat), Some(lng)) = (spot.lat, spot.lng) else {
            println!(
                "Skipping '{}': mentioned on day {} but has no coordinates",
                spot.title, day
            );
            continue;
        };

        let window = time_window(&segment_lower, position, title_lower.len());
        let time = infer_visit_time(window);

        used.insert(spot.id.clone());
        matched.push(ExtractedSpot {
            id: spot.id.clone(),
            title: spot.title.clone(),
            location: spot.location.clone().unwrap_or_default(),
            lat,
            lng,
            rating: spot.rating.unwrap_or(0.0),
            image: spot.first_image().map(|path| resolver.resolve(path)),
            price_per_night: spot.price_per_night(),
            day,
            time,
        });
    }

    matched
}

/// Runs segmentation and matching over a whole reply with one shared
/// used-set, producing the day-keyed map the widget consumes.
pub fn extract_mentioned_spots(
    text: &str,
    spots: &[SpotContext],
    resolver: &ImageUrlResolver,
) -> DaySpots {
    let mut used = HashSet::new();
    let mut day_spots = DaySpots::new();

    for (day, segment) in split_day_segments(text) {
        let found = match_spots_in_segment(&segment, day, spots, &mut used, resolver);
        if !found.is_empty() {
            day_spots.entry(day).or_default().extend(found);
        }
    }

    day_spots
}

/// Clock time for a matched spot: an explicit time near the title wins, then
/// a time-of-day keyword, then the default morning slot.
fn infer_visit_time(window: &str) -> String {
    if let Some(time) = explicit_clock_time(window) {
        return time;
    }

    // "afternoon" is checked ahead of "noon" so it cannot be shadowed by its
    // own substring.
    let keyword_times = [
        ("morning", "08:00"),
        ("afternoon", "14:00"),
        ("lunch", "12:00"),
        ("noon", "12:00"),
        ("evening", "18:00"),
        ("dinner", "18:00"),
        ("night", "20:00"),
    ];

    for (keyword, time) in keyword_times {
        if window.contains(keyword) {
            return time.to_string();
        }
    }

    DEFAULT_VISIT_TIME.to_string()
}

fn explicit_clock_time(window: &str) -> Option<String> {
    let with_minutes = Regex::new(r"(\d{1,2}):(\d{2})\s*([ap]m)?").unwrap();
    if let Some(caps) = with_minutes.captures(window) {
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        let meridiem = caps.get(3).map(|m| m.as_str());
        if let Some(time) = to_clock(hour, minute, meridiem) {
            return Some(time);
        }
    }

    let hour_only = Regex::new(r"(\d{1,2})\s*([ap]m)\b").unwrap();
    if let Some(caps) = hour_only.captures(window) {
        let hour: u32 = caps[1].parse().ok()?;
        let meridiem = caps.get(2).map(|m| m.as_str());
        if let Some(time) = to_clock(hour, 0, meridiem) {
            return Some(time);
        }
    }

    None
}

fn to_clock(hour: u32, minute: u32, meridiem: Option<&str>) -> Option<String> {
    if minute > 59 {
        return None;
    }

    let hour = match meridiem {
        Some("pm") if hour < 12 => hour + 12,
        Some("am") if hour == 12 => 0,
        _ => hour,
    };

    if hour > 23 {
        return None;
    }

    Some(format!("{:02}:{:02}", hour, minute))
}

// The match position comes from the lowercased segment, which is also what we
// slice; clamp to char boundaries since the window offsets are byte counts.
fn time_window(segment_lower: &str, title_start: usize, title_len: usize) -> &str {
    let start = floor_char_boundary(segment_lower, title_start.saturating_sub(TIME_WINDOW_BEFORE));
    let end = ceil_char_boundary(
        segment_lower,
        (title_start + title_len + TIME_WINDOW_AFTER).min(segment_lower.len()),
    );
    &segment_lower[start..end]
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(s: &str, mut index: usize) -> usize {
    while index < s.len() && !s.is_char_boundary(index) {
        index += 1;
    }
    index
}
