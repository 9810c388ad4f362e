//! Stream metadata parsing and display names.
//!
//! Both entry points are total: any descriptor, including an empty one,
//! produces a result. Categories that cannot be extracted stay `None`.

use crate::rules::{Category, Extracted, extract};
use crate::types::{ParsedStreamMetadata, Resolution, StreamDescriptor};

/// Video container extensions stripped from filename hints.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "m4v", "avi", "mov", "webm", "ts", "m2ts", "wmv", "flv", "mpg", "mpeg",
];

/// Minimum dot-separated segments for a line to look like a release name.
const RELEASE_NAME_MIN_SEGMENTS: usize = 3;

/// Extracts structured metadata from a descriptor.
///
/// Search text is the filename hint, name, title and description joined in
/// that order, so earlier fields win when a category's first matching rule
/// hits several of them.
pub fn parse(descriptor: &StreamDescriptor) -> ParsedStreamMetadata {
    let corpus = descriptor.search_fields().collect::<Vec<_>>().join("\n");

    let text = |category| match extract(category, &corpus) {
        Some(Extracted::Text(value)) => Some(value),
        _ => None,
    };

    let metadata = ParsedStreamMetadata {
        addon: descriptor
            .addon_name
            .as_deref()
            .map(str::trim)
            .filter(|addon| !addon.is_empty())
            .map(str::to_string),
        size: text(Category::Size),
        seeders: text(Category::Seeders),
        codec: match extract(Category::Codec, &corpus) {
            Some(Extracted::Codec(codec)) => Some(codec),
            _ => None,
        },
        hdr: match extract(Category::Hdr, &corpus) {
            Some(Extracted::Hdr(hdr)) => Some(hdr),
            _ => None,
        },
        audio: match extract(Category::Audio, &corpus) {
            Some(Extracted::Audio(audio)) => Some(audio),
            _ => None,
        },
        resolution: resolution_of(&corpus),
    };

    tracing::debug!(?metadata, "Parsed stream metadata");
    metadata
}

/// Picks a human-readable name for a descriptor.
///
/// Prefers the filename hint without its video extension, then a first
/// description line that looks like a release name, then `name` or `title`,
/// and finally `Stream {index + 1}`.
pub fn display_name(descriptor: &StreamDescriptor, index: usize) -> String {
    if let Some(filename) = non_blank(&descriptor.filename) {
        let stripped = strip_video_extension(filename);
        if !stripped.trim().is_empty() {
            return stripped.to_string();
        }
    }

    if let Some(first_line) = non_blank(&descriptor.description)
        .and_then(|description| description.lines().next())
        .map(str::trim)
        && looks_like_release_name(first_line)
    {
        return first_line.to_string();
    }

    if let Some(label) = non_blank(&descriptor.name).or_else(|| non_blank(&descriptor.title)) {
        return label.trim().to_string();
    }

    format!("Stream {}", index.saturating_add(1))
}

/// Strips one trailing known video extension, case-insensitively.
pub fn strip_video_extension(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, extension))
            if !stem.is_empty()
                && VIDEO_EXTENSIONS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(extension)) =>
        {
            stem
        }
        _ => filename,
    }
}

/// A resolution token and at least three non-empty dot-separated segments.
pub fn looks_like_release_name(line: &str) -> bool {
    let segments = line.split('.').filter(|segment| !segment.is_empty()).count();
    segments >= RELEASE_NAME_MIN_SEGMENTS && resolution_of(line).is_some()
}

fn resolution_of(text: &str) -> Option<Resolution> {
    match extract(Category::Resolution, text) {
        Some(Extracted::Resolution(resolution)) => Some(resolution),
        _ => None,
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.trim().is_empty())
}
