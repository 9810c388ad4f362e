//! Data types for addon stream descriptors and their parsed metadata.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sidecast_core::handover::ContainerFormat;

/// One addon-provided record describing a playable file.
///
/// Addons share no schema, so deserialization accepts any JSON value: unknown
/// fields are ignored and non-string values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value", rename_all = "camelCase")]
pub struct StreamDescriptor {
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub addon_name: Option<String>,
    /// File name hint, nested under `behaviorHints` by most addons
    pub filename: Option<String>,
}

impl From<Value> for StreamDescriptor {
    fn from(value: Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);

        let filename = value
            .get("behaviorHints")
            .and_then(|hints| hints.get("filename"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| text("filename"));

        Self {
            name: text("name"),
            title: text("title"),
            description: text("description"),
            url: text("url"),
            addon_name: text("addonName")
                .or_else(|| text("addon"))
                .or_else(|| text("source")),
            filename,
        }
    }
}

impl StreamDescriptor {
    /// Text fields in search order: filename hint, name, title, description.
    pub fn search_fields(&self) -> impl Iterator<Item = &str> {
        [&self.filename, &self.name, &self.title, &self.description]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .filter(|field| !field.is_empty())
    }

    /// Container hint from the filename, falling back to the URL.
    pub fn container_format(&self) -> ContainerFormat {
        let from_filename = self
            .filename
            .as_deref()
            .map(ContainerFormat::from_path)
            .unwrap_or(ContainerFormat::Unknown);

        if from_filename != ContainerFormat::Unknown {
            return from_filename;
        }

        self.url
            .as_deref()
            .map(ContainerFormat::from_url)
            .unwrap_or(ContainerFormat::Unknown)
    }
}

/// Video codec family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VideoCodec {
    #[serde(rename = "HEVC")]
    Hevc,
    #[serde(rename = "x264")]
    X264,
    #[serde(rename = "AV1")]
    Av1,
}

impl VideoCodec {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hevc => "HEVC",
            Self::X264 => "x264",
            Self::Av1 => "AV1",
        }
    }
}

/// High dynamic range format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HdrFormat {
    #[serde(rename = "DV")]
    DolbyVision,
    #[serde(rename = "HDR10+")]
    Hdr10Plus,
    #[serde(rename = "HDR")]
    Hdr,
}

impl HdrFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DolbyVision => "DV",
            Self::Hdr10Plus => "HDR10+",
            Self::Hdr => "HDR",
        }
    }
}

/// Object-based or lossless audio format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioFormat {
    #[serde(rename = "Atmos")]
    Atmos,
    #[serde(rename = "DTS-X")]
    DtsX,
    #[serde(rename = "TrueHD")]
    TrueHd,
    #[serde(rename = "DTS-HD")]
    DtsHd,
}

impl AudioFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Atmos => "Atmos",
            Self::DtsX => "DTS-X",
            Self::TrueHd => "TrueHD",
            Self::DtsHd => "DTS-HD",
        }
    }
}

/// Vertical video resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "480p")]
    Sd480,
    #[serde(rename = "720p")]
    Hd720,
    #[serde(rename = "1080p")]
    FullHd1080,
    #[serde(rename = "2160p")]
    Uhd2160,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sd480 => "480p",
            Self::Hd720 => "720p",
            Self::FullHd1080 => "1080p",
            Self::Uhd2160 => "2160p",
        }
    }
}

macro_rules! impl_display_via_as_str {
    ($($ty:ty),*) => {
        $(impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

impl_display_via_as_str!(VideoCodec, HdrFormat, AudioFormat, Resolution);

/// Structured metadata extracted from one descriptor.
///
/// Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedStreamMetadata {
    pub addon: Option<String>,
    /// Normalized as `<number> <GB|MB|TB>`
    pub size: Option<String>,
    pub seeders: Option<String>,
    pub codec: Option<VideoCodec>,
    pub hdr: Option<HdrFormat>,
    pub audio: Option<AudioFormat>,
    pub resolution: Option<Resolution>,
}

impl ParsedStreamMetadata {
    /// Approximate size in bytes using decimal units.
    pub fn size_bytes(&self) -> Option<u64> {
        let (number, unit) = self.size.as_deref()?.split_once(' ')?;
        let value = parse_size_number(number)?;
        let multiplier = match unit {
            "MB" => 1e6,
            "GB" => 1e9,
            "TB" => 1e12,
            _ => return None,
        };
        Some((value * multiplier).round() as u64)
    }

    /// Seeder count as a number.
    pub fn seeder_count(&self) -> Option<u32> {
        self.seeders.as_deref()?.parse().ok()
    }

    /// Short quality badges in display order, e.g. `["2160p", "DV", "HEVC", "Atmos"]`.
    pub fn badges(&self) -> Vec<&'static str> {
        [
            self.resolution.map(|value| value.as_str()),
            self.hdr.map(|value| value.as_str()),
            self.codec.map(|value| value.as_str()),
            self.audio.map(|value| value.as_str()),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Reads a size number that may use `,` or `.` for grouping or decimals.
///
/// The last separator is the decimal point, unless it repeats earlier in the
/// number (`1.234.567`) or is a lone comma before exactly three digits
/// (`1,234`), in which case it groups digits.
fn parse_size_number(number: &str) -> Option<f64> {
    let Some(last) = number.rfind([',', '.']) else {
        return number.parse().ok();
    };
    let (whole, separator, fraction) = (
        &number[..last],
        &number[last..=last],
        &number[last + 1..],
    );

    let grouping = whole.contains(separator)
        || (separator == "," && !whole.contains('.') && fraction.len() == 3);
    let whole_digits: String = whole.chars().filter(char::is_ascii_digit).collect();

    if grouping {
        format!("{whole_digits}{fraction}").parse().ok()
    } else {
        format!("{whole_digits}.{fraction}").parse().ok()
    }
}

/// A descriptor together with everything derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStream {
    pub descriptor: StreamDescriptor,
    pub metadata: ParsedStreamMetadata,
    pub display_name: String,
    pub format: ContainerFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_tolerates_any_shape() {
        let descriptor: StreamDescriptor = serde_json::from_str(
            r#"{
                "name": "Torrentio\n4k",
                "title": 42,
                "url": "https://cdn.example.com/x.mkv",
                "behaviorHints": {"filename": "Movie.2024.2160p.mkv", "bingeGroup": "a"},
                "extra": [1, 2, 3]
            }"#,
        )
        .unwrap();

        assert_eq!(descriptor.name.as_deref(), Some("Torrentio\n4k"));
        assert_eq!(descriptor.title, None);
        assert_eq!(descriptor.filename.as_deref(), Some("Movie.2024.2160p.mkv"));
        assert_eq!(descriptor.addon_name, None);

        let empty: StreamDescriptor = serde_json::from_str("null").unwrap();
        assert_eq!(empty, StreamDescriptor::default());
    }

    #[test]
    fn test_search_fields_order_skips_empty() {
        let descriptor = StreamDescriptor {
            name: Some(String::new()),
            title: Some("title".to_string()),
            description: Some("desc".to_string()),
            filename: Some("file.mkv".to_string()),
            ..Default::default()
        };

        let fields: Vec<&str> = descriptor.search_fields().collect();
        assert_eq!(fields, vec!["file.mkv", "title", "desc"]);
    }

    #[test]
    fn test_container_prefers_filename() {
        let descriptor = StreamDescriptor {
            url: Some("https://cdn.example.com/play/abc.mp4".to_string()),
            filename: Some("Show.S01E01.mkv".to_string()),
            ..Default::default()
        };
        assert_eq!(descriptor.container_format(), ContainerFormat::Mkv);

        let descriptor = StreamDescriptor {
            url: Some("https://cdn.example.com/play/abc.mp4?t=1".to_string()),
            filename: Some("no-extension".to_string()),
            ..Default::default()
        };
        assert_eq!(descriptor.container_format(), ContainerFormat::Mp4);
    }

    #[test]
    fn test_size_bytes() {
        let metadata = ParsedStreamMetadata {
            size: Some("2.4 GB".to_string()),
            ..Default::default()
        };
        assert_eq!(metadata.size_bytes(), Some(2_400_000_000));

        let metadata = ParsedStreamMetadata {
            size: Some("1,5 TB".to_string()),
            seeders: Some("17".to_string()),
            ..Default::default()
        };
        assert_eq!(metadata.size_bytes(), Some(1_500_000_000_000));
        assert_eq!(metadata.seeder_count(), Some(17));

        assert_eq!(ParsedStreamMetadata::default().size_bytes(), None);

        let bytes = |size: &str| {
            ParsedStreamMetadata {
                size: Some(size.to_string()),
                ..Default::default()
            }
            .size_bytes()
        };
        assert_eq!(bytes("800 MB"), Some(800_000_000));
        assert_eq!(bytes("1,234.5 MB"), Some(1_234_500_000));
        assert_eq!(bytes("1.234,5 MB"), Some(1_234_500_000));
        assert_eq!(bytes("1,234 MB"), Some(1_234_000_000));
        assert_eq!(bytes("1.234.567 MB"), Some(1_234_567_000_000));
        assert_eq!(bytes("2.4 PB"), None);
    }

    #[test]
    fn test_serialized_labels() {
        let metadata = ParsedStreamMetadata {
            codec: Some(VideoCodec::Hevc),
            hdr: Some(HdrFormat::Hdr10Plus),
            audio: Some(AudioFormat::DtsX),
            ..Default::default()
        };
        let json = serde_json::to_value(&metadata).unwrap();

        assert_eq!(json["codec"], "HEVC");
        assert_eq!(json["hdr"], "HDR10+");
        assert_eq!(json["audio"], "DTS-X");
        assert_eq!(json["size"], Value::Null);
    }
}
