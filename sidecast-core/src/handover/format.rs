//! Container detection from file names and stream URLs.

use serde::{Deserialize, Serialize};

/// Container format of a stream, detected from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerFormat {
    Mp4,
    M4v,
    Mov,
    Mkv,
    Avi,
    WebM,
    Ts,
    Hls,
    Unknown,
}

impl ContainerFormat {
    /// Maps a file extension (without the dot) to a container format.
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "mp4" => Self::Mp4,
            "m4v" => Self::M4v,
            "mov" => Self::Mov,
            "mkv" => Self::Mkv,
            "avi" => Self::Avi,
            "webm" => Self::WebM,
            "ts" | "m2ts" => Self::Ts,
            "m3u8" => Self::Hls,
            _ => Self::Unknown,
        }
    }

    /// Detects the container from the last extension of a file name or path.
    pub fn from_path(path: &str) -> Self {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        match file_name.rsplit_once('.') {
            Some((stem, extension)) if !stem.is_empty() => Self::from_extension(extension),
            _ => Self::Unknown,
        }
    }

    /// Detects the container from a stream URL, ignoring query and fragment.
    pub fn from_url(stream_url: &str) -> Self {
        match url::Url::parse(stream_url) {
            Ok(parsed) => Self::from_path(parsed.path()),
            Err(_) => {
                let path = stream_url
                    .split(['?', '#'])
                    .next()
                    .unwrap_or(stream_url);
                Self::from_path(path)
            }
        }
    }

    /// Short lowercase label used in logs and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::M4v => "m4v",
            Self::Mov => "mov",
            Self::Mkv => "mkv",
            Self::Avi => "avi",
            Self::WebM => "webm",
            Self::Ts => "ts",
            Self::Hls => "m3u8",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What the dispatcher knows about the stream it is handing over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatHint {
    pub container: ContainerFormat,
    /// Whether the user asked for an external subtitle track
    #[serde(default)]
    pub subtitles_requested: bool,
}

impl FormatHint {
    /// Creates a hint without subtitles.
    pub fn new(container: ContainerFormat) -> Self {
        Self {
            container,
            subtitles_requested: false,
        }
    }

    /// Returns the same hint with a subtitle track requested.
    pub fn with_subtitles(mut self, subtitles_requested: bool) -> Self {
        self.subtitles_requested = subtitles_requested;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(ContainerFormat::from_path("Movie.2024.1080p.mkv"), ContainerFormat::Mkv);
        assert_eq!(ContainerFormat::from_path("/media/show/e01.MP4"), ContainerFormat::Mp4);
        assert_eq!(ContainerFormat::from_path("no_extension"), ContainerFormat::Unknown);
        assert_eq!(ContainerFormat::from_path(".mkv"), ContainerFormat::Unknown);
        assert_eq!(ContainerFormat::from_path("archive.rar"), ContainerFormat::Unknown);
    }

    #[test]
    fn test_from_url_ignores_query() {
        assert_eq!(
            ContainerFormat::from_url("https://cdn.example.com/v/file.mp4?token=abc.mkv"),
            ContainerFormat::Mp4
        );
        assert_eq!(
            ContainerFormat::from_url("https://cdn.example.com/live/index.m3u8#t=10"),
            ContainerFormat::Hls
        );
        assert_eq!(
            ContainerFormat::from_url("not a url/movie.webm?x=1"),
            ContainerFormat::WebM
        );
        assert_eq!(
            ContainerFormat::from_url("https://cdn.example.com/resolve/abc123"),
            ContainerFormat::Unknown
        );
    }

    #[test]
    fn test_serde_names() {
        let formats: Vec<ContainerFormat> = serde_json::from_str(r#"["mp4","webm","hls"]"#).unwrap();
        assert_eq!(
            formats,
            vec![ContainerFormat::Mp4, ContainerFormat::WebM, ContainerFormat::Hls]
        );
    }
}
