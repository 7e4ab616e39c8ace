//! Image presentation helpers: remote URL allow-list patterns and viewer
//! sizing rules.

use url::Url;

use crate::error::{ModelError, Result};

/// Orientation derived from intrinsic pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Orientation {
    Portrait,
    Landscape,
    Square,
}

impl Orientation {
    pub const fn from_dimensions(width: u32, height: u32) -> Self {
        if height > width {
            Orientation::Portrait
        } else if width > height {
            Orientation::Landscape
        } else {
            Orientation::Square
        }
    }
}

/// Upper bound applied to one axis of a displayed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MaxExtent {
    Unbounded,
    /// The full viewport along this axis.
    Viewport,
    Pixels(u32),
}

/// How the full-screen viewer bounds an image. The image always fills the
/// available width and keeps its aspect ratio; these limits stop tall images
/// from overflowing the screen and wide images from upscaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisplayConstraints {
    pub max_width: MaxExtent,
    pub max_height: MaxExtent,
}

impl DisplayConstraints {
    pub const fn for_dimensions(width: u32, height: u32) -> Self {
        match Orientation::from_dimensions(width, height) {
            Orientation::Portrait => Self {
                max_width: MaxExtent::Unbounded,
                max_height: MaxExtent::Viewport,
            },
            Orientation::Landscape => Self {
                max_width: MaxExtent::Pixels(width),
                max_height: MaxExtent::Unbounded,
            },
            Orientation::Square => Self {
                max_width: MaxExtent::Unbounded,
                max_height: MaxExtent::Unbounded,
            },
        }
    }
}

/// Allow-list entry for remote image URLs.
///
/// `hostname` and `pathname` are globs over `.`- and `/`-separated segments:
/// `*` matches exactly one segment and `**` matches any number of segments,
/// including none. A `None` port only matches URLs without an explicit port.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RemotePattern {
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub protocol: Option<String>,
    pub hostname: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub port: Option<u16>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub pathname: Option<String>,
}

impl RemotePattern {
    pub fn new(
        protocol: Option<&str>,
        hostname: &str,
        port: Option<u16>,
        pathname: Option<&str>,
    ) -> Result<Self> {
        let pattern = Self {
            protocol: protocol.map(str::to_ascii_lowercase),
            hostname: hostname.to_ascii_lowercase(),
            port,
            pathname: pathname.map(str::to_string),
        };
        pattern.validate()?;
        Ok(pattern)
    }

    /// Delivery pattern for a provider cloud: `https://res.cloudinary.com/<cloud>/image/upload/**`.
    pub fn cloudinary_uploads(cloud_name: &str) -> Result<Self> {
        Self::new(
            Some("https"),
            "res.cloudinary.com",
            None,
            Some(&format!("/{cloud_name}/image/upload/**")),
        )
    }

    pub fn validate(&self) -> Result<()> {
        if self.hostname.trim().is_empty() {
            return Err(ModelError::InvalidPattern(
                "hostname must not be empty".into(),
            ));
        }
        if let Some(pathname) = &self.pathname
            && !pathname.starts_with('/')
        {
            return Err(ModelError::InvalidPattern(format!(
                "pathname '{pathname}' must start with '/'"
            )));
        }
        Ok(())
    }

    /// Parses `raw` and checks it against this pattern. Unparseable URLs
    /// never match.
    pub fn matches_str(&self, raw: &str) -> bool {
        Url::parse(raw).is_ok_and(|url| self.matches(&url))
    }

    pub fn matches(&self, url: &Url) -> bool {
        if let Some(protocol) = &self.protocol
            && !protocol.trim_end_matches(':').eq_ignore_ascii_case(url.scheme())
        {
            return false;
        }

        if url.port() != self.port {
            return false;
        }

        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        let host_segments: Vec<&str> = host.split('.').collect();
        let host_pattern: Vec<&str> = self.hostname.split('.').collect();
        if !glob_segments(&host_pattern, &host_segments) {
            return false;
        }

        match &self.pathname {
            None => true,
            Some(pathname) => {
                let path_pattern: Vec<&str> =
                    pathname.trim_start_matches('/').split('/').collect();
                let path_segments: Vec<&str> =
                    url.path().trim_start_matches('/').split('/').collect();
                glob_segments(&path_pattern, &path_segments)
            }
        }
    }
}

/// True when any pattern admits `raw`; an empty allow-list admits everything.
pub fn allowed_by_any(patterns: &[RemotePattern], raw: &str) -> bool {
    patterns.is_empty()
        || patterns.iter().any(|pattern| pattern.matches_str(raw))
}

fn glob_segments(pattern: &[&str], input: &[&str]) -> bool {
    match pattern.split_first() {
        None => input.is_empty(),
        Some((&"**", rest)) => {
            (0..=input.len()).any(|skip| glob_segments(rest, &input[skip..]))
        }
        Some((&head, rest)) => match input.split_first() {
            Some((&segment, remaining)) => {
                (head == "*" || head == segment)
                    && glob_segments(rest, remaining)
            }
            None => false,
        },
    }
}
