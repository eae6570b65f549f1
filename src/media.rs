//! Media content classifiers for message text
//!
//! A message containing a link is shown with a preview of the linked
//! content. Classifiers are tried in priority order and the first one whose
//! recognizer matches builds the content; plain text yields nothing.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Kind of linked content found in a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    YouTube,
    Twitter,
    Image,
    Article,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::YouTube => "youtube",
            Self::Twitter => "twitter",
            Self::Image => "image",
            Self::Article => "article",
        };
        f.write_str(name)
    }
}

/// Content recognized in a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaContent {
    pub kind: MediaKind,
    /// The matched link
    pub url: String,
    /// Video id for YouTube, status id for Twitter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// One entry in the classifier table
#[derive(Clone, Copy)]
pub struct MediaClassifier {
    pub kind: MediaKind,
    pub matches: fn(&str) -> bool,
    pub build: fn(&str) -> Option<MediaContent>,
}

static YOUTUBE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)https?://(?:www\.|m\.)?(?:youtube\.com/(?:watch\?(?:\S*&)?v=|shorts/|embed/)|youtu\.be/)([A-Za-z0-9_-]{11})\S*",
    )
    .expect("valid YouTube pattern")
});

static TWITTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)https?://(?:www\.|mobile\.)?(?:twitter\.com|x\.com)/\w+/status(?:es)?/(\d+)\S*",
    )
    .expect("valid Twitter pattern")
});

static IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(https?://\S+?\.(?:png|jpe?g|gif|webp)(?:\?\S*?)?)[.,;:!?)\]]*(?:\s|$)")
        .expect("valid image pattern")
});

static ARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://[^\s/$.?#][^\s]*").expect("valid link pattern"));

fn build_with_id(re: &Regex, kind: MediaKind, text: &str) -> Option<MediaContent> {
    let caps = re.captures(text)?;
    Some(MediaContent {
        kind,
        url: caps.get(0)?.as_str().to_string(),
        id: caps.get(1).map(|m| m.as_str().to_string()),
    })
}

fn build_link(re: &Regex, kind: MediaKind, text: &str) -> Option<MediaContent> {
    let caps = re.captures(text)?;
    let url = caps.get(1).or_else(|| caps.get(0))?;
    Some(MediaContent {
        kind,
        url: url.as_str().to_string(),
        id: None,
    })
}

/// Classifiers in the order they are tried
pub const CLASSIFIERS: [MediaClassifier; 4] = [
    MediaClassifier {
        kind: MediaKind::YouTube,
        matches: |text| YOUTUBE.is_match(text),
        build: |text| build_with_id(&YOUTUBE, MediaKind::YouTube, text),
    },
    MediaClassifier {
        kind: MediaKind::Twitter,
        matches: |text| TWITTER.is_match(text),
        build: |text| build_with_id(&TWITTER, MediaKind::Twitter, text),
    },
    MediaClassifier {
        kind: MediaKind::Image,
        matches: |text| IMAGE.is_match(text),
        build: |text| build_link(&IMAGE, MediaKind::Image, text),
    },
    MediaClassifier {
        kind: MediaKind::Article,
        matches: |text| ARTICLE.is_match(text),
        build: |text| build_link(&ARTICLE, MediaKind::Article, text),
    },
];

/// Classify message text with the default classifier table
pub fn classify(text: &str) -> Option<MediaContent> {
    classify_with(&CLASSIFIERS, text)
}

/// Classify message text with a caller-supplied table, first match wins
pub fn classify_with(classifiers: &[MediaClassifier], text: &str) -> Option<MediaContent> {
    classifiers
        .iter()
        .find(|c| (c.matches)(text))
        .and_then(|c| (c.build)(text))
}
