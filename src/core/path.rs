//! State paths and the textual path codec.
//!
//! An absolute identifier starts with the root marker and names every
//! segment from the root down: `#top.a.aa`. A relative identifier is a bare
//! state name (`ab`) and is only meaningful as a transition target.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Marks an identifier as absolute.
pub const ROOT_MARKER: char = '#';

/// Separates segments of an absolute identifier.
pub const DELIMITER: char = '.';

/// Errors produced when decoding a path identifier.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("Path identifier is empty")]
    Empty,

    #[error("Path '{identifier}' has a root marker but no root id")]
    MissingRoot { identifier: String },

    #[error("Path '{identifier}' contains an empty or reserved segment")]
    InvalidSegment { identifier: String },

    #[error("Relative target '{identifier}' must be a single state name")]
    AmbiguousRelative { identifier: String },

    #[error("Path '{identifier}' is relative where an absolute path is required")]
    NotAbsolute { identifier: String },
}

/// Position of a machine: the root id and the segments below it.
///
/// Paths are values. Every operation that "moves" a path returns a new one,
/// the receiver is never modified.
///
/// # Example
///
/// ```rust
/// use statetree::core::StatePath;
///
/// let path: StatePath = "#top.a.aa".parse().unwrap();
/// assert_eq!(path.root(), "top");
/// assert_eq!(path.segments(), ["a", "aa"]);
/// assert_eq!(path.parent().unwrap().to_string(), "#top.a");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StatePath {
    root: String,
    segments: Vec<String>,
}

impl StatePath {
    /// Path of the root node itself.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            segments: Vec::new(),
        }
    }

    /// Path built from a root id and the segments below it.
    pub fn from_segments<I, S>(root: impl Into<String>, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root: root.into(),
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments below the root. The root path has depth 0.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Name of the last segment, or the root id for the root path.
    pub fn name(&self) -> &str {
        self.segments.last().map_or(self.root.as_str(), String::as_str)
    }

    /// A new path one level below this one.
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self {
            root: self.root.clone(),
            segments,
        }
    }

    /// The enclosing path, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(self.prefix(self.depth() - 1))
    }

    /// The ancestor (or self) holding the first `depth` segments.
    pub fn prefix(&self, depth: usize) -> Self {
        let depth = depth.min(self.segments.len());
        Self {
            root: self.root.clone(),
            segments: self.segments[..depth].to_vec(),
        }
    }

    /// Number of leading segments shared with `other`.
    ///
    /// Paths under different roots share nothing.
    pub fn common_depth(&self, other: &StatePath) -> usize {
        if self.root != other.root {
            return 0;
        }
        self.segments
            .iter()
            .zip(&other.segments)
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// True when `self` equals `other` or lies above it.
    pub fn is_ancestor_of(&self, other: &StatePath) -> bool {
        self.root == other.root
            && self.depth() <= other.depth()
            && self.common_depth(other) == self.depth()
    }
}

impl fmt::Display for StatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(&self.root, &self.segments))
    }
}

impl FromStr for StatePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match decode(s)? {
            Target::Absolute(path) => Ok(path),
            _ => Err(PathError::NotAbsolute {
                identifier: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for StatePath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StatePath> for String {
    fn from(path: StatePath) -> Self {
        path.to_string()
    }
}

/// Where a transition should go.
///
/// All three addressing styles end up as a verified absolute [`StatePath`]
/// once the resolver has located them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    /// Root-anchored path, `#top.a.aa`.
    Absolute(StatePath),

    /// Segments below the machine's own root, `["a", "aa"]`.
    Segments(Vec<String>),

    /// A single state name, resolved against an anchor node.
    Relative(String),
}

impl Target {
    /// Decode a textual identifier. Same as [`decode`].
    pub fn parse(identifier: &str) -> Result<Self, PathError> {
        decode(identifier)
    }

    pub fn absolute(path: StatePath) -> Self {
        Self::Absolute(path)
    }

    pub fn relative(name: impl Into<String>) -> Self {
        Self::Relative(name.into())
    }

    pub fn segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Segments(segments.into_iter().map(Into::into).collect())
    }

    pub fn is_absolute(&self) -> bool {
        !matches!(self, Self::Relative(_))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute(path) => fmt::Display::fmt(path, f),
            Self::Segments(segments) => write!(f, "[{}]", segments.join(", ")),
            Self::Relative(name) => f.write_str(name),
        }
    }
}

impl FromStr for Target {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

impl From<StatePath> for Target {
    fn from(path: StatePath) -> Self {
        Self::Absolute(path)
    }
}

/// Decode a textual identifier into a [`Target`].
///
/// Never yields [`Target::Segments`]; that form only exists in code.
///
/// # Example
///
/// ```rust
/// use statetree::core::{decode, PathError, Target};
///
/// assert_eq!(decode("ab").unwrap(), Target::relative("ab"));
/// assert!(decode("#top.a").unwrap().is_absolute());
/// assert!(matches!(decode("#"), Err(PathError::MissingRoot { .. })));
/// assert!(matches!(decode("a.b"), Err(PathError::AmbiguousRelative { .. })));
/// ```
pub fn decode(identifier: &str) -> Result<Target, PathError> {
    if identifier.is_empty() {
        return Err(PathError::Empty);
    }

    let Some(rest) = identifier.strip_prefix(ROOT_MARKER) else {
        if identifier.contains([DELIMITER, ROOT_MARKER]) {
            return Err(PathError::AmbiguousRelative {
                identifier: identifier.to_string(),
            });
        }
        return Ok(Target::Relative(identifier.to_string()));
    };

    let mut parts = rest.split(DELIMITER);
    let root = parts.next().unwrap_or_default();
    if root.is_empty() {
        return Err(PathError::MissingRoot {
            identifier: identifier.to_string(),
        });
    }

    let segments: Vec<String> = parts.map(str::to_string).collect();
    let malformed = segments
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(root))
        .any(|s| s.is_empty() || s.contains(ROOT_MARKER));
    if malformed {
        return Err(PathError::InvalidSegment {
            identifier: identifier.to_string(),
        });
    }

    Ok(Target::Absolute(StatePath::from_segments(root, segments)))
}

/// Encode a root id and segments as an absolute identifier.
pub fn encode<S: AsRef<str>>(root: &str, segments: &[S]) -> String {
    let mut out = String::with_capacity(1 + root.len() + segments.len() * 8);
    out.push(ROOT_MARKER);
    out.push_str(root);
    for segment in segments {
        out.push(DELIMITER);
        out.push_str(segment.as_ref());
    }
    out
}

/// True when `name` can be used as a state name or root id.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains([DELIMITER, ROOT_MARKER])
}
