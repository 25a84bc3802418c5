//! Photo kinds and the comma-joined photo path column.

use serde::{Deserialize, Serialize};

/// Why a photo was taken. Decides the upload sub-directory and file prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoKind {
    /// Damage recorded on the intake checklist
    Damage,
    /// Vehicle state right before delivery work starts
    Before,
    /// Vehicle state at delivery
    After,
}

impl PhotoKind {
    /// Sub-directory under the upload root.
    pub fn directory(&self) -> &'static str {
        match self {
            Self::Damage => "checklists",
            Self::Before | Self::After => "deliveries",
        }
    }

    /// File name prefix.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Damage => "damage",
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

/// Ordered list of photo paths persisted as a single comma-joined column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoPaths(Vec<String>);

impl PhotoPaths {
    /// Parse a stored column value. Empty segments are dropped.
    pub fn parse(column: Option<&str>) -> Self {
        let paths = column
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect();
        Self(paths)
    }

    pub fn push(&mut self, path: impl Into<String>) {
        self.0.push(path.into());
    }

    pub fn extend(&mut self, paths: impl IntoIterator<Item = String>) {
        self.0.extend(paths);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Column value, `None` when there are no photos.
    pub fn to_column(&self) -> Option<String> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.join(","))
        }
    }

    /// Photos taken for the intake damage checklist.
    pub fn damage_photos(&self) -> Vec<String> {
        self.in_directory(PhotoKind::Damage).map(String::from).collect()
    }

    /// First pre-delivery ("before") photo, if any.
    pub fn before_photo(&self) -> Option<String> {
        self.in_directory(PhotoKind::Before).next().map(String::from)
    }

    fn in_directory(&self, kind: PhotoKind) -> impl Iterator<Item = &str> {
        let marker = format!("/{}/", kind.directory());
        self.iter().filter(move |p| p.contains(&marker))
    }
}
