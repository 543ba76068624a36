//! Deterministic placeholder avatars.
//!
//! An avatar is a pure function of `(seed, variant)`: the seed drives a PRNG
//! that picks colors and parts, and the result is an SVG document. The
//! rendered form pairs the image with a one-letter fallback for clients that
//! fail to load it.

pub mod bottts_neutral;
pub mod initials;
pub mod prng;

use anyhow::Result;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub use bottts_neutral::BotttsNeutralOptions;
pub use initials::InitialsOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AvatarVariant {
    /// Robot face.
    BotttsNeutral,
    Initials,
}

impl AvatarVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BotttsNeutral => "botttsNeutral",
            Self::Initials => "initials",
        }
    }
}

impl FromStr for AvatarVariant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "botttsNeutral" => Ok(Self::BotttsNeutral),
            "initials" => Ok(Self::Initials),
            _ => anyhow::bail!(
                "Invalid avatar variant: {} (expected botttsNeutral or initials)",
                s
            ),
        }
    }
}

impl std::fmt::Display for AvatarVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated SVG image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Avatar {
    svg: String,
}

impl Avatar {
    fn new(svg: String) -> Self {
        Self { svg }
    }

    pub fn svg(&self) -> &str {
        &self.svg
    }

    pub fn into_svg(self) -> String {
        self.svg
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:image/svg+xml;base64,{}", BASE64.encode(self.svg.as_bytes()))
    }
}

/// Generate the avatar for `seed` in the given style.
pub fn create_avatar(variant: AvatarVariant, seed: &str) -> Avatar {
    match variant {
        AvatarVariant::BotttsNeutral => {
            bottts_neutral::create(seed, &BotttsNeutralOptions::default())
        }
        AvatarVariant::Initials => initials::create(seed, &InitialsOptions::default()),
    }
}

/// Uppercased first character of the seed, shown when the image fails.
pub fn fallback_text(seed: &str) -> String {
    seed.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

/// Avatar "component" input.
#[derive(Debug, Clone)]
pub struct GeneratedAvatar {
    pub seed: String,
    pub variant: AvatarVariant,
    pub class_name: Option<String>,
}

/// Everything a client needs to display the avatar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedAvatar {
    pub src: String,
    pub alt: &'static str,
    pub class_name: Option<String>,
    pub fallback: String,
}

impl GeneratedAvatar {
    pub fn new(seed: impl Into<String>, variant: AvatarVariant) -> Self {
        Self {
            seed: seed.into(),
            variant,
            class_name: None,
        }
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn render(&self) -> RenderedAvatar {
        RenderedAvatar {
            src: create_avatar(self.variant, &self.seed).to_data_uri(),
            alt: "Avatar",
            class_name: self.class_name.clone(),
            fallback: fallback_text(&self.seed),
        }
    }
}

impl RenderedAvatar {
    pub fn to_html(&self) -> String {
        let class_attr = self
            .class_name
            .as_deref()
            .filter(|class| !class.trim().is_empty())
            .map(|class| format!(r#" class="{}""#, escape_html(class)))
            .unwrap_or_default();

        format!(
            r#"<span class="avatar"><img{} src="{}" alt="{}"/><span class="avatar-fallback">{}</span></span>"#,
            class_attr,
            escape_html(&self.src),
            self.alt,
            escape_html(&self.fallback),
        )
    }
}

pub(crate) fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
