//! Initials avatar: one or two letters on a colored disc.

use regex::Regex;
use std::sync::OnceLock;

use super::{escape_html, prng::Prng, Avatar};

const SIZE: u32 = 100;

const BACKGROUND_COLORS: [&str; 16] = [
    "e53935", "d81b60", "8e24aa", "5e35b1", "3949ab", "1e88e5", "039be5", "00acc1",
    "00897b", "43a047", "7cb342", "c0ca33", "fdd835", "ffb300", "fb8c00", "f4511e",
];

#[derive(Debug, Clone)]
pub struct InitialsOptions {
    pub font_size: u32,
    pub font_weight: u32,
    /// Corner radius as a percentage of the image size.
    pub radius: u32,
    pub text_color: String,
}

impl Default for InitialsOptions {
    fn default() -> Self {
        Self {
            font_size: 42,
            font_weight: 500,
            radius: 50,
            text_color: "ffffff".to_string(),
        }
    }
}

fn symbols() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\p{L}\p{N}\s]").expect("valid symbol regex"))
}

fn words() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\p{L}[\p{L}\p{M}]*").expect("valid word regex"))
}

fn leading_letters() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:\p{L}\p{M}*){1,2}").expect("valid letters regex"))
}

fn first_letter() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\p{L}\p{M}*").expect("valid letter regex"))
}

/// Initials for `seed`: first letters of the first and last word, or the
/// first two letters of a single word. Symbols are ignored.
pub fn initials(seed: &str) -> String {
    let cleaned = symbols().replace_all(seed, "");
    let words: Vec<&str> = words().find_iter(&cleaned).map(|m| m.as_str()).collect();

    let initials = match words.as_slice() {
        [] => String::new(),
        [word] => leading_letters()
            .find(word)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
        [first, .., last] => {
            let lead = |word: &str| {
                first_letter()
                    .find(word)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default()
            };
            format!("{}{}", lead(*first), lead(*last))
        }
    };

    initials.to_uppercase()
}

pub fn create(seed: &str, options: &InitialsOptions) -> Avatar {
    let mut prng = Prng::new(seed);
    let background = prng.pick(&BACKGROUND_COLORS).copied().unwrap_or("e53935");
    let text = initials(seed);
    let corner = SIZE * options.radius / 100;
    let dy = options.font_size as f64 * 0.35;

    let svg = format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {size} {size}" width="{size}" height="{size}">"#,
            r##"<mask id="viewboxMask"><rect width="{size}" height="{size}" rx="{corner}" ry="{corner}" x="0" y="0" fill="#fff"/></mask>"##,
            r##"<g mask="url(#viewboxMask)"><rect fill="#{background}" width="{size}" height="{size}" x="0" y="0"/>"##,
            r#"<text x="50%" y="50%" font-family="Arial, sans-serif" font-size="{font_size}" font-weight="{font_weight}" "#,
            r##"fill="#{color}" text-anchor="middle" dy="{dy:.3}">{text}</text></g></svg>"##,
        ),
        size = SIZE,
        corner = corner,
        background = background,
        font_size = options.font_size,
        font_weight = options.font_weight,
        color = options.text_color,
        dy = dy,
        text = escape_html(&text),
    );

    Avatar::new(svg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials_two_words() {
        assert_eq!(initials("ada lovelace"), "AL");
        assert_eq!(initials("Grace Brewster Hopper"), "GH");
    }

    #[test]
    fn test_initials_single_word() {
        assert_eq!(initials("standup"), "ST");
        assert_eq!(initials("x"), "X");
    }

    #[test]
    fn test_initials_ignore_symbols() {
        assert_eq!(initials("O'Brien"), "OB");
        assert_eq!(initials("  #42 release-notes "), "RE");
        assert_eq!(initials("!!!"), "");
    }

    #[test]
    fn test_initials_unicode() {
        assert_eq!(initials("élodie ürük"), "ÉÜ");
    }

    #[test]
    fn test_svg_uses_options() {
        let avatar = create("Team Sync", &InitialsOptions::default());
        let svg = avatar.svg();
        assert!(svg.contains(r#"font-size="42""#));
        assert!(svg.contains(r#"font-weight="500""#));
        assert!(svg.contains(r#"rx="50""#));
        assert!(svg.contains(r#"dy="14.700""#));
        assert!(svg.contains(">TS</text>"));
    }

    #[test]
    fn test_background_depends_on_seed() {
        let seeds = ["a", "b", "c", "d", "e", "f", "g", "h"];
        let backgrounds: std::collections::HashSet<String> = seeds
            .iter()
            .map(|seed| {
                let svg = create(seed, &InitialsOptions::default()).into_svg();
                let start = svg.find("<rect fill=\"#").unwrap();
                svg[start..start + 19].to_string()
            })
            .collect();
        assert!(backgrounds.len() > 1);
    }
}
