//! Robot face avatar: eyes and mouth parts on a colored disc.

use super::{prng::Prng, Avatar};

const SIZE: u32 = 180;

const BACKGROUND_COLORS: [&str; 19] = [
    "00acc1", "1e88e5", "5e35b1", "6d4c41", "7cb342", "8e24aa", "039be5", "43a047", "546e7a",
    "00897b", "3949ab", "757575", "c0ca33", "d81b60", "e53935", "f4511e", "fb8c00", "fdd835",
    "ffb300",
];

/// Named SVG fragment drawn on the 180x180 face.
struct Part {
    name: &'static str,
    svg: &'static str,
}

const EYES: [Part; 7] = [
    Part {
        name: "round",
        svg: r##"<circle cx="62" cy="74" r="14" fill="#fff"/><circle cx="118" cy="74" r="14" fill="#fff"/><circle cx="62" cy="74" r="6" fill="#000"/><circle cx="118" cy="74" r="6" fill="#000"/>"##,
    },
    Part {
        name: "bulging",
        svg: r##"<circle cx="60" cy="72" r="20" fill="#fff"/><circle cx="120" cy="72" r="20" fill="#fff"/><circle cx="66" cy="76" r="9" fill="#000"/><circle cx="126" cy="76" r="9" fill="#000"/>"##,
    },
    Part {
        name: "happy",
        svg: r##"<path d="M48 80q14-16 28 0M104 80q14-16 28 0" stroke="#000" stroke-width="6" fill="none" stroke-linecap="round"/>"##,
    },
    Part {
        name: "frame",
        svg: r##"<rect x="40" y="58" width="100" height="32" rx="8" fill="#000" fill-opacity=".8"/><rect x="54" y="66" width="20" height="16" rx="4" fill="#5ee7ff"/><rect x="106" y="66" width="20" height="16" rx="4" fill="#5ee7ff"/>"##,
    },
    Part {
        name: "sensor",
        svg: r##"<rect x="50" y="64" width="80" height="20" rx="10" fill="#000" fill-opacity=".8"/><circle cx="90" cy="74" r="7" fill="#ff5252"/>"##,
    },
    Part {
        name: "shade",
        svg: r##"<rect x="36" y="60" width="108" height="26" rx="6" fill="#1e1e1e"/><rect x="44" y="64" width="40" height="6" rx="3" fill="#fff" fill-opacity=".3"/>"##,
    },
    Part {
        name: "dizzy",
        svg: r##"<path d="M52 64l20 20M72 64l-20 20M108 64l20 20M128 64l-20 20" stroke="#000" stroke-width="6" stroke-linecap="round"/>"##,
    },
];

const MOUTHS: [Part; 6] = [
    Part {
        name: "smile01",
        svg: r##"<path d="M66 118q24 20 48 0" stroke="#000" stroke-width="6" fill="none" stroke-linecap="round"/>"##,
    },
    Part {
        name: "smile02",
        svg: r##"<path d="M62 114h56a28 28 0 0 1-56 0z" fill="#000" fill-opacity=".8"/>"##,
    },
    Part {
        name: "square",
        svg: r##"<rect x="68" y="112" width="44" height="16" rx="3" fill="#000" fill-opacity=".8"/>"##,
    },
    Part {
        name: "grill",
        svg: r##"<rect x="60" y="110" width="60" height="22" rx="4" fill="#000" fill-opacity=".8"/><path d="M75 110v22M90 110v22M105 110v22" stroke="#fff" stroke-opacity=".6" stroke-width="3"/>"##,
    },
    Part {
        name: "bite",
        svg: r##"<path d="M64 116h52v8l-6.5 6-6.5-6-6.5 6-6.5-6-6.5 6-6.5-6-6.5 6-6.5-6z" fill="#000" fill-opacity=".8"/>"##,
    },
    Part {
        name: "diagram",
        svg: r##"<path d="M60 122l10-10 10 14 10-14 10 14 10-14 10 10" stroke="#000" stroke-width="5" fill="none" stroke-linejoin="round"/>"##,
    },
];

#[derive(Debug, Clone)]
pub struct BotttsNeutralOptions {
    /// Corner radius as a percentage of the image size.
    pub radius: u32,
}

impl Default for BotttsNeutralOptions {
    fn default() -> Self {
        Self { radius: 50 }
    }
}

/// The parts chosen for one seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    pub background: &'static str,
    pub eyes: &'static str,
    pub mouth: &'static str,
}

pub fn face(seed: &str) -> Face {
    let mut prng = Prng::new(seed);
    let background = prng.pick(&BACKGROUND_COLORS).copied().unwrap_or("00acc1");
    let eyes = prng.pick(&EYES).unwrap_or(&EYES[0]);
    let mouth = prng.pick(&MOUTHS).unwrap_or(&MOUTHS[0]);

    Face {
        background,
        eyes: eyes.name,
        mouth: mouth.name,
    }
}

fn part_svg(parts: &[Part], name: &str) -> &'static str {
    parts
        .iter()
        .find(|part| part.name == name)
        .map(|part| part.svg)
        .unwrap_or_default()
}

pub fn create(seed: &str, options: &BotttsNeutralOptions) -> Avatar {
    let face = face(seed);
    let corner = SIZE * options.radius / 100;

    let svg = format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {size} {size}" width="{size}" height="{size}">"#,
            r##"<mask id="viewboxMask"><rect width="{size}" height="{size}" rx="{corner}" ry="{corner}" x="0" y="0" fill="#fff"/></mask>"##,
            r##"<g mask="url(#viewboxMask)"><rect fill="#{background}" width="{size}" height="{size}" x="0" y="0"/>"##,
            "{eyes}{mouth}</g></svg>",
        ),
        size = SIZE,
        corner = corner,
        background = face.background,
        eyes = part_svg(&EYES, face.eyes),
        mouth = part_svg(&MOUTHS, face.mouth),
    );

    Avatar::new(svg)
}
