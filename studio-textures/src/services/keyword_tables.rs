//! Static keyword tables for material guidance
//!
//! - material keyword → category slug
//! - generic surface terms with no category of their own (→ `wall-finishes`)
//! - finish keyword → finish slug, finish → sheen
//! - candidate name → Hebrew fallback name
//!
//! The translation table only covers common materials; anything else passes
//! through untranslated.

/// Category used when a material term carries no category of its own
pub const DEFAULT_CATEGORY: &str = "wall-finishes";

/// Finish used when a fragment names no finish
pub const DEFAULT_FINISH: &str = "natural";

/// (slug, English name, Hebrew name)
pub const DEFAULT_CATEGORIES: &[(&str, &str, &str)] = &[
    ("wood-finishes", "Wood Finishes", "גימורי עץ"),
    ("stone-finishes", "Stone Finishes", "גימורי אבן"),
    ("wall-finishes", "Wall Finishes", "גימורי קיר"),
    ("metal-finishes", "Metal Finishes", "גימורי מתכת"),
    ("textile-finishes", "Textiles", "טקסטיל"),
    ("ceramic-finishes", "Ceramics & Tiles", "קרמיקה ואריחים"),
    ("glass-finishes", "Glass", "זכוכית"),
];

const MATERIAL_KEYWORDS: &[(&str, &str)] = &[
    // wood
    ("oak", "wood-finishes"),
    ("walnut", "wood-finishes"),
    ("teak", "wood-finishes"),
    ("pine", "wood-finishes"),
    ("maple", "wood-finishes"),
    ("ash", "wood-finishes"),
    ("cherry", "wood-finishes"),
    ("birch", "wood-finishes"),
    ("cedar", "wood-finishes"),
    ("mahogany", "wood-finishes"),
    ("ebony", "wood-finishes"),
    ("bamboo", "wood-finishes"),
    ("wood", "wood-finishes"),
    ("timber", "wood-finishes"),
    ("parquet", "wood-finishes"),
    ("veneer", "wood-finishes"),
    // stone
    ("marble", "stone-finishes"),
    ("granite", "stone-finishes"),
    ("travertine", "stone-finishes"),
    ("limestone", "stone-finishes"),
    ("slate", "stone-finishes"),
    ("terrazzo", "stone-finishes"),
    ("quartz", "stone-finishes"),
    ("quartzite", "stone-finishes"),
    ("onyx", "stone-finishes"),
    ("sandstone", "stone-finishes"),
    ("basalt", "stone-finishes"),
    ("concrete", "stone-finishes"),
    ("stone", "stone-finishes"),
    // metal
    ("brass", "metal-finishes"),
    ("copper", "metal-finishes"),
    ("bronze", "metal-finishes"),
    ("steel", "metal-finishes"),
    ("iron", "metal-finishes"),
    ("aluminum", "metal-finishes"),
    ("chrome", "metal-finishes"),
    ("nickel", "metal-finishes"),
    ("gold", "metal-finishes"),
    ("zinc", "metal-finishes"),
    ("metal", "metal-finishes"),
    // textile
    ("velvet", "textile-finishes"),
    ("linen", "textile-finishes"),
    ("wool", "textile-finishes"),
    ("cotton", "textile-finishes"),
    ("silk", "textile-finishes"),
    ("leather", "textile-finishes"),
    ("suede", "textile-finishes"),
    ("boucle", "textile-finishes"),
    ("chenille", "textile-finishes"),
    ("tweed", "textile-finishes"),
    ("jute", "textile-finishes"),
    ("sisal", "textile-finishes"),
    ("rattan", "textile-finishes"),
    ("wicker", "textile-finishes"),
    // ceramic
    ("ceramic", "ceramic-finishes"),
    ("porcelain", "ceramic-finishes"),
    ("tile", "ceramic-finishes"),
    ("terracotta", "ceramic-finishes"),
    ("zellige", "ceramic-finishes"),
    ("mosaic", "ceramic-finishes"),
    ("brick", "ceramic-finishes"),
    // glass
    ("glass", "glass-finishes"),
    ("mirror", "glass-finishes"),
    ("acrylic", "glass-finishes"),
];

/// Surface materials that only ever resolve to the default category
const SECONDARY_MATERIAL_TERMS: &[&str] = &[
    "paint",
    "plaster",
    "stucco",
    "wallpaper",
    "limewash",
    "microcement",
    "tadelakt",
];

const FINISH_KEYWORDS: &[(&str, &str)] = &[
    ("matte", "matte"),
    ("matt", "matte"),
    ("polished", "polished"),
    ("brushed", "brushed"),
    ("honed", "honed"),
    ("glossy", "glossy"),
    ("gloss", "glossy"),
    ("high-gloss", "glossy"),
    ("satin", "satin"),
    ("lacquered", "lacquered"),
    ("oiled", "oiled"),
    ("waxed", "waxed"),
    ("textured", "textured"),
    ("distressed", "distressed"),
    ("weathered", "weathered"),
    ("aged", "aged"),
    ("patinated", "patinated"),
    ("hammered", "hammered"),
    ("sandblasted", "sandblasted"),
    ("tumbled", "tumbled"),
    ("leathered", "leathered"),
    ("smooth", "smooth"),
    ("rough", "rough"),
    ("raw", "raw"),
    ("natural", "natural"),
];

const FINISH_SHEEN: &[(&str, &str)] = &[
    ("matte", "matte"),
    ("honed", "matte"),
    ("natural", "matte"),
    ("raw", "matte"),
    ("rough", "matte"),
    ("textured", "matte"),
    ("sandblasted", "matte"),
    ("tumbled", "matte"),
    ("weathered", "matte"),
    ("distressed", "matte"),
    ("aged", "low"),
    ("leathered", "low"),
    ("hammered", "low"),
    ("patinated", "low"),
    ("brushed", "satin"),
    ("satin", "satin"),
    ("oiled", "satin"),
    ("waxed", "satin"),
    ("smooth", "satin"),
    ("polished", "high-gloss"),
    ("glossy", "high-gloss"),
    ("lacquered", "high-gloss"),
];

const FALLBACK_TRANSLATIONS: &[(&str, &str)] = &[
    ("Oak", "אלון"),
    ("Walnut", "אגוז"),
    ("Teak", "טיק"),
    ("Pine", "אורן"),
    ("Maple", "מייפל"),
    ("Ash", "מילה"),
    ("Cherry", "דובדבן"),
    ("Cedar", "ארז"),
    ("Bamboo", "במבוק"),
    ("Wood", "עץ"),
    ("Parquet", "פרקט"),
    ("Marble", "שיש"),
    ("Granite", "גרניט"),
    ("Travertine", "טרוורטין"),
    ("Limestone", "אבן גיר"),
    ("Slate", "צפחה"),
    ("Terrazzo", "טראצו"),
    ("Quartz", "קוורץ"),
    ("Concrete", "בטון"),
    ("Stone", "אבן"),
    ("Brass", "פליז"),
    ("Copper", "נחושת"),
    ("Bronze", "ארד"),
    ("Steel", "פלדה"),
    ("Iron", "ברזל"),
    ("Gold", "זהב"),
    ("Metal", "מתכת"),
    ("Velvet", "קטיפה"),
    ("Linen", "פשתן"),
    ("Wool", "צמר"),
    ("Cotton", "כותנה"),
    ("Silk", "משי"),
    ("Leather", "עור"),
    ("Jute", "יוטה"),
    ("Rattan", "ראטן"),
    ("Ceramic", "קרמיקה"),
    ("Porcelain", "פורצלן"),
    ("Tile", "אריח"),
    ("Brick", "לבנים"),
    ("Mosaic", "פסיפס"),
    ("Glass", "זכוכית"),
    ("Mirror", "מראה"),
    ("Paint", "צבע"),
    ("Plaster", "טיח"),
    ("Wallpaper", "טפט"),
    ("Microcement", "מיקרוצמנט"),
];

/// A material keyword found in guidance text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialMatch {
    /// Table keyword (singular form)
    pub keyword: &'static str,
    /// Category slug; `None` for secondary surface terms
    pub category: Option<&'static str>,
}

impl MaterialMatch {
    pub fn category_or_default(&self) -> &'static str {
        self.category.unwrap_or(DEFAULT_CATEGORY)
    }
}

/// Word as written plus naive singular forms ("tiles" → "tile", "finishes" → "finish")
fn word_forms(word: &str) -> impl Iterator<Item = &str> {
    std::iter::once(word)
        .chain(word.strip_suffix('s'))
        .chain(word.strip_suffix("es"))
}

/// Look up a lowercase word in the material tables
pub fn lookup_material(word: &str) -> Option<MaterialMatch> {
    word_forms(word).find_map(|form| {
        MATERIAL_KEYWORDS
            .iter()
            .find(|(keyword, _)| *keyword == form)
            .map(|(keyword, category)| MaterialMatch {
                keyword: *keyword,
                category: Some(*category),
            })
            .or_else(|| {
                SECONDARY_MATERIAL_TERMS
                    .iter()
                    .find(|term| **term == form)
                    .map(|term| MaterialMatch {
                        keyword: *term,
                        category: None,
                    })
            })
    })
}

/// Look up a lowercase word in the finish table
pub fn lookup_finish(word: &str) -> Option<&'static str> {
    FINISH_KEYWORDS
        .iter()
        .find(|(keyword, _)| *keyword == word)
        .map(|(_, finish)| *finish)
}

/// Sheen implied by a finish slug
pub fn sheen_for_finish(finish: &str) -> Option<&'static str> {
    FINISH_SHEEN
        .iter()
        .find(|(f, _)| *f == finish)
        .map(|(_, sheen)| *sheen)
}

/// Hebrew name for a candidate name; untranslated names pass through
pub fn fallback_translation(name: &str) -> String {
    FALLBACK_TRANSLATIONS
        .iter()
        .find(|(en, _)| en.eq_ignore_ascii_case(name))
        .map(|(_, he)| (*he).to_string())
        .unwrap_or_else(|| name.to_string())
}
