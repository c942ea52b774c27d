//! Theme registry.
//!
//! A theme is a named bundle of design tokens: colors, a typography scale,
//! a spacing scale, and block decoration. Every page generator and the block
//! renderer read their inline styles from the active [`ThemeConfig`]; nothing
//! downstream hard-codes a color or a size.
//!
//! ## Built-in Themes
//!
//! | Name | Character |
//! |------|-----------|
//! | `minimal` | White page, blue accent, system sans (fallback for unknown names) |
//! | `light` | Soft slate surfaces, sky accent |
//! | `dark` | Night slate background, amber accent |
//! | `travel-magazine` | Orange accent, editorial serif headings |
//! | `classic` | Warm paper, saddle-brown accent, Georgia |
//! | `modern` | Violet accent, geometric sans |
//! | `romantic` | Blush background, pink accent, script-like headings |
//! | `adventure` | Sand tones, burnt-orange accent |
//! | `black-white` | Pure monochrome, heavy borders |
//! | `sepia` | Aged paper, brown ink |
//! | `newspaper` | Broadsheet: red accent, heavy headline, no shadows |
//! | `vintage` | Faded film look with a global photo filter |
//!
//! Lookup is pure: [`get_theme`] never fails, unknown names resolve to
//! `minimal`.

use serde::Serialize;
use std::sync::LazyLock;

/// Name of the theme used when a lookup misses.
pub const DEFAULT_THEME: &str = "minimal";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeConfig {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub colors: ThemeColors,
    pub typography: Typography,
    pub spacing: Spacing,
    pub blocks: BlockStyle,
    /// CSS `filter` applied to every photo (e.g. a faded-film look).
    pub image_filter: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeColors {
    pub text: &'static str,
    pub text_secondary: &'static str,
    pub text_muted: &'static str,
    pub background: &'static str,
    pub surface: &'static str,
    pub surface_alt: &'static str,
    pub accent: &'static str,
    pub accent_strong: &'static str,
    pub accent_soft: &'static str,
    pub accent_light: &'static str,
    pub border: &'static str,
    pub border_light: &'static str,
    pub info_block: BlockColors,
    pub warning_block: BlockColors,
    pub tip_block: BlockColors,
    pub danger_block: BlockColors,
    pub cover: CoverColors,
}

/// Palette for one callout kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlockColors {
    pub background: &'static str,
    pub border: &'static str,
    pub text: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverColors {
    pub background: &'static str,
    /// Start and end stops of the cover gradient.
    pub gradient: [&'static str; 2],
    pub text: &'static str,
    pub text_secondary: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Typography {
    pub heading_font: &'static str,
    pub body_font: &'static str,
    pub mono_font: &'static str,
    pub h1: HeadingStyle,
    pub h2: HeadingStyle,
    pub h3: HeadingStyle,
    pub h4: HeadingStyle,
    pub body: TextStyle,
    pub small: ScaleStyle,
    pub caption: ScaleStyle,
}

impl Typography {
    /// Style for a heading level; levels past 4 share the `h4` style.
    pub fn heading(&self, level: u8) -> &HeadingStyle {
        match level {
            0 | 1 => &self.h1,
            2 => &self.h2,
            3 => &self.h3,
            _ => &self.h4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeadingStyle {
    pub size: &'static str,
    pub weight: u16,
    pub line_height: f32,
    pub margin_bottom: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    pub size: &'static str,
    pub line_height: f32,
    pub margin_bottom: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaleStyle {
    pub size: &'static str,
    pub line_height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spacing {
    pub page_padding: &'static str,
    pub section_spacing: &'static str,
    pub block_spacing: &'static str,
    pub element_spacing: &'static str,
    pub content_max_width: &'static str,
    pub column_gap: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockStyle {
    pub border_radius: &'static str,
    pub shadow: &'static str,
    pub border_width: &'static str,
}

// ============================================================================
// Registry
// ============================================================================

static THEMES: LazyLock<Vec<ThemeConfig>> = LazyLock::new(|| {
    vec![
        minimal(),
        light(),
        dark(),
        travel_magazine(),
        classic(),
        modern(),
        romantic(),
        adventure(),
        black_white(),
        sepia(),
        newspaper(),
        vintage(),
    ]
});

/// All built-in themes in registry order.
pub fn all_themes() -> &'static [ThemeConfig] {
    &THEMES
}

/// Names of all built-in themes in registry order.
pub fn theme_names() -> Vec<&'static str> {
    THEMES.iter().map(|t| t.name).collect()
}

/// Exact lookup; `None` for unknown names.
pub fn find_theme(name: &str) -> Option<&'static ThemeConfig> {
    THEMES.iter().find(|t| t.name == name.trim())
}

/// Lookup with fallback to [`DEFAULT_THEME`].
pub fn get_theme(name: &str) -> &'static ThemeConfig {
    match find_theme(name) {
        Some(theme) => theme,
        None => {
            log::warn!("unknown theme {name:?}, using {DEFAULT_THEME}");
            &THEMES[0]
        }
    }
}

// ============================================================================
// Theme definitions
// ============================================================================

/// The few tokens that distinguish one theme from another. Everything else
/// derives from the shared scales in [`Seed::build`].
struct Seed {
    name: &'static str,
    display_name: &'static str,
    description: &'static str,
    text: &'static str,
    text_secondary: &'static str,
    text_muted: &'static str,
    background: &'static str,
    surface: &'static str,
    surface_alt: &'static str,
    accent: &'static str,
    accent_strong: &'static str,
    accent_soft: &'static str,
    accent_light: &'static str,
    border: &'static str,
    border_light: &'static str,
    cover_gradient: [&'static str; 2],
    heading_font: &'static str,
    body_font: &'static str,
    border_radius: &'static str,
    border_width: &'static str,
    shadow: &'static str,
}

const LIGHT_CALLOUTS: [BlockColors; 4] = [
    BlockColors {
        background: "#eff6ff",
        border: "#3b82f6",
        text: "#1e3a8a",
        icon: "#2563eb",
    },
    BlockColors {
        background: "#fffbeb",
        border: "#f59e0b",
        text: "#78350f",
        icon: "#d97706",
    },
    BlockColors {
        background: "#f0fdf4",
        border: "#22c55e",
        text: "#14532d",
        icon: "#16a34a",
    },
    BlockColors {
        background: "#fef2f2",
        border: "#ef4444",
        text: "#7f1d1d",
        icon: "#dc2626",
    },
];

const DARK_CALLOUTS: [BlockColors; 4] = [
    BlockColors {
        background: "#172554",
        border: "#60a5fa",
        text: "#dbeafe",
        icon: "#93c5fd",
    },
    BlockColors {
        background: "#422006",
        border: "#fbbf24",
        text: "#fef3c7",
        icon: "#fcd34d",
    },
    BlockColors {
        background: "#052e16",
        border: "#4ade80",
        text: "#dcfce7",
        icon: "#86efac",
    },
    BlockColors {
        background: "#450a0a",
        border: "#f87171",
        text: "#fee2e2",
        icon: "#fca5a5",
    },
];

const MONO_CALLOUTS: [BlockColors; 4] = [
    BlockColors {
        background: "#f5f5f5",
        border: "#000000",
        text: "#000000",
        icon: "#000000",
    },
    BlockColors {
        background: "#eeeeee",
        border: "#000000",
        text: "#000000",
        icon: "#000000",
    },
    BlockColors {
        background: "#fafafa",
        border: "#333333",
        text: "#000000",
        icon: "#333333",
    },
    BlockColors {
        background: "#e0e0e0",
        border: "#000000",
        text: "#000000",
        icon: "#000000",
    },
];

const MONO_FONT: &str = "'JetBrains Mono', 'Courier New', monospace";

impl Seed {
    fn build(self, callouts: [BlockColors; 4]) -> ThemeConfig {
        let [info_block, warning_block, tip_block, danger_block] = callouts;
        ThemeConfig {
            name: self.name,
            display_name: self.display_name,
            description: self.description,
            colors: ThemeColors {
                text: self.text,
                text_secondary: self.text_secondary,
                text_muted: self.text_muted,
                background: self.background,
                surface: self.surface,
                surface_alt: self.surface_alt,
                accent: self.accent,
                accent_strong: self.accent_strong,
                accent_soft: self.accent_soft,
                accent_light: self.accent_light,
                border: self.border,
                border_light: self.border_light,
                info_block,
                warning_block,
                tip_block,
                danger_block,
                cover: CoverColors {
                    background: self.cover_gradient[0],
                    gradient: self.cover_gradient,
                    text: "#ffffff",
                    text_secondary: "rgba(255, 255, 255, 0.85)",
                },
            },
            typography: Typography {
                heading_font: self.heading_font,
                body_font: self.body_font,
                mono_font: MONO_FONT,
                h1: HeadingStyle {
                    size: "32pt",
                    weight: 800,
                    line_height: 1.15,
                    margin_bottom: "8mm",
                },
                h2: HeadingStyle {
                    size: "22pt",
                    weight: 700,
                    line_height: 1.25,
                    margin_bottom: "6mm",
                },
                h3: HeadingStyle {
                    size: "16pt",
                    weight: 700,
                    line_height: 1.3,
                    margin_bottom: "4mm",
                },
                h4: HeadingStyle {
                    size: "13pt",
                    weight: 600,
                    line_height: 1.35,
                    margin_bottom: "3mm",
                },
                body: TextStyle {
                    size: "11pt",
                    line_height: 1.7,
                    margin_bottom: "4mm",
                },
                small: ScaleStyle {
                    size: "9pt",
                    line_height: 1.5,
                },
                caption: ScaleStyle {
                    size: "8.5pt",
                    line_height: 1.4,
                },
            },
            spacing: Spacing {
                page_padding: "18mm",
                section_spacing: "10mm",
                block_spacing: "6mm",
                element_spacing: "3mm",
                content_max_width: "174mm",
                column_gap: "8mm",
            },
            blocks: BlockStyle {
                border_radius: self.border_radius,
                shadow: self.shadow,
                border_width: self.border_width,
            },
            image_filter: None,
        }
    }
}

const SOFT_SHADOW: &str = "0 2px 8px rgba(15, 23, 42, 0.08)";

fn minimal() -> ThemeConfig {
    Seed {
        name: "minimal",
        display_name: "Минимализм",
        description: "Чистая светлая тема с синим акцентом",
        text: "#111827",
        text_secondary: "#4b5563",
        text_muted: "#9ca3af",
        background: "#ffffff",
        surface: "#ffffff",
        surface_alt: "#f3f4f6",
        accent: "#2563eb",
        accent_strong: "#1d4ed8",
        accent_soft: "#dbeafe",
        accent_light: "#eff6ff",
        border: "#e5e7eb",
        border_light: "#f3f4f6",
        cover_gradient: ["#1e3a8a", "#2563eb"],
        heading_font: "'Inter', 'Helvetica Neue', Arial, sans-serif",
        body_font: "'Inter', 'Helvetica Neue', Arial, sans-serif",
        border_radius: "8px",
        border_width: "1px",
        shadow: SOFT_SHADOW,
    }
    .build(LIGHT_CALLOUTS)
}

fn light() -> ThemeConfig {
    Seed {
        name: "light",
        display_name: "Светлая",
        description: "Мягкие серо-голубые поверхности",
        text: "#0f172a",
        text_secondary: "#475569",
        text_muted: "#94a3b8",
        background: "#f8fafc",
        surface: "#ffffff",
        surface_alt: "#f1f5f9",
        accent: "#3b82f6",
        accent_strong: "#2563eb",
        accent_soft: "#dbeafe",
        accent_light: "#eff6ff",
        border: "#e2e8f0",
        border_light: "#f1f5f9",
        cover_gradient: ["#3b82f6", "#06b6d4"],
        heading_font: "'Inter', 'Helvetica Neue', Arial, sans-serif",
        body_font: "'Inter', 'Helvetica Neue', Arial, sans-serif",
        border_radius: "10px",
        border_width: "1px",
        shadow: SOFT_SHADOW,
    }
    .build(LIGHT_CALLOUTS)
}

fn dark() -> ThemeConfig {
    Seed {
        name: "dark",
        display_name: "Тёмная",
        description: "Ночная тема с янтарным акцентом",
        text: "#f1f5f9",
        text_secondary: "#cbd5e1",
        text_muted: "#64748b",
        background: "#0f172a",
        surface: "#1e293b",
        surface_alt: "#334155",
        accent: "#f59e0b",
        accent_strong: "#d97706",
        accent_soft: "#78350f",
        accent_light: "#451a03",
        border: "#334155",
        border_light: "#1e293b",
        cover_gradient: ["#0f172a", "#334155"],
        heading_font: "'Inter', 'Helvetica Neue', Arial, sans-serif",
        body_font: "'Inter', 'Helvetica Neue', Arial, sans-serif",
        border_radius: "10px",
        border_width: "1px",
        shadow: "0 2px 10px rgba(0, 0, 0, 0.45)",
    }
    .build(DARK_CALLOUTS)
}

fn travel_magazine() -> ThemeConfig {
    Seed {
        name: "travel-magazine",
        display_name: "Журнал путешествий",
        description: "Журнальная вёрстка с крупными заголовками",
        text: "#1c1917",
        text_secondary: "#57534e",
        text_muted: "#a8a29e",
        background: "#ffffff",
        surface: "#fafaf9",
        surface_alt: "#f5f5f4",
        accent: "#ea580c",
        accent_strong: "#c2410c",
        accent_soft: "#ffedd5",
        accent_light: "#fff7ed",
        border: "#e7e5e4",
        border_light: "#f5f5f4",
        cover_gradient: ["#7c2d12", "#ea580c"],
        heading_font: "'Playfair Display', Georgia, serif",
        body_font: "'Source Sans Pro', 'Helvetica Neue', Arial, sans-serif",
        border_radius: "4px",
        border_width: "1px",
        shadow: SOFT_SHADOW,
    }
    .build(LIGHT_CALLOUTS)
}

fn classic() -> ThemeConfig {
    Seed {
        name: "classic",
        display_name: "Классика",
        description: "Тёплая бумага и классический шрифт",
        text: "#2b2118",
        text_secondary: "#5c4a3a",
        text_muted: "#9c8a78",
        background: "#faf8f5",
        surface: "#ffffff",
        surface_alt: "#f3eee7",
        accent: "#8b4513",
        accent_strong: "#6b3410",
        accent_soft: "#f1e1d1",
        accent_light: "#f8efe6",
        border: "#e5dccf",
        border_light: "#f0e9df",
        cover_gradient: ["#3e2415", "#8b4513"],
        heading_font: "Georgia, 'Times New Roman', serif",
        body_font: "Georgia, 'Times New Roman', serif",
        border_radius: "6px",
        border_width: "1px",
        shadow: "0 1px 4px rgba(62, 36, 21, 0.12)",
    }
    .build(LIGHT_CALLOUTS)
}

fn modern() -> ThemeConfig {
    Seed {
        name: "modern",
        display_name: "Современная",
        description: "Геометрический шрифт и фиолетовый акцент",
        text: "#18181b",
        text_secondary: "#52525b",
        text_muted: "#a1a1aa",
        background: "#ffffff",
        surface: "#fafafa",
        surface_alt: "#f4f4f5",
        accent: "#8b5cf6",
        accent_strong: "#7c3aed",
        accent_soft: "#ede9fe",
        accent_light: "#f5f3ff",
        border: "#e4e4e7",
        border_light: "#f4f4f5",
        cover_gradient: ["#4c1d95", "#8b5cf6"],
        heading_font: "'Montserrat', 'Helvetica Neue', Arial, sans-serif",
        body_font: "'Inter', 'Helvetica Neue', Arial, sans-serif",
        border_radius: "14px",
        border_width: "1px",
        shadow: "0 4px 16px rgba(76, 29, 149, 0.10)",
    }
    .build(LIGHT_CALLOUTS)
}

fn romantic() -> ThemeConfig {
    Seed {
        name: "romantic",
        display_name: "Романтика",
        description: "Нежные розовые тона",
        text: "#3f1d2b",
        text_secondary: "#7a4a5c",
        text_muted: "#b98a9b",
        background: "#fdf2f8",
        surface: "#ffffff",
        surface_alt: "#fce7f3",
        accent: "#e91e63",
        accent_strong: "#c2185b",
        accent_soft: "#fbcfe8",
        accent_light: "#fdf2f8",
        border: "#f9d5e5",
        border_light: "#fce7f3",
        cover_gradient: ["#880e4f", "#e91e63"],
        heading_font: "'Cormorant Garamond', Georgia, serif",
        body_font: "'Lora', Georgia, serif",
        border_radius: "16px",
        border_width: "1px",
        shadow: "0 3px 12px rgba(233, 30, 99, 0.10)",
    }
    .build(LIGHT_CALLOUTS)
}

fn adventure() -> ThemeConfig {
    Seed {
        name: "adventure",
        display_name: "Приключения",
        description: "Песочные тона и огненный акцент",
        text: "#2d2a26",
        text_secondary: "#5e574d",
        text_muted: "#a39a8c",
        background: "#fffaf3",
        surface: "#ffffff",
        surface_alt: "#f6eee2",
        accent: "#ff6b35",
        accent_strong: "#e55a2b",
        accent_soft: "#ffe0d3",
        accent_light: "#fff3ed",
        border: "#eadfce",
        border_light: "#f4ece0",
        cover_gradient: ["#2d2a26", "#ff6b35"],
        heading_font: "'Oswald', 'Arial Narrow', sans-serif",
        body_font: "'Open Sans', 'Helvetica Neue', Arial, sans-serif",
        border_radius: "6px",
        border_width: "2px",
        shadow: "0 2px 8px rgba(45, 42, 38, 0.12)",
    }
    .build(LIGHT_CALLOUTS)
}

fn black_white() -> ThemeConfig {
    Seed {
        name: "black-white",
        display_name: "Чёрно-белая",
        description: "Строгая монохромная тема для печати",
        text: "#000000",
        text_secondary: "#333333",
        text_muted: "#666666",
        background: "#ffffff",
        surface: "#ffffff",
        surface_alt: "#f5f5f5",
        accent: "#000000",
        accent_strong: "#000000",
        accent_soft: "#e0e0e0",
        accent_light: "#f5f5f5",
        border: "#000000",
        border_light: "#cccccc",
        cover_gradient: ["#000000", "#333333"],
        heading_font: "'Helvetica Neue', Helvetica, Arial, sans-serif",
        body_font: "Georgia, 'Times New Roman', serif",
        border_radius: "4px",
        border_width: "2px",
        shadow: "none",
    }
    .build(MONO_CALLOUTS)
}

fn sepia() -> ThemeConfig {
    Seed {
        name: "sepia",
        display_name: "Сепия",
        description: "Тёплая винтажная тема в тонах старой бумаги",
        text: "#3e2723",
        text_secondary: "#5d4037",
        text_muted: "#8d6e63",
        background: "#f5f1e8",
        surface: "#faf6ee",
        surface_alt: "#efe6d6",
        accent: "#8d6e63",
        accent_strong: "#6d4c41",
        accent_soft: "#d7ccc8",
        accent_light: "#efebe9",
        border: "#d7ccc8",
        border_light: "#e8e0d4",
        cover_gradient: ["#3e2723", "#8d6e63"],
        heading_font: "'Merriweather', Georgia, serif",
        body_font: "'Crimson Text', Georgia, serif",
        border_radius: "8px",
        border_width: "1.5px",
        shadow: "0 2px 6px rgba(62, 39, 35, 0.15)",
    }
    .build([
        BlockColors {
            background: "#efe6d6",
            border: "#8d6e63",
            text: "#3e2723",
            icon: "#6d4c41",
        },
        BlockColors {
            background: "#f3e5c8",
            border: "#a1887f",
            text: "#4e342e",
            icon: "#8d6e63",
        },
        BlockColors {
            background: "#e8ecd8",
            border: "#7c8b5a",
            text: "#33402a",
            icon: "#5f6f3f",
        },
        BlockColors {
            background: "#f0d9d0",
            border: "#a0522d",
            text: "#4e1f10",
            icon: "#8b3a1a",
        },
    ])
}

fn newspaper() -> ThemeConfig {
    let mut theme = Seed {
        name: "newspaper",
        display_name: "Газета",
        description: "Классическая газетная вёрстка",
        text: "#111111",
        text_secondary: "#333333",
        text_muted: "#777777",
        background: "#ffffff",
        surface: "#ffffff",
        surface_alt: "#f2f2f2",
        accent: "#c8102e",
        accent_strong: "#a00d26",
        accent_soft: "#f6d5da",
        accent_light: "#fbeef0",
        border: "#111111",
        border_light: "#cccccc",
        cover_gradient: ["#111111", "#c8102e"],
        heading_font: "'Libre Franklin', 'Franklin Gothic Medium', Arial, sans-serif",
        body_font: "'PT Serif', Georgia, serif",
        border_radius: "2px",
        border_width: "2px",
        shadow: "none",
    }
    .build(MONO_CALLOUTS);
    theme.typography.h1 = HeadingStyle {
        size: "42pt",
        weight: 900,
        line_height: 1.05,
        margin_bottom: "6mm",
    };
    theme.spacing.page_padding = "20mm";
    theme.spacing.column_gap = "14pt";
    theme
}

fn vintage() -> ThemeConfig {
    let mut theme = Seed {
        name: "vintage",
        display_name: "Винтаж",
        description: "Выцветшая плёнка: приглушённые фото и тёплые тона",
        text: "#3b3226",
        text_secondary: "#6b5d4b",
        text_muted: "#a29580",
        background: "#fbf7ef",
        surface: "#fffdf8",
        surface_alt: "#f1e9da",
        accent: "#b5651d",
        accent_strong: "#8f4e14",
        accent_soft: "#f0d8bd",
        accent_light: "#f9eee0",
        border: "#e3d6c0",
        border_light: "#efe6d6",
        cover_gradient: ["#4a3b2a", "#b5651d"],
        heading_font: "'Playfair Display', Georgia, serif",
        body_font: "'Lora', Georgia, serif",
        border_radius: "3px",
        border_width: "1px",
        shadow: "0 1px 3px rgba(59, 50, 38, 0.18)",
    }
    .build(LIGHT_CALLOUTS);
    theme.image_filter = Some("sepia(0.35) contrast(0.95) saturate(0.85)");
    theme
}
