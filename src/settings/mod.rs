//! Decoration settings record
//!
//! Every themeable option of the window decoration, with compiled-in
//! defaults and load/save against the backing store. A record is cheap to
//! build and is created fresh for each load, save or reset.

mod color;

pub use color::Color;

use crate::store::ConfigStore;
use anyhow::bail;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Store group holding the global decoration settings
pub const SETTINGS_GROUP: &str = "Windeco";

/// Store keys, shared by the global group and every exception group
pub mod keys {
    pub const TITLE_ALIGNMENT: &str = "TitleAlignment";
    pub const OUTLINE_CLOSE_BUTTON: &str = "OutlineCloseButton";
    pub const DRAW_BORDER_ON_MAXIMIZED_WINDOWS: &str = "DrawBorderOnMaximizedWindows";
    pub const DRAW_SIZE_GRIP: &str = "DrawSizeGrip";
    pub const DRAW_BACKGROUND_GRADIENT: &str = "DrawBackgroundGradient";
    pub const DRAW_TITLE_BAR_SEPARATOR: &str = "DrawTitleBarSeparator";
    pub const MATCH_COLOR_FOR_TITLE_BAR: &str = "MatchColorForTitleBar";
    pub const BUTTON_SIZE: &str = "ButtonSize";
    pub const BUTTON_SPACING: &str = "ButtonSpacing";
    pub const BUTTON_H_PADDING: &str = "ButtonHPadding";
    pub const BUTTON_CLOSE_ACTIVE_COLOR: &str = "ButtonCloseActiveColor";
    pub const BUTTON_CLOSE_INACTIVE_COLOR: &str = "ButtonCloseInactiveColor";
    pub const BUTTON_MAXIMIZE_ACTIVE_COLOR: &str = "ButtonMaximizeActiveColor";
    pub const BUTTON_MAXIMIZE_INACTIVE_COLOR: &str = "ButtonMaximizeInactiveColor";
    pub const BUTTON_MINIMIZE_ACTIVE_COLOR: &str = "ButtonMinimizeActiveColor";
    pub const BUTTON_MINIMIZE_INACTIVE_COLOR: &str = "ButtonMinimizeInactiveColor";
    pub const BUTTON_ON_ALL_DESKTOPS_ACTIVE_COLOR: &str = "ButtonOnAllDesktopsActiveColor";
    pub const BUTTON_ON_ALL_DESKTOPS_INACTIVE_COLOR: &str = "ButtonOnAllDesktopsInactiveColor";
    pub const BUTTON_SHADE_ACTIVE_COLOR: &str = "ButtonShadeActiveColor";
    pub const BUTTON_SHADE_INACTIVE_COLOR: &str = "ButtonShadeInactiveColor";
    pub const BUTTON_KEEP_BELOW_ACTIVE_COLOR: &str = "ButtonKeepBelowActiveColor";
    pub const BUTTON_KEEP_BELOW_INACTIVE_COLOR: &str = "ButtonKeepBelowInactiveColor";
    pub const BUTTON_KEEP_ABOVE_ACTIVE_COLOR: &str = "ButtonKeepAboveActiveColor";
    pub const BUTTON_KEEP_ABOVE_INACTIVE_COLOR: &str = "ButtonKeepAboveInactiveColor";
    pub const ANIMATIONS_ENABLED: &str = "AnimationsEnabled";
    pub const ANIMATIONS_DURATION: &str = "AnimationsDuration";
    pub const SHADOW_SIZE: &str = "ShadowSize";
    pub const SHADOW_STRENGTH: &str = "ShadowStrength";
    pub const SHADOW_COLOR: &str = "ShadowColor";
}

/// Accepted ranges for the integer options
pub mod bounds {
    use std::ops::RangeInclusive;

    pub const BUTTON_SIZE: RangeInclusive<i32> = 10..=50;
    pub const BUTTON_SPACING: RangeInclusive<i32> = 0..=40;
    pub const BUTTON_H_PADDING: RangeInclusive<i32> = 0..=40;
    pub const ANIMATIONS_DURATION: RangeInclusive<i32> = 0..=10_000;
    pub const SHADOW_SIZE: RangeInclusive<i32> = 0..=500;
    /// Internal strength; the form shows it as a percentage
    pub const SHADOW_STRENGTH: RangeInclusive<i32> = 0..=255;
}

/// Horizontal placement of the window caption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleAlignment {
    Left,
    Center,
    #[default]
    CenterFullWidth,
    Right,
}

impl TitleAlignment {
    pub const ALL: [TitleAlignment; 4] = [
        TitleAlignment::Left,
        TitleAlignment::Center,
        TitleAlignment::CenterFullWidth,
        TitleAlignment::Right,
    ];

    /// Position in the alignment combo box
    pub fn index(self) -> i32 {
        match self {
            TitleAlignment::Left => 0,
            TitleAlignment::Center => 1,
            TitleAlignment::CenterFullWidth => 2,
            TitleAlignment::Right => 3,
        }
    }

    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Name used in the store
    pub fn config_name(self) -> &'static str {
        match self {
            TitleAlignment::Left => "AlignLeft",
            TitleAlignment::Center => "AlignCenter",
            TitleAlignment::CenterFullWidth => "AlignCenterFullWidth",
            TitleAlignment::Right => "AlignRight",
        }
    }
}

impl fmt::Display for TitleAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_name())
    }
}

/// Accepts the store names, short names ("left", "center-full-width", ...)
/// and bare combo indices.
impl FromStr for TitleAlignment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<i32>() {
            return match Self::from_index(index) {
                Some(alignment) => Ok(alignment),
                None => bail!("Title alignment index out of range: {}", index),
            };
        }

        let normalized = s.to_ascii_lowercase().replace(['-', '_'], "");
        let normalized = normalized.strip_prefix("align").unwrap_or(&normalized);
        match normalized {
            "left" => Ok(TitleAlignment::Left),
            "center" => Ok(TitleAlignment::Center),
            "centerfullwidth" => Ok(TitleAlignment::CenterFullWidth),
            "right" => Ok(TitleAlignment::Right),
            _ => bail!("Unknown title alignment: {}", s),
        }
    }
}

/// The full set of decoration options
#[derive(Debug, Clone, PartialEq)]
pub struct DecorationSettings {
    pub title_alignment: TitleAlignment,
    pub outline_close_button: bool,
    pub draw_border_on_maximized_windows: bool,
    pub draw_size_grip: bool,
    pub draw_background_gradient: bool,
    pub draw_title_bar_separator: bool,
    pub match_color_for_title_bar: bool,

    pub button_size: i32,
    pub button_spacing: i32,
    pub button_h_padding: i32,

    pub button_close_active_color: Color,
    pub button_close_inactive_color: Color,
    pub button_maximize_active_color: Color,
    pub button_maximize_inactive_color: Color,
    pub button_minimize_active_color: Color,
    pub button_minimize_inactive_color: Color,
    pub button_on_all_desktops_active_color: Color,
    pub button_on_all_desktops_inactive_color: Color,
    pub button_shade_active_color: Color,
    pub button_shade_inactive_color: Color,
    pub button_keep_below_active_color: Color,
    pub button_keep_below_inactive_color: Color,
    pub button_keep_above_active_color: Color,
    pub button_keep_above_inactive_color: Color,

    pub animations_enabled: bool,
    /// Milliseconds
    pub animations_duration: i32,

    pub shadow_size: i32,
    /// Internal strength in [0, 255]
    pub shadow_strength: i32,
    pub shadow_color: Color,
}

const INACTIVE_BUTTON_COLOR: Color = Color::rgb(199, 199, 199);

impl Default for DecorationSettings {
    fn default() -> Self {
        Self {
            title_alignment: TitleAlignment::CenterFullWidth,
            outline_close_button: false,
            draw_border_on_maximized_windows: false,
            draw_size_grip: false,
            draw_background_gradient: false,
            draw_title_bar_separator: false,
            match_color_for_title_bar: false,

            button_size: 18,
            button_spacing: 4,
            button_h_padding: 10,

            button_close_active_color: Color::rgb(255, 92, 87),
            button_close_inactive_color: INACTIVE_BUTTON_COLOR,
            button_maximize_active_color: Color::rgb(40, 201, 64),
            button_maximize_inactive_color: INACTIVE_BUTTON_COLOR,
            button_minimize_active_color: Color::rgb(255, 188, 46),
            button_minimize_inactive_color: INACTIVE_BUTTON_COLOR,
            button_on_all_desktops_active_color: Color::rgb(125, 209, 200),
            button_on_all_desktops_inactive_color: INACTIVE_BUTTON_COLOR,
            button_shade_active_color: Color::rgb(204, 176, 213),
            button_shade_inactive_color: INACTIVE_BUTTON_COLOR,
            button_keep_below_active_color: Color::rgb(255, 137, 241),
            button_keep_below_inactive_color: INACTIVE_BUTTON_COLOR,
            button_keep_above_active_color: Color::rgb(204, 118, 253),
            button_keep_above_inactive_color: INACTIVE_BUTTON_COLOR,

            animations_enabled: true,
            animations_duration: 150,

            shadow_size: 90,
            shadow_strength: 255,
            shadow_color: Color::rgb(0, 0, 0),
        }
    }
}

fn read_bounded(
    store: &ConfigStore,
    group: &str,
    key: &str,
    default: i32,
    range: RangeInclusive<i32>,
) -> i32 {
    store
        .read_entry(group, key, default)
        .clamp(*range.start(), *range.end())
}

impl DecorationSettings {
    /// Record holding the compiled-in defaults
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Reset every field to its compiled-in default, bypassing the store
    pub fn set_defaults(&mut self) {
        *self = Self::default();
    }

    /// Load the global settings. Missing or corrupt entries fall back to
    /// their defaults; integers outside their range are clamped.
    pub fn load(store: &ConfigStore) -> Self {
        Self::load_group(store, SETTINGS_GROUP)
    }

    /// Load a record from an arbitrary group
    pub fn load_group(store: &ConfigStore, group: &str) -> Self {
        let d = Self::default();
        let color = |key: &str, default: Color| store.read_entry(group, key, default);
        let flag = |key: &str, default: bool| store.read_entry(group, key, default);

        Self {
            title_alignment: store.read_entry(group, keys::TITLE_ALIGNMENT, d.title_alignment),
            outline_close_button: flag(keys::OUTLINE_CLOSE_BUTTON, d.outline_close_button),
            draw_border_on_maximized_windows: flag(
                keys::DRAW_BORDER_ON_MAXIMIZED_WINDOWS,
                d.draw_border_on_maximized_windows,
            ),
            draw_size_grip: flag(keys::DRAW_SIZE_GRIP, d.draw_size_grip),
            draw_background_gradient: flag(
                keys::DRAW_BACKGROUND_GRADIENT,
                d.draw_background_gradient,
            ),
            draw_title_bar_separator: flag(
                keys::DRAW_TITLE_BAR_SEPARATOR,
                d.draw_title_bar_separator,
            ),
            match_color_for_title_bar: flag(
                keys::MATCH_COLOR_FOR_TITLE_BAR,
                d.match_color_for_title_bar,
            ),

            button_size: read_bounded(
                store,
                group,
                keys::BUTTON_SIZE,
                d.button_size,
                bounds::BUTTON_SIZE,
            ),
            button_spacing: read_bounded(
                store,
                group,
                keys::BUTTON_SPACING,
                d.button_spacing,
                bounds::BUTTON_SPACING,
            ),
            button_h_padding: read_bounded(
                store,
                group,
                keys::BUTTON_H_PADDING,
                d.button_h_padding,
                bounds::BUTTON_H_PADDING,
            ),

            button_close_active_color: color(
                keys::BUTTON_CLOSE_ACTIVE_COLOR,
                d.button_close_active_color,
            ),
            button_close_inactive_color: color(
                keys::BUTTON_CLOSE_INACTIVE_COLOR,
                d.button_close_inactive_color,
            ),
            button_maximize_active_color: color(
                keys::BUTTON_MAXIMIZE_ACTIVE_COLOR,
                d.button_maximize_active_color,
            ),
            button_maximize_inactive_color: color(
                keys::BUTTON_MAXIMIZE_INACTIVE_COLOR,
                d.button_maximize_inactive_color,
            ),
            button_minimize_active_color: color(
                keys::BUTTON_MINIMIZE_ACTIVE_COLOR,
                d.button_minimize_active_color,
            ),
            button_minimize_inactive_color: color(
                keys::BUTTON_MINIMIZE_INACTIVE_COLOR,
                d.button_minimize_inactive_color,
            ),
            button_on_all_desktops_active_color: color(
                keys::BUTTON_ON_ALL_DESKTOPS_ACTIVE_COLOR,
                d.button_on_all_desktops_active_color,
            ),
            button_on_all_desktops_inactive_color: color(
                keys::BUTTON_ON_ALL_DESKTOPS_INACTIVE_COLOR,
                d.button_on_all_desktops_inactive_color,
            ),
            button_shade_active_color: color(
                keys::BUTTON_SHADE_ACTIVE_COLOR,
                d.button_shade_active_color,
            ),
            button_shade_inactive_color: color(
                keys::BUTTON_SHADE_INACTIVE_COLOR,
                d.button_shade_inactive_color,
            ),
            button_keep_below_active_color: color(
                keys::BUTTON_KEEP_BELOW_ACTIVE_COLOR,
                d.button_keep_below_active_color,
            ),
            button_keep_below_inactive_color: color(
                keys::BUTTON_KEEP_BELOW_INACTIVE_COLOR,
                d.button_keep_below_inactive_color,
            ),
            button_keep_above_active_color: color(
                keys::BUTTON_KEEP_ABOVE_ACTIVE_COLOR,
                d.button_keep_above_active_color,
            ),
            button_keep_above_inactive_color: color(
                keys::BUTTON_KEEP_ABOVE_INACTIVE_COLOR,
                d.button_keep_above_inactive_color,
            ),

            animations_enabled: flag(keys::ANIMATIONS_ENABLED, d.animations_enabled),
            animations_duration: read_bounded(
                store,
                group,
                keys::ANIMATIONS_DURATION,
                d.animations_duration,
                bounds::ANIMATIONS_DURATION,
            ),

            shadow_size: read_bounded(
                store,
                group,
                keys::SHADOW_SIZE,
                d.shadow_size,
                bounds::SHADOW_SIZE,
            ),
            shadow_strength: read_bounded(
                store,
                group,
                keys::SHADOW_STRENGTH,
                d.shadow_strength,
                bounds::SHADOW_STRENGTH,
            ),
            shadow_color: color(keys::SHADOW_COLOR, d.shadow_color),
        }
    }

    /// Write the global settings. Does not flush the store.
    pub fn save(&self, store: &mut ConfigStore) {
        self.save_group(store, SETTINGS_GROUP);
    }

    /// Write every field into `group`
    pub fn save_group(&self, store: &mut ConfigStore, group: &str) {
        store.write_entry(group, keys::TITLE_ALIGNMENT, &self.title_alignment);
        store.write_entry(group, keys::OUTLINE_CLOSE_BUTTON, &self.outline_close_button);
        store.write_entry(
            group,
            keys::DRAW_BORDER_ON_MAXIMIZED_WINDOWS,
            &self.draw_border_on_maximized_windows,
        );
        store.write_entry(group, keys::DRAW_SIZE_GRIP, &self.draw_size_grip);
        store.write_entry(group, keys::DRAW_BACKGROUND_GRADIENT, &self.draw_background_gradient);
        store.write_entry(group, keys::DRAW_TITLE_BAR_SEPARATOR, &self.draw_title_bar_separator);
        store.write_entry(group, keys::MATCH_COLOR_FOR_TITLE_BAR, &self.match_color_for_title_bar);

        store.write_entry(group, keys::BUTTON_SIZE, &self.button_size);
        store.write_entry(group, keys::BUTTON_SPACING, &self.button_spacing);
        store.write_entry(group, keys::BUTTON_H_PADDING, &self.button_h_padding);

        store.write_entry(group, keys::BUTTON_CLOSE_ACTIVE_COLOR, &self.button_close_active_color);
        store.write_entry(
            group,
            keys::BUTTON_CLOSE_INACTIVE_COLOR,
            &self.button_close_inactive_color,
        );
        store.write_entry(
            group,
            keys::BUTTON_MAXIMIZE_ACTIVE_COLOR,
            &self.button_maximize_active_color,
        );
        store.write_entry(
            group,
            keys::BUTTON_MAXIMIZE_INACTIVE_COLOR,
            &self.button_maximize_inactive_color,
        );
        store.write_entry(
            group,
            keys::BUTTON_MINIMIZE_ACTIVE_COLOR,
            &self.button_minimize_active_color,
        );
        store.write_entry(
            group,
            keys::BUTTON_MINIMIZE_INACTIVE_COLOR,
            &self.button_minimize_inactive_color,
        );
        store.write_entry(
            group,
            keys::BUTTON_ON_ALL_DESKTOPS_ACTIVE_COLOR,
            &self.button_on_all_desktops_active_color,
        );
        store.write_entry(
            group,
            keys::BUTTON_ON_ALL_DESKTOPS_INACTIVE_COLOR,
            &self.button_on_all_desktops_inactive_color,
        );
        store.write_entry(group, keys::BUTTON_SHADE_ACTIVE_COLOR, &self.button_shade_active_color);
        store.write_entry(
            group,
            keys::BUTTON_SHADE_INACTIVE_COLOR,
            &self.button_shade_inactive_color,
        );
        store.write_entry(
            group,
            keys::BUTTON_KEEP_BELOW_ACTIVE_COLOR,
            &self.button_keep_below_active_color,
        );
        store.write_entry(
            group,
            keys::BUTTON_KEEP_BELOW_INACTIVE_COLOR,
            &self.button_keep_below_inactive_color,
        );
        store.write_entry(
            group,
            keys::BUTTON_KEEP_ABOVE_ACTIVE_COLOR,
            &self.button_keep_above_active_color,
        );
        store.write_entry(
            group,
            keys::BUTTON_KEEP_ABOVE_INACTIVE_COLOR,
            &self.button_keep_above_inactive_color,
        );

        store.write_entry(group, keys::ANIMATIONS_ENABLED, &self.animations_enabled);
        store.write_entry(group, keys::ANIMATIONS_DURATION, &self.animations_duration);

        store.write_entry(group, keys::SHADOW_SIZE, &self.shadow_size);
        store.write_entry(group, keys::SHADOW_STRENGTH, &self.shadow_strength);
        store.write_entry(group, keys::SHADOW_COLOR, &self.shadow_color);
    }
}
