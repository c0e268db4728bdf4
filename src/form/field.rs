//! Catalogue of the panel's input fields and the values their widgets hold

use crate::settings::{bounds, Color, TitleAlignment};
use anyhow::{bail, Context, Result};
use std::fmt;
use std::str::FromStr;

/// Number of input fields on the panel, exceptions excluded
pub const FIELD_COUNT: usize = 29;

/// One input field of the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    TitleAlignment,
    OutlineCloseButton,
    DrawBorderOnMaximizedWindows,
    DrawSizeGrip,
    DrawBackgroundGradient,
    DrawTitleBarSeparator,
    MatchColorForTitleBar,
    ButtonSize,
    ButtonSpacing,
    ButtonHPadding,
    ButtonCloseActiveColor,
    ButtonCloseInactiveColor,
    ButtonMaximizeActiveColor,
    ButtonMaximizeInactiveColor,
    ButtonMinimizeActiveColor,
    ButtonMinimizeInactiveColor,
    ButtonOnAllDesktopsActiveColor,
    ButtonOnAllDesktopsInactiveColor,
    ButtonShadeActiveColor,
    ButtonShadeInactiveColor,
    ButtonKeepBelowActiveColor,
    ButtonKeepBelowInactiveColor,
    ButtonKeepAboveActiveColor,
    ButtonKeepAboveInactiveColor,
    AnimationsEnabled,
    AnimationsDuration,
    ShadowSize,
    ShadowStrength,
    ShadowColor,
}

/// Kind of widget backing a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Widget {
    ComboBox { items: i32 },
    CheckBox,
    SpinBox { min: i32, max: i32 },
    ColorButton,
}

/// Value held by a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    Index(i32),
    Checked(bool),
    Number(i32),
    Color(Color),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Index(index) => write!(f, "{}", index),
            FieldValue::Checked(checked) => write!(f, "{}", checked),
            FieldValue::Number(number) => write!(f, "{}", number),
            FieldValue::Color(color) => write!(f, "{}", color),
        }
    }
}

impl Widget {
    /// Value of a freshly constructed widget
    pub fn blank_value(self) -> FieldValue {
        match self {
            Widget::ComboBox { .. } => FieldValue::Index(0),
            Widget::CheckBox => FieldValue::Checked(false),
            Widget::SpinBox { min, .. } => FieldValue::Number(min),
            Widget::ColorButton => FieldValue::Color(Color::default()),
        }
    }

    /// Validate a value the way the widget would: spin boxes clamp into
    /// their range, combo boxes reject indices they do not have, and a value
    /// of the wrong kind is refused.
    pub fn accept(self, value: FieldValue) -> Result<FieldValue> {
        match (self, value) {
            (Widget::ComboBox { items }, FieldValue::Index(index)) => {
                if !(0..items).contains(&index) {
                    bail!("Index {} out of range (0..{})", index, items);
                }
                Ok(value)
            }
            (Widget::CheckBox, FieldValue::Checked(_)) => Ok(value),
            (Widget::SpinBox { min, max }, FieldValue::Number(number)) => {
                Ok(FieldValue::Number(number.clamp(min, max)))
            }
            (Widget::ColorButton, FieldValue::Color(_)) => Ok(value),
            (widget, value) => bail!("{:?} cannot hold {:?}", widget, value),
        }
    }
}

fn spin(range: std::ops::RangeInclusive<i32>) -> Widget {
    Widget::SpinBox {
        min: *range.start(),
        max: *range.end(),
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => bail!("Expected a boolean, got '{}'", other),
    }
}

impl Field {
    /// Every field, in panel order
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::TitleAlignment,
        Field::OutlineCloseButton,
        Field::DrawBorderOnMaximizedWindows,
        Field::DrawSizeGrip,
        Field::DrawBackgroundGradient,
        Field::DrawTitleBarSeparator,
        Field::MatchColorForTitleBar,
        Field::ButtonSize,
        Field::ButtonSpacing,
        Field::ButtonHPadding,
        Field::ButtonCloseActiveColor,
        Field::ButtonCloseInactiveColor,
        Field::ButtonMaximizeActiveColor,
        Field::ButtonMaximizeInactiveColor,
        Field::ButtonMinimizeActiveColor,
        Field::ButtonMinimizeInactiveColor,
        Field::ButtonOnAllDesktopsActiveColor,
        Field::ButtonOnAllDesktopsInactiveColor,
        Field::ButtonShadeActiveColor,
        Field::ButtonShadeInactiveColor,
        Field::ButtonKeepBelowActiveColor,
        Field::ButtonKeepBelowInactiveColor,
        Field::ButtonKeepAboveActiveColor,
        Field::ButtonKeepAboveInactiveColor,
        Field::AnimationsEnabled,
        Field::AnimationsDuration,
        Field::ShadowSize,
        Field::ShadowStrength,
        Field::ShadowColor,
    ];

    /// Slot of this field in form storage
    pub fn index(self) -> usize {
        self as usize
    }

    /// Name of the field's widget on the panel
    pub fn name(self) -> &'static str {
        match self {
            Field::TitleAlignment => "titleAlignment",
            Field::OutlineCloseButton => "outlineCloseButton",
            Field::DrawBorderOnMaximizedWindows => "drawBorderOnMaximizedWindows",
            Field::DrawSizeGrip => "drawSizeGrip",
            Field::DrawBackgroundGradient => "drawBackgroundGradient",
            Field::DrawTitleBarSeparator => "drawTitleBarSeparator",
            Field::MatchColorForTitleBar => "matchColorForTitleBar",
            Field::ButtonSize => "buttonSize",
            Field::ButtonSpacing => "buttonSpacing",
            Field::ButtonHPadding => "buttonHPadding",
            Field::ButtonCloseActiveColor => "buttonCloseActiveColor",
            Field::ButtonCloseInactiveColor => "buttonCloseInactiveColor",
            Field::ButtonMaximizeActiveColor => "buttonMaximizeActiveColor",
            Field::ButtonMaximizeInactiveColor => "buttonMaximizeInactiveColor",
            Field::ButtonMinimizeActiveColor => "buttonMinimizeActiveColor",
            Field::ButtonMinimizeInactiveColor => "buttonMinimizeInactiveColor",
            Field::ButtonOnAllDesktopsActiveColor => "buttonOnAllDesktopsActiveColor",
            Field::ButtonOnAllDesktopsInactiveColor => "buttonOnAllDesktopsInactiveColor",
            Field::ButtonShadeActiveColor => "buttonShadeActiveColor",
            Field::ButtonShadeInactiveColor => "buttonShadeInactiveColor",
            Field::ButtonKeepBelowActiveColor => "buttonKeepBelowActiveColor",
            Field::ButtonKeepBelowInactiveColor => "buttonKeepBelowInactiveColor",
            Field::ButtonKeepAboveActiveColor => "buttonKeepAboveActiveColor",
            Field::ButtonKeepAboveInactiveColor => "buttonKeepAboveInactiveColor",
            Field::AnimationsEnabled => "animationsEnabled",
            Field::AnimationsDuration => "animationsDuration",
            Field::ShadowSize => "shadowSize",
            Field::ShadowStrength => "shadowStrength",
            Field::ShadowColor => "shadowColor",
        }
    }

    pub fn widget(self) -> Widget {
        match self {
            Field::TitleAlignment => Widget::ComboBox {
                items: TitleAlignment::ALL.len() as i32,
            },
            Field::OutlineCloseButton
            | Field::DrawBorderOnMaximizedWindows
            | Field::DrawSizeGrip
            | Field::DrawBackgroundGradient
            | Field::DrawTitleBarSeparator
            | Field::MatchColorForTitleBar
            | Field::AnimationsEnabled => Widget::CheckBox,
            Field::ButtonSize => spin(bounds::BUTTON_SIZE),
            Field::ButtonSpacing => spin(bounds::BUTTON_SPACING),
            Field::ButtonHPadding => spin(bounds::BUTTON_H_PADDING),
            Field::AnimationsDuration => spin(bounds::ANIMATIONS_DURATION),
            Field::ShadowSize => spin(bounds::SHADOW_SIZE),
            // Percentage, not the internal strength
            Field::ShadowStrength => Widget::SpinBox { min: 0, max: 100 },
            Field::ButtonCloseActiveColor
            | Field::ButtonCloseInactiveColor
            | Field::ButtonMaximizeActiveColor
            | Field::ButtonMaximizeInactiveColor
            | Field::ButtonMinimizeActiveColor
            | Field::ButtonMinimizeInactiveColor
            | Field::ButtonOnAllDesktopsActiveColor
            | Field::ButtonOnAllDesktopsInactiveColor
            | Field::ButtonShadeActiveColor
            | Field::ButtonShadeInactiveColor
            | Field::ButtonKeepBelowActiveColor
            | Field::ButtonKeepBelowInactiveColor
            | Field::ButtonKeepAboveActiveColor
            | Field::ButtonKeepAboveInactiveColor
            | Field::ShadowColor => Widget::ColorButton,
        }
    }

    /// Parse user text into a value of this field's widget kind
    pub fn parse_value(self, raw: &str) -> Result<FieldValue> {
        let value = match self.widget() {
            Widget::ComboBox { .. } => {
                FieldValue::Index(raw.parse::<TitleAlignment>()?.index())
            }
            Widget::CheckBox => FieldValue::Checked(parse_flag(raw)?),
            Widget::SpinBox { .. } => FieldValue::Number(
                raw.trim()
                    .parse()
                    .with_context(|| format!("Expected a number for {}, got '{}'", self.name(), raw))?,
            ),
            Widget::ColorButton => FieldValue::Color(raw.parse()?),
        };
        self.widget().accept(value)
    }

    /// Human-readable rendering of a value of this field
    pub fn format_value(self, value: &FieldValue) -> String {
        match (self, value) {
            (Field::TitleAlignment, FieldValue::Index(index)) => TitleAlignment::from_index(*index)
                .map(|alignment| alignment.config_name().to_string())
                .unwrap_or_else(|| index.to_string()),
            (Field::ShadowStrength, FieldValue::Number(percent)) => format!("{}%", percent),
            (Field::AnimationsDuration, FieldValue::Number(ms)) => format!("{}ms", ms),
            _ => value.to_string(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field names are matched case-insensitively
impl FromStr for Field {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Field::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(s))
            .with_context(|| format!("Unknown field: {}", s))
    }
}
