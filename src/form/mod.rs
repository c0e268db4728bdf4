//! Form adapter
//!
//! The panel's widgets are modelled as an opaque set of typed input fields.
//! This module maps widget values to the settings record and back; the only
//! non-trivial mapping is shadow strength, shown as a percentage but stored
//! on a 0-255 scale.

mod exceptions;
mod field;

pub use exceptions::ExceptionEditor;
pub use field::{Field, FieldValue, FIELD_COUNT};

use crate::settings::{DecorationSettings, TitleAlignment};
use anyhow::{Context, Result};
use tracing::warn;

/// Internal shadow strength to the percentage shown on the panel
pub fn strength_to_percent(strength: i32) -> i32 {
    (f64::from(strength) * 100.0 / 255.0).round() as i32
}

/// Panel percentage to the internal shadow strength.
///
/// Not the exact inverse of [`strength_to_percent`]: internal values that
/// fall between two percentage steps do not survive a round trip.
pub fn percent_to_strength(percent: i32) -> i32 {
    (f64::from(percent) * 255.0 / 100.0).round() as i32
}

/// Current values of every input field plus the exception editor
#[derive(Debug, Clone)]
pub struct DecorationForm {
    values: [FieldValue; FIELD_COUNT],
    exceptions: ExceptionEditor,
}

impl Default for DecorationForm {
    fn default() -> Self {
        Self {
            values: Field::ALL.map(|field| field.widget().blank_value()),
            exceptions: ExceptionEditor::default(),
        }
    }
}

impl DecorationForm {
    pub fn value(&self, field: Field) -> FieldValue {
        self.values[field.index()]
    }

    /// Store a value as the field's widget would accept it
    pub fn set_value(&mut self, field: Field, value: FieldValue) -> Result<()> {
        let accepted = field
            .widget()
            .accept(value)
            .with_context(|| format!("Invalid value for {}", field))?;
        self.values[field.index()] = accepted;
        Ok(())
    }

    pub fn exceptions(&self) -> &ExceptionEditor {
        &self.exceptions
    }

    pub fn exceptions_mut(&mut self) -> &mut ExceptionEditor {
        &mut self.exceptions
    }

    /// Copy every field of `settings` into the form. Exceptions are left
    /// untouched.
    pub fn assign(&mut self, settings: &DecorationSettings) {
        for field in Field::ALL {
            self.values[field.index()] = settings_value(settings, field);
        }
    }

    /// Copy every field of the form into `settings`
    pub fn apply_to(&self, settings: &mut DecorationSettings) {
        for field in Field::ALL {
            apply_value(settings, field, self.value(field));
        }
    }

    /// First field whose value differs from `baseline`, if any.
    ///
    /// Shadow strength is compared on the internal scale, converting the
    /// panel percentage the same way saving does.
    pub fn first_difference(&self, baseline: &DecorationSettings) -> Option<Field> {
        Field::ALL.into_iter().find(|&field| match (field, self.value(field)) {
            (Field::ShadowStrength, FieldValue::Number(percent)) => {
                percent_to_strength(percent) != baseline.shadow_strength
            }
            (field, value) => value != settings_value(baseline, field),
        })
    }
}

/// Value the widget for `field` shows for `settings`
pub fn settings_value(settings: &DecorationSettings, field: Field) -> FieldValue {
    use FieldValue::{Checked, Color, Index, Number};

    match field {
        Field::TitleAlignment => Index(settings.title_alignment.index()),
        Field::OutlineCloseButton => Checked(settings.outline_close_button),
        Field::DrawBorderOnMaximizedWindows => Checked(settings.draw_border_on_maximized_windows),
        Field::DrawSizeGrip => Checked(settings.draw_size_grip),
        Field::DrawBackgroundGradient => Checked(settings.draw_background_gradient),
        Field::DrawTitleBarSeparator => Checked(settings.draw_title_bar_separator),
        Field::MatchColorForTitleBar => Checked(settings.match_color_for_title_bar),
        Field::ButtonSize => Number(settings.button_size),
        Field::ButtonSpacing => Number(settings.button_spacing),
        Field::ButtonHPadding => Number(settings.button_h_padding),
        Field::ButtonCloseActiveColor => Color(settings.button_close_active_color),
        Field::ButtonCloseInactiveColor => Color(settings.button_close_inactive_color),
        Field::ButtonMaximizeActiveColor => Color(settings.button_maximize_active_color),
        Field::ButtonMaximizeInactiveColor => Color(settings.button_maximize_inactive_color),
        Field::ButtonMinimizeActiveColor => Color(settings.button_minimize_active_color),
        Field::ButtonMinimizeInactiveColor => Color(settings.button_minimize_inactive_color),
        Field::ButtonOnAllDesktopsActiveColor => {
            Color(settings.button_on_all_desktops_active_color)
        }
        Field::ButtonOnAllDesktopsInactiveColor => {
            Color(settings.button_on_all_desktops_inactive_color)
        }
        Field::ButtonShadeActiveColor => Color(settings.button_shade_active_color),
        Field::ButtonShadeInactiveColor => Color(settings.button_shade_inactive_color),
        Field::ButtonKeepBelowActiveColor => Color(settings.button_keep_below_active_color),
        Field::ButtonKeepBelowInactiveColor => Color(settings.button_keep_below_inactive_color),
        Field::ButtonKeepAboveActiveColor => Color(settings.button_keep_above_active_color),
        Field::ButtonKeepAboveInactiveColor => Color(settings.button_keep_above_inactive_color),
        Field::AnimationsEnabled => Checked(settings.animations_enabled),
        Field::AnimationsDuration => Number(settings.animations_duration),
        Field::ShadowSize => Number(settings.shadow_size),
        Field::ShadowStrength => Number(strength_to_percent(settings.shadow_strength)),
        Field::ShadowColor => Color(settings.shadow_color),
    }
}

/// Write a widget value for `field` into `settings`
pub fn apply_value(settings: &mut DecorationSettings, field: Field, value: FieldValue) {
    use FieldValue::{Checked, Color, Index, Number};

    match (field, value) {
        (Field::TitleAlignment, Index(index)) => {
            settings.title_alignment = TitleAlignment::from_index(index).unwrap_or_default()
        }
        (Field::OutlineCloseButton, Checked(v)) => settings.outline_close_button = v,
        (Field::DrawBorderOnMaximizedWindows, Checked(v)) => {
            settings.draw_border_on_maximized_windows = v
        }
        (Field::DrawSizeGrip, Checked(v)) => settings.draw_size_grip = v,
        (Field::DrawBackgroundGradient, Checked(v)) => settings.draw_background_gradient = v,
        (Field::DrawTitleBarSeparator, Checked(v)) => settings.draw_title_bar_separator = v,
        (Field::MatchColorForTitleBar, Checked(v)) => settings.match_color_for_title_bar = v,
        (Field::ButtonSize, Number(v)) => settings.button_size = v,
        (Field::ButtonSpacing, Number(v)) => settings.button_spacing = v,
        (Field::ButtonHPadding, Number(v)) => settings.button_h_padding = v,
        (Field::ButtonCloseActiveColor, Color(c)) => settings.button_close_active_color = c,
        (Field::ButtonCloseInactiveColor, Color(c)) => settings.button_close_inactive_color = c,
        (Field::ButtonMaximizeActiveColor, Color(c)) => settings.button_maximize_active_color = c,
        (Field::ButtonMaximizeInactiveColor, Color(c)) => {
            settings.button_maximize_inactive_color = c
        }
        (Field::ButtonMinimizeActiveColor, Color(c)) => settings.button_minimize_active_color = c,
        (Field::ButtonMinimizeInactiveColor, Color(c)) => {
            settings.button_minimize_inactive_color = c
        }
        (Field::ButtonOnAllDesktopsActiveColor, Color(c)) => {
            settings.button_on_all_desktops_active_color = c
        }
        (Field::ButtonOnAllDesktopsInactiveColor, Color(c)) => {
            settings.button_on_all_desktops_inactive_color = c
        }
        (Field::ButtonShadeActiveColor, Color(c)) => settings.button_shade_active_color = c,
        (Field::ButtonShadeInactiveColor, Color(c)) => settings.button_shade_inactive_color = c,
        (Field::ButtonKeepBelowActiveColor, Color(c)) => {
            settings.button_keep_below_active_color = c
        }
        (Field::ButtonKeepBelowInactiveColor, Color(c)) => {
            settings.button_keep_below_inactive_color = c
        }
        (Field::ButtonKeepAboveActiveColor, Color(c)) => {
            settings.button_keep_above_active_color = c
        }
        (Field::ButtonKeepAboveInactiveColor, Color(c)) => {
            settings.button_keep_above_inactive_color = c
        }
        (Field::AnimationsEnabled, Checked(v)) => settings.animations_enabled = v,
        (Field::AnimationsDuration, Number(v)) => settings.animations_duration = v,
        (Field::ShadowSize, Number(v)) => settings.shadow_size = v,
        (Field::ShadowStrength, Number(percent)) => {
            settings.shadow_strength = percent_to_strength(percent)
        }
        (Field::ShadowColor, Color(c)) => settings.shadow_color = c,
        (field, value) => warn!("Ignoring {:?} for field {}", value, field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Color;

    #[test]
    fn test_shadow_strength_fixtures() {
        assert_eq!(percent_to_strength(50), 128);
        assert_eq!(strength_to_percent(128), 50);

        assert_eq!(percent_to_strength(33), 84);
        assert_eq!(strength_to_percent(84), 33);

        assert_eq!(percent_to_strength(100), 255);
        assert_eq!(strength_to_percent(255), 100);
        assert_eq!(strength_to_percent(0), 0);
    }

    #[test]
    fn test_every_percentage_round_trips() {
        for percent in 0..=100 {
            assert_eq!(strength_to_percent(percent_to_strength(percent)), percent);
        }
    }

    #[test]
    fn test_internal_strength_is_lossy() {
        // 1/255 is below half a percent
        assert_eq!(strength_to_percent(1), 0);
        assert_eq!(percent_to_strength(strength_to_percent(1)), 0);

        for strength in 0..=255 {
            let back = percent_to_strength(strength_to_percent(strength));
            assert!((back - strength).abs() <= 1, "strength {} came back as {}", strength, back);
        }
    }

    #[test]
    fn test_assign_then_apply_reproduces_settings() {
        let mut settings = DecorationSettings::default();
        settings.title_alignment = TitleAlignment::Left;
        settings.button_h_padding = 3;
        settings.button_keep_above_inactive_color = Color::rgba(9, 8, 7, 6);
        settings.shadow_strength = 128;

        let mut form = DecorationForm::default();
        form.assign(&settings);
        assert_eq!(form.value(Field::ShadowStrength), FieldValue::Number(50));

        let mut copy = DecorationSettings::default();
        form.apply_to(&mut copy);
        assert_eq!(copy, settings);
        assert_eq!(form.first_difference(&settings), None);
    }

    #[test]
    fn test_first_difference_reports_edited_field() {
        let settings = DecorationSettings::default();
        let mut form = DecorationForm::default();
        form.assign(&settings);

        form.set_value(Field::ShadowColor, FieldValue::Color(Color::rgb(1, 1, 1)))
            .unwrap();
        assert_eq!(form.first_difference(&settings), Some(Field::ShadowColor));
    }

    #[test]
    fn test_first_difference_uses_internal_strength() {
        let mut settings = DecorationSettings::default();
        settings.shadow_strength = 1;

        let mut form = DecorationForm::default();
        form.assign(&settings);
        assert_eq!(form.value(Field::ShadowStrength), FieldValue::Number(0));
        assert_eq!(form.first_difference(&settings), Some(Field::ShadowStrength));
    }

    #[test]
    fn test_set_value_rejects_wrong_kind() {
        let mut form = DecorationForm::default();
        assert!(form
            .set_value(Field::ButtonSize, FieldValue::Checked(true))
            .is_err());
        assert!(form
            .set_value(Field::TitleAlignment, FieldValue::Index(9))
            .is_err());
    }

    #[test]
    fn test_assign_leaves_exceptions_alone() {
        use crate::exceptions::{ExceptionRecord, ExceptionType};

        let mut form = DecorationForm::default();
        form.exceptions_mut()
            .add(ExceptionRecord::new("kate", ExceptionType::WindowClass));
        form.assign(&DecorationSettings::default());
        assert_eq!(form.exceptions().exceptions().len(), 1);
        assert!(form.exceptions().is_changed());
    }
}
