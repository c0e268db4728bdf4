//! Decoration settings panel
//!
//! Keeps the editable form, the last loaded or saved settings (the
//! baseline) and the exception list consistent, and decides whether the form
//! holds unsaved changes. Each entry point builds its own settings record
//! from the store instead of trusting a cached one.

use crate::exceptions::ExceptionList;
use crate::form::{DecorationForm, ExceptionEditor, Field, FieldValue};
use crate::notify::{ChangeNotifier, PanelEvent, ReloadNotifier, RELOAD_SIGNALS};
use crate::settings::DecorationSettings;
use crate::store::ConfigStore;
use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use tracing::{debug, info};

pub struct ConfigPanel {
    store: ConfigStore,
    form: DecorationForm,
    baseline: Option<DecorationSettings>,
    notifier: ChangeNotifier,
    reload: Box<dyn ReloadNotifier>,
}

impl ConfigPanel {
    pub fn new(store: ConfigStore, reload: Box<dyn ReloadNotifier>) -> Self {
        Self {
            store,
            form: DecorationForm::default(),
            baseline: None,
            notifier: ChangeNotifier::default(),
            reload,
        }
    }

    /// Report dirty-state changes to `observer`
    pub fn with_observer(mut self, observer: Sender<PanelEvent>) -> Self {
        self.notifier = ChangeNotifier::new(Some(observer));
        self
    }

    pub fn form(&self) -> &DecorationForm {
        &self.form
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Settings the form is compared against
    #[cfg(test)]
    pub fn baseline(&self) -> Option<&DecorationSettings> {
        self.baseline.as_ref()
    }

    /// Last dirty state reported to the observer
    pub fn is_changed(&self) -> bool {
        self.notifier.is_changed()
    }

    /// Populate the form from the store and mark it clean
    pub fn load(&mut self) {
        let settings = DecorationSettings::load(&self.store);
        self.form.assign(&settings);

        let exceptions = ExceptionList::read_config(&self.store);
        self.form
            .exceptions_mut()
            .set_exceptions(exceptions.into_inner());

        self.baseline = Some(settings);
        self.notifier.set_changed(false);
        debug!("Loaded decoration settings");
    }

    /// Reset every field except the exceptions to the compiled defaults.
    ///
    /// The baseline is kept, so the next `update_changed` reports whether
    /// the defaults differ from what is stored.
    pub fn defaults(&mut self) {
        let settings = DecorationSettings::defaults();
        self.form.assign(&settings);
        debug!("Reset form to defaults");
    }

    /// Write the form and the exception list to the store and flush it.
    ///
    /// The record written is seeded from the store rather than from the
    /// baseline. On a flush failure the store is rolled back, the form
    /// stays dirty and no reload signal is sent.
    pub fn save(&mut self) -> Result<()> {
        let snapshot = self.store.snapshot();
        let mut settings = DecorationSettings::load(&self.store);
        self.form.apply_to(&mut settings);
        settings.save(&mut self.store);

        let exceptions = ExceptionList::new(self.form.exceptions().exceptions().to_vec());
        exceptions.write_config(&mut self.store);

        if let Err(e) = self.store.sync() {
            self.store.restore(snapshot);
            return Err(e).context("Failed to save decoration settings");
        }

        self.baseline = Some(settings);
        self.form.exceptions_mut().acknowledge();
        self.notifier.set_changed(false);
        info!(
            "Decoration settings saved ({} exceptions)",
            exceptions.get().len()
        );

        for signal in &RELOAD_SIGNALS {
            self.reload.send(signal);
        }
        Ok(())
    }

    /// Compare the form against the baseline and report the result.
    /// Does nothing until something has been loaded or saved.
    pub fn update_changed(&mut self) {
        let Some(baseline) = self.baseline.as_ref() else {
            return;
        };

        let modified = match self.form.first_difference(baseline) {
            Some(field) => {
                debug!("Field {} differs from saved settings", field);
                true
            }
            None => self.form.exceptions().is_changed(),
        };
        self.notifier.set_changed(modified);
    }

    /// Entry point for every form edit
    pub fn on_field_changed(&mut self, field: Field, value: FieldValue) -> Result<()> {
        self.form.set_value(field, value)?;
        self.update_changed();
        Ok(())
    }

    /// Apply an edit to the exception editor, then re-check for changes
    pub fn edit_exceptions<R>(
        &mut self,
        edit: impl FnOnce(&mut ExceptionEditor) -> Result<R>,
    ) -> Result<R> {
        let result = edit(self.form.exceptions_mut())?;
        self.update_changed();
        Ok(result)
    }
}
