use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use anyhow::{Result, Context};

use crate::core::{InputField, PredictionRequest, INPUT_FIELDS};

/// Interactive form collecting the five student metrics
pub struct InputCollector;

impl InputCollector {
    /// Prompt for every field, pre-filled from `current`.
    pub fn collect(current: &PredictionRequest) -> Result<PredictionRequest> {
        let theme = ColorfulTheme::default();
        let mut values = current.to_vector();

        for (field, value) in INPUT_FIELDS.iter().zip(values.iter_mut()) {
            *value = Self::prompt_field(&theme, field, *value)?;
        }

        PredictionRequest::from_values(values)
            .context("Collected values are outside the accepted ranges")
    }

    fn prompt_field(theme: &ColorfulTheme, field: &InputField, default: f64) -> Result<f64> {
        let field = *field;
        let value: f64 = Input::with_theme(theme)
            .with_prompt(format!("{} {}", field.label, field.range_label()))
            .default(default)
            .validate_with(move |input: &f64| -> Result<(), String> {
                field.validate(*input).map(|_| ()).map_err(|e| e.to_string())
            })
            .interact_text()
            .with_context(|| format!("Failed to read {}", field.label))?;

        Ok(value)
    }

    /// The "Predict" button
    pub fn confirm_predict() -> Result<bool> {
        Ok(Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Predict the final exam score?")
            .default(true)
            .interact()?)
    }

    pub fn confirm_another() -> Result<bool> {
        Ok(Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Try another scenario?")
            .default(true)
            .interact()?)
    }
}
