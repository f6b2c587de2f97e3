use console::style;

use crate::core::INPUT_FIELDS;
use crate::ml::{Prediction, PipelineShape};

pub fn banner() {
    println!("{}", style("🎓 Student Performance Predictor").bold().cyan());
    println!(
        "Predicts the final exam score with a linear regression model on degree-2 \
         polynomial features, standardised and reduced to the most predictive columns."
    );
    println!();
    println!("{}", style("Enter the Student Performance Metrics").bold().yellow());
}

pub fn prediction(prediction: &Prediction) {
    println!("{}", style("✅ Prediction Complete!").bold().green());
    println!("{}", prediction_line(prediction));
}

/// The single result line, score rounded to two decimals
pub fn prediction_line(prediction: &Prediction) -> String {
    format!(
        "Predicted final exam score is {}",
        style(prediction.formatted_score()).bold()
    )
}

pub fn scenario_note() {
    println!(
        "{}",
        style("Adjust the input values to explore different scenarios.").dim()
    );
}

pub fn failure(error: &dyn std::fmt::Display) {
    eprintln!("{} {}", style("✗").red().bold(), style(error).red());
}

pub fn fields() {
    println!("{}", style("Input fields (in model column order)").bold().cyan());
    for (index, field) in INPUT_FIELDS.iter().enumerate() {
        println!(
            "{}. {} [{}] range {} default {} step {}",
            index + 1,
            style(field.label).bold(),
            field.key,
            field.range_label(),
            field.default,
            field.step
        );
    }
}

pub fn pipeline(shape: &PipelineShape, files: &[(String, String)]) {
    println!("{}", style("📊 Prediction Pipeline").bold().green());
    for (artifact, path) in files {
        println!("{}: {}", style(artifact).cyan(), path);
    }
    println!("Shape: {}", style(shape).magenta());
}
