use serde::Serialize;

use super::error::{PredictorError, PredictorResult};

/// A bounded numeric input presented to the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputField {
    pub key: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: Option<f64>,
    pub default: f64,
    pub step: f64,
}

impl InputField {
    /// Check a value against the field's range.
    pub fn validate(&self, value: f64) -> PredictorResult<f64> {
        let reject = |reason: String| PredictorError::InvalidInput {
            field: self.label.to_string(),
            value,
            reason,
        };

        if !value.is_finite() {
            return Err(reject("must be a finite number".to_string()));
        }
        if value < self.min {
            return Err(reject(format!("must be at least {}", self.min)));
        }
        if let Some(max) = self.max {
            if value > max {
                return Err(reject(format!("must be at most {}", max)));
            }
        }

        Ok(value)
    }

    pub fn range_label(&self) -> String {
        match self.max {
            Some(max) => format!("[{}, {}]", self.min, max),
            None => format!(">= {}", self.min),
        }
    }
}

pub const STUDY_HOURS: InputField = InputField {
    key: "study_hours",
    label: "Study Hours per Week",
    min: 0.0,
    max: None,
    default: 11.5,
    step: 0.5,
};

pub const ATTENDANCE: InputField = InputField {
    key: "attendance",
    label: "Attendance (%)",
    min: 0.0,
    max: Some(100.0),
    default: 82.5,
    step: 1.0,
};

pub const ASSIGNMENT_COMPLETION: InputField = InputField {
    key: "assignment_completion",
    label: "Assignment Completion (%)",
    min: 0.0,
    max: Some(100.0),
    default: 78.4,
    step: 1.0,
};

pub const MIDTERM_SCORE: InputField = InputField {
    key: "midterm_score",
    label: "Midterm Score",
    min: 0.0,
    max: Some(100.0),
    default: 74.2,
    step: 1.0,
};

pub const GROUP_PROJECT: InputField = InputField {
    key: "group_project",
    label: "Group Project Participation",
    min: 0.0,
    max: Some(1.0),
    default: 0.0,
    step: 1.0,
};

/// Column order the regression artifacts were fitted with. Do not reorder.
pub const INPUT_FIELDS: [InputField; 5] = [
    STUDY_HOURS,
    ATTENDANCE,
    ASSIGNMENT_COMPLETION,
    MIDTERM_SCORE,
    GROUP_PROJECT,
];

/// One row of student metrics, validated against [`INPUT_FIELDS`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub study_hours: f64,
    pub attendance: f64,
    pub assignment_completion: f64,
    pub midterm_score: f64,
    pub group_project: f64,
}

impl PredictionRequest {
    pub fn new(
        study_hours: f64,
        attendance: f64,
        assignment_completion: f64,
        midterm_score: f64,
        group_project: f64,
    ) -> PredictorResult<Self> {
        Self::from_values([
            study_hours,
            attendance,
            assignment_completion,
            midterm_score,
            group_project,
        ])
    }

    /// Build a request from values given in [`INPUT_FIELDS`] order.
    pub fn from_values(values: [f64; 5]) -> PredictorResult<Self> {
        for (field, value) in INPUT_FIELDS.iter().zip(values) {
            field.validate(value)?;
        }

        let [study_hours, attendance, assignment_completion, midterm_score, group_project] = values;
        Ok(Self {
            study_hours,
            attendance,
            assignment_completion,
            midterm_score,
            group_project,
        })
    }

    pub fn to_vector(&self) -> [f64; 5] {
        [
            self.study_hours,
            self.attendance,
            self.assignment_completion,
            self.midterm_score,
            self.group_project,
        ]
    }
}

impl Default for PredictionRequest {
    fn default() -> Self {
        Self {
            study_hours: STUDY_HOURS.default,
            attendance: ATTENDANCE.default,
            assignment_completion: ASSIGNMENT_COMPLETION.default,
            midterm_score: MIDTERM_SCORE.default,
            group_project: GROUP_PROJECT.default,
        }
    }
}
