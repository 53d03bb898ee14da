//! Grade book with weighted averages, trend and what-if simulation

use super::types::{Grade, NewGrade};
use super::{impl_manager, mean};
use crate::error::{Error, Result};
use crate::ids::IdGenerator;
use serde::{Deserialize, Serialize};

/// Weight used by [`GradeManager::simulate`] when the caller has no preference
pub const DEFAULT_SIMULATION_WEIGHT: u32 = 2;

/// School system the grades belong to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchoolType {
    #[default]
    HighSchool,
    University,
}

impl SchoolType {
    pub fn scale(self) -> GradeScale {
        match self {
            Self::HighSchool => GradeScale { min: 1.0, max: 10.0 },
            Self::University => GradeScale { min: 18.0, max: 30.0 },
        }
    }
}

/// Accepted grade values, inclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeScale {
    pub min: f64,
    pub max: f64,
}

impl GradeScale {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone)]
pub struct GradeManager {
    grades: Vec<Grade>,
    scale: GradeScale,
    ids: IdGenerator,
}

impl_manager!(GradeManager, Grade, grades);

impl GradeManager {
    pub fn new(grades: Vec<Grade>, scale: GradeScale) -> Self {
        let ids = IdGenerator::seeded(grades.iter().map(|g| g.id));
        let mut manager = Self { grades, scale, ids };
        manager.sort_by_date();
        manager
    }

    pub fn scale(&self) -> GradeScale {
        self.scale
    }

    /// Switch scale for future inserts; stored grades are left as they are
    pub fn set_scale(&mut self, scale: GradeScale) {
        self.scale = scale;
    }

    pub fn add_grade(&mut self, req: NewGrade) -> Result<Grade> {
        if !req.value.is_finite() || !self.scale.contains(req.value) {
            return Err(Error::Validation(format!(
                "grade {} is outside the scale {}-{}",
                req.value, self.scale.min, self.scale.max
            )));
        }
        if req.weight < 1 {
            return Err(Error::Validation("weight must be at least 1".to_string()));
        }

        let grade = Grade {
            id: self.ids.next_id(),
            subject: req.subject,
            value: req.value,
            weight: req.weight,
            date: req.date,
        };
        self.grades.push(grade.clone());
        self.sort_by_date();
        Ok(grade)
    }

    fn sort_by_date(&mut self) {
        self.grades.sort_by(|a, b| b.date.cmp(&a.date));
    }

    fn total_weight(&self) -> f64 {
        self.grades.iter().map(|g| f64::from(g.weight)).sum()
    }

    fn weighted_sum(&self) -> f64 {
        self.grades.iter().map(|g| g.value * f64::from(g.weight)).sum()
    }

    /// Σ(value·weight) / Σ(weight), 0 when there is nothing to weigh
    pub fn weighted_average(&self) -> f64 {
        let total_weight = self.total_weight();
        if total_weight == 0.0 {
            return 0.0;
        }
        self.weighted_sum() / total_weight
    }

    /// Unweighted mean for one subject, compared case-insensitively
    pub fn average_by_subject(&self, subject: &str) -> f64 {
        let subject = subject.to_lowercase();
        mean(
            self.grades
                .iter()
                .filter(|g| g.subject.to_lowercase() == subject)
                .map(|g| g.value),
        )
    }

    /// Distinct subjects in first-seen order
    pub fn subjects(&self) -> Vec<String> {
        let mut subjects: Vec<String> = Vec::new();
        for grade in &self.grades {
            if !subjects.contains(&grade.subject) {
                subjects.push(grade.subject.clone());
            }
        }
        subjects
    }

    /// Mean of the most recent half minus mean of the older half.
    ///
    /// The recent half takes the extra record when the count is odd.
    pub fn trend(&self) -> f64 {
        if self.grades.len() < 2 {
            return 0.0;
        }
        let split = self.grades.len().div_ceil(2);
        let (recent, older) = self.grades.split_at(split);
        mean(recent.iter().map(|g| g.value)) - mean(older.iter().map(|g| g.value))
    }

    /// Weighted average as if `value` had been added with `weight`
    pub fn simulate(&self, value: f64, weight: u32) -> f64 {
        let weight = f64::from(weight);
        let total_weight = self.total_weight() + weight;
        if total_weight == 0.0 {
            return 0.0;
        }
        (self.weighted_sum() + value * weight) / total_weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::managers::Manager;
    use chrono::NaiveDate;

    fn req(day: u32, value: f64, weight: u32) -> NewGrade {
        NewGrade {
            subject: "Math".to_string(),
            value,
            weight,
            date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
        }
    }

    fn book(grades: &[(u32, f64, u32)]) -> GradeManager {
        let mut manager = GradeManager::new(Vec::new(), SchoolType::HighSchool.scale());
        for (day, value, weight) in grades {
            manager.add_grade(req(*day, *value, *weight)).unwrap();
        }
        manager
    }

    #[test]
    fn test_weighted_average() {
        let grades = book(&[(1, 6.0, 1), (2, 9.0, 2)]);
        assert_eq!(grades.weighted_average(), 8.0);
        assert_eq!(book(&[]).weighted_average(), 0.0);
    }

    #[test]
    fn test_weighted_average_order_invariant() {
        let a = book(&[(1, 6.0, 1), (2, 9.0, 3), (3, 7.5, 2)]);
        let mut reversed = a.records().to_vec();
        reversed.reverse();
        let b = GradeManager::new(reversed, SchoolType::HighSchool.scale());
        assert!((a.weighted_average() - b.weighted_average()).abs() < 1e-12);
    }

    #[test]
    fn test_equal_weights_is_mean() {
        let grades = book(&[(1, 5.0, 2), (2, 7.0, 2), (3, 9.0, 2)]);
        assert_eq!(grades.weighted_average(), 7.0);
    }

    #[test]
    fn test_trend_uses_ceiling_split() {
        assert_eq!(book(&[(1, 8.0, 1)]).trend(), 0.0);
        // Most recent first: 9 (day 3), 7 (day 2) | 4 (day 1)
        let grades = book(&[(1, 4.0, 1), (2, 7.0, 1), (3, 9.0, 1)]);
        assert_eq!(grades.trend(), 8.0 - 4.0);
    }

    #[test]
    fn test_simulate_does_not_mutate() {
        let grades = book(&[(1, 6.0, 1), (2, 8.0, 1)]);
        let before_len = grades.len();
        let before_avg = grades.weighted_average();

        let simulated = grades.simulate(10.0, DEFAULT_SIMULATION_WEIGHT);
        assert_eq!(simulated, (6.0 + 8.0 + 20.0) / 4.0);

        assert_eq!(grades.len(), before_len);
        assert_eq!(grades.weighted_average(), before_avg);
        assert_eq!(book(&[]).simulate(7.0, 2), 7.0);
    }

    #[test]
    fn test_scale_validation() {
        let mut grades = book(&[]);
        assert!(grades.add_grade(req(1, 11.0, 1)).is_err());
        assert!(grades.add_grade(req(1, 8.0, 0)).is_err());

        grades.set_scale(SchoolType::University.scale());
        assert!(grades.add_grade(req(1, 8.0, 1)).is_err());
        assert!(grades.add_grade(req(1, 28.0, 1)).is_ok());
    }

    #[test]
    fn test_subject_average_and_subjects() {
        let mut grades = book(&[(1, 6.0, 1), (2, 8.0, 3)]);
        let mut latin = req(3, 10.0, 1);
        latin.subject = "Latin".to_string();
        grades.add_grade(latin).unwrap();

        assert_eq!(grades.average_by_subject("math"), 7.0);
        assert_eq!(grades.average_by_subject("greek"), 0.0);
        assert_eq!(grades.subjects(), vec!["Latin", "Math"]);
    }
}
