//! Split the days before an exam evenly across its topics

use chrono::NaiveDate;
use serde::Serialize;

/// Recommended study hours per allocated day
pub const HOURS_PER_DAY: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicAllocation {
    pub topic: String,
    /// First day, 1-based
    pub start_day: u32,
    /// Last day, inclusive
    pub end_day: u32,
    pub recommended_hours: u32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamPlan {
    pub exam_name: String,
    pub total_days: u32,
    pub generated_at: NaiveDate,
    pub plan: Vec<TopicAllocation>,
    /// Days left over by the even split, never assigned to a topic
    pub unallocated_days: u32,
}

/// Parse a comma separated topic list, dropping blanks
pub fn parse_topics(topics_csv: &str) -> Vec<String> {
    topics_csv
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Give every topic `floor(days / topics)` consecutive days.
///
/// With fewer days than topics every topic gets zero days, so its range is
/// empty (`end_day < start_day`).
pub fn generate_plan(exam_name: &str, days: u32, topics_csv: &str, today: NaiveDate) -> ExamPlan {
    let topics = parse_topics(topics_csv);
    let count = topics.len() as u32;
    let days_per_topic = days.checked_div(count).unwrap_or(0);

    let plan = topics
        .into_iter()
        .enumerate()
        .map(|(index, topic)| {
            let index = index as u32;
            let start_day = index * days_per_topic + 1;
            let end_day = (index + 1) * days_per_topic;
            let recommended_hours = days_per_topic * HOURS_PER_DAY;
            let description = format!(
                "Spend {} hours on {} from day {} to day {}",
                recommended_hours, topic, start_day, end_day
            );
            TopicAllocation {
                topic,
                start_day,
                end_day,
                recommended_hours,
                description,
            }
        })
        .collect();

    ExamPlan {
        exam_name: exam_name.to_string(),
        total_days: days,
        generated_at: today,
        plan,
        unallocated_days: days - days_per_topic * count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_three_topics_ten_days() {
        let plan = generate_plan("Biology final", 10, "Cells, Genetics,Evolution", today());
        assert_eq!(plan.plan.len(), 3);
        for topic in &plan.plan {
            assert_eq!(topic.end_day - topic.start_day + 1, 3);
            assert_eq!(topic.recommended_hours, 6);
        }
        assert_eq!(plan.plan[1].topic, "Genetics");
        assert_eq!((plan.plan[1].start_day, plan.plan[1].end_day), (4, 6));
        assert_eq!(plan.plan[2].end_day, 9);
        assert_eq!(plan.unallocated_days, 1);
        assert_eq!(plan.plan[0].description, "Spend 6 hours on Cells from day 1 to day 3");
    }

    #[test]
    fn test_blank_topics_dropped() {
        assert_eq!(parse_topics(" a, ,b,, "), vec!["a", "b"]);
    }

    #[test]
    fn test_no_topics() {
        let plan = generate_plan("Quiz", 5, " , ", today());
        assert!(plan.plan.is_empty());
        assert_eq!(plan.unallocated_days, 5);
    }

    #[test]
    fn test_fewer_days_than_topics() {
        let plan = generate_plan("Quiz", 2, "a,b,c", today());
        assert_eq!(plan.plan.len(), 3);
        assert!(plan.plan.iter().all(|t| t.recommended_hours == 0));
        assert_eq!((plan.plan[0].start_day, plan.plan[0].end_day), (1, 0));
        assert_eq!(plan.unallocated_days, 2);
    }
}
