//! Pure derivation functions over store snapshots.
//!
//! Everything here is stateless and performs no I/O: callers hand in the
//! latest catalog or progress-series snapshot and get a derived view back.
//! All functions are total over empty inputs.

use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;

use crate::model::{
    Category, CategoryStat, Difficulty, OverallProgress, ProgressEntry, Question, Status,
    WeeklyBucket,
};

//
// ─── COMPLETION RATIOS ─────────────────────────────────────────────────────────
//

/// Rounded percentage of `completed` over `total`, 0 when `total` is 0.
///
/// Single rounding rule reused by every completion-ratio display.
#[must_use]
pub fn progress_percentage(completed: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(completed) / f64::from(total) * 100.0).round() as u32
}

/// Sums per-category stats into an overall completion ratio.
#[must_use]
pub fn overall_progress(stats: &[CategoryStat]) -> OverallProgress {
    let completed = stats.iter().map(|s| s.completed).sum();
    let total = stats.iter().map(|s| s.total).sum();
    OverallProgress {
        completed,
        total,
        percentage: progress_percentage(completed, total),
    }
}

/// Display label for a question status ("in-progress" → "In Progress").
#[must_use]
pub fn format_status(status: Status) -> &'static str {
    match status {
        Status::NotStarted => "Not Started",
        Status::InProgress => "In Progress",
        Status::Completed => "Completed",
    }
}

//
// ─── CATALOG VIEWS ─────────────────────────────────────────────────────────────
//

/// Per-category totals and completion counts.
///
/// Always returns exactly one entry per category in [`Category::ALL`] order;
/// empty categories appear with `total` 0.
#[must_use]
pub fn category_stats(questions: &[Question]) -> Vec<CategoryStat> {
    Category::ALL
        .iter()
        .map(|&category| {
            let in_category = questions.iter().filter(|q| q.category == category);
            let (mut total, mut completed) = (0, 0);
            for q in in_category {
                total += 1;
                if q.status == Status::Completed {
                    completed += 1;
                }
            }
            CategoryStat {
                category,
                total,
                completed,
            }
        })
        .collect()
}

/// Search and filter a catalog snapshot.
///
/// A non-empty `term` matches case-insensitively against title, description,
/// or any tag. `None` for category or difficulty means "all". Filters
/// compose with logical AND.
#[must_use]
pub fn filter_questions(
    questions: &[Question],
    term: &str,
    category: Option<Category>,
    difficulty: Option<Difficulty>,
) -> Vec<Question> {
    let needle = term.to_lowercase();
    questions
        .iter()
        .filter(|q| needle.is_empty() || matches_term(q, &needle))
        .filter(|q| category.is_none_or(|c| q.category == c))
        .filter(|q| difficulty.is_none_or(|d| q.difficulty == d))
        .cloned()
        .collect()
}

fn matches_term(question: &Question, needle: &str) -> bool {
    question.title.to_lowercase().contains(needle)
        || question.description.to_lowercase().contains(needle)
        || question
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

//
// ─── TIME-SERIES VIEWS ─────────────────────────────────────────────────────────
//

/// Count of consecutive most-recent days with at least one completion.
///
/// Entries are ordered by date descending; counting starts at `today` and
/// stops at the first zero-completion entry. A missing entry for `today`
/// breaks the streak immediately (the series is never synthesized on read).
#[must_use]
pub fn current_streak(entries: &[ProgressEntry], today: NaiveDate) -> u32 {
    let mut sorted: Vec<&ProgressEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    match sorted.first() {
        Some(latest) if latest.date == today => {}
        _ => return 0,
    }

    let mut streak = 0;
    for entry in sorted {
        if entry.questions_completed > 0 {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

/// Total minutes spent across the whole series.
#[must_use]
pub fn total_time_spent(entries: &[ProgressEntry]) -> u32 {
    entries.iter().map(|e| e.time_spent).sum()
}

/// Sums completions into Sunday-starting weekly buckets, ascending by week.
#[must_use]
pub fn weekly_rollup(entries: &[ProgressEntry]) -> Vec<WeeklyBucket> {
    let mut weeks: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for entry in entries {
        *weeks.entry(week_start(entry.date)).or_insert(0) += entry.questions_completed;
    }
    weeks
        .into_iter()
        .map(|(week_start, completed)| WeeklyBucket {
            week_start,
            completed,
        })
        .collect()
}

/// The Sunday starting the week that contains `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// Buckets a day's completion count into a heat-map intensity in 0..=4.
#[must_use]
pub fn activity_intensity(questions_completed: u32) -> u8 {
    match questions_completed {
        0 => 0,
        1 => 1,
        2 => 2,
        3 => 3,
        _ => 4,
    }
}

/// Encouragement tier for the streak display.
#[must_use]
pub fn streak_message(streak: u32) -> &'static str {
    match streak {
        0 => "Start your streak today!",
        1..=6 => "Great start! Keep it up!",
        7..=29 => "Impressive consistency!",
        _ => "Outstanding dedication!",
    }
}

/// Bar height for the weekly chart, as a percentage of the tallest bucket.
#[must_use]
pub fn weekly_bar_height(completed: u32, buckets: &[WeeklyBucket]) -> u32 {
    let max = buckets.iter().map(|b| b.completed).max().unwrap_or(0).max(1);
    completed * 100 / max
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionId;

    fn question(id: &str, category: Category, status: Status) -> Question {
        Question {
            id: QuestionId::new(id),
            title: format!("Question {id}"),
            description: "desc".into(),
            category,
            difficulty: Difficulty::Easy,
            tags: vec![],
            hint: None,
            status,
            notes: String::new(),
        }
    }

    fn entry(date: NaiveDate, completed: u32) -> ProgressEntry {
        ProgressEntry::new(date, completed, 30)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(progress_percentage(3, 4), 75);
        assert_eq!(progress_percentage(1, 3), 33);
        assert_eq!(progress_percentage(2, 3), 67);
        assert_eq!(progress_percentage(0, 0), 0);
        assert_eq!(progress_percentage(5, 5), 100);
    }

    #[test]
    fn overall_progress_sums_category_stats() {
        let stats = vec![
            CategoryStat {
                category: Category::Java,
                total: 2,
                completed: 1,
            },
            CategoryStat {
                category: Category::Dsa,
                total: 2,
                completed: 2,
            },
        ];
        let overall = overall_progress(&stats);
        assert_eq!(overall.completed, 3);
        assert_eq!(overall.total, 4);
        assert_eq!(overall.percentage, 75);
    }

    #[test]
    fn overall_progress_of_nothing_is_zero() {
        assert_eq!(overall_progress(&[]), OverallProgress::default());
    }

    #[test]
    fn format_status_title_cases_labels() {
        assert_eq!(format_status(Status::NotStarted), "Not Started");
        assert_eq!(format_status(Status::InProgress), "In Progress");
        assert_eq!(format_status(Status::Completed), "Completed");
    }

    #[test]
    fn category_stats_cover_all_categories_even_when_empty() {
        let stats = category_stats(&[]);
        assert_eq!(stats.len(), 4);
        assert_eq!(
            stats.iter().map(|s| s.category).collect::<Vec<_>>(),
            Category::ALL.to_vec()
        );
        assert!(stats.iter().all(|s| s.total == 0 && s.completed == 0));
    }

    #[test]
    fn category_stats_count_totals_and_completions() {
        let catalog = vec![
            question("1", Category::Java, Status::Completed),
            question("2", Category::Java, Status::NotStarted),
            question("3", Category::Hr, Status::Completed),
        ];
        let stats = category_stats(&catalog);
        assert_eq!(stats[0].category, Category::Java);
        assert_eq!(stats[0].total, 2);
        assert_eq!(stats[0].completed, 1);
        assert_eq!(stats[1].total, 0);
        assert_eq!(stats[3].category, Category::Hr);
        assert_eq!(stats[3].completed, 1);
    }

    #[test]
    fn filter_matches_title_description_and_tags_case_insensitively() {
        let mut q = question("1", Category::Dsa, Status::NotStarted);
        q.title = "Implement Binary Search".into();
        q.tags = vec!["Algorithm".into()];
        let catalog = vec![q, question("2", Category::Java, Status::NotStarted)];

        assert_eq!(filter_questions(&catalog, "BINARY", None, None).len(), 1);
        assert_eq!(filter_questions(&catalog, "algorithm", None, None).len(), 1);
        assert_eq!(filter_questions(&catalog, "desc", None, None).len(), 2);
        assert!(filter_questions(&catalog, "nope", None, None).is_empty());
    }

    #[test]
    fn filters_compose_with_and() {
        let mut easy = question("1", Category::Dsa, Status::NotStarted);
        easy.difficulty = Difficulty::Easy;
        let mut hard = question("2", Category::Dsa, Status::NotStarted);
        hard.difficulty = Difficulty::Hard;
        let catalog = vec![easy, hard, question("3", Category::Java, Status::NotStarted)];

        let hits = filter_questions(&catalog, "", Some(Category::Dsa), Some(Difficulty::Hard));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, QuestionId::new("2"));

        // Empty term means no text filtering at all.
        assert_eq!(filter_questions(&catalog, "", None, None).len(), 3);
    }

    #[test]
    fn streak_is_zero_without_an_entry_for_today() {
        let today = day(2024, 3, 10);
        let entries = vec![entry(day(2024, 3, 9), 2), entry(day(2024, 3, 8), 1)];
        assert_eq!(current_streak(&entries, today), 0);
    }

    #[test]
    fn streak_is_zero_on_empty_series() {
        assert_eq!(current_streak(&[], day(2024, 3, 10)), 0);
    }

    #[test]
    fn streak_stops_at_first_zero_completion_day() {
        let today = day(2024, 3, 10);
        let entries = vec![
            entry(day(2024, 3, 7), 4),
            entry(day(2024, 3, 8), 0),
            entry(day(2024, 3, 9), 1),
            entry(today, 2),
        ];
        assert_eq!(current_streak(&entries, today), 2);
    }

    #[test]
    fn streak_counts_every_qualifying_leading_day() {
        let today = day(2024, 3, 10);
        let entries = vec![
            entry(today, 1),
            entry(day(2024, 3, 9), 3),
            entry(day(2024, 3, 8), 2),
            entry(day(2024, 3, 7), 0),
        ];
        assert_eq!(current_streak(&entries, today), 3);
    }

    #[test]
    fn streak_is_zero_when_today_has_no_completions() {
        let today = day(2024, 3, 10);
        let entries = vec![entry(today, 0), entry(day(2024, 3, 9), 5)];
        assert_eq!(current_streak(&entries, today), 0);
    }

    #[test]
    fn total_time_sums_minutes() {
        let entries = vec![entry(day(2024, 3, 9), 1), entry(day(2024, 3, 10), 2)];
        assert_eq!(total_time_spent(&entries), 60);
        assert_eq!(total_time_spent(&[]), 0);
    }

    #[test]
    fn week_start_is_the_containing_sunday() {
        // 2024-03-06 is a Wednesday; its week starts Sunday 2024-03-03.
        assert_eq!(week_start(day(2024, 3, 6)), day(2024, 3, 3));
        // A Sunday is its own week start.
        assert_eq!(week_start(day(2024, 3, 3)), day(2024, 3, 3));
    }

    #[test]
    fn weekly_rollup_buckets_by_sunday_and_sorts_ascending() {
        let entries = vec![
            entry(day(2024, 3, 11), 2), // week of Sun 2024-03-10
            entry(day(2024, 3, 4), 1),  // week of Sun 2024-03-03
            entry(day(2024, 3, 6), 3),  // week of Sun 2024-03-03
        ];
        let buckets = weekly_rollup(&entries);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].week_start, day(2024, 3, 3));
        assert_eq!(buckets[0].completed, 4);
        assert_eq!(buckets[1].week_start, day(2024, 3, 10));
        assert_eq!(buckets[1].completed, 2);
    }

    #[test]
    fn intensity_caps_at_four() {
        assert_eq!(activity_intensity(0), 0);
        assert_eq!(activity_intensity(1), 1);
        assert_eq!(activity_intensity(2), 2);
        assert_eq!(activity_intensity(3), 3);
        assert_eq!(activity_intensity(4), 4);
        assert_eq!(activity_intensity(17), 4);
    }

    #[test]
    fn streak_message_tiers() {
        assert_eq!(streak_message(0), "Start your streak today!");
        assert_eq!(streak_message(6), "Great start! Keep it up!");
        assert_eq!(streak_message(29), "Impressive consistency!");
        assert_eq!(streak_message(30), "Outstanding dedication!");
    }

    #[test]
    fn bar_height_scales_against_the_tallest_week() {
        let buckets = vec![
            WeeklyBucket {
                week_start: day(2024, 3, 3),
                completed: 4,
            },
            WeeklyBucket {
                week_start: day(2024, 3, 10),
                completed: 2,
            },
        ];
        assert_eq!(weekly_bar_height(4, &buckets), 100);
        assert_eq!(weekly_bar_height(2, &buckets), 50);
        assert_eq!(weekly_bar_height(0, &[]), 0);
    }
}
