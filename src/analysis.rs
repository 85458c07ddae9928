//! Weakness analysis over the answer records: per-skill accuracy, ranked
//! blind spots, and a short coaching report.

use serde::Serialize;

use crate::models::{AnswerRecord, BlindSpotCount, Skill, SkillStat, Subject};
use crate::progress::percentage;

/// Score shown for a skill with no answered questions.
pub const UNEXERCISED_SKILL_SCORE: u32 = 20;
pub const FULL_MARK: u32 = 100;

pub const NO_DATA_MESSAGE: &str = "No data recorded yet. Go take some quizzes!";
pub const BALANCED_MESSAGE: &str = "Your stats look balanced, or you haven't made many mistakes! \
     Try the 'Desert' biome for a harder challenge!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub skills: Vec<SkillStat>,
    pub blind_spots: Vec<BlindSpotCount>,
    pub summary: String,
}

impl Analysis {
    pub fn from_records(records: &[AnswerRecord]) -> Self {
        let blind_spots = blind_spot_ranking(records);
        let summary = report_summary(records, &blind_spots);
        Self {
            skills: skill_profile(records),
            blind_spots,
            summary,
        }
    }

    pub fn primary_weakness(&self) -> Option<&BlindSpotCount> {
        self.blind_spots.first()
    }
}

pub fn skill_profile(records: &[AnswerRecord]) -> Vec<SkillStat> {
    Skill::ALL
        .iter()
        .map(|&skill| {
            let (correct, total) = records
                .iter()
                .filter(|r| r.skill == skill)
                .fold((0u32, 0u32), |(c, t), r| (c + u32::from(r.is_correct), t + 1));
            let score = if total == 0 {
                UNEXERCISED_SKILL_SCORE
            } else {
                percentage(correct, total)
            };
            SkillStat {
                skill,
                score,
                full_mark: FULL_MARK,
            }
        })
        .collect()
}

/// Incorrect records grouped by blind spot, most frequent first.
/// Equal counts keep the order in which the blind spot was first seen.
pub fn blind_spot_ranking(records: &[AnswerRecord]) -> Vec<BlindSpotCount> {
    let mut ranking: Vec<BlindSpotCount> = Vec::new();
    for r in records.iter().filter(|r| !r.is_correct) {
        match ranking.iter_mut().find(|b| b.name == r.blind_spot) {
            Some(entry) => entry.count += 1,
            None => ranking.push(BlindSpotCount {
                name: r.blind_spot.clone(),
                count: 1,
            }),
        }
    }
    // sort_by is stable
    ranking.sort_by(|a, b| b.count.cmp(&a.count));
    ranking
}

pub fn report_summary(records: &[AnswerRecord], ranking: &[BlindSpotCount]) -> String {
    if records.is_empty() {
        return NO_DATA_MESSAGE.to_string();
    }
    let Some(primary) = ranking.first() else {
        return BALANCED_MESSAGE.to_string();
    };

    let (subject, errors) = worst_subject(records, &primary.name);
    let subject = subject
        .map(|s| s.as_str().to_uppercase())
        .unwrap_or_else(|| "NONE".to_string());

    match primary.name.as_str() {
        "Calculation Error" => format!(
            "Your biggest threat is careless calculation ({} times), mostly on {} questions. \
             Add a strict checking step after every solution so the points stay yours.",
            errors, subject
        ),
        "Concept Error" => format!(
            "Mixed-up concepts cost you the most points ({} times). Review the {} topics: \
             this is a gap in what you have stored, so go back to your notes.",
            errors, subject
        ),
        "Misreading" => format!(
            "{} of your mistakes came from misreading the question. Your knowledge is enough, \
             so slow down, underline the key words, and don't let time pressure rush you.",
            errors
        ),
        "Careless" => format!(
            "{} of your mistakes were pure slips. Your foundation is solid but points are \
             leaking away; add five minutes of checking at the end of every quiz.",
            errors
        ),
        other => format!(
            "Your main blind spot is {}. Practice more questions of this type to firm up \
             the basics.",
            other
        ),
    }
}

// Subject with the most incorrect answers tagged `blind_spot`. On a tie the
// subject seen later wins.
fn worst_subject(records: &[AnswerRecord], blind_spot: &str) -> (Option<Subject>, u32) {
    let mut counts: Vec<(Subject, u32)> = Vec::new();
    for r in records
        .iter()
        .filter(|r| !r.is_correct && r.blind_spot == blind_spot)
    {
        match counts.iter_mut().find(|(s, _)| *s == r.subject) {
            Some((_, n)) => *n += 1,
            None => counts.push((r.subject, 1)),
        }
    }

    counts
        .into_iter()
        .fold((None, 0), |(best, best_n), (subject, n)| {
            if best.is_none() || n >= best_n {
                (Some(subject), n)
            } else {
                (best, best_n)
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Biome;
    use chrono::Utc;

    fn record(subject: Subject, skill: Skill, blind_spot: &str, is_correct: bool) -> AnswerRecord {
        AnswerRecord {
            question_id: format!("{}-{}", subject.as_str(), blind_spot),
            subject,
            biome: Biome::Forest,
            skill,
            blind_spot: blind_spot.to_string(),
            is_correct,
            timestamp: Utc::now(),
        }
    }

    fn wrong(subject: Subject, blind_spot: &str) -> AnswerRecord {
        record(subject, Skill::Logic, blind_spot, false)
    }

    mod skill_profile_tests {
        use super::*;

        #[test]
        fn no_records_gives_floor_for_every_skill() {
            let profile = skill_profile(&[]);
            assert_eq!(profile.len(), 4);
            for stat in &profile {
                assert_eq!(stat.score, 20);
                assert_eq!(stat.full_mark, 100);
            }
        }

        #[test]
        fn keeps_radar_order() {
            let skills: Vec<Skill> = skill_profile(&[]).into_iter().map(|s| s.skill).collect();
            assert_eq!(skills, Skill::ALL.to_vec());
        }

        #[test]
        fn accuracy_rounds_like_completion() {
            let mut records = vec![record(Subject::Math, Skill::Logic, "Careless", true)];
            for _ in 0..7 {
                records.push(record(Subject::Math, Skill::Logic, "Careless", false));
            }
            let logic = &skill_profile(&records)[2];
            assert_eq!(logic.skill, Skill::Logic);
            assert_eq!(logic.score, percentage(1, 8));
            assert_eq!(logic.score, 13);
        }

        #[test]
        fn accuracy_per_skill() {
            let records = vec![
                record(Subject::Math, Skill::Calculation, "Careless", true),
                record(Subject::Math, Skill::Calculation, "Careless", false),
                record(Subject::Math, Skill::Calculation, "Careless", true),
                record(Subject::Bio, Skill::Knowledge, "Concept Error", false),
            ];
            let profile = skill_profile(&records);
            assert_eq!(profile[0].skill, Skill::Knowledge);
            assert_eq!(profile[0].score, 0);
            assert_eq!(profile[1].skill, Skill::Calculation);
            assert_eq!(profile[1].score, 67);
            assert_eq!(profile[2].score, 20);
            assert_eq!(profile[3].score, 20);
        }

        #[test]
        fn all_wrong_is_zero_not_floor() {
            let records = vec![record(Subject::Math, Skill::Logic, "Careless", false)];
            assert_eq!(skill_profile(&records)[2].score, 0);
        }
    }

    mod ranking_tests {
        use super::*;

        #[test]
        fn empty_records_empty_ranking() {
            assert!(blind_spot_ranking(&[]).is_empty());
        }

        #[test]
        fn counts_and_sorts_descending() {
            let records = vec![
                wrong(Subject::Math, "Careless"),
                wrong(Subject::Bio, "Concept Error"),
                wrong(Subject::Math, "Careless"),
            ];
            let ranking = blind_spot_ranking(&records);
            assert_eq!(
                ranking,
                vec![
                    BlindSpotCount {
                        name: "Careless".to_string(),
                        count: 2
                    },
                    BlindSpotCount {
                        name: "Concept Error".to_string(),
                        count: 1
                    },
                ]
            );
        }

        #[test]
        fn ignores_correct_records() {
            let records = vec![
                record(Subject::Math, Skill::Logic, "Careless", true),
                record(Subject::Math, Skill::Logic, "Careless", true),
                wrong(Subject::Bio, "Misreading"),
            ];
            let ranking = blind_spot_ranking(&records);
            assert_eq!(ranking.len(), 1);
            assert_eq!(ranking[0].name, "Misreading");
        }

        #[test]
        fn ties_keep_first_seen_order() {
            let records = vec![
                wrong(Subject::Math, "Misreading"),
                wrong(Subject::Math, "Careless"),
                wrong(Subject::Bio, "Careless"),
                wrong(Subject::Bio, "Misreading"),
                wrong(Subject::Bio, "Complex Logic"),
            ];
            let names: Vec<String> = blind_spot_ranking(&records)
                .into_iter()
                .map(|b| b.name)
                .collect();
            assert_eq!(names, vec!["Misreading", "Careless", "Complex Logic"]);
        }

        #[test]
        fn non_increasing_and_head_is_mode() {
            let labels = [
                "Careless",
                "Misreading",
                "Misreading",
                "Concept Error",
                "Misreading",
                "Careless",
            ];
            let records: Vec<AnswerRecord> =
                labels.iter().map(|l| wrong(Subject::Math, l)).collect();
            let ranking = blind_spot_ranking(&records);
            assert!(ranking.windows(2).all(|w| w[0].count >= w[1].count));
            assert_eq!(ranking[0].name, "Misreading");
            assert_eq!(ranking[0].count, 3);
        }
    }

    mod summary_tests {
        use super::*;

        fn summarize(records: &[AnswerRecord]) -> String {
            report_summary(records, &blind_spot_ranking(records))
        }

        #[test]
        fn no_records_no_data_message() {
            assert_eq!(summarize(&[]), NO_DATA_MESSAGE);
        }

        #[test]
        fn all_correct_balanced_message() {
            let records = vec![record(Subject::Math, Skill::Logic, "Careless", true)];
            assert_eq!(summarize(&records), BALANCED_MESSAGE);
        }

        #[test]
        fn concept_error_names_subject_and_count() {
            let records = vec![
                wrong(Subject::Bio, "Concept Error"),
                wrong(Subject::Bio, "Concept Error"),
                wrong(Subject::Math, "Concept Error"),
            ];
            let summary = summarize(&records);
            assert!(summary.contains("(2 times)"), "{}", summary);
            assert!(summary.contains("BIO"), "{}", summary);
        }

        #[test]
        fn calculation_error_template() {
            let records = vec![wrong(Subject::Math, "Calculation Error")];
            let summary = summarize(&records);
            assert!(summary.contains("careless calculation (1 times)"));
            assert!(summary.contains("MATH"));
        }

        #[test]
        fn misreading_template() {
            let records = vec![
                wrong(Subject::Bio, "Misreading"),
                wrong(Subject::Bio, "Misreading"),
            ];
            assert!(summarize(&records).starts_with("2 of your mistakes came from misreading"));
        }

        #[test]
        fn careless_template() {
            let records = vec![wrong(Subject::Math, "Careless")];
            assert!(summarize(&records).starts_with("1 of your mistakes were pure slips"));
        }

        #[test]
        fn unknown_blind_spot_uses_generic_template() {
            let records = vec![wrong(Subject::Math, "Complex Logic")];
            let summary = summarize(&records);
            assert!(summary.contains("Your main blind spot is Complex Logic"));
        }

        #[test]
        fn subject_tie_goes_to_later_subject() {
            let records = vec![
                wrong(Subject::Math, "Concept Error"),
                wrong(Subject::Bio, "Concept Error"),
            ];
            assert_eq!(
                worst_subject(&records, "Concept Error"),
                (Some(Subject::Bio), 1)
            );
        }

        #[test]
        fn worst_subject_only_counts_matching_blind_spot() {
            let records = vec![
                wrong(Subject::Math, "Careless"),
                wrong(Subject::Math, "Careless"),
                wrong(Subject::Bio, "Concept Error"),
            ];
            assert_eq!(
                worst_subject(&records, "Concept Error"),
                (Some(Subject::Bio), 1)
            );
            assert_eq!(worst_subject(&records, "Misreading"), (None, 0));
        }
    }

    #[test]
    fn analysis_bundles_all_views() {
        let records = vec![
            wrong(Subject::Math, "Careless"),
            wrong(Subject::Bio, "Concept Error"),
            wrong(Subject::Math, "Careless"),
        ];
        let analysis = Analysis::from_records(&records);
        assert_eq!(analysis.skills.len(), 4);
        assert_eq!(analysis.primary_weakness().unwrap().name, "Careless");
        assert!(analysis.summary.starts_with("2 of your mistakes were pure slips"));
    }

    #[test]
    fn analysis_of_nothing() {
        let analysis = Analysis::from_records(&[]);
        assert!(analysis.blind_spots.is_empty());
        assert!(analysis.primary_weakness().is_none());
        assert_eq!(analysis.summary, NO_DATA_MESSAGE);
    }
}
