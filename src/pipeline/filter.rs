use crate::models::candidate::Candidate;
use crate::models::job::JobPosting;
use crate::pipeline::status::CandidateStatus;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Age-range buckets offered by the talent-database view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeRange {
    #[serde(rename = "18-25")]
    From18To25,
    #[serde(rename = "26-35")]
    From26To35,
    #[serde(rename = "36-45")]
    From36To45,
    #[serde(rename = "46+")]
    From46,
}

impl AgeRange {
    pub fn contains(&self, age: i64) -> bool {
        match self {
            AgeRange::From18To25 => (18..=25).contains(&age),
            AgeRange::From26To35 => (26..=35).contains(&age),
            AgeRange::From36To45 => (36..=45).contains(&age),
            AgeRange::From46 => age >= 46,
        }
    }
}

/// Independent predicate filters of the talent-database view, combined with
/// logical AND. An empty value for any field matches all candidates.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TalentFilter {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub sex: String,
    #[serde(default)]
    pub education_level: String,
    #[serde(default)]
    pub status: Option<CandidateStatus>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub age_ranges: Vec<AgeRange>,
}

fn contains_fold(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl TalentFilter {
    pub fn matches(&self, candidate: &Candidate, jobs_by_id: &HashMap<i64, &JobPosting>) -> bool {
        if !self.name.trim().is_empty() && !contains_fold(&candidate.name, self.name.trim()) {
            return false;
        }

        if !self.job_title.trim().is_empty() {
            let any_job = candidate.job_ids.iter().any(|id| {
                jobs_by_id
                    .get(id)
                    .map(|job| contains_fold(&job.title, self.job_title.trim()))
                    .unwrap_or(false)
            });
            if !any_job {
                return false;
            }
        }

        if !self.sex.trim().is_empty() {
            match &candidate.sex {
                Some(sex) if sex.eq_ignore_ascii_case(self.sex.trim()) => {}
                _ => return false,
            }
        }

        if !self.education_level.trim().is_empty() {
            match &candidate.education_level {
                Some(level) if level.eq_ignore_ascii_case(self.education_level.trim()) => {}
                _ => return false,
            }
        }

        if let Some(status) = self.status {
            // A statusless candidate is in Screening for filter purposes too.
            if candidate.effective_status() != status {
                return false;
            }
        }

        if !self.city.trim().is_empty() {
            let needle = self.city.trim();
            let in_city = candidate
                .city
                .as_deref()
                .map(|c| contains_fold(c, needle))
                .unwrap_or(false);
            let in_neighborhood = candidate
                .neighborhood
                .as_deref()
                .map(|n| contains_fold(n, needle))
                .unwrap_or(false);
            if !in_city && !in_neighborhood {
                return false;
            }
        }

        if !self.age_ranges.is_empty() {
            match candidate.age {
                Some(age) if self.age_ranges.iter().any(|range| range.contains(age)) => {}
                _ => return false,
            }
        }

        true
    }

    pub fn apply<'a>(
        &self,
        candidates: &'a [Candidate],
        jobs: &[JobPosting],
    ) -> Vec<&'a Candidate> {
        let jobs_by_id: HashMap<i64, &JobPosting> = jobs.iter().map(|j| (j.id, j)).collect();
        candidates
            .iter()
            .filter(|c| self.matches(c, &jobs_by_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: i64, name: &str) -> Candidate {
        Candidate {
            id,
            name: name.to_string(),
            email: None,
            phone: None,
            score: None,
            status: None,
            job_ids: vec![],
            video_interview: None,
            last_contact: None,
            ai_summary: None,
            profile: Default::default(),
            behavioral_test_status: None,
            theoretical_test_status: None,
            sex: None,
            education_level: None,
            age: None,
            city: None,
            neighborhood: None,
            rejection_reason: None,
            interview_notes: None,
            created_at: None,
        }
    }

    fn job(id: i64, title: &str) -> JobPosting {
        JobPosting {
            id,
            title: title.to_string(),
            description: String::new(),
            address: None,
            required_skills: None,
            desired_skills: None,
            owner: None,
            created_at: None,
        }
    }

    #[test]
    fn empty_filter_matches_every_candidate() {
        let list = vec![candidate(1, "Ana"), candidate(2, "Bruno")];
        let filter = TalentFilter::default();
        assert_eq!(filter.apply(&list, &[]).len(), 2);
    }

    #[test]
    fn filters_combine_with_logical_and() {
        let mut ana = candidate(1, "Ana Souza");
        ana.city = Some("Recife".to_string());
        ana.age = Some(28);
        let mut bruno = candidate(2, "Bruno Lima");
        bruno.city = Some("Recife".to_string());
        bruno.age = Some(51);

        let filter = TalentFilter {
            city: "recife".to_string(),
            age_ranges: vec![AgeRange::From26To35],
            ..Default::default()
        };
        let candidates = [ana, bruno];
        let hits = filter.apply(&candidates, &[]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
    }

    #[test]
    fn city_filter_also_matches_neighborhood_substring() {
        let mut c = candidate(1, "Carla");
        c.neighborhood = Some("Boa Viagem".to_string());
        let filter = TalentFilter {
            city: "viagem".to_string(),
            ..Default::default()
        };
        assert_eq!(filter.apply(&[c], &[]).len(), 1);
    }

    #[test]
    fn job_title_filter_follows_job_links() {
        let mut c = candidate(1, "Davi");
        c.job_ids = vec![10];
        let jobs = vec![job(10, "Backend Engineer"), job(11, "Designer")];
        let matching = TalentFilter {
            job_title: "backend".to_string(),
            ..Default::default()
        };
        let missing = TalentFilter {
            job_title: "designer".to_string(),
            ..Default::default()
        };
        assert_eq!(matching.apply(std::slice::from_ref(&c), &jobs).len(), 1);
        assert_eq!(missing.apply(std::slice::from_ref(&c), &jobs).len(), 0);
    }

    #[test]
    fn status_filter_treats_missing_status_as_screening() {
        let c = candidate(1, "Eva");
        let filter = TalentFilter {
            status: Some(CandidateStatus::Screening),
            ..Default::default()
        };
        assert_eq!(filter.apply(&[c], &[]).len(), 1);
    }

    #[test]
    fn multi_select_age_ranges_match_any_selected_bucket() {
        let mut young = candidate(1, "F");
        young.age = Some(19);
        let mut senior = candidate(2, "G");
        senior.age = Some(60);
        let mut unknown = candidate(3, "H");
        unknown.age = None;

        let filter = TalentFilter {
            age_ranges: vec![AgeRange::From18To25, AgeRange::From46],
            ..Default::default()
        };
        let candidates = [young, senior, unknown];
        let hits = filter.apply(&candidates, &[]);
        let ids: Vec<_> = hits.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
