//! In-process stand-in for the tailoring service, plus shared fixtures.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::api_client::{ApiError, JobDescription, TailorApi};
use crate::models::{
    CompanyInfo, ExtractedSkills, MinScore, ScoredExperience, ScoredHighlight, ScoredProject,
    ScoredResume, Skill, TransformedExperience, TransformedHighlight, TransformedProject,
    TransformedResume,
};

pub fn skill(name: &str) -> Skill {
    Skill {
        name: name.to_string(),
        importance: None,
        context: None,
    }
}

pub fn skills_fixture() -> ExtractedSkills {
    ExtractedSkills {
        required_skills: vec![skill("Rust"), skill("PostgreSQL")],
        nice_to_have_skills: vec![skill("Kafka")],
        company_info: CompanyInfo {
            name: Some("Acme".to_string()),
            position: Some("Backend Engineer".to_string()),
            level: Some("Senior".to_string()),
        },
    }
}

/// RenderCV-style resume matching `scored_fixture`.
pub fn resume_fixture() -> Value {
    json!({
        "CV": {
            "name": "Jane Doe",
            "sections": {
                "ProfessionalExperience": [
                    {"company": "Acme", "position": "Engineer", "highlights": ["five", "seven", "nine"]},
                    {"company": "Initech", "position": "Intern", "highlights": ["Mentored interns"]}
                ],
                "Projects": [
                    {"name": "tailor", "highlights": ["cli"]}
                ]
            }
        }
    })
}

fn highlight(text: &str, score: f64) -> ScoredHighlight {
    ScoredHighlight {
        text: text.to_string(),
        score,
        matching_skills: vec!["Rust".to_string()],
    }
}

/// Acme bullets score {5, 7, 9}; the single project bullet scores 8.
pub fn scored_fixture() -> ScoredResume {
    ScoredResume {
        professional_experience: vec![ScoredExperience {
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            score: 7.0,
            matching_skills: vec!["Rust".to_string()],
            highlights: vec![
                highlight("five", 5.0),
                highlight("seven", 7.0),
                highlight("nine", 9.0),
            ],
        }],
        projects: vec![ScoredProject {
            name: "tailor".to_string(),
            score: 8.0,
            matching_skills: vec!["Rust".to_string()],
            highlights: vec![highlight("cli", 8.0)],
        }],
        overall_score: None,
    }
}

/// What `FakeApi` returns when given `scored_fixture()` at the default min score.
pub fn transformed_fixture() -> TransformedResume {
    fake_transform(&scored_fixture().retain_eligible(MinScore::default()))
}

fn fake_transform(scored: &ScoredResume) -> TransformedResume {
    let rewrite = |highlights: &[ScoredHighlight]| -> Vec<TransformedHighlight> {
        highlights
            .iter()
            .map(|h| TransformedHighlight {
                original: h.text.clone(),
                transformed: format!("Led <strong>Rust</strong> work on {}", h.text),
                emphasized_skills: h.matching_skills.clone(),
            })
            .collect()
    };

    TransformedResume {
        professional_experience: scored
            .professional_experience
            .iter()
            .map(|e| TransformedExperience {
                company: e.company.clone(),
                position: e.position.clone(),
                highlights: rewrite(&e.highlights),
            })
            .collect(),
        projects: scored
            .projects
            .iter()
            .map(|p| TransformedProject {
                name: p.name.clone(),
                highlights: rewrite(&p.highlights),
            })
            .collect(),
    }
}

/// Records every call and answers from the fixtures above.
/// An endpoint named by `fail_on` answers with a 500 instead.
#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<&'static str>>,
    failing: Mutex<Option<&'static str>>,
    last_transform: Mutex<Option<ScoredResume>>,
    last_alternative: Mutex<Option<(String, Vec<String>)>>,
}

impl FakeApi {
    pub fn failing(endpoint: &'static str) -> Self {
        let api = Self::default();
        api.fail_on(endpoint);
        api
    }

    pub fn fail_on(&self, endpoint: &'static str) {
        *self.failing.lock().unwrap() = Some(endpoint);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_transform_request(&self) -> Option<ScoredResume> {
        self.last_transform.lock().unwrap().clone()
    }

    pub fn last_alternative_request(&self) -> Option<(String, Vec<String>)> {
        self.last_alternative.lock().unwrap().clone()
    }

    fn record(&self, endpoint: &'static str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(endpoint);
        if *self.failing.lock().unwrap() == Some(endpoint) {
            return Err(ApiError::Status {
                status: 500,
                message: format!("{endpoint} exploded"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl TailorApi for FakeApi {
    async fn extract(&self, _job: &JobDescription) -> Result<ExtractedSkills, ApiError> {
        self.record("extract")?;
        Ok(skills_fixture())
    }

    async fn match_resume(
        &self,
        _skills: &ExtractedSkills,
        _resume: &Value,
    ) -> Result<ScoredResume, ApiError> {
        self.record("match")?;
        Ok(scored_fixture())
    }

    async fn transform(
        &self,
        scored: &ScoredResume,
        _skills: &ExtractedSkills,
        _min_score: MinScore,
    ) -> Result<TransformedResume, ApiError> {
        self.record("transform")?;
        *self.last_transform.lock().unwrap() = Some(scored.clone());
        Ok(fake_transform(scored))
    }

    async fn alternative(
        &self,
        bullet_point: &str,
        matching_skills: &[String],
    ) -> Result<String, ApiError> {
        self.record("alternative")?;
        *self.last_alternative.lock().unwrap() =
            Some((bullet_point.to_string(), matching_skills.to_vec()));
        Ok(format!("Alternative for {bullet_point}"))
    }
}
