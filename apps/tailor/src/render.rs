//! Terminal views of each wizard step.

use std::fmt::Write;

use crate::models::{
    ExtractedSkills, HighlightRef, MinScore, ScoreBand, ScoredHighlight, ScoredResume, Skill,
    TransformedHighlight, TransformedResume,
};
use crate::workflow::emphasis::{emphasize, strip_markup};
use crate::workflow::WizardState;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// How emphasized skills are marked in transformed bullets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Ansi,
    Markdown,
}

pub fn skills(skills: &ExtractedSkills) -> String {
    let info = &skills.company_info;
    let or_na = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());

    let mut out = String::new();
    let _ = writeln!(out, "Company:  {}", or_na(&info.name));
    let _ = writeln!(out, "Position: {}", or_na(&info.position));
    let _ = writeln!(out, "Level:    {}", or_na(&info.level));
    let _ = writeln!(out, "Required skills: {}", names(&skills.required_skills));
    let _ = writeln!(
        out,
        "Nice-to-have skills: {}",
        names(&skills.nice_to_have_skills)
    );
    out
}

pub fn scores(scored: &ScoredResume, min_score: MinScore) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Professional Experience");
    for exp in &scored.professional_experience {
        let _ = writeln!(
            out,
            "  {} - {} {}",
            exp.company,
            exp.position,
            badge(exp.score)
        );
        let _ = writeln!(out, "    Matching skills: {}", exp.matching_skills.join(", "));
        for highlight in &exp.highlights {
            scored_line(&mut out, highlight, min_score);
        }
    }

    let _ = writeln!(out, "Projects");
    for proj in &scored.projects {
        let _ = writeln!(out, "  {} {}", proj.name, badge(proj.score));
        let _ = writeln!(out, "    Matching skills: {}", proj.matching_skills.join(", "));
        for highlight in &proj.highlights {
            scored_line(&mut out, highlight, min_score);
        }
    }

    if let Some(overall) = scored.overall_score {
        let _ = writeln!(out, "Overall score: {overall:.1}/10");
    }
    out
}

pub fn transformed(
    transformed: &TransformedResume,
    is_kept: impl Fn(HighlightRef) -> bool,
    emphasis: Emphasis,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Professional Experience");
    for (entry, exp) in transformed.professional_experience.iter().enumerate() {
        let _ = writeln!(out, "  {} - {}", exp.company, exp.position);
        for (index, highlight) in exp.highlights.iter().enumerate() {
            let at = HighlightRef::experience(entry, index);
            transformed_line(&mut out, at, highlight, is_kept(at), emphasis);
        }
    }

    let _ = writeln!(out, "Projects");
    for (entry, proj) in transformed.projects.iter().enumerate() {
        let _ = writeln!(out, "  {}", proj.name);
        for (index, highlight) in proj.highlights.iter().enumerate() {
            let at = HighlightRef::project(entry, index);
            transformed_line(&mut out, at, highlight, is_kept(at), emphasis);
        }
    }
    out
}

pub fn status(state: &WizardState) -> String {
    let enabled: Vec<String> = state
        .enabled_steps()
        .iter()
        .map(ToString::to_string)
        .collect();
    let mut out = format!(
        "Stage: {} | min score: {} | available: {}",
        state.stage(),
        state.min_score(),
        enabled.join(", ")
    );
    if let Some(transformed) = state.transformed_resume() {
        let refs = transformed.refs();
        let kept = refs.iter().filter(|at| state.is_kept(**at)).count();
        let _ = write!(out, " | keeping {kept}/{} bullets", refs.len());
    }
    out.push('\n');
    out
}

/// Bullet text with each emphasized skill marked.
pub fn emphasized(text: &str, skills: &[String], emphasis: Emphasis) -> String {
    let (open, close) = match emphasis {
        Emphasis::Ansi => (BOLD, RESET),
        Emphasis::Markdown => ("**", "**"),
    };

    emphasize(text, skills)
        .into_iter()
        .map(|span| {
            if span.emphasized {
                format!("{open}{}{close}", span.text)
            } else {
                span.text.to_string()
            }
        })
        .collect()
}

fn names(skills: &[Skill]) -> String {
    if skills.is_empty() {
        return "-".to_string();
    }
    skills
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn badge(score: f64) -> String {
    let band = match ScoreBand::of(score) {
        ScoreBand::High => "high",
        ScoreBand::Medium => "medium",
        ScoreBand::Low => "low",
    };
    format!("[{score} {band}]")
}

fn scored_line(out: &mut String, highlight: &ScoredHighlight, min_score: MinScore) {
    let marker = if min_score.admits(highlight.score) {
        '*'
    } else {
        ' '
    };
    let _ = writeln!(
        out,
        "   {marker} {} {}",
        badge(highlight.score),
        highlight.text
    );
}

fn transformed_line(
    out: &mut String,
    at: HighlightRef,
    highlight: &TransformedHighlight,
    kept: bool,
    emphasis: Emphasis,
) {
    let check = if kept { "[x]" } else { "[ ]" };
    let _ = writeln!(out, "    {check} {at}");
    let _ = writeln!(out, "        original:    {}", highlight.original);
    let _ = writeln!(
        out,
        "        transformed: {}",
        emphasized(
            &strip_markup(&highlight.transformed),
            &highlight.emphasized_skills,
            emphasis
        )
    );
}
