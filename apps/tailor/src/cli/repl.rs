//! Interactive wizard. One command per line; each step runs to completion
//! before the next line is read.

use std::io::Write as _;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use crate::api_client::JobDescription;
use crate::errors::TailorError;
use crate::models::{HighlightRef, MinScore};
use crate::render::{self, Emphasis};
use crate::workflow::download::DEFAULT_FILE_NAME;
use crate::workflow::{Action, Router, WizardState};

use super::{read_resume, save_document, step};

const HELP: &str = "\
Commands:
  extract <file>           extract skills from a job description file
  extract-text <text>      extract skills from pasted text
  match <resume.json>      score the resume against the extracted skills
  min-score <1-10>         set the transform threshold
  transform                rewrite bullets at or above the min score
  toggle <ref>             keep/drop a transformed bullet (e.g. exp:0:1)
  alt <ref>                replace a transformed bullet with an alternative
  show [skills|scores|transformed]
  status                   current stage and available steps
  download [path]          write the tailored resume
  help | quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Skills,
    Scores,
    Transformed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Extract(PathBuf),
    ExtractText(String),
    Match(PathBuf),
    MinScore(MinScore),
    Transform,
    Toggle(HighlightRef),
    Alternative(HighlightRef),
    Show(Option<View>),
    Status,
    Download(Option<PathBuf>),
    Help,
    Quit,
}

impl ReplCommand {
    /// Parses one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, TailorError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let needs = |what: &str| TailorError::Validation(format!("{verb} needs {what}"));

        let command = match verb {
            "extract" if !rest.is_empty() => ReplCommand::Extract(PathBuf::from(rest)),
            "extract" => return Err(needs("a job description file")),
            "extract-text" if !rest.is_empty() => ReplCommand::ExtractText(rest.to_string()),
            "extract-text" => return Err(needs("some text")),
            "match" if !rest.is_empty() => ReplCommand::Match(PathBuf::from(rest)),
            "match" => return Err(needs("a resume JSON file")),
            "min-score" => {
                let value = rest
                    .parse::<u8>()
                    .map_err(|_| needs("a number between 1 and 10"))?;
                ReplCommand::MinScore(MinScore::new(value)?)
            }
            "transform" => ReplCommand::Transform,
            "toggle" => ReplCommand::Toggle(HighlightRef::from_str(rest)?),
            "alt" | "alternative" => ReplCommand::Alternative(HighlightRef::from_str(rest)?),
            "show" => ReplCommand::Show(match rest {
                "" => None,
                "skills" => Some(View::Skills),
                "scores" => Some(View::Scores),
                "transformed" => Some(View::Transformed),
                other => {
                    return Err(TailorError::Validation(format!("Unknown view '{other}'")))
                }
            }),
            "status" => ReplCommand::Status,
            "download" => ReplCommand::Download((!rest.is_empty()).then(|| PathBuf::from(rest))),
            "help" | "?" => ReplCommand::Help,
            "quit" | "exit" => ReplCommand::Quit,
            other => {
                return Err(TailorError::Validation(format!(
                    "Unknown command '{other}' (try 'help')"
                )))
            }
        };
        Ok(Some(command))
    }
}

pub async fn run_wizard(router: &Router, min_score: MinScore, emphasis: Emphasis) -> Result<()> {
    let mut state = WizardState::new(min_score);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    prompt(&state)?;

    while let Some(line) = lines.next_line().await? {
        match ReplCommand::parse(&line) {
            Ok(None) => {}
            Ok(Some(ReplCommand::Quit)) => break,
            Ok(Some(command)) => {
                if let Err(e) = handle(router, &mut state, command, emphasis).await {
                    warn!("{e:#}");
                    eprintln!("{e:#}");
                }
            }
            Err(e) => eprintln!("{e}"),
        }
        prompt(&state)?;
    }
    Ok(())
}

/// Runs one command. `state` is replaced only when the command succeeds.
async fn handle(
    router: &Router,
    state: &mut WizardState,
    command: ReplCommand,
    emphasis: Emphasis,
) -> Result<()> {
    match command {
        ReplCommand::Extract(path) => {
            let job = JobDescription::from_inputs(None, Some(&path)).await?;
            *state = step(router, state, Action::Extract(job)).await?.state;
            show(state, Some(View::Skills), emphasis);
        }
        ReplCommand::ExtractText(text) => {
            let job = JobDescription::from_inputs(Some(&text), None).await?;
            *state = step(router, state, Action::Extract(job)).await?.state;
            show(state, Some(View::Skills), emphasis);
        }
        ReplCommand::Match(path) => {
            let resume = read_resume(&path).await?;
            *state = step(router, state, Action::Match(resume)).await?.state;
            show(state, Some(View::Scores), emphasis);
        }
        ReplCommand::MinScore(min_score) => {
            *state = state.clone().with_min_score(min_score);
            println!("Min score set to {min_score}");
        }
        ReplCommand::Transform => {
            *state = step(router, state, Action::Transform).await?.state;
            show(state, Some(View::Transformed), emphasis);
        }
        ReplCommand::Toggle(at) => {
            let keep = !state.is_kept(at);
            *state = state.clone().with_toggle(at, keep)?;
            println!("{at} {}", if keep { "kept" } else { "dropped" });
        }
        ReplCommand::Alternative(at) => {
            *state = step(router, state, Action::Alternative(at)).await?.state;
            show(state, Some(View::Transformed), emphasis);
        }
        ReplCommand::Show(view) => show(state, view, emphasis),
        ReplCommand::Status => print!("{}", render::status(state)),
        ReplCommand::Download(path) => {
            let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME));
            let dispatch = step(router, state, Action::Download).await?;
            save_document(&dispatch, &path).await?;
            *state = dispatch.state;
            println!("Tailored resume written to {}", path.display());
        }
        ReplCommand::Help => println!("{HELP}"),
        ReplCommand::Quit => {}
    }
    Ok(())
}

/// Re-navigation: prints a completed step's view. Without a view, shows the latest one.
fn show(state: &WizardState, view: Option<View>, emphasis: Emphasis) {
    let view = view.unwrap_or(if state.transformed_resume().is_some() {
        View::Transformed
    } else if state.scored_resume().is_some() {
        View::Scores
    } else {
        View::Skills
    });

    let rendered = match view {
        View::Skills => state.extracted_skills().map(render::skills),
        View::Scores => state
            .scored_resume()
            .map(|scored| render::scores(scored, state.min_score())),
        View::Transformed => state
            .transformed_resume()
            .map(|t| render::transformed(t, |at| state.is_kept(at), emphasis)),
    };

    match rendered {
        Some(text) => print!("{text}"),
        None => println!("Nothing to show yet: {}", render::status(state).trim_end()),
    }
}

fn prompt(state: &WizardState) -> Result<()> {
    print!("tailor [{}]> ", state.stage());
    std::io::stdout().flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_are_ignored() {
        assert_eq!(ReplCommand::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_commands_with_arguments() {
        assert_eq!(
            ReplCommand::parse("extract  jd.txt ").unwrap(),
            Some(ReplCommand::Extract(PathBuf::from("jd.txt")))
        );
        assert_eq!(
            ReplCommand::parse("extract-text Senior Rust Engineer, remote").unwrap(),
            Some(ReplCommand::ExtractText(
                "Senior Rust Engineer, remote".to_string()
            ))
        );
        assert_eq!(
            ReplCommand::parse("toggle exp:1:0").unwrap(),
            Some(ReplCommand::Toggle(HighlightRef::experience(1, 0)))
        );
        assert_eq!(
            ReplCommand::parse("alt proj:0:2").unwrap(),
            Some(ReplCommand::Alternative(HighlightRef::project(0, 2)))
        );
        assert_eq!(
            ReplCommand::parse("min-score 8").unwrap(),
            Some(ReplCommand::MinScore(MinScore::new(8).unwrap()))
        );
        assert_eq!(
            ReplCommand::parse("show scores").unwrap(),
            Some(ReplCommand::Show(Some(View::Scores)))
        );
        assert_eq!(
            ReplCommand::parse("download").unwrap(),
            Some(ReplCommand::Download(None))
        );
    }

    #[test]
    fn test_invalid_input_is_a_validation_error() {
        for line in [
            "extract",
            "match",
            "min-score 11",
            "min-score high",
            "toggle exp",
            "show everything",
            "frobnicate",
        ] {
            assert!(
                matches!(ReplCommand::parse(line), Err(TailorError::Validation(_))),
                "accepted {line:?}"
            );
        }
    }
}
