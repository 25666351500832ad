//! Show command implementation

use anyhow::{bail, Context, Result};
use examdesk_core::render::{excerpt, plain_text};
use examdesk_core::render_blocks;
use examdesk_core::storage::{LocalProblemStore, ProblemStore};
use examdesk_core::types::Problem;

/// List an exam's problems, or render one of them
pub async fn show(data_path: &str, exam: i64, problem: Option<i64>, format: &str) -> Result<()> {
    let store = LocalProblemStore::new(data_path);

    let Some(id) = problem else {
        let problems = store
            .list_problems(exam)
            .await
            .with_context(|| format!("Failed to list problems in {}", data_path))?;
        if problems.is_empty() {
            println!("No problems found for exam {}", exam);
        }
        for problem in &problems {
            println!("{:>3}. [{}] {}", problem.number, problem.id, excerpt(&problem.content, 60));
        }
        return Ok(());
    };

    let problem = store
        .get_problem(id)
        .await
        .with_context(|| format!("Failed to load problem {}", id))?;
    if problem.exam_id != exam {
        bail!("Problem {} does not belong to exam {}", id, exam);
    }
    println!("{}", render_problem(&problem, format)?);
    Ok(())
}

fn render_problem(problem: &Problem, format: &str) -> Result<String> {
    let answers: Vec<String> = problem
        .answers()
        .map(|c| c.number.to_string())
        .collect();

    match format {
        "text" => Ok(format!(
            "Problem {}\n{}\nAnswer: {}\nExplanation: {}",
            problem.number,
            plain_text(&problem.content),
            answers.join(", "),
            plain_text(&problem.explanation)
        )),
        "html" => Ok(format!(
            "<section>{}</section>\n<section>{}</section>",
            render_blocks(&problem.content),
            render_blocks(&problem.explanation)
        )),
        other => bail!("No writer available for {} output", other),
    }
}
