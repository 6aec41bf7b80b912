use anyhow::{Context, Result};
use std::sync::Arc;

use taskthread::api::{CommentView, TaskView};
use taskthread::auth::Caller;
use taskthread::config::Config;
use taskthread::service::TrackerService;
use taskthread::storage::LocalStorage;
use taskthread::{constants, logger};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    logger::init(&config.logging)?;

    let storage = Arc::new(
        LocalStorage::new(&config.storage)
            .await
            .context("Failed to open task store")?,
    );
    let service = TrackerService::with_config(storage, &config);

    // Read-only dump; the identity only has to be present
    let caller = Caller::user(constants::APP_NAME);
    let tasks = service.list_tasks(&caller).await?;

    if std::env::args().skip(1).any(|arg| arg == "--json") {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks in {}", config.storage.database_url);
        return Ok(());
    }

    for task in &tasks {
        print_task(task);
    }

    Ok(())
}

fn print_task(task: &TaskView) {
    let mark = if task.is_completed { "x" } else { " " };
    println!("[{}] #{} {} ({})", mark, task.id, task.title, task.owner_id);
    if !task.description.is_empty() {
        println!("    {}", task.description);
    }

    // Explicit stack keeps deep threads off the call stack
    let mut stack: Vec<(&CommentView, usize)> = task.comments.iter().rev().map(|c| (c, 1)).collect();
    while let Some((comment, depth)) = stack.pop() {
        let edited = if comment.is_edited { " (edited)" } else { "" };
        println!(
            "{}- #{} {}: {}{}",
            "  ".repeat(depth * 2),
            comment.id,
            comment.owner_id,
            comment.body,
            edited
        );
        stack.extend(comment.replies.iter().rev().map(|reply| (reply, depth + 1)));
    }
}
