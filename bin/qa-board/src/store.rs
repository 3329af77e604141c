//! Board file persistence. The board file is a board export.

use std::path::Path;

use anyhow::{Context, Result};
use qb_board::Board;
use qb_core::Question;

/// Opens the board at `path`. A missing file gives a fresh board, seeded when `seed` is set.
pub async fn load_board(path: &Path, seed: bool) -> Result<Board> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), seed, "no board file, starting fresh");
            let board = Board::default();
            return Ok(if seed {
                board.with_questions(qb_board::sample_questions())
            } else {
                board
            });
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
    };

    let questions: Vec<Question> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a board file", path.display()))?;
    tracing::debug!(path = %path.display(), count = questions.len(), "board loaded");
    Ok(Board::default().with_questions(questions))
}

pub async fn save_board(board: &Board, path: &Path) -> Result<()> {
    let json = board.export_all().context("Failed to serialize board")?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), count = board.len(), "board saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_seeded_on_request() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.json");

        assert_eq!(load_board(&path, true).await.unwrap().len(), 3);
        assert!(load_board(&path, false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_keeps_ids_and_answers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.json");

        let board = load_board(&path, true).await.unwrap();
        save_board(&board, &path).await.unwrap();
        let reloaded = load_board(&path, false).await.unwrap();
        assert_eq!(reloaded.questions(), board.questions());
    }

    #[tokio::test]
    async fn test_garbage_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.json");
        tokio::fs::write(&path, "not json").await.unwrap();
        assert!(load_board(&path, true).await.is_err());
    }
}
