use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One finished quiz run, as posted by the game page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub id: String,
    pub player_name: String,
    pub score: u32,
    pub total_questions: u32,
    pub time_in_seconds: f64,
    pub completed_at: String,
}

/// Append-only JSON array on disk.
///
/// Read-modify-write with no locking; two concurrent writers race and
/// the first one loses. The game posts rarely enough that this matches
/// the original endpoint's behavior.
#[derive(Clone)]
pub struct ResultLog {
    path: PathBuf,
}

impl ResultLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub async fn read_all(&self) -> anyhow::Result<Vec<GameResult>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if !contents.trim().is_empty() => serde_json::from_str(&contents)
                .with_context(|| format!("parsing result log {}", self.path.display())),
            // Missing or empty file starts a fresh array.
            _ => Ok(Vec::new()),
        }
    }

    /// Appends one result and returns the new total.
    pub async fn append(&self, result: GameResult) -> anyhow::Result<usize> {
        let mut results = self.read_all().await?;
        results.push(result);

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating result log directory {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(&results)?;
        tokio::fs::write(&self.path, serialized)
            .await
            .with_context(|| format!("writing result log {}", self.path.display()))?;
        Ok(results.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn result(id: &str, score: u32) -> GameResult {
        GameResult {
            id: id.into(),
            player_name: "somchai".into(),
            score,
            total_questions: 10,
            time_in_seconds: 42.5,
            completed_at: "2025-06-01T10:00:00Z".into(),
        }
    }

    #[tokio::test]
    async fn append_grows_the_array_in_order() {
        let dir = tempdir().unwrap();
        let log = ResultLog::new(dir.path().join("nested/result.json"));

        assert_eq!(log.append(result("a", 7)).await.unwrap(), 1);
        assert_eq!(log.append(result("b", 9)).await.unwrap(), 2);

        let all = log.read_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "a");
        assert_eq!(all[1].score, 9);
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let log = ResultLog::new(dir.path().join("absent.json"));
        assert!(log.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn wire_format_uses_camel_case_keys() {
        let serialized = serde_json::to_string(&result("a", 7)).unwrap();
        assert!(serialized.contains("playerName"));
        assert!(serialized.contains("totalQuestions"));
        assert!(serialized.contains("timeInSeconds"));
        assert!(serialized.contains("completedAt"));
    }
}
