//! Append-only question store
//!
//! Rows live in an append-only JSON-lines file, loaded into memory once at
//! startup. Queries run against the in-memory table; appends write the
//! encoded row to the file and then publish it to the table.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::error::AppError;
use crate::questions::{Question, QuestionStore};

/// Question store backed by a JSON-lines file
#[derive(Debug)]
pub struct JsonlQuestionStore {
    path: PathBuf,
    rows: RwLock<Vec<Question>>,
    // Serializes appends against each other; readers are not blocked
    append_lock: Mutex<()>,
}

impl JsonlQuestionStore {
    /// Load the store from disk
    ///
    /// A missing or unreadable file is a fatal startup error, as is any
    /// row that fails to decode.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();
        let contents = tokio::fs::read_to_string(&path).await.map_err(|e| {
            AppError::Config(format!(
                "failed to read question store {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut rows = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let question: Question = serde_json::from_str(line).map_err(|e| {
                AppError::Config(format!(
                    "bad question row at {}:{}: {}",
                    path.display(),
                    index + 1,
                    e
                ))
            })?;
            rows.push(question);
        }

        Ok(Self {
            path,
            rows: RwLock::new(rows),
            append_lock: Mutex::new(()),
        })
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[async_trait]
impl QuestionStore for JsonlQuestionStore {
    async fn list_uses(&self) -> Vec<String> {
        let rows = self.rows.read().await;
        let mut uses: Vec<String> = Vec::new();
        for row in rows.iter() {
            if !uses.contains(&row.use_) {
                uses.push(row.use_.clone());
            }
        }
        uses
    }

    async fn list_subjects(&self, use_: &str) -> Vec<String> {
        let rows = self.rows.read().await;
        let mut subjects: Vec<String> = Vec::new();
        for row in rows.iter().filter(|r| r.use_ == use_) {
            if !subjects.contains(&row.subject) {
                subjects.push(row.subject.clone());
            }
        }
        subjects
    }

    async fn sample(&self, use_: &str, subjects: &[String], count: usize) -> Vec<Question> {
        let rows = self.rows.read().await;
        let mut matching: Vec<Question> = rows
            .iter()
            .filter(|r| r.use_ == use_ && subjects.contains(&r.subject))
            .cloned()
            .collect();
        drop(rows);

        matching.shuffle(&mut rand::thread_rng());
        matching.truncate(count);
        matching
    }

    async fn append(&self, question: Question) -> Result<(), AppError> {
        let mut line = serde_json::to_string(&question)
            .map_err(|e| AppError::Internal(format!("failed to encode question row: {}", e)))?;
        line.push('\n');

        let _guard = self.append_lock.lock().await;

        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                AppError::Internal(format!(
                    "failed to open question store {}: {}",
                    self.path.display(),
                    e
                ))
            })?;
        file.write_all(line.as_bytes()).await.map_err(|e| {
            AppError::Internal(format!("failed to append question row: {}", e))
        })?;
        file.flush().await.map_err(|e| {
            AppError::Internal(format!("failed to flush question store: {}", e))
        })?;

        debug!(subject = %question.subject, use_ = %question.use_, "question appended");

        // Publish to in-memory readers only once the row is on disk
        self.rows.write().await.push(question);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static STORE_COUNTER: AtomicU32 = AtomicU32::new(0);

    fn question(text: &str, subject: &str, use_: &str) -> Question {
        Question {
            question: text.to_string(),
            subject: subject.to_string(),
            use_: use_.to_string(),
            correct: "A".to_string(),
            response_a: "a".to_string(),
            response_b: "b".to_string(),
            response_c: "c".to_string(),
            response_d: None,
            remark: None,
        }
    }

    fn seed_rows() -> Vec<Question> {
        vec![
            question("q1", "SQL", "backend"),
            question("q2", "SQL", "backend"),
            question("q3", "NoSQL", "backend"),
            question("q4", "Docker", "devops"),
            question("q5", "NoSQL", "backend"),
        ]
    }

    async fn seeded_store() -> JsonlQuestionStore {
        let path = std::env::temp_dir().join(format!(
            "questionnaire-store-{}-{}.jsonl",
            std::process::id(),
            STORE_COUNTER.fetch_add(1, Ordering::SeqCst),
        ));
        let mut contents = String::new();
        for row in seed_rows() {
            contents.push_str(&serde_json::to_string(&row).unwrap());
            contents.push('\n');
        }
        tokio::fs::write(&path, contents).await.unwrap();
        JsonlQuestionStore::load(&path).await.unwrap()
    }

    #[tokio::test]
    async fn test_load_counts_rows() {
        let store = seeded_store().await;
        assert_eq!(store.len().await, 5);
    }

    #[tokio::test]
    async fn test_missing_file_is_fatal() {
        let result = JsonlQuestionStore::load("/nonexistent/questions.jsonl").await;
        assert!(matches!(result.unwrap_err(), AppError::Config(_)));
    }

    #[tokio::test]
    async fn test_bad_row_is_fatal() {
        let path = std::env::temp_dir().join(format!(
            "questionnaire-badrow-{}.jsonl",
            std::process::id()
        ));
        tokio::fs::write(&path, "{\"not\": \"a question\"}\n")
            .await
            .unwrap();

        let result = JsonlQuestionStore::load(&path).await;
        assert!(matches!(result.unwrap_err(), AppError::Config(_)));
    }

    #[tokio::test]
    async fn test_list_uses_unique_first_seen_order() {
        let store = seeded_store().await;
        assert_eq!(store.list_uses().await, vec!["backend", "devops"]);
    }

    #[tokio::test]
    async fn test_list_subjects_filters_by_use() {
        let store = seeded_store().await;
        assert_eq!(store.list_subjects("backend").await, vec!["SQL", "NoSQL"]);
        assert_eq!(store.list_subjects("devops").await, vec!["Docker"]);
        assert!(store.list_subjects("frontend").await.is_empty());
    }

    #[tokio::test]
    async fn test_sample_respects_use_subjects_and_count() {
        let store = seeded_store().await;
        let subjects = vec!["SQL".to_string(), "NoSQL".to_string()];

        let picked = store.sample("backend", &subjects, 2).await;
        assert_eq!(picked.len(), 2);
        for row in &picked {
            assert_eq!(row.use_, "backend");
            assert!(subjects.contains(&row.subject));
        }

        // Without replacement: no duplicate questions in one draw
        let picked = store.sample("backend", &subjects, 10).await;
        assert_eq!(picked.len(), 4);
        let mut texts: Vec<&str> = picked.iter().map(|r| r.question.as_str()).collect();
        texts.sort_unstable();
        texts.dedup();
        assert_eq!(texts.len(), 4);
    }

    #[tokio::test]
    async fn test_append_publishes_to_reads_and_file() {
        let store = seeded_store().await;
        store
            .append(question("q6", "Kubernetes", "devops"))
            .await
            .unwrap();

        assert_eq!(store.len().await, 6);
        assert_eq!(
            store.list_subjects("devops").await,
            vec!["Docker", "Kubernetes"]
        );

        // The row must be on disk too: a reload sees it
        let reloaded = JsonlQuestionStore::load(&store.path).await.unwrap();
        assert_eq!(reloaded.len().await, 6);
    }
}
