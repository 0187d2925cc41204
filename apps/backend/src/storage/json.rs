//! JSON file storage.
//!
//! Directory layout:
//! ```text
//! {data_dir}/
//! ├── flashcards.json    # {language: {subcategory: [flashcard, ...]}}
//! ├── users.json         # [user, ...]
//! └── quiz_results.json  # [result, ...]
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use lexicard_core::{QuizResult, VocabularyStore};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{Result, Storage, StorageError};
use crate::models::{NewQuizResult, NewUser, User};

const VOCABULARY_FILE: &str = "flashcards.json";
const USERS_FILE: &str = "users.json";
const RESULTS_FILE: &str = "quiz_results.json";

/// Storage backed by pretty-printed JSON files in one directory.
pub struct JsonStorage {
    dir: PathBuf,
    /// Serializes read-modify-write cycles on the files.
    write_lock: Mutex<()>,
}

impl JsonStorage {
    /// Open storage in `dir`, creating the directory if necessary.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    fn read_or_default<T: DeserializeOwned + Default>(&self, file: &str) -> Result<T> {
        let path = self.path(file);
        if !path.exists() {
            return Ok(T::default());
        }

        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(T::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> Result<()> {
        let path = self.path(file);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(value)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn load_users(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = self.read_or_default(USERS_FILE)?;
        assign_missing_ids(&mut users);
        Ok(users)
    }
}

/// Give sequential ids to entries written without one.
fn assign_missing_ids(users: &mut [User]) {
    let mut next_id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
    for user in users.iter_mut().filter(|u| u.id <= 0) {
        user.id = next_id;
        next_id += 1;
    }
}

impl Storage for JsonStorage {
    fn name(&self) -> &'static str {
        "json"
    }

    fn load_vocabulary(&self) -> Result<VocabularyStore> {
        self.read_or_default(VOCABULARY_FILE)
    }

    fn save_vocabulary(&self, store: &VocabularyStore) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.write(VOCABULARY_FILE, store)
    }

    fn create_user(&self, user: &NewUser) -> Result<User> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut users = self.load_users()?;

        if users.iter().any(|u| u.username == user.username) {
            return Err(StorageError::DuplicateUsername(user.username.clone()));
        }

        let created = User {
            id: users.iter().map(|u| u.id).max().unwrap_or(0) + 1,
            username: user.username.clone(),
            email: user.email.clone(),
            password: user.password_hash.clone(),
            created_at: Utc::now(),
        };
        users.push(created.clone());
        self.write(USERS_FILE, &users)?;
        Ok(created)
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .load_users()?
            .into_iter()
            .find(|u| u.username == username))
    }

    fn get_user(&self, id: i64) -> Result<Option<User>> {
        Ok(self.load_users()?.into_iter().find(|u| u.id == id))
    }

    fn append_quiz_result(&self, result: &NewQuizResult) -> Result<QuizResult> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut results: Vec<QuizResult> = self.read_or_default(RESULTS_FILE)?;

        let stored = QuizResult {
            id: results.iter().map(|r| r.id).max().unwrap_or(0) + 1,
            user_id: result.user_id,
            correct_answers: result.correct_answers,
            wrong_answers: result.wrong_answers,
            date: result.date,
        };
        results.push(stored.clone());
        self.write(RESULTS_FILE, &results)?;
        Ok(stored)
    }

    fn quiz_results(&self, user_id: i64) -> Result<Vec<QuizResult>> {
        let results: Vec<QuizResult> = self.read_or_default(RESULTS_FILE)?;
        let mut mine: Vec<QuizResult> = results
            .into_iter()
            .filter(|r| r.user_id == user_id)
            .collect();
        mine.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(mine)
    }
}
