//! SQLite storage.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use lexicard_core::{Flashcard, QuizResult, VocabularyStore};
use rusqlite::{params, Connection, OptionalExtension};

use super::schema::{SCHEMA, SCHEMA_VERSION};
use super::{Result, Storage, StorageError};
use crate::models::{NewQuizResult, NewUser, User};

/// id, username, email, password, created_at
type UserRow = (i64, String, String, String, String);

/// category, subcategory, word, user_id
type CardKey = (String, String, String, Option<i64>);

/// Storage backed by a single SQLite connection held for the process lifetime.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::initialize(Connection::open(path)?)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<UserRow> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
    }

    fn user_from_row(row: UserRow) -> Result<User> {
        let (id, username, email, password, created_at) = row;
        Ok(User {
            id,
            username,
            email,
            password,
            created_at: parse_timestamp(&created_at)?,
        })
    }

    fn find_user(&self, column: &str, value: &dyn rusqlite::ToSql) -> Result<Option<User>> {
        let sql = format!(
            "SELECT id, username, email, password, created_at FROM users WHERE {column} = ?1"
        );
        let row = self
            .conn()
            .query_row(&sql, [value], Self::row_to_user)
            .optional()?;
        row.map(Self::user_from_row).transpose()
    }
}

/// Fixed-width UTC timestamps so text ordering matches time ordering.
fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::InvalidData(format!("bad timestamp {value:?}: {e}")))
}

fn count_to_u32(value: i64, column: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| StorageError::InvalidData(format!("{column} out of range: {value}")))
}

impl Storage for SqliteStorage {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn load_vocabulary(&self) -> Result<VocabularyStore> {
        let conn = self.conn();
        let mut languages: BTreeMap<String, BTreeMap<String, Vec<Flashcard>>> = BTreeMap::new();

        let mut stmt = conn.prepare("SELECT name FROM categories")?;
        for name in stmt.query_map([], |row| row.get::<_, String>(0))? {
            languages.entry(name?).or_default();
        }

        let mut stmt = conn.prepare("SELECT category, name FROM subcategories")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
        for row in rows {
            let (category, name) = row?;
            languages.entry(category).or_default().entry(name).or_default();
        }

        let mut stmt = conn.prepare(
            "SELECT category, subcategory, word, translation, example_sentence, user_id
             FROM flashcards ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                Flashcard {
                    word: row.get(2)?,
                    translation: row.get(3)?,
                    example_sentence: row.get(4)?,
                    owner_id: row.get(5)?,
                },
            ))
        })?;
        for row in rows {
            let (category, subcategory, card) = row?;
            languages
                .entry(category)
                .or_default()
                .entry(subcategory)
                .or_default()
                .push(card);
        }

        Ok(VocabularyStore::from(languages))
    }

    /// Rewrites every table. Row ids are reassigned, but a card keeps its
    /// `created_at` as long as its language, subcategory, word and owner stay
    /// the same.
    fn save_vocabulary(&self, store: &VocabularyStore) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let mut created: HashMap<CardKey, String> = HashMap::new();
        {
            let mut stmt = tx.prepare(
                "SELECT category, subcategory, word, user_id, created_at FROM flashcards ORDER BY id",
            )?;
            let rows = stmt.query_map([], |row| {
                let key: CardKey = (row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?);
                Ok((key, row.get::<_, String>(4)?))
            })?;
            for row in rows {
                let (key, created_at) = row?;
                created.entry(key).or_insert(created_at);
            }
        }

        tx.execute("DELETE FROM flashcards", [])?;
        tx.execute("DELETE FROM subcategories", [])?;
        tx.execute("DELETE FROM categories", [])?;

        {
            let mut insert_category = tx.prepare("INSERT INTO categories (name) VALUES (?1)")?;
            let mut insert_subcategory =
                tx.prepare("INSERT INTO subcategories (category, name) VALUES (?1, ?2)")?;
            let mut insert_card = tx.prepare(
                "INSERT INTO flashcards (category, subcategory, word, translation, example_sentence, user_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, COALESCE(?7, CURRENT_TIMESTAMP))",
            )?;

            for (language, subcategories) in store.iter() {
                insert_category.execute(params![language])?;
                for (subcategory, cards) in subcategories {
                    insert_subcategory.execute(params![language, subcategory])?;
                    for card in cards {
                        let key = (
                            language.clone(),
                            subcategory.clone(),
                            card.word.clone(),
                            card.owner_id,
                        );
                        insert_card.execute(params![
                            language,
                            subcategory,
                            card.word,
                            card.translation,
                            card.example_sentence,
                            card.owner_id,
                            created.get(&key)
                        ])?;
                    }
                }
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn create_user(&self, user: &NewUser) -> Result<User> {
        let conn = self.conn();

        let taken: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)",
            params![user.username],
            |row| row.get(0),
        )?;
        if taken {
            return Err(StorageError::DuplicateUsername(user.username.clone()));
        }

        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO users (username, email, password, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![user.username, user.email, user.password_hash, format_timestamp(&created_at)],
        )?;

        Ok(User {
            id: conn.last_insert_rowid(),
            username: user.username.clone(),
            email: user.email.clone(),
            password: user.password_hash.clone(),
            created_at,
        })
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.find_user("username", &username)
    }

    fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.find_user("id", &id)
    }

    fn append_quiz_result(&self, result: &NewQuizResult) -> Result<QuizResult> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO quiz_results (user_id, correct_answers, wrong_answers, date) VALUES (?1, ?2, ?3, ?4)",
            params![
                result.user_id,
                result.correct_answers,
                result.wrong_answers,
                format_timestamp(&result.date)
            ],
        )?;

        Ok(QuizResult {
            id: conn.last_insert_rowid(),
            user_id: result.user_id,
            correct_answers: result.correct_answers,
            wrong_answers: result.wrong_answers,
            date: result.date,
        })
    }

    fn quiz_results(&self, user_id: i64) -> Result<Vec<QuizResult>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, correct_answers, wrong_answers, date
             FROM quiz_results WHERE user_id = ?1
             ORDER BY date DESC, id DESC",
        )?;

        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, user_id, correct, wrong, date)| {
                Ok(QuizResult {
                    id,
                    user_id,
                    correct_answers: count_to_u32(correct, "correct_answers")?,
                    wrong_answers: count_to_u32(wrong, "wrong_answers")?,
                    date: parse_timestamp(&date)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "digest".to_string(),
        }
    }

    fn sample_store() -> VocabularyStore {
        let mut store = VocabularyStore::new();
        store.add_language("German").unwrap();
        store.add_language("Polish").unwrap();
        store.add_subcategory("Polish", "verbs").unwrap();
        store.add_subcategory("Polish", "empty").unwrap();
        store
            .add_flashcard("Polish", "verbs", Flashcard::new("spać", "to sleep", "Lubię spać.", Some(1)))
            .unwrap();
        store
            .add_flashcard("Polish", "verbs", Flashcard::new("jeść", "to eat", "", None))
            .unwrap();
        store
    }

    #[test]
    fn test_schema_version_recorded() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let version: i32 = storage
            .conn()
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_empty_database_loads_empty_store() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        assert!(storage.load_vocabulary().unwrap().is_empty());
    }

    #[test]
    fn test_vocabulary_round_trip_keeps_empty_groups_and_order() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let store = sample_store();
        storage.save_vocabulary(&store).unwrap();

        let loaded = storage.load_vocabulary().unwrap();
        assert_eq!(loaded, store);
        assert_eq!(loaded.languages(), vec!["German", "Polish"]);

        let words: Vec<String> = loaded
            .list_flashcards("Polish", "verbs", None, None)
            .into_iter()
            .map(|c| c.word)
            .collect();
        assert_eq!(words, vec!["spać", "jeść"]);
    }

    #[test]
    fn test_save_replaces_previous_contents() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let mut store = sample_store();
        storage.save_vocabulary(&store).unwrap();

        store.delete_language("Polish").unwrap();
        storage.save_vocabulary(&store).unwrap();

        let loaded = storage.load_vocabulary().unwrap();
        assert_eq!(loaded.languages(), vec!["German"]);
    }

    #[test]
    fn test_users() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let anna = storage.create_user(&new_user("anna")).unwrap();

        let found = storage.find_user_by_username("anna").unwrap().unwrap();
        assert_eq!(found.id, anna.id);
        assert_eq!(found.email, "anna@example.com");
        assert_eq!(storage.get_user(anna.id).unwrap().unwrap().username, "anna");
        assert_eq!(storage.find_user_by_username("bob").unwrap(), None);

        assert!(matches!(
            storage.create_user(&new_user("anna")),
            Err(StorageError::DuplicateUsername(_))
        ));
    }

    #[test]
    fn test_quiz_results_newest_first() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let anna = storage.create_user(&new_user("anna")).unwrap();
        let now = Utc::now();

        for (correct, age) in [(2, 10), (7, 0), (4, 5)] {
            storage
                .append_quiz_result(&NewQuizResult {
                    user_id: anna.id,
                    correct_answers: correct,
                    wrong_answers: 3,
                    date: now - Duration::minutes(age),
                })
                .unwrap();
        }

        let results = storage.quiz_results(anna.id).unwrap();
        let correct: Vec<u32> = results.iter().map(|r| r.correct_answers).collect();
        assert_eq!(correct, vec![7, 4, 2]);
        assert_eq!(results[0].total_points(), 4);
        assert!(storage.quiz_results(anna.id + 1).unwrap().is_empty());
    }

    #[test]
    fn test_open_file_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("lexicard.db");

        {
            let storage = SqliteStorage::open(&path).unwrap();
            storage.save_vocabulary(&sample_store()).unwrap();
        }

        let reopened = SqliteStorage::open(&path).unwrap();
        assert_eq!(reopened.load_vocabulary().unwrap(), sample_store());
    }

    #[test]
    fn test_save_keeps_flashcard_created_at() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let mut store = sample_store();
        storage.save_vocabulary(&store).unwrap();
        storage
            .conn()
            .execute("UPDATE flashcards SET created_at = '2020-01-01 00:00:00'", [])
            .unwrap();

        store
            .add_flashcard("Polish", "verbs", Flashcard::new("pić", "to drink", "", Some(1)))
            .unwrap();
        storage.save_vocabulary(&store).unwrap();

        let conn = storage.conn();
        let created_at = |word: &str| -> String {
            conn.query_row(
                "SELECT created_at FROM flashcards WHERE word = ?1",
                params![word],
                |row| row.get(0),
            )
            .unwrap()
        };
        assert_eq!(created_at("spać"), "2020-01-01 00:00:00");
        assert_eq!(created_at("jeść"), "2020-01-01 00:00:00");
        assert_ne!(created_at("pić"), "2020-01-01 00:00:00");
    }
}
