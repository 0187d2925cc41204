//! SQLite schema definitions.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema for the relational backend.
pub const SCHEMA: &str = r#"
-- Accounts
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL,
    password TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Languages, kept even when they hold no subcategories
CREATE TABLE IF NOT EXISTS categories (
    name TEXT PRIMARY KEY
);

CREATE TABLE IF NOT EXISTS subcategories (
    category TEXT NOT NULL REFERENCES categories(name),
    name TEXT NOT NULL,
    PRIMARY KEY (category, name)
);

-- Flashcards in insertion order (id)
CREATE TABLE IF NOT EXISTS flashcards (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category TEXT NOT NULL,
    subcategory TEXT NOT NULL,
    word TEXT NOT NULL,
    translation TEXT NOT NULL,
    example_sentence TEXT NOT NULL DEFAULT '',
    user_id INTEGER REFERENCES users(id),
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (category, subcategory) REFERENCES subcategories(category, name)
);

-- Results log
CREATE TABLE IF NOT EXISTS quiz_results (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    correct_answers INTEGER NOT NULL,
    wrong_answers INTEGER NOT NULL,
    date TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_flashcards_group ON flashcards(category, subcategory);
CREATE INDEX IF NOT EXISTS idx_quiz_results_user ON quiz_results(user_id, date);
"#;
