//! In-memory vocabulary store.
//!
//! # Layout
//! ```text
//! language
//! └── subcategory
//!     └── [flashcard, ...]   (insertion order)
//! ```
//!
//! The serialized form is a plain JSON object of the same shape, so the
//! store round-trips through `serde_json` unchanged.

use crate::error::StoreError;
use crate::types::{Flashcard, SubcategoryInfo};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

type Result<T> = std::result::Result<T, StoreError>;

/// Subcategory name -> ordered flashcards.
pub type Subcategories = BTreeMap<String, Vec<Flashcard>>;

/// Language -> subcategory -> flashcards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VocabularyStore {
    languages: BTreeMap<String, Subcategories>,
}

impl VocabularyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Iterate over every language with its subcategories.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Subcategories)> {
        self.languages.iter()
    }

    /// Language names in sorted order.
    pub fn languages(&self) -> Vec<String> {
        self.languages.keys().cloned().collect()
    }

    /// Subcategories of a language with their flashcard counts.
    pub fn subcategories(&self, language: &str) -> Vec<SubcategoryInfo> {
        self.languages
            .get(language)
            .map(|subs| {
                subs.iter()
                    .map(|(name, cards)| SubcategoryInfo {
                        name: name.clone(),
                        flashcard_count: cards.len(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn has_subcategory(&self, language: &str, subcategory: &str) -> bool {
        self.languages
            .get(language)
            .is_some_and(|subs| subs.contains_key(subcategory))
    }

    pub fn add_language(&mut self, name: &str) -> Result<()> {
        let name = required("language", name)?;
        if self.languages.contains_key(name) {
            return Err(StoreError::LanguageExists(name.to_string()));
        }
        self.languages.insert(name.to_string(), BTreeMap::new());
        Ok(())
    }

    /// Remove a language with all its subcategories and flashcards.
    pub fn delete_language(&mut self, name: &str) -> Result<()> {
        self.languages
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::LanguageNotFound(name.to_string()))
    }

    pub fn add_subcategory(&mut self, language: &str, name: &str) -> Result<()> {
        let name = required("subcategory", name)?;
        let subs = self.language_mut(language)?;
        if subs.contains_key(name) {
            return Err(StoreError::SubcategoryExists {
                language: language.to_string(),
                subcategory: name.to_string(),
            });
        }
        subs.insert(name.to_string(), Vec::new());
        Ok(())
    }

    /// Remove a subcategory with all its flashcards.
    pub fn delete_subcategory(&mut self, language: &str, name: &str) -> Result<()> {
        self.language_mut(language)?
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::SubcategoryNotFound {
                language: language.to_string(),
                subcategory: name.to_string(),
            })
    }

    pub fn add_flashcard(&mut self, language: &str, subcategory: &str, card: Flashcard) -> Result<()> {
        self.cards_mut(language, subcategory)?.push(card);
        Ok(())
    }

    /// Replace the first card matching `original_word` and `owner`.
    pub fn edit_flashcard(
        &mut self,
        language: &str,
        subcategory: &str,
        original_word: &str,
        owner: Option<i64>,
        updated: Flashcard,
    ) -> Result<()> {
        let slot = self
            .cards_mut(language, subcategory)?
            .iter_mut()
            .find(|card| card.word == original_word && card.owner_id == owner)
            .ok_or_else(|| StoreError::FlashcardNotFound {
                word: original_word.to_string(),
            })?;

        slot.word = updated.word;
        slot.translation = updated.translation;
        slot.example_sentence = updated.example_sentence;
        Ok(())
    }

    /// Remove every card matching `word` and `owner`, returning how many went.
    pub fn delete_flashcard(
        &mut self,
        language: &str,
        subcategory: &str,
        word: &str,
        owner: Option<i64>,
    ) -> Result<usize> {
        let cards = self.cards_mut(language, subcategory)?;
        let before = cards.len();
        cards.retain(|card| card.word != word || card.owner_id != owner);

        let removed = before - cards.len();
        if removed == 0 {
            return Err(StoreError::FlashcardNotFound {
                word: word.to_string(),
            });
        }
        Ok(removed)
    }

    /// Flashcards of a subcategory visible to `viewer`, optionally filtered
    /// by a case-insensitive substring of word or translation. The filter is
    /// used as given, so whitespace in it must match too; an empty filter
    /// lists everything.
    ///
    /// Unknown language or subcategory yields an empty list.
    pub fn list_flashcards(
        &self,
        language: &str,
        subcategory: &str,
        filter: Option<&str>,
        viewer: Option<i64>,
    ) -> Vec<Flashcard> {
        let Some(cards) = self.languages.get(language).and_then(|subs| subs.get(subcategory)) else {
            return Vec::new();
        };

        let needle = filter
            .map(str::to_lowercase)
            .filter(|f| !f.is_empty());

        cards
            .iter()
            .filter(|card| card.visible_to(viewer))
            .filter(|card| needle.as_deref().map_or(true, |n| card.matches_filter(n)))
            .cloned()
            .collect()
    }

    fn language_mut(&mut self, language: &str) -> Result<&mut Subcategories> {
        self.languages
            .get_mut(language)
            .ok_or_else(|| StoreError::LanguageNotFound(language.to_string()))
    }

    fn cards_mut(&mut self, language: &str, subcategory: &str) -> Result<&mut Vec<Flashcard>> {
        self.language_mut(language)?
            .get_mut(subcategory)
            .ok_or_else(|| StoreError::SubcategoryNotFound {
                language: language.to_string(),
                subcategory: subcategory.to_string(),
            })
    }
}

impl From<BTreeMap<String, Subcategories>> for VocabularyStore {
    fn from(languages: BTreeMap<String, Subcategories>) -> Self {
        Self { languages }
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::EmptyField { field });
    }
    Ok(trimmed)
}
