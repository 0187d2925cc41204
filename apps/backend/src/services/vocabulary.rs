//! Vocabulary service: the in-memory store plus write-through persistence.

use std::sync::Arc;

use lexicard_core::{language_code, Flashcard, StoreError, VocabularyStore};
use tokio::sync::Mutex;

use crate::error::{ApiError, Result};
use crate::models::{CreateFlashcardRequest, LanguageEntry, SubcategoryInfo};
use crate::services::sentences::{SentenceGenerator, GENERATION_FAILED};
use crate::services::translate::Translator;
use crate::storage::{Storage, StorageError};

pub struct VocabularyService {
    store: Mutex<VocabularyStore>,
    storage: Arc<dyn Storage>,
}

impl VocabularyService {
    /// Load the persisted vocabulary from `storage`.
    pub fn load(storage: Arc<dyn Storage>) -> std::result::Result<Self, StorageError> {
        let store = storage.load_vocabulary()?;
        tracing::info!(
            backend = storage.name(),
            languages = store.languages().len(),
            "vocabulary loaded"
        );
        Ok(Self {
            store: Mutex::new(store),
            storage,
        })
    }

    /// Apply `f` to a copy of the store, persist it, then publish it.
    ///
    /// If either step fails the in-memory store is left untouched.
    async fn mutate<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut VocabularyStore) -> std::result::Result<T, StoreError>,
    {
        let mut store = self.store.lock().await;
        let mut next = store.clone();
        let value = f(&mut next)?;

        if let Err(e) = self.storage.save_vocabulary(&next) {
            tracing::error!(backend = self.storage.name(), error = %e, "failed to save vocabulary");
            return Err(e.into());
        }

        *store = next;
        Ok(value)
    }

    /// Languages with their subcategories, counting cards `viewer` can see.
    pub async fn languages(&self, viewer: i64) -> Vec<LanguageEntry> {
        let store = self.store.lock().await;
        store
            .languages()
            .into_iter()
            .map(|language| {
                let subcategories = store
                    .subcategories(&language)
                    .into_iter()
                    .map(|info| SubcategoryInfo {
                        flashcard_count: store
                            .list_flashcards(&language, &info.name, None, Some(viewer))
                            .len(),
                        name: info.name,
                    })
                    .collect();
                LanguageEntry {
                    name: language,
                    subcategories,
                }
            })
            .collect()
    }

    pub async fn has_subcategory(&self, language: &str, subcategory: &str) -> bool {
        self.store.lock().await.has_subcategory(language, subcategory)
    }

    pub async fn add_language(&self, name: &str) -> Result<()> {
        self.mutate(|store| store.add_language(name)).await?;
        tracing::info!(language = name.trim(), "language added");
        Ok(())
    }

    pub async fn delete_language(&self, name: &str) -> Result<()> {
        self.mutate(|store| store.delete_language(name)).await?;
        tracing::info!(language = name, "language deleted");
        Ok(())
    }

    pub async fn add_subcategory(&self, language: &str, name: &str) -> Result<()> {
        self.mutate(|store| store.add_subcategory(language, name)).await?;
        tracing::info!(language, subcategory = name.trim(), "subcategory added");
        Ok(())
    }

    pub async fn delete_subcategory(&self, language: &str, name: &str) -> Result<()> {
        self.mutate(|store| store.delete_subcategory(language, name)).await?;
        tracing::info!(language, subcategory = name, "subcategory deleted");
        Ok(())
    }

    pub async fn add_flashcard(&self, language: &str, subcategory: &str, card: Flashcard) -> Result<Flashcard> {
        let stored = card.clone();
        self.mutate(|store| store.add_flashcard(language, subcategory, card)).await?;
        tracing::debug!(language, subcategory, word = %stored.word, "flashcard added");
        Ok(stored)
    }

    pub async fn edit_flashcard(
        &self,
        language: &str,
        subcategory: &str,
        original_word: &str,
        owner: Option<i64>,
        card: Flashcard,
    ) -> Result<Flashcard> {
        let stored = card.clone();
        self.mutate(|store| store.edit_flashcard(language, subcategory, original_word, owner, card))
            .await?;
        Ok(stored)
    }

    pub async fn delete_flashcard(
        &self,
        language: &str,
        subcategory: &str,
        word: &str,
        owner: Option<i64>,
    ) -> Result<usize> {
        self.mutate(|store| store.delete_flashcard(language, subcategory, word, owner))
            .await
    }

    pub async fn list_flashcards(
        &self,
        language: &str,
        subcategory: &str,
        filter: Option<&str>,
        viewer: Option<i64>,
    ) -> Vec<Flashcard> {
        self.store
            .lock()
            .await
            .list_flashcards(language, subcategory, filter, viewer)
    }
}

/// Build the card for an add request, filling blanks through the external
/// services.
///
/// An empty translation is fetched only when `auto_translate` is set. An empty
/// example sentence is always generated.
pub async fn compose_flashcard(
    language: &str,
    request: CreateFlashcardRequest,
    owner: i64,
    translator: &dyn Translator,
    generator: &dyn SentenceGenerator,
) -> Result<Flashcard> {
    let word = request.word.trim().to_string();
    if word.is_empty() {
        return Err(ApiError::Validation("word is required".to_string()));
    }

    let mut translation = request.translation.trim().to_string();
    if translation.is_empty() && request.auto_translate {
        translation = translator.translate(&word, language_code(language)).await;
        if translation.trim() == word {
            return Err(ApiError::Validation(
                "automatic translation failed, please enter the translation manually".to_string(),
            ));
        }
    }
    if translation.is_empty() {
        return Err(ApiError::Validation("translation is required".to_string()));
    }

    let mut example_sentence = request.example_sentence.trim().to_string();
    if example_sentence.is_empty() {
        example_sentence = generator.generate_example(&word, language).await;
        if example_sentence == GENERATION_FAILED {
            return Err(ApiError::Validation(
                "could not generate an example sentence, please enter one manually".to_string(),
            ));
        }
    }

    Ok(Flashcard::new(word, translation, example_sentence, Some(owner)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewQuizResult;
    use crate::models::{NewUser, User};
    use async_trait::async_trait;
    use lexicard_core::QuizResult;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// In-memory storage whose saves can be made to fail.
    #[derive(Default)]
    struct FlakyStorage {
        fail_saves: AtomicBool,
        saved: std::sync::Mutex<Option<VocabularyStore>>,
    }

    impl Storage for FlakyStorage {
        fn name(&self) -> &'static str {
            "flaky"
        }
        fn load_vocabulary(&self) -> crate::storage::Result<VocabularyStore> {
            Ok(VocabularyStore::new())
        }
        fn save_vocabulary(&self, store: &VocabularyStore) -> crate::storage::Result<()> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(StorageError::Io(std::io::Error::other("disk full")));
            }
            *self.saved.lock().unwrap() = Some(store.clone());
            Ok(())
        }
        fn create_user(&self, _user: &NewUser) -> crate::storage::Result<User> {
            unimplemented!()
        }
        fn find_user_by_username(&self, _username: &str) -> crate::storage::Result<Option<User>> {
            Ok(None)
        }
        fn get_user(&self, _id: i64) -> crate::storage::Result<Option<User>> {
            Ok(None)
        }
        fn append_quiz_result(&self, _result: &NewQuizResult) -> crate::storage::Result<QuizResult> {
            unimplemented!()
        }
        fn quiz_results(&self, _user_id: i64) -> crate::storage::Result<Vec<QuizResult>> {
            Ok(Vec::new())
        }
    }

    struct EchoTranslator;

    #[async_trait]
    impl Translator for EchoTranslator {
        async fn translate(&self, text: &str, _target_code: &str) -> String {
            text.to_string()
        }
    }

    struct UpperTranslator;

    #[async_trait]
    impl Translator for UpperTranslator {
        async fn translate(&self, text: &str, target_code: &str) -> String {
            format!("{}:{}", target_code, text.to_uppercase())
        }
    }

    struct FixedGenerator(&'static str);

    #[async_trait]
    impl SentenceGenerator for FixedGenerator {
        async fn generate_example(&self, _word: &str, _language: &str) -> String {
            self.0.to_string()
        }
    }

    fn request(word: &str, translation: &str, example: &str, auto_translate: bool) -> CreateFlashcardRequest {
        CreateFlashcardRequest {
            word: word.to_string(),
            translation: translation.to_string(),
            example_sentence: example.to_string(),
            auto_translate,
        }
    }

    #[tokio::test]
    async fn test_mutations_are_saved() {
        let storage = Arc::new(FlakyStorage::default());
        let service = VocabularyService::load(storage.clone()).unwrap();

        service.add_language("Polish").await.unwrap();
        service.add_subcategory("Polish", "animals").await.unwrap();

        let saved = storage.saved.lock().unwrap().clone().unwrap();
        assert!(saved.has_subcategory("Polish", "animals"));
    }

    #[tokio::test]
    async fn test_failed_save_rolls_back() {
        let storage = Arc::new(FlakyStorage::default());
        let service = VocabularyService::load(storage.clone()).unwrap();
        service.add_language("Polish").await.unwrap();

        storage.fail_saves.store(true, Ordering::SeqCst);
        let err = service.add_subcategory("Polish", "animals").await.unwrap_err();
        assert!(matches!(err, ApiError::Storage(_)));
        assert!(!service.has_subcategory("Polish", "animals").await);

        storage.fail_saves.store(false, Ordering::SeqCst);
        service.add_subcategory("Polish", "animals").await.unwrap();
        assert!(service.has_subcategory("Polish", "animals").await);
    }

    #[tokio::test]
    async fn test_store_errors_skip_saving() {
        let storage = Arc::new(FlakyStorage::default());
        let service = VocabularyService::load(storage.clone()).unwrap();

        let err = service.add_subcategory("Nowhere", "x").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert!(storage.saved.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_language_counts_follow_visibility() {
        let storage = Arc::new(FlakyStorage::default());
        let service = VocabularyService::load(storage).unwrap();
        service.add_language("Polish").await.unwrap();
        service.add_subcategory("Polish", "animals").await.unwrap();
        for (word, owner) in [("kot", Some(1)), ("pies", Some(2)), ("koń", None)] {
            service
                .add_flashcard("Polish", "animals", Flashcard::new(word, "x", "", owner))
                .await
                .unwrap();
        }

        let languages = service.languages(1).await;
        assert_eq!(languages.len(), 1);
        assert_eq!(languages[0].subcategories[0].flashcard_count, 2);
    }

    #[tokio::test]
    async fn test_compose_keeps_given_fields() {
        let card = compose_flashcard(
            "English",
            request(" cat ", "kot", "The cat sleeps.", true),
            7,
            &EchoTranslator,
            &FixedGenerator(GENERATION_FAILED),
        )
        .await
        .unwrap();
        assert_eq!(card, Flashcard::new("cat", "kot", "The cat sleeps.", Some(7)));
    }

    #[tokio::test]
    async fn test_compose_auto_translates_with_language_code() {
        let card = compose_flashcard(
            "Niemiecki",
            request("kot", "", "", true),
            1,
            &UpperTranslator,
            &FixedGenerator("Die Katze schläft."),
        )
        .await
        .unwrap();
        assert_eq!(card.translation, "de:KOT");
        assert_eq!(card.example_sentence, "Die Katze schläft.");
    }

    #[tokio::test]
    async fn test_compose_rejects_translation_fallback() {
        let err = compose_flashcard(
            "English",
            request("kot", "", "x.", true),
            1,
            &EchoTranslator,
            &FixedGenerator("x."),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(msg) if msg.contains("manually")));
    }

    #[tokio::test]
    async fn test_compose_requires_translation_without_auto_translate() {
        let err = compose_flashcard("English", request("kot", "", "x.", false), 1, &UpperTranslator, &FixedGenerator("x."))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_compose_rejects_generation_placeholder() {
        let err = compose_flashcard(
            "English",
            request("kot", "cat", "", false),
            1,
            &EchoTranslator,
            &FixedGenerator(GENERATION_FAILED),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_compose_requires_word() {
        let err = compose_flashcard("English", request("  ", "cat", "x.", false), 1, &EchoTranslator, &FixedGenerator("x."))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(msg) if msg == "word is required"));
    }
}
