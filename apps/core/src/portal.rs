//! Composition root: wires the store, directory, ledger, engine, resume
//! store, and content generator into one value a UI holds on to.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::accounts::AccountDirectory;
use crate::ai::{ContentGenerator, GeminiClient, OfflineGenerator};
use crate::assessment::{AnswerKeyGrader, AssessmentEngine};
use crate::certificates::CertificateLedger;
use crate::config::Config;
use crate::resume::ResumeStore;
use crate::store::{keys, FileStore, MemoryStore, SharedStore};

pub struct Portal {
    store: SharedStore,
    accounts: AccountDirectory,
    certificates: CertificateLedger,
    engine: AssessmentEngine,
    resumes: ResumeStore,
    generator: Arc<dyn ContentGenerator>,
    backend: &'static str,
}

impl Portal {
    /// Opens the portal with the configured backing store: file-backed
    /// when `SKILLUP_STORE_PATH` is set, in-memory otherwise.
    pub fn new(config: Config) -> Result<Self> {
        let store: SharedStore = match &config.store_path {
            Some(path) => Arc::new(FileStore::open(path)?),
            None => Arc::new(MemoryStore::new()),
        };
        Ok(Self::with_store(config, store))
    }

    /// Opens the portal over an existing store.
    pub fn with_store(config: Config, store: SharedStore) -> Self {
        let accounts = AccountDirectory::new(Arc::clone(&store));
        let certificates = CertificateLedger::new(Arc::clone(&store));
        let engine = AssessmentEngine::new(certificates.clone(), Arc::new(AnswerKeyGrader));
        let resumes = ResumeStore::new(Arc::clone(&store));

        // Environment key wins over one supplied through the store.
        let api_key = config
            .gemini_api_key
            .clone()
            .or_else(|| store.get(keys::GEMINI_API_KEY));
        let (generator, backend) = build_generator(api_key);
        info!("Portal ready (generation backend: {backend})");

        Self {
            store,
            accounts,
            certificates,
            engine,
            resumes,
            generator,
            backend,
        }
    }

    /// Stores an API key supplied at runtime and switches generation to
    /// the live backend.
    pub fn set_api_key(&mut self, key: &str) {
        self.store.set(keys::GEMINI_API_KEY, key);
        let (generator, backend) = build_generator(Some(key.to_string()));
        self.generator = generator;
        self.backend = backend;
    }

    pub fn accounts(&self) -> &AccountDirectory {
        &self.accounts
    }

    pub fn certificates(&self) -> &CertificateLedger {
        &self.certificates
    }

    pub fn assessments(&self) -> &AssessmentEngine {
        &self.engine
    }

    pub fn resumes(&self) -> &ResumeStore {
        &self.resumes
    }

    pub fn generator(&self) -> &dyn ContentGenerator {
        self.generator.as_ref()
    }

    /// "gemini" or "offline", for UI transparency.
    pub fn generation_backend(&self) -> &'static str {
        self.backend
    }
}

fn build_generator(api_key: Option<String>) -> (Arc<dyn ContentGenerator>, &'static str) {
    match api_key {
        Some(key) => match GeminiClient::new(key) {
            Ok(client) => (Arc::new(client), "gemini"),
            Err(e) => {
                tracing::warn!("Falling back to offline generation: {e}");
                (Arc::new(OfflineGenerator), "offline")
            }
        },
        None => (Arc::new(OfflineGenerator), "offline"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_offline_backend() {
        let portal = Portal::with_store(Config::default(), Arc::new(MemoryStore::new()));
        assert_eq!(portal.generation_backend(), "offline");
    }

    #[test]
    fn test_store_supplied_key_selects_gemini() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        store.set(keys::GEMINI_API_KEY, "test-key");

        let portal = Portal::with_store(Config::default(), store);
        assert_eq!(portal.generation_backend(), "gemini");
    }

    #[test]
    fn test_set_api_key_persists_and_switches() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mut portal = Portal::with_store(Config::default(), Arc::clone(&store));
        portal.set_api_key("runtime-key");

        assert_eq!(store.get(keys::GEMINI_API_KEY).as_deref(), Some("runtime-key"));
        assert_eq!(portal.generation_backend(), "gemini");
    }

    #[tokio::test]
    async fn test_full_flow_over_one_store() {
        use crate::assessment::{find_assessment, Answer};

        let portal = Portal::with_store(Config::default(), Arc::new(MemoryStore::new()));

        let user = portal.accounts().login("demo@skillup.com", "123").unwrap();

        let assessment = find_assessment("python-basic").unwrap();
        let mut session = portal.assessments().start(&assessment);
        portal.assessments().answer(&mut session, 0, Answer::Choice(1));
        portal.assessments().answer(&mut session, 2, Answer::Choice(3));
        let score = portal
            .assessments()
            .submit(&mut session, &assessment, &user)
            .unwrap();
        assert_eq!(score, 66);

        // react-basic seed record plus the new one.
        let certs = portal.certificates().list_for(&user.email);
        assert_eq!(certs.len(), 2);
        assert_eq!(certs[1].cert_id, "python-basic");

        let mut resume = portal.resumes().load(&user.email);
        resume
            .import_from_text("plain text resume", portal.generator())
            .await
            .unwrap();
        portal.resumes().save(&user.email, &resume).unwrap();
        assert_eq!(
            portal.resumes().load(&user.email).personal_info.full_name,
            "Extracted Name"
        );
    }
}
