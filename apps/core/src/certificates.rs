//! Certificate Ledger — append-only record of passed assessments.
//!
//! One canonical store: the global JSON list. Per-user views are derived
//! by filtering, never written separately (the original portal kept a
//! second per-user list in parallel; collapsed here).

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::accounts::Account;
use crate::store::{keys, SharedStore};

/// Proof a user passed a specific assessment. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    pub user_email: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub department: String,
    pub cert_id: String,
    pub score: u32,
    #[serde(rename = "date")]
    pub date_earned: NaiveDate,
}

#[derive(Clone)]
pub struct CertificateLedger {
    store: SharedStore,
}

impl CertificateLedger {
    /// Opens the ledger, seeding the demo records on first use.
    pub fn new(store: SharedStore) -> Self {
        let ledger = Self { store };
        if ledger.store.get(keys::GLOBAL_CERTS).is_none() {
            info!("No certificate ledger found; seeding demo records");
            ledger.write_all(&demo_certificates());
        }
        ledger
    }

    /// Appends a record dated today. No-op when `(user_email, cert_id)` is
    /// already present; the first score wins.
    pub fn earn(&self, user: &Account, cert_id: &str, score: u32) {
        let mut records = self.list_all();
        if records
            .iter()
            .any(|r| r.user_email == user.email && r.cert_id == cert_id)
        {
            debug!("Certificate {cert_id} already earned by {}; ignoring", user.email);
            return;
        }

        info!("{} earned certificate {cert_id} (score {score})", user.email);
        records.push(CertificateRecord {
            user_email: user.email.clone(),
            user_name: user.name.clone(),
            department: user.department.clone(),
            cert_id: cert_id.to_string(),
            score,
            date_earned: Utc::now().date_naive(),
        });
        self.write_all(&records);
    }

    /// Records for one user, insertion order. Derived from the global list.
    pub fn list_for(&self, user_email: &str) -> Vec<CertificateRecord> {
        self.list_all()
            .into_iter()
            .filter(|r| r.user_email == user_email)
            .collect()
    }

    /// All records, insertion order. Feeds leaderboard and admin views.
    pub fn list_all(&self) -> Vec<CertificateRecord> {
        let Some(json) = self.store.get(keys::GLOBAL_CERTS) else {
            return Vec::new();
        };
        match serde_json::from_str(&json) {
            Ok(records) => records,
            Err(e) => {
                warn!("Certificate ledger is corrupt ({e}); treating as empty");
                Vec::new()
            }
        }
    }

    fn write_all(&self, records: &[CertificateRecord]) {
        match serde_json::to_string(records) {
            Ok(json) => self.store.set(keys::GLOBAL_CERTS, &json),
            Err(e) => warn!("Failed to persist certificate ledger: {e}"),
        }
    }
}

/// The two demo records the original portal ships with.
fn demo_certificates() -> Vec<CertificateRecord> {
    vec![
        CertificateRecord {
            user_email: "sumit@gmail.com".into(),
            user_name: "Sumit Gupta".into(),
            department: "Engineering".into(),
            cert_id: "python-basic".into(),
            score: 95,
            date_earned: NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date"),
        },
        CertificateRecord {
            user_email: "demo@skillup.com".into(),
            user_name: "Demo User".into(),
            department: "Design".into(),
            cert_id: "react-basic".into(),
            score: 88,
            date_earned: NaiveDate::from_ymd_opt(2024, 3, 10).expect("valid date"),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::Role;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn user(email: &str) -> Account {
        Account {
            email: email.into(),
            password: "pw".into(),
            name: "U One".into(),
            role: Role::Employee,
            company: "Co".into(),
            department: "Engineering".into(),
        }
    }

    fn ledger() -> CertificateLedger {
        CertificateLedger::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_seeds_demo_records() {
        assert_eq!(ledger().list_all().len(), 2);
    }

    #[test]
    fn test_earn_appends_for_user() {
        let ledger = ledger();
        ledger.earn(&user("u1@co.com"), "python-basic", 90);

        let certs = ledger.list_for("u1@co.com");
        assert_eq!(certs.len(), 1);
        assert_eq!(certs[0].cert_id, "python-basic");
        assert_eq!(certs[0].score, 90);
        assert_eq!(certs[0].department, "Engineering");
    }

    #[test]
    fn test_duplicate_earn_keeps_first_score() {
        let ledger = ledger();
        let u1 = user("u1@co.com");
        ledger.earn(&u1, "python-basic", 90);
        ledger.earn(&u1, "python-basic", 95);

        let certs = ledger.list_for("u1@co.com");
        assert_eq!(certs.len(), 1);
        assert_eq!(certs[0].score, 90);
    }

    #[test]
    fn test_same_cert_different_users() {
        let ledger = ledger();
        ledger.earn(&user("u1@co.com"), "python-basic", 80);
        ledger.earn(&user("u2@co.com"), "python-basic", 85);

        assert_eq!(ledger.list_for("u1@co.com").len(), 1);
        assert_eq!(ledger.list_for("u2@co.com").len(), 1);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let ledger = ledger();
        let u1 = user("u1@co.com");
        ledger.earn(&u1, "python-basic", 80);
        ledger.earn(&u1, "react-basic", 85);

        let ids: Vec<_> = ledger
            .list_for("u1@co.com")
            .into_iter()
            .map(|r| r.cert_id)
            .collect();
        assert_eq!(ids, vec!["python-basic", "react-basic"]);
    }

    #[test]
    fn test_persisted_layout_matches_original() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let ledger = CertificateLedger::new(Arc::clone(&store));
        ledger.earn(&user("u1@co.com"), "python-basic", 90);

        let json = store.get(keys::GLOBAL_CERTS).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let record = value.as_array().unwrap().last().unwrap();
        assert_eq!(record["userEmail"], "u1@co.com");
        assert_eq!(record["certId"], "python-basic");
        assert!(record["date"].is_string());
    }
}
