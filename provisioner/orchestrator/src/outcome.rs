use serde::{Deserialize, Serialize};
use ssv_types::{prefix_hex, OperatorId, RegistrationPayload};
use std::collections::BTreeSet;
use std::fmt::{self, Display};

/// Terminal state of one validator's attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum ProvisioningStatus {
    Success,
    SplitFailed(String),
    DepositFailed(String),
    RegistrationFailed(String),
}

impl ProvisioningStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Metric label of the status
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::SplitFailed(_) => "split_failed",
            Self::DepositFailed(_) => "deposit_failed",
            Self::RegistrationFailed(_) => "registration_failed",
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::SplitFailed(reason)
            | Self::DepositFailed(reason)
            | Self::RegistrationFailed(reason) => Some(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningOutcome {
    /// Index of the keystore in the store
    pub index: usize,
    /// 0x prefixed validator public key, as listed in the deposit data
    pub validator_pubkey: String,
    /// The committee the validator was assigned to
    pub committee: Vec<OperatorId>,
    pub status: ProvisioningStatus,
}

/// Chain state of validators across runs. Keys are lowercase and 0x prefixed.
///
/// A validator is either deposited and waiting for registration, or registered. A later run
/// never deposits a key listed here again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationProgress {
    #[serde(default)]
    registered: BTreeSet<String>,
    #[serde(default)]
    deposited: BTreeSet<String>,
}

fn normalize(pubkey: &str) -> String {
    prefix_hex(&pubkey.to_lowercase())
}

impl RegistrationProgress {
    pub fn is_registered(&self, pubkey: &str) -> bool {
        self.registered.contains(&normalize(pubkey))
    }

    /// True if the deposit was confirmed but the registration was not
    pub fn is_deposited(&self, pubkey: &str) -> bool {
        self.deposited.contains(&normalize(pubkey))
    }

    pub fn record_deposit(&mut self, pubkey: &str) {
        let key = normalize(pubkey);
        if !self.registered.contains(&key) {
            self.deposited.insert(key);
        }
    }

    pub fn record_registration(&mut self, pubkey: &str) {
        let key = normalize(pubkey);
        self.deposited.remove(&key);
        self.registered.insert(key);
    }

    pub fn registered(&self) -> impl Iterator<Item = &str> {
        self.registered.iter().map(String::as_str)
    }

    pub fn awaiting_registration(&self) -> impl Iterator<Item = &str> {
        self.deposited.iter().map(String::as_str)
    }

    pub fn awaiting_count(&self) -> usize {
        self.deposited.len()
    }

    // Reapply every key so hand-edited or older reports compare correctly
    pub(crate) fn normalized(&self) -> Self {
        let mut progress = Self::default();
        for key in &self.deposited {
            progress.record_deposit(key);
        }
        for key in &self.registered {
            progress.record_registration(key);
        }
        progress
    }
}

/// Result of a provisioning run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// One entry per attempted validator, in index order
    pub outcomes: Vec<ProvisioningOutcome>,
    /// Registration data of every validator that was registered in this run
    pub registered: Vec<RegistrationPayload>,
    /// Public keys that were registered by an earlier run and not attempted again
    pub skipped: Vec<String>,
    /// State after this run, including everything carried over from earlier runs. Passing it to
    /// the next run resumes instead of repeating deposits.
    #[serde(default)]
    pub progress: RegistrationProgress,
}

impl RunReport {
    pub fn successes(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_success()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ProvisioningOutcome> {
        self.outcomes.iter().filter(|o| !o.status.is_success())
    }

    pub fn any_success(&self) -> bool {
        self.successes() > 0
    }

    /// True if nothing was attempted
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

impl Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "processed: {}, registered: {}, skipped: {}, failed: {}, awaiting registration: {}",
            self.outcomes.len(),
            self.successes(),
            self.skipped.len(),
            self.failures().count(),
            self.progress.awaiting_count()
        )?;
        for outcome in self.failures() {
            writeln!(
                f,
                "  keystore {} ({}): {} {}",
                outcome.index,
                outcome.validator_pubkey,
                outcome.status.label(),
                outcome.status.reason().unwrap_or_default()
            )?;
        }
        Ok(())
    }
}
