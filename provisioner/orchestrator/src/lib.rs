//! Sequencing of validator provisioning.
//!
//! A [`Provisioner`] runs a batch of prepared validators through the pipeline: committee
//! assignment, keystore decryption, key splitting, deposit and registration. Every failure that
//! concerns a single validator is recorded in the [`RunReport`] and the run continues with the
//! next one. Only the errors in [`ProvisioningError`] end a run early, and all of them are raised
//! before the first transaction is submitted.

mod error;
mod gateway;
mod metrics;
mod outcome;
mod store;

pub use error::{GatewayError, ProvisioningError, StoreError};
pub use gateway::{ChainDepositGateway, ChainRegistrationGateway};
pub use crate::metrics::encode_metrics;
pub use outcome::{ProvisioningOutcome, ProvisioningStatus, RegistrationProgress, RunReport};
pub use store::{FileKeystoreStore, KeystoreEntry, KeystoreStore};

use key_share::{decrypt_keystore, split};
use operator_directory::{partition_into_committees, CommitteeSelection, OperatorRegistry};
use serde::{Deserialize, Serialize};
use ssv_types::{Committee, RegistrationPayload, MIN_OPERATORS};
use tracing::{error, info, instrument, warn};

#[derive(Clone, Debug, Serialize, Deserialize)]
/// Configuration for a [`Provisioner`]
pub struct Config {
    /// The number of operators in a committee. Must be of the form 3f+1.
    pub committee_size: usize,
    /// How validators are assigned to committees
    pub selection: CommitteeSelection,
    /// Store index of the first validator of a run
    pub first_index: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            committee_size: MIN_OPERATORS,
            selection: CommitteeSelection::default(),
            first_index: 1,
        }
    }
}

pub struct Provisioner<R, S, D, G> {
    config: Config,
    registry: R,
    store: S,
    deposit_gateway: D,
    registration_gateway: G,
}

// A validator whose inputs are loaded and whose committee is known
struct PendingValidator<'a> {
    index: usize,
    entry: KeystoreEntry,
    committee: &'a Committee,
    // Deposited by an earlier run, only the registration is outstanding
    deposited: bool,
}

// The validators a run attempts, and the registered ones it passed over
struct RunPlan<'a> {
    pending: Vec<PendingValidator<'a>>,
    skipped: Vec<String>,
}

impl<R, S, D, G> Provisioner<R, S, D, G>
where
    R: OperatorRegistry,
    S: KeystoreStore,
    D: ChainDepositGateway,
    G: ChainRegistrationGateway,
{
    pub fn new(
        config: Config,
        registry: R,
        store: S,
        deposit_gateway: D,
        registration_gateway: G,
    ) -> Self {
        Self {
            config,
            registry,
            store,
            deposit_gateway,
            registration_gateway,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Deposit and register `count` new validators, walking the store from the configured first
    /// index.
    ///
    /// `previous` is the progress of earlier runs. Registered validators are listed as skipped
    /// and do not count towards `count`. Validators that were deposited but not registered are
    /// registered without a second deposit, also outside of `count`.
    #[instrument(skip_all, fields(count = count, first_index = self.config.first_index))]
    pub async fn run(
        &self,
        count: usize,
        password: &str,
        previous: &RegistrationProgress,
    ) -> Result<RunReport, ProvisioningError> {
        let mut report = RunReport {
            progress: previous.normalized(),
            ..Default::default()
        };
        if count == 0 && report.progress.awaiting_count() == 0 {
            info!("No validators to provision");
            return Ok(report);
        }

        let operators = self.registry.fetch_operators().await.map_err(|e| {
            error!(error = %e, "Failed to fetch operators");
            ProvisioningError::DirectoryUnavailable(e.to_string())
        })?;

        let committees = partition_into_committees(&operators, self.config.committee_size);
        if committees.is_empty() {
            return Err(ProvisioningError::NoCommittees {
                operators: operators.len(),
                committee_size: self.config.committee_size,
            });
        }
        info!(
            operators = operators.len(),
            committees = committees.len(),
            "Formed committees"
        );

        let plan = self.prepare(count, &committees, &report.progress)?;
        for validator_pubkey in &plan.skipped {
            metrics::inc_counter(&metrics::PROVISIONER_VALIDATORS_SKIPPED_TOTAL);
            info!(validator = %validator_pubkey, "Validator already registered, skipping");
        }
        report.skipped = plan.skipped;

        for validator in plan.pending {
            let validator_pubkey = validator.entry.deposit.validator_pubkey();
            let (status, registration) = self.provision(&validator, password).await;
            metrics::inc_counter_vec(&metrics::PROVISIONER_VALIDATORS_TOTAL, &[status.label()]);
            match &status {
                ProvisioningStatus::Success => {
                    report.progress.record_registration(&validator_pubkey);
                    info!(index = validator.index, validator = %validator_pubkey, "Validator provisioned")
                }
                failure => {
                    // The deposit went through, the next run only registers
                    if matches!(failure, ProvisioningStatus::RegistrationFailed(_)) {
                        report.progress.record_deposit(&validator_pubkey);
                    }
                    warn!(
                        index = validator.index,
                        validator = %validator_pubkey,
                        status = failure.label(),
                        reason = failure.reason().unwrap_or_default(),
                        "Validator not provisioned"
                    )
                }
            }

            report.registered.extend(registration);
            report.outcomes.push(ProvisioningOutcome {
                index: validator.index,
                validator_pubkey,
                committee: validator.committee.operator_ids(),
                status,
            });
        }

        info!(
            processed = report.outcomes.len(),
            registered = report.successes(),
            skipped = report.skipped.len(),
            awaiting_registration = report.progress.awaiting_count(),
            "Provisioning run complete"
        );
        Ok(report)
    }

    // Walk the store until `count` new validators are found and every deposited but
    // unregistered key has been seen. Everything is loaded and assigned before the first
    // submission, so configuration problems surface without side effects.
    fn prepare<'a>(
        &self,
        count: usize,
        committees: &'a [Committee],
        progress: &RegistrationProgress,
    ) -> Result<RunPlan<'a>, ProvisioningError> {
        let mut plan = RunPlan {
            pending: Vec::new(),
            skipped: Vec::new(),
        };
        let mut new_validators = 0;
        let mut awaiting = progress.awaiting_count();

        for index in self.config.first_index.. {
            if new_validators == count && awaiting == 0 {
                break;
            }

            let entry = match self.store.load(index) {
                Ok(entry) => entry,
                // Only unregistered leftovers were still being looked for
                Err(StoreError::NotFound(_)) if new_validators == count => {
                    warn!(
                        index,
                        awaiting, "Store exhausted before every deposited validator was found"
                    );
                    break;
                }
                Err(e) => {
                    return Err(ProvisioningError::KeystoreStore {
                        index,
                        reason: e.to_string(),
                    })
                }
            };

            let validator_pubkey = entry.deposit.validator_pubkey();
            if progress.is_registered(&validator_pubkey) {
                plan.skipped.push(validator_pubkey);
                continue;
            }
            let deposited = progress.is_deposited(&validator_pubkey);
            if deposited {
                awaiting = awaiting.saturating_sub(1);
            } else if new_validators == count {
                continue;
            } else {
                new_validators += 1;
            }

            let position = plan.pending.len();
            let committee = self
                .config
                .selection
                .select(committees, position)
                .ok_or_else(|| {
                    ProvisioningError::CommitteeSelection(format!(
                        "{:?} does not select any of {} committees",
                        self.config.selection,
                        committees.len()
                    ))
                })?;
            plan.pending.push(PendingValidator {
                index,
                entry,
                committee,
                deposited,
            });
        }
        Ok(plan)
    }

    // Drive one validator through the pipeline. Never fails, every error becomes a status.
    #[instrument(skip_all, fields(index = validator.index))]
    async fn provision(
        &self,
        validator: &PendingValidator<'_>,
        password: &str,
    ) -> (ProvisioningStatus, Option<RegistrationPayload>) {
        let registration = {
            let _timer = metrics::start_timer(&metrics::PROVISIONER_SPLIT_SECONDS);
            match split_validator(validator, password) {
                Ok(registration) => registration,
                Err(reason) => return (ProvisioningStatus::SplitFailed(reason), None),
            }
        };

        if validator.deposited {
            info!("Deposit confirmed by an earlier run, resuming at registration");
        } else {
            let _timer = metrics::start_timer_vec(
                &metrics::PROVISIONER_CHAIN_SUBMISSION_SECONDS,
                &["deposit"],
            );
            if let Err(e) = self
                .deposit_gateway
                .deposit(&validator.entry.deposit.prefixed())
                .await
            {
                return (ProvisioningStatus::DepositFailed(e.to_string()), None);
            }
        }

        {
            let _timer = metrics::start_timer_vec(
                &metrics::PROVISIONER_CHAIN_SUBMISSION_SECONDS,
                &["registration"],
            );
            if let Err(e) = self.registration_gateway.register(&registration).await {
                return (ProvisioningStatus::RegistrationFailed(e.to_string()), None);
            }
        }

        (ProvisioningStatus::Success, Some(registration))
    }
}

fn split_validator(
    validator: &PendingValidator<'_>,
    password: &str,
) -> Result<RegistrationPayload, String> {
    let key_material =
        decrypt_keystore(&validator.entry.keystore_json, password).map_err(|e| e.to_string())?;
    if key_material.validator_pubkey_hex() != validator.entry.deposit.validator_pubkey() {
        return Err("deposit data does not match keystore".to_string());
    }
    let share_set = split(key_material, validator.committee).map_err(|e| e.to_string())?;
    Ok(share_set.to_registration())
}
