//! # Update Builder
//!
//! Turns a batch of account point changes into a complete `MerkleUpdate`:
//!
//! ```text
//! working tree ← mirror (or empty, for genesis)
//! set old leaves            → old_root   (must equal the ledger's root)
//! set new leaves            → new_root
//! prove_multi(all keys)     → proof      (checks both roots)
//! ```
//!
//! The builder keeps a mirror of the committed state (address → point plus
//! the matching tree). Building never touches the mirror; [`UpdateBuilder::apply`]
//! advances it once a record has been accepted by the ledger.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use mp_01_codec::{encode, AccountUpdate, MerkleUpdate};
use mp_02_smt::{
    leaf_key, leaf_value, new_leaf, old_leaf, LeafKey, ProofTree, ProofVerifier, ProvenLeaf,
    SmtAdapter, SmtVerifier,
};
use point_telemetry::{
    log_event, log_transition, HistogramTimer, ACCOUNTS_PER_RECORD, BUILD_DURATION, BUILD_FAILURES,
    RECORDS_BUILT,
};
use shared_crypto::{CkbBlake2b, HashPrimitive};
use shared_types::{to_prefixed_hex, Address, Hash};

use crate::domain::{AccountPoint, BuildError, BuilderConfig};
use crate::ports::CommitmentSource;

const COMPONENT: &str = "builder";

/// Off-chain producer of update records.
#[derive(Debug, Clone)]
pub struct UpdateBuilder<H: HashPrimitive = CkbBlake2b> {
    config: BuilderConfig,
    points: BTreeMap<Address, u32>,
    tree: SmtAdapter<H>,
}

impl UpdateBuilder {
    /// Builder using the CKB hash with an empty mirror.
    pub fn new(config: BuilderConfig) -> Result<Self, BuildError> {
        Self::with_config(config)
    }
}

impl<H: HashPrimitive> UpdateBuilder<H> {
    pub fn with_config(config: BuilderConfig) -> Result<Self, BuildError> {
        config.validate()?;
        Ok(Self {
            config,
            points: BTreeMap::new(),
            tree: SmtAdapter::new(),
        })
    }

    /// Builder whose mirror starts from `accounts`. Later entries for the
    /// same address win.
    pub fn with_accounts<I>(config: BuilderConfig, accounts: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = AccountPoint>,
    {
        let mut builder = Self::with_config(config)?;
        for AccountPoint { address, point } in accounts {
            builder.points.insert(address, point);
            builder
                .tree
                .set(leaf_key::<H>(&address), Some(leaf_value::<H>(point)));
        }
        log_event!(
            debug,
            COMPONENT,
            "Mirror loaded",
            accounts = builder.points.len(),
            hasher = H::NAME
        );
        Ok(builder)
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Root of the mirrored state.
    pub fn current_root(&self) -> Hash {
        self.tree.root()
    }

    /// Tracked point of `address`.
    pub fn point(&self, address: &Address) -> Option<u32> {
        self.points.get(address).copied()
    }

    /// Snapshot of the mirror, ordered by address.
    pub fn accounts(&self) -> Vec<AccountPoint> {
        self.points
            .iter()
            .map(|(address, point)| AccountPoint::new(*address, *point))
            .collect()
    }

    /// Turn target balances into updates, filling `old_point` from the
    /// mirror (0 for untracked accounts).
    pub fn plan<I>(&self, changes: I) -> Vec<AccountUpdate>
    where
        I: IntoIterator<Item = AccountPoint>,
    {
        changes
            .into_iter()
            .map(|change| {
                let old_point = self.point(&change.address).unwrap_or(0);
                AccountUpdate::new(change.address, old_point, change.point)
            })
            .collect()
    }

    /// Build the record moving the ledger from `prior_root` to the state
    /// implied by `updates`.
    ///
    /// `None` means no ledger record exists yet: the old state is the empty
    /// tree and every update must be an insertion.
    pub fn build_transition(
        &self,
        prior_root: Option<Hash>,
        updates: &[AccountUpdate],
    ) -> Result<MerkleUpdate, BuildError> {
        let _timer = HistogramTimer::new(&BUILD_DURATION);
        match self.try_build(prior_root, updates) {
            Ok(record) => {
                RECORDS_BUILT.inc();
                ACCOUNTS_PER_RECORD.observe(record.accounts.len() as f64);
                log_transition!(
                    info,
                    COMPONENT,
                    "Update record built",
                    record.old_root,
                    record.new_root,
                    accounts = record.accounts.len(),
                    genesis = prior_root.is_none()
                );
                Ok(record)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// [`build_transition`](Self::build_transition) followed by encoding.
    pub fn build_record(
        &self,
        prior_root: Option<Hash>,
        updates: &[AccountUpdate],
    ) -> Result<Vec<u8>, BuildError> {
        let record = self.build_transition(prior_root, updates)?;
        encode(&record).map_err(|e| self.fail(e.into()))
    }

    /// Fetch the current commitment from `source`, then build.
    pub async fn build_against<S>(
        &self,
        source: &S,
        updates: &[AccountUpdate],
    ) -> Result<MerkleUpdate, BuildError>
    where
        S: CommitmentSource + ?Sized,
    {
        let prior_root = source
            .current_commitment()
            .await
            .map_err(|e| self.fail(e.into()))?;
        self.build_transition(prior_root, updates)
    }

    /// Rebuild a mirror from the full chain of records, creation first.
    ///
    /// Each record is applied to the mirror the previous one left, so a
    /// gap or a reordering surfaces as `StaleMirror`.
    pub fn replay<'a, I>(config: BuilderConfig, records: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = &'a MerkleUpdate>,
    {
        let mut builder = Self::with_config(config)?;
        let mut count = 0usize;
        for record in records {
            builder.apply(record)?;
            count += 1;
        }
        log_event!(
            debug,
            COMPONENT,
            "Mirror replayed",
            records = count,
            accounts = builder.points.len()
        );
        Ok(builder)
    }

    /// Advance the mirror past an accepted record.
    ///
    /// The record must start at the mirror's root and its new leaves must
    /// reproduce its new root; otherwise the mirror is left untouched.
    pub fn apply(&mut self, record: &MerkleUpdate) -> Result<(), BuildError> {
        let mirror_root = self.tree.root();
        if record.old_root != mirror_root {
            return Err(self.fail(stale(&mirror_root, &record.old_root)));
        }

        let mut tree = self.tree.clone();
        for update in &record.accounts {
            let (key, value) = new_leaf::<H>(update);
            tree.set(key, value);
        }
        let reached = tree.root();
        if reached != record.new_root {
            return Err(self.fail(stale(&reached, &record.new_root)));
        }

        for update in &record.accounts {
            self.points.insert(update.address, update.new_point);
        }
        self.tree = tree;
        log_transition!(
            debug,
            COMPONENT,
            "Mirror advanced",
            record.old_root,
            record.new_root,
            accounts = self.points.len()
        );
        Ok(())
    }

    fn try_build(
        &self,
        prior_root: Option<Hash>,
        updates: &[AccountUpdate],
    ) -> Result<MerkleUpdate, BuildError> {
        let genesis = prior_root.is_none();
        let accounts = self.check_updates(genesis, updates)?;

        let mut tree = if genesis {
            SmtAdapter::<H>::new()
        } else {
            self.tree.clone()
        };

        for update in &accounts {
            let (key, value) = old_leaf::<H>(update);
            tree.set(key, value);
        }
        let old_root = tree.root();
        if let Some(expected) = prior_root {
            if expected != old_root {
                return Err(BuildError::PriorRootMismatch {
                    expected: to_prefixed_hex(&expected),
                    computed: to_prefixed_hex(&old_root),
                });
            }
        }

        for update in &accounts {
            let (key, value) = new_leaf::<H>(update);
            tree.set(key, value);
        }
        let new_root = tree.root();

        let keys: Vec<LeafKey> = accounts
            .iter()
            .map(|update| leaf_key::<H>(&update.address))
            .collect();
        let proof = tree.prove_multi(&keys)?;

        if self.config.verify_before_emit {
            self_check::<H>(&old_root, &new_root, &proof, &accounts)?;
        }

        log_event!(
            debug,
            COMPONENT,
            "Proof generated",
            proof_len = proof.len(),
            hasher = H::NAME
        );

        Ok(MerkleUpdate {
            old_root,
            new_root,
            accounts,
            proof,
        })
    }

    /// Validate the caller's batch and drop exact duplicates, keeping the
    /// first occurrence's position.
    fn check_updates(
        &self,
        genesis: bool,
        updates: &[AccountUpdate],
    ) -> Result<Vec<AccountUpdate>, BuildError> {
        if updates.is_empty() {
            return Err(BuildError::EmptyUpdate);
        }

        let mut seen: BTreeMap<Address, &AccountUpdate> = BTreeMap::new();
        let mut accounts = Vec::with_capacity(updates.len());

        for update in updates {
            match seen.entry(update.address) {
                Entry::Occupied(entry) => {
                    let first = *entry.get();
                    if first.old_point != update.old_point {
                        return Err(inconsistent(
                            &update.address,
                            format!(
                                "old point given as both {} and {}",
                                first.old_point, update.old_point
                            ),
                        ));
                    }
                    if first.new_point != update.new_point {
                        return Err(inconsistent(
                            &update.address,
                            format!(
                                "new point given as both {} and {}",
                                first.new_point, update.new_point
                            ),
                        ));
                    }
                    continue;
                }
                Entry::Vacant(entry) => {
                    entry.insert(update);
                }
            }

            if genesis && !update.is_insertion() {
                return Err(inconsistent(
                    &update.address,
                    format!("genesis update claims old point {}", update.old_point),
                ));
            }
            if !genesis && update.is_insertion() && self.points.contains_key(&update.address) {
                return Err(inconsistent(
                    &update.address,
                    "tracked account claims to be absent (old point 0)".to_string(),
                ));
            }
            if update.new_point == 0 {
                // A zero balance is stored as value(0) but reads back as absent.
                log_event!(
                    warn,
                    COMPONENT,
                    "New point 0 cannot be updated by a later record",
                    address = %to_prefixed_hex(&update.address)
                );
            }
            accounts.push(update.clone());
        }

        let max = self.config.max_accounts_per_update;
        if accounts.len() > max {
            return Err(BuildError::TooManyAccounts {
                count: accounts.len(),
                max,
            });
        }
        Ok(accounts)
    }

    fn fail(&self, error: BuildError) -> BuildError {
        BUILD_FAILURES.with_label_values(&[error.reason()]).inc();
        log_event!(warn, COMPONENT, "Update build aborted", error = %error);
        error
    }
}

/// Replay both validator checks against a fresh proof.
fn self_check<H: HashPrimitive>(
    old_root: &Hash,
    new_root: &Hash,
    proof: &[u8],
    accounts: &[AccountUpdate],
) -> Result<(), BuildError> {
    let verifier = SmtVerifier::<H>::new();

    let old: Vec<ProvenLeaf> = accounts.iter().map(old_leaf::<H>).collect();
    if !verifier.verify(old_root, proof, &old) {
        return Err(BuildError::ProofSelfCheckFailed { side: "old" });
    }

    let new: Vec<ProvenLeaf> = accounts.iter().map(new_leaf::<H>).collect();
    if !verifier.verify(new_root, proof, &new) {
        return Err(BuildError::ProofSelfCheckFailed { side: "new" });
    }
    Ok(())
}

fn inconsistent(address: &Address, reason: String) -> BuildError {
    BuildError::InconsistentUpdate {
        address: to_prefixed_hex(address),
        reason,
    }
}

fn stale(mirror_root: &Hash, record_root: &Hash) -> BuildError {
    BuildError::StaleMirror {
        mirror_root: to_prefixed_hex(mirror_root),
        record_root: to_prefixed_hex(record_root),
    }
}
