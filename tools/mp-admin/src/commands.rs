//! Command implementations.
//!
//! Each command is a plain function so it can be tested without a process.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use mp_01_codec::{decode, encode, MerkleUpdate};
use mp_02_smt::{leaf_key, leaf_value, point_preimage};
use mp_03_builder::{AccountPoint, BuilderConfig, FixedCommitment, UpdateBuilder};
use mp_04_validator::{StateValidator, ValidationOutcome};
use serde::Serialize;
use shared_crypto::CkbBlake2b;
use shared_types::{parse_hash, parse_hex, to_prefixed_hex, Hash};
use tracing::info;

/// Inputs of `mp-admin build`.
#[derive(Debug, Clone)]
pub struct BuildRequest<'a> {
    /// Account mirror; a missing file is an empty mirror.
    pub state: Option<&'a Path>,
    /// Target balances.
    pub changes: &'a Path,
    /// No ledger record exists yet.
    pub genesis: bool,
    /// Current on-ledger root, when it differs from the mirror's.
    pub prior: Option<Hash>,
    /// Advance the mirror file past the built record.
    pub write_state: bool,
    pub max_accounts: Option<usize>,
}

impl<'a> BuildRequest<'a> {
    pub fn new(changes: &'a Path) -> Self {
        Self {
            state: None,
            changes,
            genesis: false,
            prior: None,
            write_state: false,
            max_accounts: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub old_root: String,
    pub new_root: String,
    pub accounts: usize,
    /// Encoded record, ready for witness 0.
    pub record: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub outcome: ValidationOutcome,
    pub exit_code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyReport {
    pub address: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueReport {
    pub point: u32,
    pub preimage: String,
    pub value: String,
}

pub fn read_accounts(path: &Path) -> Result<Vec<AccountPoint>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing accounts in {}", path.display()))
}

pub fn write_accounts(path: &Path, accounts: &[AccountPoint]) -> Result<()> {
    let mut json = serde_json::to_string_pretty(accounts)?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

/// Plan the changes against the mirror and build one record.
pub async fn build(request: &BuildRequest<'_>) -> Result<BuildReport> {
    let tracked = match request.state {
        Some(path) if path.exists() => read_accounts(path)?,
        _ => Vec::new(),
    };
    if request.genesis && !tracked.is_empty() {
        bail!(
            "genesis needs an empty mirror, found {} tracked accounts",
            tracked.len()
        );
    }

    let mut config = BuilderConfig::default();
    if let Some(max) = request.max_accounts {
        config = config.with_max_accounts(max);
    }
    let mut builder = UpdateBuilder::<CkbBlake2b>::with_accounts(config, tracked)
        .context("loading account mirror")?;

    let changes = read_accounts(request.changes)?;
    let updates = builder.plan(changes);
    let prior = if request.genesis {
        None
    } else {
        Some(request.prior.unwrap_or_else(|| builder.current_root()))
    };

    let record = builder
        .build_against(&FixedCommitment::new(prior), &updates)
        .await
        .context("building update record")?;
    let bytes = encode(&record).context("encoding update record")?;

    if request.write_state {
        let path = request.state.context("--write-state needs --state")?;
        builder.apply(&record).context("advancing account mirror")?;
        let accounts = builder.accounts();
        write_accounts(path, &accounts)?;
        info!(path = %path.display(), accounts = accounts.len(), "Account mirror written");
    }

    Ok(BuildReport {
        old_root: to_prefixed_hex(&record.old_root),
        new_root: to_prefixed_hex(&record.new_root),
        accounts: record.accounts.len(),
        record: to_prefixed_hex(&bytes),
    })
}

pub fn decode_record(record_hex: &str) -> Result<MerkleUpdate> {
    let bytes = parse_hex(record_hex).context("record is not hex")?;
    decode(&bytes).context("decoding update record")
}

/// Run the validator on raw hex parts. Only malformed hex is an error.
pub fn validate(record_hex: &str, output_hex: &str, input_hex: Option<&str>) -> Result<ValidationReport> {
    let record = parse_hex(record_hex).context("record is not hex")?;
    let output = parse_hex(output_hex).context("output data is not hex")?;
    let input = input_hex
        .map(|data| parse_hex(data).context("input data is not hex"))
        .transpose()?;

    let result = StateValidator::new().validate_parts(input.as_deref(), &output, Some(&record));
    Ok(match result {
        Ok(_) => ValidationReport {
            outcome: ValidationOutcome::Accepted,
            exit_code: 0,
            reason: None,
        },
        Err(rejection) => ValidationReport {
            outcome: rejection.outcome(),
            exit_code: rejection.outcome().exit_code(),
            reason: Some(rejection.to_string()),
        },
    })
}

pub fn hash_address(address_hex: &str) -> Result<KeyReport> {
    let address = parse_hash(address_hex).context("address must be 32 bytes of hex")?;
    Ok(KeyReport {
        address: to_prefixed_hex(&address),
        key: to_prefixed_hex(&leaf_key::<CkbBlake2b>(&address).0),
    })
}

pub fn hash_point(point: u32) -> ValueReport {
    ValueReport {
        point,
        preimage: to_prefixed_hex(&point_preimage(point)),
        value: to_prefixed_hex(&leaf_value::<CkbBlake2b>(point).0),
    }
}
