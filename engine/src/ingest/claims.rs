//! External claim mapping.
//!
//! The backend collaborator ingests spreadsheets whose column names vary
//! across departments; rows arrive here as loosely-shaped `ExternalClaim`
//! values. Mapping is defensive by design: a malformed row never fails the
//! batch - missing numerics coerce to 0, a missing or unparseable claim
//! date defaults to the load instant, and string fields are trimmed and
//! uppercased before comparison.

use crate::ingest::demo::RISK_MODEL_RULE;
use crate::ingest::status_for_risk;
use crate::integrity;
use crate::models::record::{IncomeTier, LedgerRecord};
use crate::rng::DeterministicRng;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Region assigned to rows that carry no region column
const DEFAULT_REGION: &str = "RG-00";

/// Scheme assigned to rows that carry no scheme column
const DEFAULT_SCHEME: &str = "Welfare Scheme";

/// One claim row as supplied by the external backend
///
/// Field aliases cover the column-name variants the upload pipeline
/// accepts ("Citizen ID", "citizen_id", "Aadhaar Status", ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalClaim {
    /// Beneficiary identity token
    #[serde(default, alias = "Citizen_ID", alias = "citizen id", alias = "citizenid")]
    pub citizen_id: Option<String>,

    /// "TRUE" when the identity is Aadhaar-verified
    #[serde(
        default,
        alias = "Aadhaar_Verified",
        alias = "aadhaar verified",
        alias = "aadhaar status",
        alias = "aadhaar_linked"
    )]
    pub aadhaar_verified: Option<String>,

    /// Claims filed by this beneficiary in the reporting period
    #[serde(default, alias = "Claim_Count", alias = "claim count", alias = "claims")]
    pub claim_count: Option<f64>,

    /// Account standing ("ACTIVE" or anything else)
    #[serde(
        default,
        alias = "Account_Status",
        alias = "account status",
        alias = "status"
    )]
    pub account_status: Option<String>,

    /// Claimed amount in whole rupees
    #[serde(
        default,
        alias = "Scheme_Amount",
        alias = "scheme amount",
        alias = "amount"
    )]
    pub scheme_amount: Option<f64>,

    /// Welfare scheme name
    #[serde(default, alias = "Scheme")]
    pub scheme: Option<String>,

    /// Administrative region code
    #[serde(default, alias = "Region_Code", alias = "region")]
    pub region_code: Option<String>,

    /// Income tier label (LOW/MEDIUM/HIGH)
    #[serde(default, alias = "Income_Tier", alias = "tier")]
    pub income_tier: Option<String>,

    /// Claim date, RFC 3339 or plain YYYY-MM-DD
    #[serde(default, alias = "Claim_Date", alias = "claim date", alias = "date")]
    pub claim_date: Option<String>,
}

impl ExternalClaim {
    /// Risk score for this row
    ///
    /// Additive model over claim history: +30 for 4+ claims, +40 for an
    /// unverified Aadhaar, +20 for a non-active account, +10 for a payout
    /// of 5000 or more, capped at 100.
    pub fn risk_score(&self) -> u8 {
        let mut risk: u32 = 0;

        if self.claim_count.unwrap_or(0.0) >= 4.0 {
            risk += 30;
        }
        if !self.flag_matches(&self.aadhaar_verified, "TRUE") {
            risk += 40;
        }
        if !self.flag_matches(&self.account_status, "ACTIVE") {
            risk += 20;
        }
        if self.amount() >= 5_000 {
            risk += 10;
        }

        risk.min(100) as u8
    }

    /// Claimed amount, coerced to a non-negative i64
    pub fn amount(&self) -> i64 {
        self.scheme_amount.unwrap_or(0.0).max(0.0) as i64
    }

    fn flag_matches(&self, field: &Option<String>, expected: &str) -> bool {
        field
            .as_deref()
            .map(|value| value.trim().to_uppercase() == expected)
            .unwrap_or(false)
    }

    /// Dominant risk factor, phrased for the audit trail
    fn risk_note(&self) -> &'static str {
        if !self.flag_matches(&self.aadhaar_verified, "TRUE") {
            "Aadhaar verification missing for beneficiary record"
        } else if self.claim_count.unwrap_or(0.0) >= 4.0 {
            "Claim count nearing annual threshold limit"
        } else if !self.flag_matches(&self.account_status, "ACTIVE") {
            "Inactive beneficiary account with sudden activity surge"
        } else if self.amount() >= 5_000 {
            "Benefit amount exceeds scheme-defined maximum"
        } else {
            "No dominant risk factor identified"
        }
    }

    fn timestamp(&self, loaded_at: DateTime<Utc>) -> DateTime<Utc> {
        let Some(raw) = self.claim_date.as_deref() else {
            return loaded_at;
        };
        let raw = raw.trim();

        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return parsed.with_timezone(&Utc);
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                return DateTime::from_naive_utc_and_offset(midnight, Utc);
            }
        }

        loaded_at
    }
}

/// Map external claim rows onto ledger records in row order
///
/// IDs and chain links are assigned in creation order from the genesis
/// token; the RNG supplies chain tokens only.
pub fn map_claims(
    claims: &[ExternalClaim],
    loaded_at: DateTime<Utc>,
    rng: &mut DeterministicRng,
) -> Vec<LedgerRecord> {
    let mut records = Vec::with_capacity(claims.len());
    let mut previous_hash = integrity::GENESIS_TOKEN.to_string();

    for (i, claim) in claims.iter().enumerate() {
        let current_hash = integrity::next_chain_token(rng);
        let risk_score = claim.risk_score();

        let citizen_id = claim
            .citizen_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or("CIT-UNKNOWN");
        let scheme = claim
            .scheme
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SCHEME);
        let region = claim
            .region_code
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_REGION);
        let income_tier = claim
            .income_tier
            .as_deref()
            .and_then(IncomeTier::parse)
            .unwrap_or(IncomeTier::Medium);

        let record = LedgerRecord::new(
            format!("TXN-{:04}", i + 1),
            citizen_id.to_string(),
            scheme.to_string(),
            region.to_string(),
            income_tier,
            claim.amount(),
            claim.timestamp(loaded_at),
            previous_hash.clone(),
            current_hash.clone(),
        )
        .with_risk_score(risk_score)
        .with_initial_status(status_for_risk(risk_score))
        .with_audit_note(RISK_MODEL_RULE, claim.risk_note());

        previous_hash = current_hash;
        records.push(record);
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::RecordStatus;

    fn verified_claim() -> ExternalClaim {
        ExternalClaim {
            citizen_id: Some("cit-100".to_string()),
            aadhaar_verified: Some("true".to_string()),
            claim_count: Some(1.0),
            account_status: Some("Active".to_string()),
            scheme_amount: Some(2_000.0),
            scheme: Some("PM-KISAN".to_string()),
            region_code: Some("rg-02".to_string()),
            income_tier: Some("low".to_string()),
            claim_date: Some("2026-01-10".to_string()),
        }
    }

    #[test]
    fn test_risk_model_additive_rules() {
        let clean = verified_claim();
        assert_eq!(clean.risk_score(), 0);

        let mut risky = verified_claim();
        risky.claim_count = Some(4.0);
        assert_eq!(risky.risk_score(), 30);

        risky.aadhaar_verified = Some("FALSE".to_string());
        assert_eq!(risky.risk_score(), 70);

        risky.account_status = Some("DORMANT".to_string());
        assert_eq!(risky.risk_score(), 90);

        risky.scheme_amount = Some(5_000.0);
        assert_eq!(risky.risk_score(), 100);
    }

    #[test]
    fn test_missing_fields_default_defensively() {
        let bare = ExternalClaim::default();

        // Unverified + non-active from missing flags; amount coerces to 0.
        assert_eq!(bare.risk_score(), 60);
        assert_eq!(bare.amount(), 0);

        let loaded_at = Utc::now();
        let mut rng = DeterministicRng::new(1);
        let records = map_claims(&[bare], loaded_at, &mut rng);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].citizen_hash(), "CIT-UNKNOWN");
        assert_eq!(records[0].region_code(), "RG-00");
        assert_eq!(records[0].amount(), 0);
        assert_eq!(records[0].timestamp(), loaded_at);
        assert_eq!(records[0].status(), RecordStatus::Pending);
    }

    #[test]
    fn test_unparseable_date_defaults_to_load_instant() {
        let mut claim = verified_claim();
        claim.claim_date = Some("not-a-date".to_string());

        let loaded_at = Utc::now();
        let mut rng = DeterministicRng::new(1);
        let records = map_claims(&[claim], loaded_at, &mut rng);

        assert_eq!(records[0].timestamp(), loaded_at);
    }

    #[test]
    fn test_plain_date_parses_to_midnight() {
        let loaded_at = Utc::now();
        let mut rng = DeterministicRng::new(1);
        let records = map_claims(&[verified_claim()], loaded_at, &mut rng);

        assert_eq!(
            records[0].timestamp(),
            DateTime::parse_from_rfc3339("2026-01-10T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc)
        );
    }

    #[test]
    fn test_negative_amount_coerces_to_zero() {
        let mut claim = verified_claim();
        claim.scheme_amount = Some(-500.0);
        assert_eq!(claim.amount(), 0);
    }

    #[test]
    fn test_chain_assigned_in_row_order() {
        let claims = vec![verified_claim(), verified_claim(), verified_claim()];
        let mut rng = DeterministicRng::new(5);
        let records = map_claims(&claims, Utc::now(), &mut rng);

        assert_eq!(records[0].previous_hash(), integrity::GENESIS_TOKEN);
        for pair in records.windows(2) {
            assert_eq!(pair[1].previous_hash(), pair[0].current_hash());
        }
    }
}
