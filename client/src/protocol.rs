//! Wire shapes for the ledger's JSON-over-WebSocket query protocol.
//!
//! Requests carry a client-assigned `id` echoed back in the response, which
//! is what lets one connection multiplex concurrent queries. Trust lines are
//! fetched with the `account_lines` command; large line sets come back in
//! pages chained by an opaque `marker` value.

use crate::error::LedgerError;
use serde::Deserialize;
use serde_json::Value;
use trustscan_types::{AccountId, TrustLine};

/// Page size requested per `account_lines` call.
pub const DEFAULT_PAGE_LIMIT: u32 = 400;

/// Build one `account_lines` request. `marker` is `None` for the first page
/// and the previous page's marker afterwards.
pub fn account_lines_request(id: u64, account: &AccountId, limit: u32, marker: Option<&Value>) -> Value {
    let mut request = serde_json::json!({
        "id": id,
        "command": "account_lines",
        "account": account.as_str(),
        "limit": limit,
    });
    if let Some(marker) = marker {
        request["marker"] = marker.clone();
    }
    request
}

/// Envelope common to every response from the endpoint.
#[derive(Debug, Deserialize)]
pub struct ResponseEnvelope {
    pub id: Option<u64>,
    pub status: Option<String>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub retry_after_ms: Option<u64>,
}

impl ResponseEnvelope {
    pub fn parse(raw: &str) -> Result<Self, LedgerError> {
        serde_json::from_str(raw)
            .map_err(|e| LedgerError::Protocol(format!("unparseable response: {e}")))
    }

    /// Split the envelope into its payload or a classified error.
    pub fn into_result(self) -> Result<Value, LedgerError> {
        if self.status.as_deref() == Some("error") || self.error.is_some() {
            let code = self.error.unwrap_or_else(|| "unknown".into());
            let message = self.error_message.unwrap_or_else(|| code.clone());
            return Err(classify_error_code(&code, &message, self.retry_after_ms));
        }
        self.result
            .ok_or_else(|| LedgerError::Protocol("response missing result field".into()))
    }
}

/// Map a server error code onto the client error taxonomy.
fn classify_error_code(code: &str, message: &str, retry_after_ms: Option<u64>) -> LedgerError {
    match code {
        "actNotFound" | "actMalformed" => {
            LedgerError::AccountNotFound(format!("{code}: {message}"))
        }
        "slowDown" | "tooBusy" => LedgerError::RateLimited {
            message: format!("{code}: {message}"),
            retry_after_ms,
        },
        _ => LedgerError::Protocol(format!("{code}: {message}")),
    }
}

/// Raw trust-line object inside `result.lines`. The wire calls the
/// counterparty field `account`.
#[derive(Debug, Deserialize)]
struct RawLine {
    account: String,
    currency: String,
    balance: String,
    limit: String,
}

/// One decoded page: the lines plus the marker for the next page, if any.
#[derive(Debug)]
pub struct LinesPage {
    pub lines: Vec<TrustLine>,
    pub marker: Option<Value>,
}

/// Decode an `account_lines` result payload into a page.
pub fn parse_lines_page(result: &Value) -> Result<LinesPage, LedgerError> {
    let raw_lines = result
        .get("lines")
        .ok_or_else(|| LedgerError::Protocol("result missing lines array".into()))?;
    let raw_lines: Vec<RawLine> = serde_json::from_value(raw_lines.clone())
        .map_err(|e| LedgerError::Protocol(format!("malformed lines array: {e}")))?;

    let lines = raw_lines
        .into_iter()
        .map(|raw| TrustLine {
            counterparty: AccountId::new(raw.account),
            currency: raw.currency,
            limit: raw.limit,
            balance: raw.balance,
        })
        .collect();

    // `marker` present and non-null means more pages follow.
    let marker = match result.get("marker") {
        Some(Value::Null) | None => None,
        Some(m) => Some(m.clone()),
    };

    Ok(LinesPage { lines, marker })
}
