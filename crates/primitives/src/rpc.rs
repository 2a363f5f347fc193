use serde::{Deserialize, Serialize};

//------------------------------------------------------------------------------
// RPC Methods - Parameters and Results
//------------------------------------------------------------------------------

/// Parameters for invoking a chaincode function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeTransactionParams {
    pub channel: String,
    pub chaincode: String,
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
    pub identity: String,
    pub organization: String,
    /// JSON object with a single top-level key naming the private document
    #[serde(default)]
    pub transient_data: Option<String>,
}

/// Transaction accepted by the network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedTransaction {
    pub transaction_id: String,
}

impl SubmittedTransaction {
    /// The chaincode returns the transaction id as its raw result
    pub fn from_raw(bytes: &[u8]) -> Self {
        Self {
            transaction_id: String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "status",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum InvocationOutcome {
    Submitted(SubmittedTransaction),
    /// The identity was missing and its registration has been triggered. The
    /// invocation has to be retried once registration completes.
    NeedsRegistration {
        identity: String,
        organization: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeTransactionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub outcome: InvocationOutcome,
}

impl InvokeTransactionResult {
    pub fn submitted(transaction: SubmittedTransaction) -> Self {
        Self {
            message: None,
            outcome: InvocationOutcome::Submitted(transaction),
        }
    }

    pub fn needs_registration(identity: &str, organization: &str) -> Self {
        Self {
            message: Some(format!(
                "Identity {} was not found in the {} wallet. Registration has been \
                 triggered, retry once it completes",
                identity, organization
            )),
            outcome: InvocationOutcome::NeedsRegistration {
                identity: identity.to_string(),
                organization: organization.to_string(),
            },
        }
    }

    pub fn transaction_id(&self) -> Option<&str> {
        match &self.outcome {
            InvocationOutcome::Submitted(transaction) => Some(&transaction.transaction_id),
            InvocationOutcome::NeedsRegistration { .. } => None,
        }
    }
}

/// How a supported function takes its arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum CallConventionInfo {
    Positional { arity: usize },
    Transient { document: String },
    TransientWithArgs { document: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedFunction {
    pub function: String,
    pub qualified_name: String,
    pub convention: CallConventionInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetSupportedFunctionsResult {
    pub functions: Vec<SupportedFunction>,
}
