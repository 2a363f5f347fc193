use std::collections::HashMap;

use once_cell::sync::Lazy;
use relay_primitives::rpc::{CallConventionInfo, SupportedFunction};
use relay_primitives::types::TransientMap;
use serde::Serialize;

use crate::transient::{extract_document, TransientPayloadError};

pub const SMART_CONTRACT: &str = "SmartContract";
pub const DOCUMENT_CONTRACT: &str = "DocumentContract";

/// How a chaincode function expects to receive its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallConvention {
    /// The first `arity` request arguments, in order
    Positional { arity: usize },
    /// No arguments, the `document` entry of the payload as transient data
    Transient { document: &'static str },
    /// The `document` entry as transient data plus all request arguments
    /// encoded as a single JSON array argument
    TransientWithArgs { document: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractFunction {
    pub namespace: &'static str,
    pub name: &'static str,
    pub convention: CallConvention,
}

const CONTRACT_FUNCTIONS: &[ContractFunction] = &[
    ContractFunction {
        namespace: SMART_CONTRACT,
        name: "CreateCar",
        convention: CallConvention::Positional { arity: 1 },
    },
    ContractFunction {
        namespace: SMART_CONTRACT,
        name: "UpdateCarOwner",
        convention: CallConvention::Positional { arity: 2 },
    },
    ContractFunction {
        namespace: DOCUMENT_CONTRACT,
        name: "CreateDocument",
        convention: CallConvention::Positional { arity: 1 },
    },
    ContractFunction {
        namespace: SMART_CONTRACT,
        name: "SetTransaction",
        convention: CallConvention::Positional { arity: 1 },
    },
    ContractFunction {
        namespace: SMART_CONTRACT,
        name: "CreatePrivateCar",
        convention: CallConvention::Transient { document: "car" },
    },
    ContractFunction {
        namespace: SMART_CONTRACT,
        name: "SetPrivateTransaction",
        convention: CallConvention::TransientWithArgs {
            document: "transaction",
        },
    },
];

static REGISTRY: Lazy<HashMap<&'static str, &'static ContractFunction>> = Lazy::new(|| {
    CONTRACT_FUNCTIONS
        .iter()
        .map(|function| (function.name, function))
        .collect()
});

/// Find the descriptor of a supported function
pub fn lookup(function: &str) -> Option<&'static ContractFunction> {
    REGISTRY.get(function).copied()
}

/// All supported functions, in registration order
pub fn all() -> impl Iterator<Item = &'static ContractFunction> {
    CONTRACT_FUNCTIONS.iter()
}

#[derive(Debug, thiserror::Error, Serialize, PartialEq, Eq, Clone)]
pub enum SubmissionError {
    #[error("{function} expects {expected} argument(s), got {provided}")]
    MissingArguments {
        function: String,
        expected: usize,
        provided: usize,
    },
    #[error("Invalid transient data: {0}")]
    InvalidTransientPayload(#[from] TransientPayloadError),
    #[error("Failed to encode arguments: {0}")]
    ArgumentEncoding(String),
}

/// A fully prepared call, ready to be handed to a contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Plain {
        function: String,
        args: Vec<String>,
    },
    WithTransient {
        function: String,
        transient: TransientMap,
        args: Vec<String>,
    },
}

impl Submission {
    pub fn function(&self) -> &str {
        match self {
            Submission::Plain { function, .. } | Submission::WithTransient { function, .. } => {
                function
            }
        }
    }
}

impl ContractFunction {
    /// Name of the function as addressed inside a multi-contract chaincode
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.namespace, self.name)
    }

    pub fn prepare(
        &self,
        args: &[String],
        transient_data: Option<&str>,
    ) -> Result<Submission, SubmissionError> {
        match self.convention {
            CallConvention::Positional { arity } => {
                if args.len() < arity {
                    return Err(SubmissionError::MissingArguments {
                        function: self.name.to_string(),
                        expected: arity,
                        provided: args.len(),
                    });
                }
                Ok(Submission::Plain {
                    function: self.qualified_name(),
                    args: args[..arity].to_vec(),
                })
            }
            CallConvention::Transient { document } => Ok(Submission::WithTransient {
                function: self.qualified_name(),
                transient: extract_document(transient_data, document)?,
                args: vec![],
            }),
            CallConvention::TransientWithArgs { document } => {
                let transient = extract_document(transient_data, document)?;
                let encoded_args = serde_json::to_string(args)
                    .map_err(|e| SubmissionError::ArgumentEncoding(e.to_string()))?;
                Ok(Submission::WithTransient {
                    function: self.qualified_name(),
                    transient,
                    args: vec![encoded_args],
                })
            }
        }
    }
}

impl From<&ContractFunction> for SupportedFunction {
    fn from(function: &ContractFunction) -> Self {
        let convention = match function.convention {
            CallConvention::Positional { arity } => CallConventionInfo::Positional { arity },
            CallConvention::Transient { document } => CallConventionInfo::Transient {
                document: document.to_string(),
            },
            CallConvention::TransientWithArgs { document } => {
                CallConventionInfo::TransientWithArgs {
                    document: document.to_string(),
                }
            }
        };
        SupportedFunction {
            function: function.name.to_string(),
            qualified_name: function.qualified_name(),
            convention,
        }
    }
}
