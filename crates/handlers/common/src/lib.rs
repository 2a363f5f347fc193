pub mod functions;
pub mod invoke_transaction;
pub mod supported_functions;
pub mod transient;
