use relay_primitives::rpc::{GetSupportedFunctionsResult, SupportedFunction};

use crate::functions;

pub fn get_supported_functions() -> GetSupportedFunctionsResult {
    GetSupportedFunctionsResult {
        functions: functions::all().map(SupportedFunction::from).collect(),
    }
}
