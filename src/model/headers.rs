use serde::{Deserialize, Serialize};

use super::endpoint::EndpointReference;
use super::types::{
    AttributedQName, AttributedUnsignedLong, AttributedUri, ProblemAction, RelatesTo,
};

/// The message-addressing properties of one document: every 2005/08 header
/// slot, each carrying its schema content model.
///
/// `retry_after` is the xs:unsignedLong slot; `relates_to` is the only
/// repeatable header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressingHeaders {
    pub to: Option<AttributedUri>,
    pub from: Option<EndpointReference>,
    pub reply_to: Option<EndpointReference>,
    pub fault_to: Option<EndpointReference>,
    pub action: Option<AttributedUri>,
    pub message_id: Option<AttributedUri>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relates_to: Vec<RelatesTo>,
    pub retry_after: Option<AttributedUnsignedLong>,
    pub problem_action: Option<ProblemAction>,
    pub problem_header: Option<AttributedQName>,
}

impl AddressingHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of headers present, counting each `wsa:RelatesTo` separately.
    pub fn header_count(&self) -> usize {
        let singles = [
            self.to.is_some(),
            self.from.is_some(),
            self.reply_to.is_some(),
            self.fault_to.is_some(),
            self.action.is_some(),
            self.message_id.is_some(),
            self.retry_after.is_some(),
            self.problem_action.is_some(),
            self.problem_header.is_some(),
        ];
        singles.iter().filter(|present| **present).count() + self.relates_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.header_count() == 0
    }
}
