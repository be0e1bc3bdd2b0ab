use poem_openapi::Enum;
use serde::{Deserialize, Serialize};

/// Direction of a stock movement. The wire values are the Portuguese
/// operator vocabulary ("entrada" = stock in, "saida" = stock out) that
/// existing clients already send.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Enum, Serialize, Deserialize)]
pub enum MovementKind {
    #[oai(rename = "entrada")]
    #[serde(rename = "entrada")]
    Inbound,
    #[oai(rename = "saida")]
    #[serde(rename = "saida")]
    Outbound,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Inbound => "entrada",
            MovementKind::Outbound => "saida",
        }
    }
}
