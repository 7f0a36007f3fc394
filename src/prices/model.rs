use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    #[serde(default)]
    pub symbol: String,
    /// Missing or `null` prices read as zero.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub price: f64,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

/// Normalized list returned by `GET /prices`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceList {
    pub prices: Vec<PriceEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PriceQuote {
    pub id: String,
    pub price: f64,
}

/// The two body layouts the upstream is known to send. Variants are tried in
/// declaration order, so the structured list wins over the flat map.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum UpstreamPayload {
    Listed { prices: Vec<PriceEntry> },
    Flat(BTreeMap<String, f64>),
}

impl From<UpstreamPayload> for PriceList {
    fn from(payload: UpstreamPayload) -> Self {
        match payload {
            UpstreamPayload::Listed { prices } => PriceList { prices },
            UpstreamPayload::Flat(map) => PriceList {
                prices: map
                    .into_iter()
                    .map(|(symbol, price)| PriceEntry { symbol, price })
                    .collect(),
            },
        }
    }
}

impl PriceList {
    /// Both sides go through the same Unicode uppercase mapping.
    pub fn find(&self, symbol: &str) -> Option<&PriceEntry> {
        let wanted = symbol.to_uppercase();
        self.prices
            .iter()
            .find(|entry| entry.symbol.to_uppercase() == wanted)
    }
}
