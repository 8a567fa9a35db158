/// Raw environment values, gathered once before composition.
///
/// Values are kept as strings here; parsing and defaulting happen in the
/// loader so that bad input can be reported as warnings in one place.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    pub ipfs_gateway: Option<String>,
    pub img_cid: Option<String>,
    pub img_count: Option<String>,
    pub img_list: Option<Vec<String>>,
    pub total_supply: Option<String>,
    pub thirdweb_client_id: Option<String>,
    pub site_url: Option<String>,
    pub pfp_url: Option<String>,
    pub pfp_gateway: Option<String>,
    pub base_rpc_url: Option<String>,
    pub contract_address: Option<String>,
    pub auto_connect: Option<String>,
    pub share_text: Option<String>,
}

impl EnvConfig {
    /// Snapshot the process environment.
    pub fn gather() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            ipfs_gateway: var("IPFS_GATEWAY"),
            img_cid: var("IMG_CID"),
            img_count: var("IMG_COUNT"),
            img_list: var("IMG_LIST").map(|raw| parse_csv(&raw)),
            total_supply: var("TOTAL_SUPPLY"),
            thirdweb_client_id: var("THIRDWEB_CLIENT_ID"),
            site_url: var("SITE_URL"),
            pfp_url: var("PFP_URL"),
            pfp_gateway: var("PFP_GATEWAY"),
            base_rpc_url: var("BASE_RPC_URL"),
            contract_address: var("CONTRACT_ADDRESS"),
            auto_connect: var("AUTO_CONNECT"),
            share_text: var("SHARE_TEXT"),
        }
    }
}

pub(crate) fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|part| {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}
