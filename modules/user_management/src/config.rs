use serde::{Deserialize, Serialize};

/// Configuration for the user_management module (`modules.user_management`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserManagementConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
    /// Actor recorded on log entries written by the REST layer.
    #[serde(default = "default_log_owner")]
    pub log_owner: String,
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,
}

impl Default for UserManagementConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            log_owner: default_log_owner(),
            seed_demo_data: default_seed_demo_data(),
        }
    }
}

fn default_page_size() -> u32 {
    20
}

fn default_max_page_size() -> u32 {
    100
}

fn default_log_owner() -> String {
    "Admin".to_string()
}

fn default_seed_demo_data() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = UserManagementConfig::default();
        assert_eq!(cfg.default_page_size, 20);
        assert_eq!(cfg.max_page_size, 100);
        assert_eq!(cfg.log_owner, "Admin");
        assert!(cfg.seed_demo_data);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: UserManagementConfig =
            serde_json::from_str(r#"{"default_page_size": 5, "seed_demo_data": false}"#).unwrap();
        assert_eq!(cfg.default_page_size, 5);
        assert_eq!(cfg.max_page_size, 100);
        assert!(!cfg.seed_demo_data);
    }

    #[test]
    fn unknown_fields_rejected() {
        let res: Result<UserManagementConfig, _> = serde_json::from_str(r#"{"page": 1}"#);
        assert!(res.is_err());
    }
}
