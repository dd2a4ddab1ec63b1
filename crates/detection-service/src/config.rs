use anyhow::Result;
use std::env;

/// Runtime configuration, loaded from the environment.
#[derive(Debug, Clone)]
pub struct DetectionServiceConfig {
    /// Address to bind the HTTP server to
    pub bind_addr: String,

    /// Node ID for this detection service instance
    pub node_id: String,

    /// Path to the detector model artifact
    pub model_path: String,

    /// External record store credentials, when fully configured
    pub salesforce: Option<SalesforceConfig>,
}

/// Credentials for the external record store.
#[derive(Debug, Clone)]
pub struct SalesforceConfig {
    pub username: String,
    pub password: String,
    pub security_token: String,
    /// `login` (production) or `test` (sandbox)
    pub domain: String,
}

impl SalesforceConfig {
    /// Username, password, and token must all be present; a partial set
    /// means the store is unavailable, never a startup failure.
    fn from_env() -> Option<Self> {
        let username = env::var("SF_USERNAME").ok()?;
        let password = env::var("SF_PASSWORD").ok()?;
        let security_token = env::var("SF_SECURITY_TOKEN").ok()?;
        let domain = env::var("SF_DOMAIN").unwrap_or_else(|_| "login".to_string());

        Some(Self {
            username,
            password,
            security_token,
            domain,
        })
    }
}

impl DetectionServiceConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr =
            env::var("DETECT_SERVICE_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let model_path =
            env::var("MODEL_PATH").unwrap_or_else(|_| "models/mobilenet_ssd.onnx".to_string());

        let node_id = env::var("NODE_ID").unwrap_or_else(|_| {
            format!(
                "detection-service-{}",
                hostname::get()
                    .ok()
                    .and_then(|h| h.into_string().ok())
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
            )
        });

        Ok(Self {
            bind_addr,
            node_id,
            model_path,
            salesforce: SalesforceConfig::from_env(),
        })
    }
}
