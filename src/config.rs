use std::env;

#[derive(Debug, Clone)]
pub struct VnpayConfig {
    pub tmn_code: String,
    pub hash_secret: String,
    pub pay_url: String,
    pub return_url: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub request_timeout_secs: u64,
    pub vnpay: VnpayConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET is not set, using an insecure development secret");
            "dev-secret".to_string()
        });
        let request_timeout_secs = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(15);
        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            request_timeout_secs,
            vnpay: VnpayConfig::from_env(),
        })
    }
}

impl VnpayConfig {
    pub fn from_env() -> Self {
        Self {
            tmn_code: env::var("VNPAY_TMN_CODE").unwrap_or_default(),
            hash_secret: env::var("VNPAY_HASH_SECRET").unwrap_or_default(),
            pay_url: env::var("VNPAY_URL")
                .unwrap_or_else(|_| "https://sandbox.vnpayment.vn/paymentv2/vpcpay.html".to_string()),
            return_url: env::var("VNPAY_RETURN_URL")
                .unwrap_or_else(|_| "http://localhost:5173/booking/vnpay-return".to_string()),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.tmn_code.is_empty() && !self.hash_secret.is_empty()
    }
}
