// Credential store trait - process-local key/value lookup
pub const ACCESS_TOKEN_KEY: &str = "access_token";

pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}
