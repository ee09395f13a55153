use rand::distributions::Uniform;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const LOCAL_SUFFIX_LEN: usize = 7;

/// Fresh UUID v4 string, used for every locally created message.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Opaque identifier scoping a conversation on the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Synthesize a locally unique id: `session_<unix-millis>_<7 base-36 chars>`.
    pub fn local() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let mut rng = rand::thread_rng();
        let pick = Uniform::from(0..BASE36.len());
        let suffix: String = (0..LOCAL_SUFFIX_LEN)
            .map(|_| BASE36[rng.sample(pick)] as char)
            .collect();
        Self(format!("session_{millis}_{suffix}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
