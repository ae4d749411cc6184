//! Redirect targets around the login flow.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginConfig {
    /// Where the browser lands after a successful callback.
    #[serde(default = "default_after_login")]
    pub redirect_after_login: String,
    /// Where the frontend should send the user after logout.
    #[serde(default = "default_after_logout")]
    pub redirect_after_logout: String,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            redirect_after_login: default_after_login(),
            redirect_after_logout: default_after_logout(),
        }
    }
}

fn default_after_login() -> String {
    "http://localhost:5173/app/mindmap".to_string()
}

fn default_after_logout() -> String {
    "http://localhost:5173/".to_string()
}
