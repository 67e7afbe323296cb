/// Env-backed service configuration. A service derives `serde::Deserialize`
/// on its config struct and calls `from_env()` once at startup; field names
/// map to SCREAMING_SNAKE env vars via envy.
///
/// # Panics
///
/// Panics when a required variable is missing or malformed; configuration
/// errors are fatal at startup.
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn from_env() -> Self {
        envy::from_env().expect("missing or malformed environment configuration")
    }
}
