//! Client-local session marker with a sliding 24-hour expiry
//!
//! The marker substitutes for server-side session validation: a JSON file
//! holding `{timestamp, username}`, rewritten on qualifying activity so the
//! window slides. It provides no real security guarantee; the backend accepts
//! any credentials, so this only gates the dashboard locally.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Maximum session age before forced re-login.
pub const SESSION_MAX_AGE_HOURS: i64 = 24;
/// Age past which the operator is warned of the upcoming expiry.
pub const SESSION_WARNING_AGE_HOURS: i64 = 23;

/// Stored session marker
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionMarker {
    timestamp: DateTime<Utc>,
    username: String,
}

/// Outcome of a session check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// No marker stored (or the stored data was malformed and discarded).
    Missing,
    /// Marker was older than the maximum age and has been cleared.
    Expired,
    /// Valid, but within one hour of expiry.
    ExpiringSoon {
        username: String,
        hours_remaining: i64,
    },
    /// Valid.
    Active { username: String },
}

impl SessionStatus {
    /// Whether the operator may use the dashboard.
    pub fn is_authenticated(&self) -> bool {
        matches!(
            self,
            SessionStatus::Active { .. } | SessionStatus::ExpiringSoon { .. }
        )
    }
}

/// File-backed session store.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and classify the stored marker.
    ///
    /// Malformed data is treated as "no session" and the file is discarded;
    /// this never surfaces an error to the caller.
    pub fn check(&self) -> SessionStatus {
        let marker = match self.read_marker() {
            Some(marker) => marker,
            None => return SessionStatus::Missing,
        };

        let age = Utc::now().signed_duration_since(marker.timestamp);
        if age >= Duration::hours(SESSION_MAX_AGE_HOURS) {
            self.discard();
            return SessionStatus::Expired;
        }
        if age >= Duration::hours(SESSION_WARNING_AGE_HOURS) {
            let remaining = Duration::hours(SESSION_MAX_AGE_HOURS) - age;
            return SessionStatus::ExpiringSoon {
                username: marker.username,
                hours_remaining: remaining.num_hours().max(0),
            };
        }
        SessionStatus::Active {
            username: marker.username,
        }
    }

    /// Store a fresh marker after a successful login.
    pub fn save(&self, username: &str) -> AppResult<()> {
        self.write_marker(&SessionMarker {
            timestamp: Utc::now(),
            username: username.to_string(),
        })
    }

    /// Rewrite the timestamp to now, sliding the expiry window.
    ///
    /// Invoked on each authenticated command, the CLI analogue of the pointer
    /// and key activity events the browser listened for. A missing or
    /// malformed marker is left alone.
    pub fn refresh(&self) -> AppResult<()> {
        match self.read_marker() {
            Some(mut marker) => {
                marker.timestamp = Utc::now();
                self.write_marker(&marker)
            }
            None => Ok(()),
        }
    }

    /// Remove the marker on explicit logout.
    pub fn clear(&self) -> AppResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .map_err(|e| AppError::Session(format!("Failed to clear session: {}", e)))?;
        }
        Ok(())
    }

    fn read_marker(&self) -> Option<SessionMarker> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(marker) => Some(marker),
            Err(e) => {
                tracing::warn!("Discarding malformed session marker: {}", e);
                self.discard();
                None
            }
        }
    }

    fn write_marker(&self, marker: &SessionMarker) -> AppResult<()> {
        let raw = serde_json::to_string(marker)
            .map_err(|e| AppError::Session(format!("Failed to encode session: {}", e)))?;
        fs::write(&self.path, raw)
            .map_err(|e| AppError::Session(format!("Failed to store session: {}", e)))
    }

    fn discard(&self) {
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> SessionStore {
        let path = std::env::temp_dir().join(format!(
            "pts-session-{}-{}.json",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        SessionStore::new(path)
    }

    fn write_aged_marker(store: &SessionStore, hours: i64, minutes: i64) {
        let marker = SessionMarker {
            timestamp: Utc::now() - Duration::hours(hours) - Duration::minutes(minutes),
            username: "operator".to_string(),
        };
        fs::write(store.path(), serde_json::to_string(&marker).unwrap()).unwrap();
    }

    #[test]
    fn test_missing_marker_is_missing() {
        let store = temp_store("missing");
        assert_eq!(store.check(), SessionStatus::Missing);
    }

    #[test]
    fn test_fresh_marker_is_active() {
        let store = temp_store("fresh");
        store.save("operator").unwrap();
        assert_eq!(
            store.check(),
            SessionStatus::Active {
                username: "operator".to_string()
            }
        );
        store.clear().unwrap();
    }

    #[test]
    fn test_25_hour_old_marker_expires_and_is_cleared() {
        let store = temp_store("expired");
        write_aged_marker(&store, 25, 0);
        assert_eq!(store.check(), SessionStatus::Expired);
        // The marker was discarded, so the next check finds nothing.
        assert_eq!(store.check(), SessionStatus::Missing);
    }

    #[test]
    fn test_23_and_a_half_hour_old_marker_warns_but_stays_valid() {
        let store = temp_store("warning");
        write_aged_marker(&store, 23, 30);
        let status = store.check();
        match status {
            SessionStatus::ExpiringSoon {
                ref username,
                hours_remaining,
            } => {
                assert_eq!(username, "operator");
                assert_eq!(hours_remaining, 0);
            }
            other => panic!("expected ExpiringSoon, got {:?}", other),
        }
        assert!(status.is_authenticated());
        store.clear().unwrap();
    }

    #[test]
    fn test_malformed_marker_is_discarded_without_error() {
        let store = temp_store("malformed");
        fs::write(store.path(), "{not json").unwrap();
        assert_eq!(store.check(), SessionStatus::Missing);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_refresh_slides_the_window() {
        let store = temp_store("refresh");
        write_aged_marker(&store, 23, 30);
        store.refresh().unwrap();
        assert_eq!(
            store.check(),
            SessionStatus::Active {
                username: "operator".to_string()
            }
        );
        store.clear().unwrap();
    }

    #[test]
    fn test_refresh_without_marker_is_a_no_op() {
        let store = temp_store("refresh-none");
        store.refresh().unwrap();
        assert_eq!(store.check(), SessionStatus::Missing);
    }
}
