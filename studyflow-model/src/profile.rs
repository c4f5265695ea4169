//! User profile preferences stored on the per-user document.

use serde::{Deserialize, Serialize};

use crate::display::{DateFormat, TimeFormat};

/// The user's profile and notification preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub time_format: TimeFormat,
    #[serde(default)]
    pub date_format: DateFormat,
    /// Master switch for notification emails.
    #[serde(default)]
    pub notifications: bool,
    /// Reminder schedule flags: weekly, three days, one day, day-of.
    #[serde(default)]
    pub notification_frequency: [bool; 4],
}

/// A partial profile update; unset fields keep their current value.
///
/// Queued while offline and replayed in order by the sync coordinator,
/// so later updates win field by field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub time_format: Option<TimeFormat>,
    pub date_format: Option<DateFormat>,
    pub notifications: Option<bool>,
    pub notification_frequency: Option<[bool; 4]>,
}

impl ProfileUpdate {
    /// Merges this update into an existing profile, overwriting only
    /// the supplied fields.
    pub fn apply(&self, profile: &mut UserProfile) {
        if let Some(name) = &self.name {
            profile.name.clone_from(name);
        }
        if let Some(email) = &self.email {
            profile.email.clone_from(email);
        }
        if let Some(tf) = self.time_format {
            profile.time_format = tf;
        }
        if let Some(df) = self.date_format {
            profile.date_format = df;
        }
        if let Some(on) = self.notifications {
            profile.notifications = on;
        }
        if let Some(freq) = self.notification_frequency {
            profile.notification_frequency = freq;
        }
    }
}
