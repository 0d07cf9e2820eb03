//! Account status.

use crate::status::status_enum;

status_enum! {
    /// Whether an account may sign in.
    UserStatus as "user_status" {
        Active => "active",
        /// Deactivated by an administrator. Sessions are ended on the switch.
        Inactive => "inactive",
    }
}

impl UserStatus {
    pub fn can_login(&self) -> bool {
        matches!(self, Self::Active)
    }
}
