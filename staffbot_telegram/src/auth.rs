//! Administrative access checks.

/// True when `user_id` is on the configured admin whitelist. Unknown
/// senders are never admins.
#[must_use]
pub fn is_admin(admin_user_ids: &[i64], user_id: Option<i64>) -> bool {
    user_id.is_some_and(|id| admin_user_ids.contains(&id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitelist_membership_decides() {
        assert!(is_admin(&[1, 2], Some(2)));
        assert!(!is_admin(&[1, 2], Some(3)));
    }

    #[test]
    fn unknown_sender_is_never_admin() {
        assert!(!is_admin(&[1, 2], None));
        assert!(!is_admin(&[], None));
    }
}
