use log::debug;

use crate::models::DiscoveredUser;

/// Users listed on the discovery screen with their follow state.
#[derive(Debug, Default)]
pub struct DiscoveryStore {
    users: Vec<DiscoveredUser>,
    disposed: bool,
}

impl DiscoveryStore {
    pub fn new(initial: Vec<DiscoveredUser>) -> Self {
        Self {
            users: initial,
            disposed: false,
        }
    }

    pub fn users(&self) -> &[DiscoveredUser] {
        &self.users
    }

    pub fn get(&self, user_id: &str) -> Option<&DiscoveredUser> {
        self.users.iter().find(|u| u.user.id == user_id)
    }

    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    pub fn load_all(&mut self, users: Vec<DiscoveredUser>) {
        if self.disposed {
            debug!("dropping user load for disposed store");
            return;
        }
        self.users = users;
    }

    /// Takes follow state and follower count from the follow/unfollow response.
    pub fn apply_follow(&mut self, user_id: &str, server_following: bool, server_follower_count: u64) {
        if self.disposed {
            return;
        }
        match self.users.iter_mut().find(|u| u.user.id == user_id) {
            Some(user) => {
                user.is_following = server_following;
                user.follower_count = server_follower_count;
            }
            None => debug!("follow result for user {user_id} not in list"),
        }
    }

    pub fn filter_by_name(&self, query: &str) -> Vec<&DiscoveredUser> {
        let needle = query.trim().to_lowercase();
        self.users
            .iter()
            .filter(|u| needle.is_empty() || u.user.name.to_lowercase().contains(&needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserSummary;

    fn user(id: &str, name: &str) -> DiscoveredUser {
        DiscoveredUser {
            user: UserSummary {
                id: id.into(),
                name: name.into(),
                profile_picture: None,
            },
            bio: None,
            is_following: false,
            follower_count: 10,
        }
    }

    #[test]
    fn follow_and_unfollow_use_server_values() {
        let mut store = DiscoveryStore::new(vec![user("u1", "Ana"), user("u2", "Bo")]);
        store.apply_follow("u1", true, 11);
        assert!(store.get("u1").unwrap().is_following);
        assert_eq!(store.get("u1").unwrap().follower_count, 11);

        store.apply_follow("u1", false, 10);
        assert!(!store.get("u1").unwrap().is_following);
        assert_eq!(store.get("u1").unwrap().follower_count, 10);
        assert_eq!(store.get("u2").unwrap().follower_count, 10);
    }

    #[test]
    fn follow_for_unknown_user_is_noop() {
        let mut store = DiscoveryStore::new(vec![user("u1", "Ana")]);
        store.apply_follow("ghost", true, 99);
        assert_eq!(store.users(), &[user("u1", "Ana")]);
    }

    #[test]
    fn disposed_store_ignores_follow() {
        let mut store = DiscoveryStore::new(vec![user("u1", "Ana")]);
        store.dispose();
        store.apply_follow("u1", true, 11);
        store.load_all(Vec::new());
        assert_eq!(store.users(), &[user("u1", "Ana")]);
    }

    #[test]
    fn name_filter_is_case_insensitive() {
        let store = DiscoveryStore::new(vec![user("u1", "Ana"), user("u2", "Bo"), user("u3", "Joana")]);
        assert_eq!(store.filter_by_name("").len(), 3);
        let ids: Vec<_> = store.filter_by_name("ANA").iter().map(|u| u.user.id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u3"]);
    }
}
