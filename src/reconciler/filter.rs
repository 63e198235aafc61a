use crate::models::{RoleFilter, User};

/// Stable filter over a user slice: case-insensitive trimmed substring match
/// on name or email, combined with an exact role restriction. Input order is
/// preserved; an empty search term matches everything.
pub fn filter_users(users: &[User], search_term: &str, role_filter: RoleFilter) -> Vec<User> {
    let needle = search_term.trim().to_lowercase();
    users
        .iter()
        .filter(|u| {
            let matches_search = needle.is_empty()
                || u.name.to_lowercase().contains(&needle)
                || u.email.to_lowercase().contains(&needle);
            matches_search && role_filter.matches(u.role)
        })
        .cloned()
        .collect()
}
