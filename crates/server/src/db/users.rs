use chrono::{DateTime, Utc};
use fruit_porter_core::{AccountStatus, Email, OrderStatus, UserId};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::User;
use crate::store::query::{Predicate, Query};
use crate::store::Database;

/// Fields for inserting a new account. The id and creation time are
/// assigned by the repository.
#[derive(Debug)]
pub struct NewUser {
    pub email: Email,
    pub password_hash: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_admin: bool,
    pub credit: Decimal,
}

/// Admin member-list filters. `search` matches name, email or phone,
/// case-insensitively; paging applies after filtering.
#[derive(Debug, Default)]
pub struct MemberListFilter {
    pub search: Option<String>,
    pub status: Option<AccountStatus>,
    pub limit: Option<usize>,
    pub offset: usize,
}

/// A member row for the admin console, with purchase stats folded in.
#[derive(Debug, Clone, Serialize)]
pub struct MemberSummary {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub credit: Decimal,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub order_count: usize,
    pub total_spent: Decimal,
}

pub struct UserRepository<'a> {
    db: &'a mut Database,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a mut Database) -> Self {
        Self { db }
    }

    pub fn insert(&mut self, new_user: NewUser) -> UserId {
        let id = self.db.issue_user_id();
        self.db.users.push(User {
            id,
            email: new_user.email,
            password_hash: new_user.password_hash,
            name: new_user.name,
            phone: new_user.phone,
            address: new_user.address,
            is_admin: new_user.is_admin,
            credit: new_user.credit,
            status: AccountStatus::Active,
            created_at: Utc::now(),
        });
        id
    }

    pub fn find_by_id(&self, id: UserId) -> Option<User> {
        Query::new()
            .filter(Predicate::IdEq(id.as_i32()))
            .run_one(&self.db.users)
    }

    pub fn find_by_email(&self, email: &Email) -> Option<User> {
        Query::new()
            .filter(Predicate::EmailEq(email.clone()))
            .run_one(&self.db.users)
    }

    pub fn update_profile(
        &mut self,
        id: UserId,
        name: String,
        phone: Option<String>,
        address: Option<String>,
    ) -> usize {
        self.db
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .map_or(0, |user| {
                user.name = name;
                user.phone = phone;
                user.address = address;
                1
            })
    }

    /// Replaces the credit balance.
    pub fn set_credit(&mut self, id: UserId, credit: Decimal) -> usize {
        self.db
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .map_or(0, |user| {
                user.credit = credit;
                1
            })
    }

    /// Adds `delta` to the credit balance; negative deltas deduct.
    pub fn adjust_credit(&mut self, id: UserId, delta: Decimal) -> usize {
        self.db
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .map_or(0, |user| {
                user.credit += delta;
                1
            })
    }

    pub fn set_status(&mut self, id: UserId, status: AccountStatus) -> usize {
        self.db
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .map_or(0, |user| {
                user.status = status;
                1
            })
    }

    pub fn delete(&mut self, id: UserId) -> usize {
        let before = self.db.users.len();
        self.db.users.retain(|u| u.id != id);
        before - self.db.users.len()
    }

    /// Non-admin accounts, newest first, each with its order count and
    /// lifetime spend. Returns the page plus the total match count
    /// before paging.
    pub fn members(&self, filter: &MemberListFilter) -> (Vec<MemberSummary>, usize) {
        let mut matched = Query::new()
            .filter(Predicate::IsAdmin(false))
            .newest_first()
            .run(&self.db.users);
        if let Some(status) = filter.status {
            matched.retain(|user| user.status == status);
        }
        if let Some(needle) = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            let needle = needle.to_lowercase();
            matched.retain(|user| {
                user.name.to_lowercase().contains(&needle)
                    || user.email.as_str().contains(&needle)
                    || user
                        .phone
                        .as_deref()
                        .is_some_and(|phone| phone.contains(&needle))
            });
        }
        let total = matched.len();
        let mut page: Vec<_> = matched.into_iter().skip(filter.offset).collect();
        if let Some(limit) = filter.limit {
            page.truncate(limit);
        }
        let summaries = page
            .into_iter()
            .map(|user| {
                let orders: Vec<_> = self
                    .db
                    .orders
                    .iter()
                    .filter(|o| o.user_id == user.id && o.status != OrderStatus::Cancelled)
                    .collect();
                MemberSummary {
                    id: user.id,
                    email: user.email,
                    name: user.name,
                    phone: user.phone,
                    address: user.address,
                    credit: user.credit,
                    status: user.status,
                    created_at: user.created_at,
                    order_count: orders.len(),
                    total_spent: orders.iter().map(|o| o.total_amount).sum(),
                }
            })
            .collect();
        (summaries, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str, name: &str) -> NewUser {
        NewUser {
            email: Email::parse(email).expect("valid test email"),
            password_hash: "hash".to_owned(),
            name: name.to_owned(),
            phone: None,
            address: None,
            is_admin: false,
            credit: Decimal::ZERO,
        }
    }

    #[test]
    fn insert_assigns_sequential_ids() {
        let mut db = Database::empty();
        let mut repo = UserRepository::new(&mut db);
        let first = repo.insert(new_user("a@example.com", "A"));
        let second = repo.insert(new_user("b@example.com", "B"));
        assert_eq!(first, UserId::new(1));
        assert_eq!(second, UserId::new(2));
    }

    #[test]
    fn update_of_missing_row_affects_nothing() {
        let mut db = Database::empty();
        let mut repo = UserRepository::new(&mut db);
        let affected = repo.update_profile(UserId::new(42), "Nobody".to_owned(), None, None);
        assert_eq!(affected, 0);
    }

    #[test]
    fn adjust_credit_round_trips() {
        let mut db = Database::empty();
        let mut repo = UserRepository::new(&mut db);
        let id = repo.insert(NewUser {
            credit: Decimal::from(100),
            ..new_user("c@example.com", "C")
        });
        assert_eq!(repo.adjust_credit(id, Decimal::from(500)), 1);
        assert_eq!(repo.adjust_credit(id, Decimal::from(-500)), 1);
        let user = repo.find_by_id(id).expect("user exists");
        assert_eq!(user.credit, Decimal::from(100));
    }

    #[test]
    fn find_by_email_matches_normalized_address() {
        let mut db = Database::empty();
        let mut repo = UserRepository::new(&mut db);
        repo.insert(new_user("mixed@example.com", "M"));
        let lookup = Email::parse("Mixed@Example.com").expect("valid test email");
        assert!(repo.find_by_email(&lookup).is_some());
    }

    #[test]
    fn member_list_filters_on_search_and_status() {
        let mut db = Database::empty();
        let mut repo = UserRepository::new(&mut db);
        let alice = repo.insert(NewUser {
            phone: Some("555-0199".to_owned()),
            ..new_user("alice@example.com", "Alice")
        });
        repo.insert(new_user("bob@example.com", "Bob"));
        repo.set_status(alice, AccountStatus::Suspended);

        let (page, total) = repo.members(&MemberListFilter {
            search: Some("ALICE".to_owned()),
            ..MemberListFilter::default()
        });
        assert_eq!(total, 1);
        assert_eq!(page.first().map(|m| m.id), Some(alice));

        let (page, _) = repo.members(&MemberListFilter {
            search: Some("555-0199".to_owned()),
            ..MemberListFilter::default()
        });
        assert_eq!(page.len(), 1);

        let (page, total) = repo.members(&MemberListFilter {
            status: Some(AccountStatus::Suspended),
            ..MemberListFilter::default()
        });
        assert_eq!(total, 1);
        assert_eq!(page.first().map(|m| m.id), Some(alice));

        let (page, total) = repo.members(&MemberListFilter {
            limit: Some(1),
            offset: 1,
            ..MemberListFilter::default()
        });
        assert_eq!(total, 2);
        assert_eq!(page.len(), 1);
    }

    #[test]
    fn delete_reports_rows_removed() {
        let mut db = Database::empty();
        let mut repo = UserRepository::new(&mut db);
        let id = repo.insert(new_user("gone@example.com", "G"));
        assert_eq!(repo.delete(id), 1);
        assert_eq!(repo.delete(id), 0);
    }
}
