use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;

use shopkit_core::error::AppError;
use shopkit_core::result::AppResult;
use shopkit_core::types::{PageResponse, QuerySpec, UserId};
use shopkit_entity::user::{CreateUser, USER_SORT_FIELDS, User, UserFilter, UserStatus};

use super::MemoryStore;
use crate::query::{checked_sort, directed, page_slice};
use crate::store::UserStore;

fn compare(a: &User, b: &User, field: &str) -> Ordering {
    match field {
        "email" => a.email.cmp(&b.email),
        "created_at" => a.created_at.cmp(&b.created_at),
        "last_name" => a.last_name.cmp(&b.last_name),
        _ => Ordering::Equal,
    }
    .then(a.id.cmp(&b.id))
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        let email = data.email.to_lowercase();
        if tables.users.values().any(|u| u.email == email) {
            return Err(AppError::conflict("email is not available"));
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(tables.next_id()),
            first_name: data.first_name.clone(),
            middle_name: data.middle_name.clone(),
            last_name: data.last_name.clone(),
            email,
            password_hash: data.password_hash.clone(),
            phone: data.phone.clone(),
            status: data.status,
            created_at: now,
            updated_at: now,
            verified_at: None,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.trim().to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self, spec: &QuerySpec<UserFilter>) -> AppResult<PageResponse<User>> {
        let sort = checked_sort(spec.sort.as_ref(), USER_SORT_FIELDS)?;
        let tables = self.tables.read().await;

        let mut users: Vec<User> = tables
            .users
            .values()
            .filter(|u| spec.filters.iter().all(|f| f.matches(u)))
            .cloned()
            .collect();
        match sort {
            Some(sort) => {
                users.sort_by(|a, b| directed(compare(a, b, &sort.field), sort.direction))
            }
            None => users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))),
        }

        let total = users.len() as u64;
        Ok(PageResponse::new(page_slice(users, &spec.page), &spec.page, total))
    }

    async fn update_status(&self, id: UserId, status: UserStatus) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.status = status;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }
}
