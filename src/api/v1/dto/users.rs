/*
 * Responsibility
 * - Users request/response DTOs
 * - validate() performs shape checks only; ownership rules live in handlers
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::user_repo::{UserDoc, UserFields};

fn check_profile(name: &str, email: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("name is required");
    }
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err("email must be a valid address");
    }
    Ok(())
}

fn check_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 6 {
        return Err("password must be at least 6 chars");
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    // Older clients send the plain password as `passwordHash`.
    #[serde(alias = "passwordHash")]
    pub password: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub apartment: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        check_profile(&self.name, &self.email)?;
        check_password(&self.password)
    }

    /// Profile fields; `is_admin` is decided by the caller (register never grants it).
    pub fn fields(&self, is_admin: bool) -> UserFields {
        UserFields {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.clone(),
            is_admin,
            street: self.street.clone(),
            apartment: self.apartment.clone(),
            zip: self.zip.clone(),
            city: self.city.clone(),
            country: self.country.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    /// Absent: keep the current password.
    pub password: Option<String>,
    #[serde(default)]
    pub phone: String,
    /// Absent: keep the current flag. Only admins may change it.
    pub is_admin: Option<bool>,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub apartment: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        check_profile(&self.name, &self.email)?;
        if let Some(password) = &self.password {
            check_password(password)?;
        }
        Ok(())
    }

    pub fn fields(&self, is_admin: bool) -> UserFields {
        UserFields {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.clone(),
            is_admin,
            street: self.street.clone(),
            apartment: self.apartment.clone(),
            zip: self.zip.clone(),
            city: self.city.clone(),
            country: self.country.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// The user's email.
    pub user: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub is_admin: bool,
    pub street: String,
    pub apartment: String,
    pub zip: String,
    pub city: String,
    pub country: String,
}

impl From<UserDoc> for UserResponse {
    fn from(doc: UserDoc) -> Self {
        let f = doc.fields;
        Self {
            id: doc.id,
            name: f.name,
            email: f.email,
            phone: f.phone,
            is_admin: f.is_admin,
            street: f.street,
            apartment: f.apartment,
            zip: f.zip,
            city: f.city,
            country: f.country,
        }
    }
}
